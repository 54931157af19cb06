use thiserror::Error;

use crate::core::ports::{RemoteError, StoreError};

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("no integration configured for project {project_id}")]
    ConfigMissing { project_id: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
