use std::sync::Arc;

use crate::application::reconcile::Reconciler;

#[derive(Clone)]
pub struct AppState {
    pub reconciler: Arc<Reconciler>,
}
