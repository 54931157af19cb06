// In-memory implementations of the ports. Used by the composition root for
// local runs and by every engine and shell test. Each store carries an
// offline switch so failure paths stay testable.

pub mod integration_store;
pub mod link_store;
pub mod remote;

pub use integration_store::InMemoryIntegrationStore;
pub use link_store::InMemoryLinkStore;
pub use remote::{InMemoryRemoteFactory, InMemoryRemoteProject};
