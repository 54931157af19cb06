// HTTP shell for the webhook surface.
//
// Responsibilities
// - Route registration and vendor header checks.
// - Translate reconciliation outcomes into 200/500 responses; webhook
//   senders treat anything other than 2xx as retry-worthy.

pub mod clockify;
pub mod http;
pub mod jira;
pub mod state;
