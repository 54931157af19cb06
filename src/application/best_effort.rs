// Best-effort operations: actions whose failure is logged but never aborts
// the enclosing reconciliation. Cleanup calls (deleting an already-gone
// remote entity, dropping a link record) go through here; primary mutating
// calls never do.

use std::fmt::Display;
use std::future::Future;

pub async fn best_effort<T, E>(label: &str, operation: impl Future<Output = Result<T, E>>)
where
    E: Display,
{
    if let Err(error) = operation.await {
        tracing::warn!(%error, label, "best-effort operation failed");
    }
}

#[cfg(test)]
mod best_effort_tests {
    use rstest::rstest;

    use super::best_effort;

    #[rstest]
    #[tokio::test]
    async fn it_should_swallow_failures() {
        // Must not panic or propagate.
        best_effort("noop", async { Err::<(), _>("boom") }).await;
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_pass_successes_through_silently() {
        best_effort("noop", async { Ok::<_, String>(42) }).await;
    }
}
