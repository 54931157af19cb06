// Composition root.
//
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Wire implementations into the reconciliation engine and the router.

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, EnvFilter};

use time_sync::adapters::activecollab::ActiveCollabFactory;
use time_sync::adapters::in_memory::{InMemoryIntegrationStore, InMemoryLinkStore};
use time_sync::application::reconcile::Reconciler;
use time_sync::core::config::{ActiveCollabTarget, IntegrationConfig, SyncDefaults};
use time_sync::shell::http::router;
use time_sync::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    // In-memory stores for now; one integration can be seeded from the
    // environment for local runs.
    let links = Arc::new(InMemoryLinkStore::new());
    let integrations = Arc::new(InMemoryIntegrationStore::new());
    if let Some(config) = integration_from_env() {
        tracing::info!(
            project_id = config.source_project_id,
            "seeded integration from environment"
        );
        integrations.insert(config).await;
    }

    let reconciler = Arc::new(Reconciler::new(
        links,
        integrations,
        Arc::new(ActiveCollabFactory::new()),
    ));

    let app = router(AppState { reconciler }).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".into())
        .parse()?;
    tracing::info!("webhook endpoints: http://{addr}/hooks");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn integration_from_env() -> Option<IntegrationConfig> {
    let source_project_id = std::env::var("SYNC_SOURCE_PROJECT_ID").ok()?;
    let base_url = std::env::var("SYNC_AC_URL").ok()?;
    let project_id = std::env::var("SYNC_AC_PROJECT_ID").ok()?.parse().ok()?;
    let token = std::env::var("SYNC_AC_TOKEN").ok()?;

    let job_type_id = env_i64("SYNC_JOB_TYPE_ID")?;
    let billable_status = env_i64("SYNC_BILLABLE_STATUS")?;
    let subscribers = std::env::var("SYNC_SUBSCRIBERS")
        .ok()
        .map(|raw| {
            raw.split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    Some(IntegrationConfig {
        id: "env".into(),
        source_project_id,
        source_account_id: std::env::var("SYNC_SOURCE_ACCOUNT_ID").ok(),
        activecollab: ActiveCollabTarget {
            base_url,
            project_id,
            token,
        },
        defaults: SyncDefaults {
            job_type_id,
            billable_status,
            subscribers,
        },
    })
}

fn env_i64(name: &str) -> Option<i64> {
    std::env::var(name).ok()?.parse().ok()
}
