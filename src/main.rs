use std::sync::Arc;

use tokio::sync::Mutex;

use pickem::api::router::create_router;
use pickem::config::AppConfig;
use pickem::db;
use pickem::services::settlement::run_settlement_poller;
use pickem::store::{PgStore, SettlementStore};
use pickem::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Database connected");

    let store: Arc<dyn SettlementStore> = Arc::new(PgStore::new(pool));
    let settle_lock = Arc::new(Mutex::new(()));
    let metrics_handle = pickem::metrics::init_metrics();

    if !config.has_api_token() {
        tracing::warn!("API_TOKEN is not set, protected endpoints will reject every request");
    }

    // --- Scheduled settlement ---
    if config.settlement_poller_enabled {
        let poller_store = store.clone();
        let poller_lock = settle_lock.clone();
        let interval_secs = config.settlement_interval_secs;
        tokio::spawn(async move {
            run_settlement_poller(poller_store, poller_lock, interval_secs).await;
        });
        tracing::info!(interval_secs, "Settlement poller spawned");
    } else {
        tracing::info!("Settlement poller disabled (SETTLEMENT_POLLER_ENABLED=false)");
    }

    let state = AppState {
        store,
        config,
        metrics_handle,
        settle_lock,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}
