pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;
use crate::store::SettlementStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SettlementStore>,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    /// Held for the whole of every settlement run so runs never overlap.
    pub settle_lock: Arc<Mutex<()>>,
}
