use std::env;

const DEFAULT_SETTLEMENT_INTERVAL_SECS: u64 = 300;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,

    // Bearer token for the admin endpoints. Unset means every admin call is rejected.
    pub api_token: Option<String>,

    // Scheduled settlement
    pub settlement_poller_enabled: bool,
    pub settlement_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),

            settlement_poller_enabled: env::var("SETTLEMENT_POLLER_ENABLED")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
            settlement_interval_secs: env::var("SETTLEMENT_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_SETTLEMENT_INTERVAL_SECS),
        })
    }

    /// Returns true if an admin API token is configured.
    pub fn has_api_token(&self) -> bool {
        self.api_token.is_some()
    }
}
