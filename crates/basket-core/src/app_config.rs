use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How per-store totals are computed when picking the cheapest store.
///
/// `BestEffort` sums only the cheapest matches that landed at each store, so a
/// store can win without stocking the whole basket. `FullBasketOnly` restricts
/// the candidates to stores that list every basket item and totals each
/// store's own cheapest listing per item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalsMode {
    #[default]
    BestEffort,
    FullBasketOnly,
}

impl std::fmt::Display for TotalsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalsMode::BestEffort => write!(f, "best_effort"),
            TotalsMode::FullBasketOnly => write!(f, "full_basket_only"),
        }
    }
}

impl std::str::FromStr for TotalsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "best_effort" => Ok(TotalsMode::BestEffort),
            "full_basket_only" => Ok(TotalsMode::FullBasketOnly),
            other => Err(format!(
                "unknown totals mode '{other}'; expected 'best_effort' or 'full_basket_only'"
            )),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub retailers_path: PathBuf,
    pub api_keys: Option<String>,
    pub totals_mode: TotalsMode,
    pub source_timeout_secs: u64,
    pub rate_limit_per_minute: usize,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("retailers_path", &self.retailers_path)
            .field("database_url", &self.database_url)
            .field("api_keys", &self.api_keys.as_ref().map(|_| "[redacted]"))
            .field("totals_mode", &self.totals_mode)
            .field("source_timeout_secs", &self.source_timeout_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
