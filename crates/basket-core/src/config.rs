use crate::app_config::{AppConfig, Environment, TotalsMode};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("BASKET_ENV", "development"))?;
    let database_url = or_default("DATABASE_URL", "sqlite://basket.db");
    let bind_addr = parse_addr("BASKET_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("BASKET_LOG_LEVEL", "info");
    let retailers_path = PathBuf::from(or_default(
        "BASKET_RETAILERS_PATH",
        "./config/retailers.yaml",
    ));
    let api_keys = lookup("BASKET_API_KEYS").ok().filter(|s| !s.trim().is_empty());

    let totals_mode = or_default("BASKET_TOTALS_MODE", "best_effort")
        .parse::<TotalsMode>()
        .map_err(|reason| invalid("BASKET_TOTALS_MODE", reason))?;

    let source_timeout_secs = parse_u64("BASKET_SOURCE_TIMEOUT_SECS", "10")?;
    if source_timeout_secs == 0 {
        return Err(invalid(
            "BASKET_SOURCE_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }
    let rate_limit_per_minute = parse_usize("BASKET_RATE_LIMIT_PER_MINUTE", "120")?;

    let db_max_connections = parse_u32("BASKET_DB_MAX_CONNECTIONS", "5")?;
    let db_acquire_timeout_secs = parse_u64("BASKET_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        retailers_path,
        api_keys,
        totals_mode,
        source_timeout_secs,
        rate_limit_per_minute,
        db_max_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test` or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "BASKET_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
