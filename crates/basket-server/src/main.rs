mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = basket_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = basket_db::PoolConfig::from_app_config(&config);
    let pool = basket_db::connect_pool(&config.database_url, pool_config).await?;
    basket_db::run_migrations(&pool).await?;

    let retailers = basket_core::load_retailers(&config.retailers_path)?;
    tracing::info!(
        retailers = retailers.retailers.len(),
        path = %config.retailers_path.display(),
        "loaded retailer configuration"
    );

    let state = AppState {
        pool,
        sources: Arc::new(basket_catalog::build_sources(&retailers)),
        totals_mode: config.totals_mode,
        source_timeout: Duration::from_secs(config.source_timeout_secs),
    };
    let auth = AuthState::from_config(config.api_keys.as_deref(), &config.env)?;
    let rate_limit = RateLimitState::new(config.rate_limit_per_minute, Duration::from_secs(60));
    let app = build_app(state, auth, rate_limit);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, totals_mode = %config.totals_mode, "basket server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
