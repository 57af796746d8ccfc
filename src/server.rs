use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::routes;
use crate::state::AppState;

/// Install the global tracing subscriber once per process. `RUST_LOG` wins over the default `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Build the application state from `config` and serve until the process is stopped.
pub async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Classmarket API in {:?} mode", config.environment);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let state = AppState::from_config(config).await?;
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Classmarket API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
