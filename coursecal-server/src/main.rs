mod cors;
mod routes;
mod state;

use std::path::PathBuf;

use anyhow::{Context, Result};
use coursecal_core::AppConfig;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let config_path = std::env::var_os("COURSECAL_CONFIG").map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;
    let state = AppState::from_config(&config)?;

    let app = routes::app(state)
        .layer(cors::cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(
        %addr,
        origins = ?config.cors.allowed_origins,
        "coursecal-server listening"
    );

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;

    Ok(())
}
