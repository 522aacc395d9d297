//! CORS allow-list

use anyhow::{Context, Result};
use axum::http::{HeaderValue, header};
use coursecal_core::app_config::CorsConfig;
use tower_http::cors::{Any, CorsLayer};

pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION]);

    if config.allows_any() {
        return Ok(layer.allow_origin(Any));
    }

    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(layer.allow_origin(origins))
}
