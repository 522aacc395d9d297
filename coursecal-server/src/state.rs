use std::sync::Arc;

use anyhow::{Context, Result};
use coursecal_core::clock::{Clock, SystemClock};
use coursecal_core::{AppConfig, CalendarExporter, ExportConfig, IcsEncoder, Repos, SeedData};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repos: Repos,
    pub exporter: Arc<CalendarExporter>,
    /// Timestamps of created records
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        repos: Repos,
        encoder: IcsEncoder,
        export: ExportConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let exporter = CalendarExporter::new(repos.clone(), encoder, export);
        AppState {
            repos,
            exporter: Arc::new(exporter),
            clock,
        }
    }

    /// Repositories seeded from `seed_path` when configured, empty otherwise
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let seed = match config.seed_path {
            Some(ref path) => {
                let seed = SeedData::load(path)
                    .with_context(|| format!("Failed to load seed data from {}", path.display()))?;
                info!(
                    path = %path.display(),
                    users = seed.users.len(),
                    courses = seed.courses.len(),
                    "loaded seed data"
                );
                seed
            }
            None => SeedData::default(),
        };

        Ok(AppState::new(
            Repos::from_seed(seed),
            IcsEncoder::from_settings(config.calendar.clone()),
            config.export.clone(),
            Arc::new(SystemClock),
        ))
    }
}
