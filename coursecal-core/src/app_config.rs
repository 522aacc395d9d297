//! Application configuration.
//!
//! Values come from serde defaults, then an optional TOML file, then
//! `COURSECAL_*` environment variables (`COURSECAL_SERVER__PORT=8080`,
//! `COURSECAL_CORS__ALLOWED_ORIGINS=https://a.example,https://b.example`).

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{CourseCalError, CourseCalResult};
use crate::export::ExportConfig;
use crate::ics::CalendarSettings;

pub static DEFAULT_CONFIG_FILE: &str = "coursecal.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// JSON seed file loaded into the in-memory repositories
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub calendar: CalendarSettings,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Exact origins, or `"*"` for any
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        CorsConfig {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
        }
    }
}

impl CorsConfig {
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl AppConfig {
    /// Load configuration. An explicit `path` must exist; without one,
    /// `coursecal.toml` in the working directory is read if present.
    pub fn load(path: Option<&Path>) -> CourseCalResult<Self> {
        let file = match path {
            Some(p) => File::from(p.to_path_buf()).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("COURSECAL")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| CourseCalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CourseCalError::Config(e.to_string()))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Write the defaults as TOML, refusing to overwrite an existing file.
    pub fn create_default_config(path: &Path) -> CourseCalResult<()> {
        if path.exists() {
            return Err(CourseCalError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }

        let contents = toml::to_string_pretty(&AppConfig::default())
            .map_err(|e| CourseCalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CourseCalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, format!("# coursecal configuration\n\n{contents}"))
            .map_err(|e| CourseCalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursecal.toml");
        std::fs::write(
            &path,
            r#"
seed_path = "data/seed.json"

[server]
port = 8080

[cors]
allowed_origins = ["https://school.example"]

[export]
default_session_minutes = 50

[calendar.single]
name = "Lecture"
timezone = "Europe/Helsinki"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cors.allowed_origins, vec!["https://school.example"]);
        assert_eq!(config.export.default_session_minutes, 50);
        assert_eq!(config.export.deadline_minutes, 15);
        assert_eq!(config.calendar.single.name, "Lecture");
        assert_eq!(config.calendar.batch, CalendarSettings::default().batch);
        assert_eq!(config.seed_path, Some(PathBuf::from("data/seed.json")));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, CourseCalError::Config(_)));
    }

    #[test]
    fn default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("coursecal.toml");

        AppConfig::create_default_config(&path).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());
        assert!(AppConfig::create_default_config(&path).is_err());
    }

    #[test]
    fn wildcard_origin() {
        let mut cors = CorsConfig::default();
        assert!(!cors.allows_any());
        cors.allowed_origins.push("*".into());
        assert!(cors.allows_any());
    }

    #[test]
    fn bind_address_joins_host_and_port() {
        assert_eq!(AppConfig::default().bind_address(), "127.0.0.1:4000");
    }
}
