use std::path::Path;

use anyhow::Result;
use coursecal_core::AppConfig;
use owo_colors::OwoColorize;

pub fn run(path: &Path) -> Result<()> {
    AppConfig::create_default_config(path)?;
    println!("{} {}", "Created".green(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_loadable_defaults_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursecal.toml");

        run(&path).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());

        std::fs::write(&path, "[server]\nport = 9000\n").unwrap();
        assert!(run(&path).is_err());
        assert_eq!(AppConfig::load(Some(&path)).unwrap().server.port, 9000);
    }
}
