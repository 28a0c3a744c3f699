use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use solar_bag::output::DEFAULT_COUNTRY;
use solar_bag::overpass::DEFAULT_OVERPASS_ENDPOINT;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub overpass: OverpassConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OverpassConfig {
    pub endpoint: String,
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_OVERPASS_ENDPOINT.to_string(),
            user_agent: concat!("solar-bag/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ExportConfig {
    pub country: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            country: DEFAULT_COUNTRY.to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.overpass.endpoint, DEFAULT_OVERPASS_ENDPOINT);
        assert!(config.overpass.user_agent.starts_with("solar-bag/"));
        assert_eq!(config.export.country, "Netherlands");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solar-bag.toml");
        fs::write(
            &path,
            "[overpass]\nendpoint = \"https://overpass.kumi.systems/api/interpreter\"\n",
        )
        .unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(
            config.overpass.endpoint,
            "https://overpass.kumi.systems/api/interpreter"
        );
        assert!(config.overpass.user_agent.starts_with("solar-bag/"));
        assert_eq!(config.export.country, "Netherlands");
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[export\ncountry = ").unwrap();
        assert!(Config::load_from_file(&path).is_err());
        assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
