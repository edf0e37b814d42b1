use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    pub path: PathBuf,
    /// Build the nearest-vertex fallback
    #[serde(default = "default_true")]
    pub fallback: bool,
    /// Abort on the first malformed record instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse(
            r#"
            [server]

            [catalog]
            path = "/data/counties.json.gz"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen, "0.0.0.0:3000");
        assert_eq!(config.catalog.path, PathBuf::from("/data/counties.json.gz"));
        assert!(config.catalog.fallback);
        assert!(!config.catalog.strict);
    }

    #[test]
    fn test_overrides() {
        let config = Config::parse(
            r#"
            [server]
            listen = "127.0.0.1:8080"

            [catalog]
            path = "regions.json.gz"
            fallback = false
            strict = true
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen, "127.0.0.1:8080");
        assert!(!config.catalog.fallback);
        assert!(config.catalog.strict);
    }

    #[test]
    fn test_missing_catalog_path() {
        assert!(Config::parse("[server]\n[catalog]\n").is_err());
    }
}
