//! Configuration loader and validator for the listing synchronizer.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Root configuration struct mirroring the YAML schema exactly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub app: App,
    pub rentcast: Rentcast,
}

/// App-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct App {
    /// Directory holding the SQLite database.
    pub data_dir: String,
    /// Directory downloaded listing photos are written under.
    pub photo_dir: String,
    /// Courtesy pause between cities, milliseconds.
    pub city_delay_ms: u64,
    /// Max records requested per city per endpoint.
    pub listing_limit: u32,
    /// Overwrite rows that already exist, refreshing the sync timestamp.
    pub update_existing: bool,
    /// Download photos for newly inserted listings.
    pub download_photos: bool,
}

/// RentCast API settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rentcast {
    pub api_key: String,
    pub base_url: String,
}

impl Config {
    /// Ensure required directories exist (creates `app.data_dir` and
    /// `app.photo_dir` if missing).
    pub fn ensure_dirs(&self) -> Result<(), std::io::Error> {
        if !self.app.data_dir.trim().is_empty() {
            fs::create_dir_all(&self.app.data_dir)?;
        }
        if !self.app.photo_dir.trim().is_empty() {
            fs::create_dir_all(&self.app.photo_dir)?;
        }
        Ok(())
    }
}

/// Load configuration from a YAML file and validate it.
/// - If `path` is None, uses `config.yaml` in the current working directory.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.unwrap_or_else(|| Path::new("config.yaml"));
    let content = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

/// Validate a configuration instance.
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.app.data_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.data_dir must be non-empty"));
    }
    if cfg.app.photo_dir.trim().is_empty() {
        return Err(ConfigError::Invalid("app.photo_dir must be non-empty"));
    }
    if cfg.app.listing_limit == 0 {
        return Err(ConfigError::Invalid("app.listing_limit must be > 0"));
    }

    if cfg.rentcast.api_key.trim().is_empty() {
        return Err(ConfigError::Invalid("rentcast.api_key must be non-empty"));
    }
    if reqwest::Url::parse(&cfg.rentcast.base_url).is_err() {
        return Err(ConfigError::Invalid("rentcast.base_url must be a valid URL"));
    }

    Ok(())
}

/// Example YAML content for a fresh install.
pub fn example() -> &'static str {
    r#"app:
  data_dir: "./data"
  photo_dir: "./public/listings"
  city_delay_ms: 1000
  listing_limit: 50
  update_existing: true
  download_photos: true

rentcast:
  api_key: "YOUR_RENTCAST_API_KEY"
  base_url: "https://api.rentcast.io/v1/"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn parse_example_ok() {
        let cfg: Config = serde_yaml::from_str(example()).unwrap();
        validate(&cfg).unwrap();
    }

    #[test]
    fn invalid_api_key() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.rentcast.api_key = "".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("rentcast.api_key")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_base_url() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.rentcast.base_url = "not a url".into();
        let err = validate(&cfg).unwrap_err();
        match err {
            ConfigError::Invalid(msg) => assert!(msg.contains("base_url")),
            _ => panic!("wrong error"),
        }
    }

    #[test]
    fn invalid_dirs_and_limit() {
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.data_dir = " ".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.photo_dir = "".into();
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));

        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.listing_limit = 0;
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn ensure_dirs_creates_both_dirs() {
        let td = tempdir().unwrap();
        let data_path = td.path().join("data");
        let photo_path = td.path().join("public").join("listings");
        let mut cfg: Config = serde_yaml::from_str(example()).unwrap();
        cfg.app.data_dir = data_path.to_string_lossy().to_string();
        cfg.app.photo_dir = photo_path.to_string_lossy().to_string();
        cfg.ensure_dirs().unwrap();
        assert!(data_path.exists());
        assert!(photo_path.exists());
    }

    #[test]
    fn load_from_file_ok() {
        let td = tempdir().unwrap();
        let p = td.path().join("config.yaml");
        let mut f = fs::File::create(&p).unwrap();
        f.write_all(example().as_bytes()).unwrap();
        let cfg = load(Some(&p)).unwrap();
        assert_eq!(cfg.app.city_delay_ms, 1000);
        assert_eq!(cfg.rentcast.base_url, "https://api.rentcast.io/v1/");
    }
}
