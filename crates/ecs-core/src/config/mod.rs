//! Configuration management for ecs-status

mod reporter;
pub mod serde_utils;

pub use reporter::ReporterConfig;

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecs-status")
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load the reporter configuration.
///
/// An explicit `path` must exist. Without one the default location is tried
/// and built-in defaults are used when nothing is there.
pub fn load_reporter_config(path: Option<&Path>) -> Result<ReporterConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                tracing::debug!("Loading config from {:?}", default_path);
                load_config(&default_path)
            } else {
                Ok(ReporterConfig::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_load_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");

        let err = load_reporter_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == path));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
region = "eu-west-1"
cluster = "staging"
suffix = "-stg"
request_timeout = 5
"#,
        )
        .unwrap();

        let config = load_reporter_config(Some(&path)).unwrap();
        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.cluster.as_deref(), Some("staging"));
        assert_eq!(config.suffix.as_deref(), Some("-stg"));
        assert_eq!(config.endpoint, None);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "request_timeout = \"soon\"").unwrap();

        assert!(matches!(
            load_reporter_config(Some(&path)),
            Err(ConfigError::Parse(_))
        ));
    }
}
