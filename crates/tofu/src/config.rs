//! CLI configuration loading.
//!
//! Configuration lives in `~/.tofu/config.toml` unless `--config` points
//! elsewhere. A missing default file means defaults; a missing explicit file
//! is an error.
//!
//! ```toml
//! [network]
//! connect_timeout_secs = 10
//! handshake_timeout_secs = 10
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tofu_core::DialOptions;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config file: {message}")]
    ConfigParseError { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("IO error reading config: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TofuConfig {
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    /// Upper bound on establishing the TCP connection.
    pub connect_timeout_secs: Option<u64>,
    /// Upper bound on each socket read/write during the TLS handshake.
    pub handshake_timeout_secs: Option<u64>,
}

impl TofuConfig {
    pub fn dial_options(&self) -> DialOptions {
        DialOptions {
            connect_timeout: self.network.connect_timeout_secs.map(Duration::from_secs),
            handshake_timeout: self.network.handshake_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Default config location, `~/.tofu/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tofu").join("config.toml"))
}

/// Load config from `explicit` if given, otherwise from the default path.
pub fn load(explicit: Option<&Path>) -> Result<TofuConfig, ConfigError> {
    let config = match explicit {
        Some(path) => load_config_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_config_file(&path)?,
            _ => TofuConfig::default(),
        },
    };
    validate_config(&config)?;
    Ok(config)
}

fn load_config_file(path: &Path) -> Result<TofuConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| std::io::Error::new(e.kind(), format!("'{}': {}", path.display(), e)))?;
    toml::from_str(&content).map_err(|e| ConfigError::ConfigParseError {
        message: format!("'{}': {}", path.display(), e),
    })
}

pub fn validate_config(config: &TofuConfig) -> Result<(), ConfigError> {
    let timeouts = [
        ("connect_timeout_secs", config.network.connect_timeout_secs),
        ("handshake_timeout_secs", config.network.handshake_timeout_secs),
    ];
    for (name, value) in timeouts {
        if value == Some(0) {
            return Err(ConfigError::InvalidConfiguration {
                message: format!("network.{} must be greater than 0", name),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_have_no_timeouts() {
        let config = TofuConfig::default();
        assert_eq!(config.dial_options(), DialOptions::default());
    }

    #[test]
    fn test_load_timeouts() {
        let file = write_config(
            "[network]\nconnect_timeout_secs = 5\nhandshake_timeout_secs = 7\n",
        );
        let config = load(Some(file.path())).unwrap();
        let opts = config.dial_options();
        assert_eq!(opts.connect_timeout, Some(Duration::from_secs(5)));
        assert_eq!(opts.handshake_timeout, Some(Duration::from_secs(7)));
    }

    #[test]
    fn test_empty_file_is_default() {
        let file = write_config("");
        assert_eq!(load(Some(file.path())).unwrap(), TofuConfig::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let file = write_config("[network]\nconnect_timeout_secs = 0\n");
        let err = load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConfiguration { .. }));
        assert!(err.to_string().contains("connect_timeout_secs"));
    }

    #[test]
    fn test_parse_error_reported() {
        let file = write_config("[network\n");
        let err = load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let file = write_config("[network]\nretries = 3\n");
        assert!(matches!(
            load(Some(file.path())),
            Err(ConfigError::ConfigParseError { .. })
        ));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
