//! mayhem.toml configuration parser.
//!
//! Every key is optional. Missing keys fall back to the values the chaos
//! agent has always used against the Railway control plane.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://backboard.railway.app/graphql/v2";
pub const DEFAULT_ENVIRONMENT: &str = "dev";
pub const DEFAULT_SERVICE_FILTER: &str = "Sample API";
pub const DEFAULT_SCHEME: &str = "https";
pub const DEFAULT_HEALTH_PATH: &str = "/health";
pub const DEFAULT_KILL_PATH: &str = "/boom";

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MayhemConfig {
    pub platform: PlatformSettings,
    pub probe: ProbeSettings,
}

/// Where and what to look for on the control plane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformSettings {
    /// GraphQL endpoint.
    pub endpoint: String,
    /// Environment name to operate in.
    pub environment: String,
    /// Substring a service name must contain to be a candidate.
    pub service_filter: String,
}

impl Default for PlatformSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            service_filter: DEFAULT_SERVICE_FILTER.to_string(),
        }
    }
}

/// How target domains are addressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProbeSettings {
    pub scheme: String,
    pub health_path: String,
    pub kill_path: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            kill_path: DEFAULT_KILL_PATH.to_string(),
        }
    }
}

impl MayhemConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load from `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = MayhemConfig::from_toml("").unwrap();
        assert_eq!(config, MayhemConfig::default());
        assert_eq!(config.platform.environment, "dev");
        assert_eq!(config.platform.service_filter, "Sample API");
        assert_eq!(config.probe.scheme, "https");
        assert_eq!(config.probe.kill_path, "/boom");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = MayhemConfig::from_toml(
            r#"
            [platform]
            environment = "staging"

            [probe]
            scheme = "http"
            "#,
        )
        .unwrap();

        assert_eq!(config.platform.environment, "staging");
        assert_eq!(config.platform.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.probe.scheme, "http");
        assert_eq!(config.probe.health_path, "/health");
    }

    #[test]
    fn unknown_types_are_rejected() {
        let err = MayhemConfig::from_toml("[platform]\nenvironment = 3\n");
        assert!(err.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MayhemConfig::from_file(Path::new("/nonexistent/mayhem.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/mayhem.toml"));
    }

    #[test]
    fn load_without_path_is_default() {
        assert_eq!(MayhemConfig::load(None).unwrap(), MayhemConfig::default());
    }
}
