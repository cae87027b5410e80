//! Dashboard configuration — endpoint, timers, agent identity.
//!
//! User-level config: `~/.livequeue/config.yaml`
//! Project-level config: `.livequeue/config.yaml` (overrides user values)
//!
//! Resolution: defaults → user file → project file → env vars → CLI flags.
//! Every layer is a `FileConfig` of optional fields; later layers win
//! field by field, then `DashboardConfig::resolve` validates the result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::session::{DEFAULT_INACTIVITY_TIMEOUT, DEFAULT_REFRESH_INTERVAL};

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Where "exit" sends the operator.
pub const DEFAULT_LOGOUT_URL: &str = "logout.html";

pub const ENV_ENDPOINT: &str = "LIVEQUEUE_ENDPOINT";
pub const ENV_AGENT_ARN: &str = "LIVEQUEUE_AGENT_ARN";
pub const ENV_AGENT_NAME: &str = "LIVEQUEUE_AGENT_NAME";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Agent identity section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// One configuration layer, as written in YAML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout_url: Option<String>,
    #[serde(default)]
    pub agent: AgentSection,
}

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub endpoint: String,
    pub refresh_interval: Duration,
    pub inactivity_timeout: Duration,
    pub request_timeout: Duration,
    pub logout_url: String,
    pub agent_arn: Option<String>,
    pub agent_name: Option<String>,
}

/// Path to `~/.livequeue/`.
pub fn dirs_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".livequeue"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".livequeue"))
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs_path().map(|p| p.join("config.yaml"))
}

fn project_config_path() -> PathBuf {
    PathBuf::from(".livequeue").join("config.yaml")
}

impl FileConfig {
    /// Load one YAML file.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a file if it exists. Missing files are silent, broken ones are
    /// logged and skipped.
    fn load_optional(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("ignoring config: {e}");
                Self::default()
            }
        }
    }

    /// User file merged with the project file.
    pub fn load_layers() -> Self {
        let user = user_config_path()
            .map(|p| Self::load_optional(&p))
            .unwrap_or_default();
        user.merge(Self::load_optional(&project_config_path()))
    }

    /// Overlay `other` on `self`; set fields in `other` win.
    pub fn merge(self, other: FileConfig) -> Self {
        Self {
            endpoint: other.endpoint.or(self.endpoint),
            refresh_secs: other.refresh_secs.or(self.refresh_secs),
            idle_secs: other.idle_secs.or(self.idle_secs),
            request_timeout_secs: other.request_timeout_secs.or(self.request_timeout_secs),
            logout_url: other.logout_url.or(self.logout_url),
            agent: AgentSection {
                arn: other.agent.arn.or(self.agent.arn),
                name: other.agent.name.or(self.agent.name),
            },
        }
    }

    /// Overlay environment variables read through `lookup`.
    pub fn with_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let env = FileConfig {
            endpoint: lookup(ENV_ENDPOINT),
            agent: AgentSection {
                arn: lookup(ENV_AGENT_ARN),
                name: lookup(ENV_AGENT_NAME),
            },
            ..Default::default()
        };
        self.merge(env)
    }
}

impl DashboardConfig {
    /// Apply defaults and validate.
    pub fn resolve(layer: FileConfig) -> Result<Self, ConfigError> {
        let endpoint = layer
            .endpoint
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "no queue endpoint configured (set `endpoint`, {ENV_ENDPOINT} or --endpoint)"
                ))
            })?;

        let secs = |value: Option<u64>, default: Duration, name: &str| match value {
            Some(0) => Err(ConfigError::Invalid(format!("{name} must be greater than zero"))),
            Some(s) => Ok(Duration::from_secs(s)),
            None => Ok(default),
        };

        Ok(Self {
            endpoint,
            refresh_interval: secs(layer.refresh_secs, DEFAULT_REFRESH_INTERVAL, "refresh_secs")?,
            inactivity_timeout: secs(layer.idle_secs, DEFAULT_INACTIVITY_TIMEOUT, "idle_secs")?,
            request_timeout: secs(
                layer.request_timeout_secs,
                DEFAULT_REQUEST_TIMEOUT,
                "request_timeout_secs",
            )?,
            logout_url: layer
                .logout_url
                .unwrap_or_else(|| DEFAULT_LOGOUT_URL.to_string()),
            agent_arn: layer.agent.arn,
            agent_name: layer.agent.name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn with_endpoint() -> FileConfig {
        FileConfig {
            endpoint: Some("https://queue.example.com/live".into()),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_apply() {
        let config = DashboardConfig::resolve(with_endpoint()).unwrap();
        assert_eq!(config.refresh_interval, Duration::from_secs(7));
        assert_eq!(config.inactivity_timeout, Duration::from_secs(120));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.logout_url, DEFAULT_LOGOUT_URL);
        assert!(config.agent_arn.is_none());
    }

    #[test]
    fn missing_endpoint_is_invalid() {
        let err = DashboardConfig::resolve(FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no queue endpoint"));

        let blank = FileConfig {
            endpoint: Some("  ".into()),
            ..Default::default()
        };
        assert!(DashboardConfig::resolve(blank).is_err());
    }

    #[test]
    fn zero_interval_is_invalid() {
        let layer = FileConfig {
            refresh_secs: Some(0),
            ..with_endpoint()
        };
        let err = DashboardConfig::resolve(layer).unwrap_err();
        assert!(err.to_string().contains("refresh_secs"));
    }

    #[test]
    fn merge_prefers_overlay() {
        let base = FileConfig {
            endpoint: Some("a".into()),
            refresh_secs: Some(10),
            agent: AgentSection {
                arn: Some("arn-1".into()),
                name: Some("Base".into()),
            },
            ..Default::default()
        };
        let overlay = FileConfig {
            refresh_secs: Some(3),
            agent: AgentSection {
                arn: None,
                name: Some("Top".into()),
            },
            ..Default::default()
        };
        let merged = base.merge(overlay);
        assert_eq!(merged.endpoint.as_deref(), Some("a"));
        assert_eq!(merged.refresh_secs, Some(3));
        assert_eq!(merged.agent.arn.as_deref(), Some("arn-1"));
        assert_eq!(merged.agent.name.as_deref(), Some("Top"));
    }

    #[test]
    fn env_overrides_file() {
        let vars: HashMap<&str, &str> = [
            (ENV_ENDPOINT, "https://env.example.com"),
            (ENV_AGENT_ARN, "arn:env"),
        ]
        .into_iter()
        .collect();
        let layer = with_endpoint().with_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(layer.endpoint.as_deref(), Some("https://env.example.com"));
        assert_eq!(layer.agent.arn.as_deref(), Some("arn:env"));
        assert!(layer.agent.name.is_none());
    }

    #[test]
    fn load_file_parses_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "endpoint: https://queue.example.com\nidle_secs: 300\nagent:\n  arn: arn:x\n",
        )
        .unwrap();

        let layer = FileConfig::load_file(&path).unwrap();
        assert_eq!(layer.endpoint.as_deref(), Some("https://queue.example.com"));
        assert_eq!(layer.idle_secs, Some(300));
        assert_eq!(layer.agent.arn.as_deref(), Some("arn:x"));

        let config = DashboardConfig::resolve(layer).unwrap();
        assert_eq!(config.inactivity_timeout, Duration::from_secs(300));
    }

    #[test]
    fn load_file_reports_bad_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "endpoint: [unclosed").unwrap();
        assert!(matches!(
            FileConfig::load_file(&path),
            Err(ConfigError::Yaml { .. })
        ));
        assert!(matches!(
            FileConfig::load_file(&dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }

    #[test]
    fn load_optional_skips_missing_and_broken() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            FileConfig::load_optional(&dir.path().join("nope.yaml")),
            FileConfig::default()
        );
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "refresh_secs: [").unwrap();
        assert_eq!(FileConfig::load_optional(&path), FileConfig::default());
    }
}
