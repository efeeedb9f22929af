//! Dashboard configuration
//!
//! Read from an optional TOML file; every key has a default so an empty
//! file (or none at all) gives a working local setup.
//!
//! ```toml
//! base_url = "https://metrics.example.com"
//! reconnect_delay_ms = 2000
//! refresh_interval_secs = 30
//!
//! [log]
//! default_level = "debug"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use pulse_logging::LogConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::connection::RetryPolicy;
use crate::render::CounterSettings;
use crate::session::SessionConfig;

/// Path of the fetch endpoint under the base address
pub const METRICS_PATH: &str = "/api/metrics";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Backend address serving both the fetch endpoint and the channels
    pub base_url: String,
    /// Delay before both channels are reopened after a drop
    pub reconnect_delay_ms: u64,
    /// Period of the background refresh
    pub refresh_interval_secs: u64,
    /// Lifetime of an error banner
    pub banner_ttl_secs: u64,
    pub counter_duration_ms: u64,
    pub counter_steps: u32,
    pub request_timeout_secs: u64,
    pub log: LogConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            reconnect_delay_ms: 2000,
            refresh_interval_secs: 30,
            banner_ttl_secs: 5,
            counter_duration_ms: 1000,
            counter_steps: 60,
            request_timeout_secs: 10,
            log: LogConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// The base address as given, validated
    pub fn base(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|e| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: e.to_string(),
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::InvalidUrl {
                url: self.base_url.clone(),
                reason: format!("unsupported scheme {other:?}"),
            }),
        }
    }

    /// Base address for the channels: `https` becomes `wss`, `http` becomes `ws`
    pub fn websocket_base(&self) -> Result<Url, ConfigError> {
        let mut url = self.base()?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme).map_err(|()| ConfigError::InvalidUrl {
            url: self.base_url.clone(),
            reason: format!("cannot switch scheme to {scheme}"),
        })?;
        Ok(url)
    }

    pub fn metrics_endpoint(&self) -> Result<Url, ConfigError> {
        let mut url = self.base()?;
        url.set_path(METRICS_PATH);
        url.set_query(None);
        Ok(url)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        Ok(SessionConfig {
            ws_base: self.websocket_base()?,
            retry: RetryPolicy::fixed(Duration::from_millis(self.reconnect_delay_ms)),
            banner_ttl: Duration::from_secs(self.banner_ttl_secs),
            counter: CounterSettings {
                duration: Duration::from_millis(self.counter_duration_ms),
                steps: self.counter_steps,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        let session = config.session_config().unwrap();
        assert_eq!(session.ws_base.as_str(), "ws://127.0.0.1:8000/");
        assert_eq!(session.retry, RetryPolicy::fixed(Duration::from_secs(2)));
        assert_eq!(session.banner_ttl, Duration::from_secs(5));
        assert_eq!(session.counter, CounterSettings::default());
        assert_eq!(config.refresh_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_secure_base_upgrades_to_wss() {
        let config = DashboardConfig {
            base_url: "https://metrics.example.com".into(),
            ..Default::default()
        };
        assert_eq!(config.websocket_base().unwrap().scheme(), "wss");
        assert_eq!(
            config.metrics_endpoint().unwrap().as_str(),
            "https://metrics.example.com/api/metrics"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        let config = DashboardConfig {
            base_url: "ftp://example.com".into(),
            ..Default::default()
        };
        assert!(matches!(config.base(), Err(ConfigError::InvalidUrl { .. })));

        let config = DashboardConfig {
            base_url: "not a url".into(),
            ..Default::default()
        };
        assert!(config.websocket_base().is_err());
    }

    #[test]
    fn test_partial_toml() {
        let config = DashboardConfig::from_toml(
            r#"
            base_url = "http://10.0.0.5:9000"
            reconnect_delay_ms = 500

            [log]
            default_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.reconnect_delay_ms, 500);
        assert_eq!(config.refresh_interval_secs, 30);
        assert_eq!(config.log.default_level, "debug");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs = 5").unwrap();

        let config = DashboardConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.refresh_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_errors() {
        let missing = DashboardConfig::load(Some(Path::new("/nonexistent/pulse.toml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs = \"soon\"").unwrap();
        let bad = DashboardConfig::load(Some(file.path()));
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_no_path_means_defaults() {
        let config = DashboardConfig::load(None).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
    }
}
