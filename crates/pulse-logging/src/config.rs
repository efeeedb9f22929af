//! Logging settings
//!
//! [`LogConfig`] is the `[log]` table of the dashboard's TOML file. Missing
//! keys fall back to JSONL on stdout at `info`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

const DEFAULT_LEVEL: &str = "info";
const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_FILE_PREFIX: &str = "contract-pulse";

fn default_level() -> String {
    DEFAULT_LEVEL.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub default_level: String,
    #[serde(default)]
    pub console: ConsoleConfig,
    /// Also write JSONL to disk when set
    #[serde(default)]
    pub file: Option<FileConfig>,
    #[serde(default)]
    pub jsonl: JsonlConfig,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            default_level: default_level(),
            console: ConsoleConfig::jsonl(),
            file: None,
            jsonl: JsonlConfig::default(),
        }
    }
}

impl LogConfig {
    /// `debug` with colored, human-readable console output
    pub fn development() -> Self {
        Self {
            default_level: "debug".to_string(),
            console: ConsoleConfig::pretty(),
            ..Self::default()
        }
    }

    /// Daily JSONL files under `log_dir`, nothing on the console
    pub fn production(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            console: ConsoleConfig::off(),
            file: Some(FileConfig::new(log_dir)),
            ..Self::default()
        }
    }

    /// Warnings only, compact lines
    pub fn testing() -> Self {
        Self {
            default_level: "warn".to_string(),
            jsonl: JsonlConfig::compact(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    /// Human-readable lines instead of JSONL
    pub pretty: bool,
    /// Colors; ignored for JSONL
    pub ansi: bool,
}

impl ConsoleConfig {
    pub fn jsonl() -> Self {
        Self {
            enabled: true,
            pretty: false,
            ansi: false,
        }
    }

    pub fn pretty() -> Self {
        Self {
            enabled: true,
            pretty: true,
            ansi: true,
        }
    }

    pub fn off() -> Self {
        Self {
            enabled: false,
            ..Self::jsonl()
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self::jsonl()
    }
}

/// Where and how log files are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub directory: PathBuf,
    /// File name stem; rolling files get a date suffix
    pub prefix: String,
    pub rotation: RotationStrategy,
}

impl FileConfig {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            prefix: DEFAULT_FILE_PREFIX.to_string(),
            rotation: RotationStrategy::Daily,
        }
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_DIR)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotationStrategy {
    #[default]
    Daily,
    Hourly,
    /// Single file, truncated at start-up
    Never,
}

/// Which extras go into each JSONL line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonlConfig {
    /// Event fields at the top level instead of under `fields`
    pub flatten_events: bool,
    /// Enclosing spans, which carry the session id
    pub include_spans: bool,
    pub include_thread_info: bool,
    /// Source file and line
    pub include_location: bool,
}

impl JsonlConfig {
    /// No spans, threads or locations
    pub fn compact() -> Self {
        Self {
            flatten_events: true,
            include_spans: false,
            include_thread_info: false,
            include_location: false,
        }
    }
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            include_spans: true,
            include_location: true,
            ..Self::compact()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_jsonl_console() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, "info");
        assert_eq!(config.console, ConsoleConfig::jsonl());
        assert!(config.file.is_none());
        assert!(config.jsonl.include_spans);
    }

    #[test]
    fn test_presets() {
        let development = LogConfig::development();
        assert_eq!(development.default_level, "debug");
        assert!(development.console.pretty && development.console.ansi);

        let production = LogConfig::production("/var/log/pulse");
        assert!(!production.console.enabled);
        assert_eq!(
            production.file,
            Some(FileConfig {
                directory: PathBuf::from("/var/log/pulse"),
                prefix: "contract-pulse".to_string(),
                rotation: RotationStrategy::Daily,
            })
        );

        let testing = LogConfig::testing();
        assert_eq!(testing.default_level, "warn");
        assert_eq!(testing.jsonl, JsonlConfig::compact());
    }

    #[test]
    fn test_partial_toml_table() {
        let config: LogConfig = toml::from_str(
            r#"
            [console]
            pretty = true

            [file]
            directory = "/tmp/pulse"
            rotation = "hourly"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_level, "info");
        assert!(config.console.enabled);
        assert!(config.console.pretty);
        let file = config.file.unwrap();
        assert_eq!(file.prefix, "contract-pulse");
        assert_eq!(file.rotation, RotationStrategy::Hourly);
    }

    #[test]
    fn test_empty_table_is_default() {
        let config: LogConfig = toml::from_str("").unwrap();
        assert_eq!(config.default_level, "info");
        assert_eq!(config.jsonl, JsonlConfig::default());
    }
}
