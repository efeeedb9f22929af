//! JSONL and pretty tracing output for the Contract Pulse dashboard
//!
//! # Quick Start
//!
//! ```ignore
//! use pulse_logging::{FileConfig, LogConfig, PulseSubscriberBuilder};
//!
//! // JSONL to console
//! let _guard = PulseSubscriberBuilder::new().init();
//!
//! // Pretty, verbose console output
//! let _guard = PulseSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//!
//! // Console plus daily JSONL files under ./logs
//! let _guard = PulseSubscriberBuilder::new()
//!     .with_file_output(FileConfig::new("./logs"))
//!     .init();
//! ```
//!
//! Keep the returned guard alive for as long as file output should flush.

pub mod config;
pub mod layers;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use layers::BoxedLayer;

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LogError {
    #[error("Failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Global subscriber already set: {0}")]
    AlreadySet(String),
}

/// Assembles the global subscriber from a [`LogConfig`]
pub struct PulseSubscriberBuilder {
    config: LogConfig,
}

impl PulseSubscriberBuilder {
    /// JSONL on stdout at `info`
    pub fn new() -> Self {
        Self {
            config: LogConfig::default(),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Level used when `RUST_LOG` is unset
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Switch the console between pretty and JSONL output
    pub fn with_pretty_console(mut self, pretty: bool) -> Self {
        self.config.console.pretty = pretty;
        self.config.console.ansi = pretty;
        self
    }

    /// Also write JSONL files
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    /// Install the subscriber globally
    ///
    /// Returns the file writer guard when file output is enabled.
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LogError> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.config.default_level));

        let mut stack: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            stack.push(layers::console_layer(&self.config.console, &self.config.jsonl));
        }

        if let Some(file) = &self.config.file {
            let (writer, file_guard) = layers::file_writer(file)?;
            stack.push(layers::jsonl_layer(writer, &self.config.jsonl));
            guard = Some(file_guard);
        }

        Registry::default()
            .with(stack)
            .with(env_filter)
            .try_init()
            .map_err(|e| LogError::AlreadySet(e.to_string()))?;

        Ok(guard)
    }

    /// Install the subscriber, reporting failures on stderr
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: logging not initialized: {}", e);
                None
            }
        }
    }
}

impl Default for PulseSubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Initialize logging for tests; safe to call from every test
pub fn init_testing() {
    let _ = PulseSubscriberBuilder::new()
        .with_config(LogConfig::testing())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_creation() {
        let builder = PulseSubscriberBuilder::new();
        assert_eq!(builder.config.default_level, "info");
        assert!(!builder.config.console.pretty);
    }

    #[test]
    fn test_builder_with_config() {
        let builder = PulseSubscriberBuilder::new().with_config(LogConfig::development());
        assert_eq!(builder.config.default_level, "debug");
        assert!(builder.config.console.pretty);
    }

    #[test]
    fn test_builder_overrides() {
        let builder = PulseSubscriberBuilder::new()
            .with_level("trace")
            .with_console(false)
            .with_pretty_console(true);
        assert_eq!(builder.config.default_level, "trace");
        assert!(!builder.config.console.enabled);
        assert!(builder.config.console.pretty);
        assert!(builder.config.console.ansi);
    }

    #[test]
    fn test_file_output_keeps_console() {
        let builder = PulseSubscriberBuilder::new()
            .with_config(LogConfig::development())
            .with_file_output(FileConfig::new("/tmp/pulse-logs"));
        assert!(builder.config.console.enabled);
        assert_eq!(builder.config.file, Some(FileConfig::new("/tmp/pulse-logs")));
    }

    #[test]
    fn test_init_testing_is_repeatable() {
        init_testing();
        init_testing();
        tracing::warn!("logging initialized twice without panicking");
    }
}
