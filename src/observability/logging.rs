//! Structured logging configuration.

use crate::config::{LogFormat, LoggingSettings};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Logging configuration resolved for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Output format.
    pub format: LogFormat,
    /// Filter directive used when `RUST_LOG` is unset.
    pub default_directive: String,
    /// Log file; `None` writes to stderr.
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Builds logging configuration from settings.
    ///
    /// `verbose` raises the default directive to `debug`.
    #[must_use]
    pub fn from_settings(settings: &LoggingSettings, verbose: bool) -> Self {
        let default_directive = if verbose {
            "debug".to_string()
        } else {
            settings.level.clone()
        };

        Self {
            format: settings.format,
            default_directive,
            file: settings.file.clone(),
        }
    }

    /// Builds the filter: `RUST_LOG` if set and valid, otherwise the default
    /// directive, otherwise `info`.
    #[must_use]
    pub fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.default_directive))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_settings(&LoggingSettings::default(), false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            format: LogFormat::Pretty,
            level: "warn".to_string(),
            file: None,
        };
        let config = LoggingConfig::from_settings(&settings, false);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.default_directive, "warn");
        assert_eq!(config.file, None);
    }

    #[test]
    fn test_verbose_overrides_level() {
        let config = LoggingConfig::from_settings(&LoggingSettings::default(), true);
        assert_eq!(config.default_directive, "debug");
    }

    #[test]
    fn test_default_logs_to_file() {
        let config = LoggingConfig::default();
        assert_eq!(config.file, Some(PathBuf::from("server.log")));
        assert_eq!(config.format, LogFormat::Json);
    }
}
