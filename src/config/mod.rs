//! Configuration management.
//!
//! Values are layered, lowest precedence first: built-in defaults, a TOML
//! config file, `GROCERY_*` environment variables, then command-line flags
//! (applied by the binary).

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GROCERY_CONFIG_PATH";

/// Main configuration for the grocery tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// HTTP listening port.
    pub port: u16,
    /// HTTP listening address.
    pub host: IpAddr,
    /// Path of the JSON list file.
    pub data_file: PathBuf,
    /// Logging settings.
    pub logging: LoggingSettings,
    /// Metrics settings.
    pub metrics: MetricsSettings,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human-readable multi-line output.
    Pretty,
}

impl LogFormat {
    /// Parses a format name, falling back to JSON.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "pretty" | "text" => Self::Pretty,
            _ => Self::Json,
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Pretty => "pretty",
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Output format.
    pub format: LogFormat,
    /// Default filter directive, used when `RUST_LOG` is unset.
    pub level: String,
    /// Log file; `None` writes to stderr.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            level: "info".to_string(),
            file: Some(PathBuf::from("server.log")),
        }
    }
}

/// Metrics settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Whether the Prometheus exporter is installed.
    pub enabled: bool,
    /// Port of the Prometheus scrape endpoint.
    pub port: u16,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 9090,
        }
    }
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// HTTP port.
    pub port: Option<u16>,
    /// HTTP host.
    pub host: Option<String>,
    /// List file path.
    pub data_file: Option<String>,
    /// Logging section.
    pub logging: Option<ConfigFileLogging>,
    /// Metrics section.
    pub metrics: Option<ConfigFileMetrics>,
}

/// Logging section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileLogging {
    /// `json` or `pretty`.
    pub format: Option<String>,
    /// Filter directive.
    pub level: Option<String>,
    /// Log file path; an empty string logs to stderr.
    pub file: Option<String>,
}

/// Metrics section in config file.
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileMetrics {
    /// Enable the exporter.
    pub enabled: Option<bool>,
    /// Exporter port.
    pub port: Option<u16>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            port: crate::http::DEFAULT_PORT,
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            data_file: PathBuf::from("data.json"),
            logging: LoggingSettings::default(),
            metrics: MetricsSettings::default(),
        }
    }
}

impl TrackerConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or has unknown keys.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Self::from_config_file(file)
    }

    /// Loads configuration from the default location.
    ///
    /// Looks for `grocery-tracker/config.toml` in the platform config
    /// directory and returns defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_default() -> crate::Result<Self> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Resolves the config file (explicit path, `GROCERY_CONFIG_PATH`, then
    /// the default location) and applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the selected file cannot be read or parsed.
    pub fn load(explicit: Option<&Path>) -> crate::Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let mut config = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::load_default()?,
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Converts a `ConfigFile` to `TrackerConfig`.
    fn from_config_file(file: ConfigFile) -> crate::Result<Self> {
        let mut config = Self::default();

        if let Some(port) = file.port {
            config.port = port;
        }
        if let Some(host) = file.host {
            config.host = parse_host(&host)?;
        }
        if let Some(data_file) = file.data_file {
            config.data_file = PathBuf::from(data_file);
        }
        if let Some(logging) = file.logging {
            if let Some(format) = logging.format {
                config.logging.format = LogFormat::parse(&format);
            }
            if let Some(level) = logging.level {
                config.logging.level = level;
            }
            if let Some(file) = logging.file {
                config.logging.file = non_empty_path(&file);
            }
        }
        if let Some(metrics) = file.metrics {
            if let Some(enabled) = metrics.enabled {
                config.metrics.enabled = enabled;
            }
            if let Some(port) = metrics.port {
                config.metrics.port = port;
            }
        }

        Ok(config)
    }

    /// Applies `GROCERY_*` overrides read through `lookup`.
    ///
    /// Unparseable numeric or boolean values are ignored with a warning.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(port) = lookup("GROCERY_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid GROCERY_PORT"),
            }
        }
        if let Some(host) = lookup("GROCERY_HOST") {
            match parse_host(&host) {
                Ok(host) => self.host = host,
                Err(_) => tracing::warn!(value = %host, "Ignoring invalid GROCERY_HOST"),
            }
        }
        if let Some(data_file) = lookup("GROCERY_DATA_FILE") {
            self.data_file = PathBuf::from(data_file);
        }
        if let Some(log_file) = lookup("GROCERY_LOG_FILE") {
            self.logging.file = Some(PathBuf::from(log_file));
        }
        if let Some(format) = lookup("GROCERY_LOG_FORMAT") {
            self.logging.format = LogFormat::parse(&format);
        }
        if let Some(level) = lookup("GROCERY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(enabled) = lookup("GROCERY_METRICS_ENABLED") {
            self.metrics.enabled = parse_bool(&enabled);
        }
        if let Some(port) = lookup("GROCERY_METRICS_PORT") {
            match port.parse() {
                Ok(port) => self.metrics.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid GROCERY_METRICS_PORT"),
            }
        }
    }

    /// Sets the HTTP port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the list file path.
    #[must_use]
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }
}

/// Returns the default config file path, if a home directory is known.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "grocery-tracker")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn parse_host(s: &str) -> crate::Result<IpAddr> {
    s.trim()
        .parse()
        .map_err(|e| crate::Error::InvalidInput(format!("invalid host '{s}': {e}")))
}

fn parse_bool(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn non_empty_path(s: &str) -> Option<PathBuf> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
