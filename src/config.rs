//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache TTLs, risk and recommendation thresholds, logging format, and
//! default paths. `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// Values are in seconds. The dataset only changes when the file is replaced,
// so dashboard pages can be served stale briefly while a cache revalidates.

/// Dashboard, API and export responses
pub const HTTP_CACHE_DASHBOARD_MAX_AGE: u32 = 60;
pub const HTTP_CACHE_DASHBOARD_SWR: u32 = 30;

/// Static assets (CSS) - long cache with immutable hint
pub const HTTP_CACHE_STATIC_MAX_AGE: u32 = 86400;

/// Error responses - short TTL so a freshly uploaded dataset shows up quickly
pub const HTTP_CACHE_ERROR_MAX_AGE: u32 = 5;

/// Stale-if-error duration (5 minutes)
pub const HTTP_CACHE_STALE_IF_ERROR: u32 = 300;

pub const CACHE_CONTROL_DASHBOARD: &str = formatcp!(
    "public, max-age={}, stale-while-revalidate={}, stale-if-error={}",
    HTTP_CACHE_DASHBOARD_MAX_AGE,
    HTTP_CACHE_DASHBOARD_SWR,
    HTTP_CACHE_STALE_IF_ERROR
);

pub const CACHE_CONTROL_STATIC: &str =
    formatcp!("public, max-age={}, immutable", HTTP_CACHE_STATIC_MAX_AGE);

pub const CACHE_CONTROL_ERROR: &str = formatcp!("public, max-age={}", HTTP_CACHE_ERROR_MAX_AGE);

pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Risk Thresholds (daily screen time, hours)
// =============================================================================

/// Below this: low risk
pub const RISK_LOW_BELOW_HOURS: f64 = 2.0;
/// Below this: moderate risk
pub const RISK_MODERATE_BELOW_HOURS: f64 = 4.0;
/// Below this: high risk; at or above: very high risk
pub const RISK_HIGH_BELOW_HOURS: f64 = 6.0;

// =============================================================================
// Recommendation Thresholds
// =============================================================================

/// Screen time above this many hours per day is excessive
pub const EXCESSIVE_SCREEN_TIME_HOURS: f64 = 6.0;
/// Sleep below this many hours is insufficient
pub const INSUFFICIENT_SLEEP_HOURS: f64 = 7.0;
/// Outdoor activity below this many hours is minimal
pub const MINIMAL_OUTDOOR_HOURS: f64 = 1.0;
/// Health issue percentage above this triggers a wellness recommendation
pub const HEALTH_ISSUES_ALERT_PCT: f64 = 5.0;

// =============================================================================
// Dataset
// =============================================================================

/// Value of the `Reported_Health_Issues` column meaning "yes"
pub const HEALTH_ISSUES_YES: &str = "Yes";

/// Selector value meaning "do not filter on this column"
pub const FILTER_ALL: &str = "All";

/// File name offered for the filtered CSV download
pub const EXPORT_FILE_NAME: &str = "filtered_screen_time_data.csv";

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default dataset path
pub const DEFAULT_DATA_PATH: &str = "indian_kids_screen_time.csv";

/// Default directory holding Tera templates
pub const DEFAULT_TEMPLATES_DIR: &str = "templates";

/// Default directory for static files
pub const DEFAULT_STATIC_DIR: &str = "static";

/// Default site title
pub const DEFAULT_SITE_NAME: &str = "Indian Kids Screen Time Analytics";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "screentime=debug,tower_http=debug";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

/// Default bind address: all interfaces
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default dataset cache TTL (1 hour)
pub const DEFAULT_DATA_CACHE_TTL_SECS: u64 = 3600;

/// Default port for the HTTP->HTTPS redirect listener
pub const DEFAULT_REDIRECT_PORT: u16 = 80;

/// Seconds allowed for in-flight requests to finish on shutdown
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Dataset location and caching
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub ui: UiConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
    #[serde(default)]
    pub tls: TlsConfig,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            tls: TlsConfig::default(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }
}

/// How the listener terminates TLS
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain HTTP, the usual setup behind an orchestrator's ingress
    #[default]
    None,
    /// Certificate and key files supplied by the operator
    Manual,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    #[serde(default)]
    pub mode: TlsMode,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
    /// Run a plain HTTP listener that redirects to HTTPS
    #[serde(default)]
    pub redirect_http: bool,
    #[serde(default = "TlsConfig::default_redirect_port")]
    pub redirect_port: u16,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            mode: TlsMode::None,
            cert_path: None,
            key_path: None,
            redirect_http: false,
            redirect_port: Self::default_redirect_port(),
        }
    }
}

impl TlsConfig {
    fn default_redirect_port() -> u16 {
        DEFAULT_REDIRECT_PORT
    }
}

/// Dataset configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path of the CSV dataset
    #[serde(default = "DataConfig::default_path")]
    pub path: PathBuf,
    /// How long a loaded dataset is served before the file is read again
    #[serde(default = "DataConfig::default_cache_ttl")]
    pub cache_ttl_seconds: u64,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            cache_ttl_seconds: Self::default_cache_ttl(),
        }
    }
}

impl DataConfig {
    fn default_path() -> PathBuf {
        PathBuf::from(DEFAULT_DATA_PATH)
    }

    fn default_cache_ttl() -> u64 {
        DEFAULT_DATA_CACHE_TTL_SECS
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiConfig {
    /// Site title shown in header and page titles
    #[serde(default = "UiConfig::default_site_name")]
    pub site_name: String,
    #[serde(default = "UiConfig::default_templates_dir")]
    pub templates_dir: String,
    #[serde(default = "UiConfig::default_static_dir")]
    pub static_dir: String,
    /// Version string, populated at runtime
    #[serde(skip_deserializing, default = "UiConfig::default_version")]
    pub version: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            site_name: Self::default_site_name(),
            templates_dir: Self::default_templates_dir(),
            static_dir: Self::default_static_dir(),
            version: Self::default_version(),
        }
    }
}

impl UiConfig {
    fn default_site_name() -> String {
        DEFAULT_SITE_NAME.to_string()
    }

    fn default_templates_dir() -> String {
        DEFAULT_TEMPLATES_DIR.to_string()
    }

    fn default_static_dir() -> String {
        DEFAULT_STATIC_DIR.to_string()
    }

    fn default_version() -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    /// Glob matching every template below `templates_dir`
    pub fn template_glob(&self) -> String {
        format!("{}/**/*", self.templates_dir.trim_end_matches('/'))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            http: HttpServerConfig::default(),
            data: DataConfig::default(),
            ui: UiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.tls.mode == TlsMode::Manual
            && (self.http.tls.cert_path.is_none() || self.http.tls.key_path.is_none())
        {
            return Err(ConfigError::Validation(
                "http.tls.mode = \"manual\" requires cert_path and key_path".to_string(),
            ));
        }

        if self.http.tls.redirect_http && self.http.tls.mode == TlsMode::None {
            return Err(ConfigError::Validation(
                "http.tls.redirect_http requires TLS to be enabled".to_string(),
            ));
        }

        if !matches!(self.logging.format.to_ascii_lowercase().as_str(), "text" | "json") {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
