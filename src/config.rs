use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Document store configuration
    pub state: StateConfig,

    /// Observability configuration
    pub observability: ObservabilityConfig,

    /// Archive reporting and search limits
    #[serde(default)]
    pub archive: ArchiveConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: FACILITY_ARCHIVE_)
            .add_source(
                config::Environment::with_prefix("FACILITY_ARCHIVE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Document store backend type
    #[serde(default)]
    pub backend: StateBackend,

    /// Path for the embedded database (sled)
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    #[default]
    Sled,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    /// Service name reported in logs
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Expose Prometheus metrics on /metrics
    #[serde(default = "default_true")]
    pub prometheus_enabled: bool,
}

/// Limits applied by the archive report pipeline and the advanced search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArchiveConfig {
    /// Maximum records fetched per collection for a report
    #[serde(default = "default_report_collection_limit")]
    pub report_collection_limit: usize,

    /// Default per-collection result cap for advanced search
    #[serde(default = "default_search_limit")]
    pub search_default_limit: usize,

    /// Maximum number of status values in a search membership filter
    #[serde(default = "default_max_status_filter")]
    pub max_status_filter: usize,

    /// Number of records kept in the persisted audit sample
    #[serde(default = "default_sample_size")]
    pub audit_sample_size: usize,

    /// Collection receiving one audit document per generated report
    #[serde(default = "default_audit_collection")]
    pub audit_collection: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            report_collection_limit: default_report_collection_limit(),
            search_default_limit: default_search_limit(),
            max_status_filter: default_max_status_filter(),
            audit_sample_size: default_sample_size(),
            audit_collection: default_audit_collection(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "facility-archive".to_string()
}

fn default_true() -> bool {
    true
}

fn default_report_collection_limit() -> usize {
    5000
}

fn default_search_limit() -> usize {
    500
}

fn default_max_status_filter() -> usize {
    10
}

fn default_sample_size() -> usize {
    10
}

fn default_audit_collection() -> String {
    "generated_reports".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        assert_eq!(default_http_port(), 8080);
        assert_eq!(default_log_level(), "info");
        assert!(default_true());
    }

    #[test]
    fn test_archive_defaults() {
        let archive = ArchiveConfig::default();
        assert_eq!(archive.report_collection_limit, 5000);
        assert_eq!(archive.search_default_limit, 500);
        assert_eq!(archive.max_status_filter, 10);
        assert_eq!(archive.audit_sample_size, 10);
        assert_eq!(archive.audit_collection, "generated_reports");
    }

    #[test]
    fn test_state_backend_default() {
        assert_eq!(StateBackend::default(), StateBackend::Sled);
    }

    #[test]
    fn test_embedded_defaults_parse() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.archive, ArchiveConfig::default());
    }
}
