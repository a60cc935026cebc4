//! Configuration management for the fraud scoring service

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "FRAUD_SCORING_CONFIG";

/// Prefix for per-key environment overrides (`FRAUD_SCORING__SERVER__PORT`)
const ENV_PREFIX: &str = "FRAUD_SCORING";

/// Log output format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// TCP port to bind
    pub port: u16,
}

/// Classifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path of the trained ONNX model
    pub path: String,
    /// Number of threads for ONNX inference (default: 1)
    #[serde(default = "default_onnx_threads")]
    pub onnx_threads: usize,
    /// Category vocabulary for the `type` column, in training order
    #[serde(default = "default_transaction_types")]
    pub transaction_types: Vec<String>,
}

fn default_onnx_threads() -> usize {
    1
}

fn default_transaction_types() -> Vec<String> {
    ["CASH_IN", "CASH_OUT", "DEBIT", "PAYMENT", "TRANSFER"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    #[serde(default)]
    pub format: LogFormat,
}

impl ServerConfig {
    /// Address string suitable for `TcpListener::bind`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    /// Load configuration from the default file, or the one named by
    /// `FRAUD_SCORING_CONFIG`, layered over the built-in defaults.
    pub fn load() -> Result<Self> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from_path(path)
    }

    /// Load configuration from a specific path. A missing file is not an
    /// error; defaults and environment overrides still apply.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults =
            Config::try_from(&Self::default()).context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5001,
            },
            model: ModelConfig {
                path: "models/fraud_detection_pipeline.onnx".to_string(),
                onnx_threads: default_onnx_threads(),
                transaction_types: default_transaction_types(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: LogFormat::Pretty,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    // Environment variables are process wide; tests that load config take this lock
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:5001");
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.model.transaction_types.len(), 5);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = AppConfig::load_from_path("does/not/exist.toml").unwrap();
        assert_eq!(config.model.path, "models/fraud_detection_pipeline.onnx");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = std::env::temp_dir().join(format!("fraud-scoring-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 9090\n\n[model]\npath = \"m.onnx\"\ntransaction_types = [\"A\", \"B\", \"C\", \"D\", \"E\"]\n\n[logging]\nformat = \"json\""
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.model.path, "m.onnx");
        assert_eq!(config.model.transaction_types, vec!["A", "B", "C", "D", "E"]);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_env_overrides_file() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let dir = std::env::temp_dir().join(format!("fraud-scoring-env-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[server]\nport = 9090\n\n[logging]\nformat = \"pretty\"\n").unwrap();

        std::env::set_var("FRAUD_SCORING__SERVER__PORT", "8080");
        std::env::set_var("FRAUD_SCORING__LOGGING__FORMAT", "json");
        let loaded = AppConfig::load_from_path(&path);
        std::env::remove_var("FRAUD_SCORING__SERVER__PORT");
        std::env::remove_var("FRAUD_SCORING__LOGGING__FORMAT");
        std::fs::remove_dir_all(&dir).ok();

        let config = loaded.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }
}
