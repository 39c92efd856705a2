use std::path::PathBuf;
use std::time::Duration;

use config::{Config as ConfigLib, ConfigError, Environment, File};
use serde::Deserialize;

use crate::utils::error::{MonitorError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub ledger: LedgerConfig,
    pub recognition: RecognitionConfig,
    pub providers: ProviderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Single allowed CORS origin. Any origin is accepted when unset.
    pub allowed_origin: Option<String>,
    pub max_frame_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub data_dir: PathBuf,
    pub file_name: String,
    /// Relative paths are resolved against `data_dir`.
    pub archive_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RecognitionConfig {
    pub gallery_dir: PathBuf,
    pub threshold: f32,
    pub tolerance: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            allowed_origin: None,
            max_frame_bytes: 10_485_760, // 10MB
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/attendance"),
            file_name: "attendance.json".to_string(),
            archive_dir: PathBuf::from("archive"),
        }
    }
}

impl Default for RecognitionConfig {
    fn default() -> Self {
        Self {
            gallery_dir: PathBuf::from("data/known_faces"),
            threshold: 0.5,
            tolerance: 0.6,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8500".to_string(),
            timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let config = ConfigLib::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (e.g., MONITOR_SERVER__PORT)
            .add_source(
                Environment::with_prefix("MONITOR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(MonitorError::Config("Invalid port number".into()));
        }
        if self.ledger.data_dir.as_os_str().is_empty() {
            return Err(MonitorError::Config("ledger.data_dir must be set".into()));
        }
        if self.ledger.file_name.trim().is_empty() {
            return Err(MonitorError::Config("ledger.file_name must be set".into()));
        }

        let recognition = &self.recognition;
        if !recognition.threshold.is_finite() || recognition.threshold <= 0.0 {
            return Err(MonitorError::Config(
                "recognition.threshold must be a positive number".into(),
            ));
        }
        if !recognition.tolerance.is_finite() || recognition.tolerance < recognition.threshold {
            return Err(MonitorError::Config(
                "recognition.tolerance must not be below recognition.threshold".into(),
            ));
        }

        if self.providers.timeout_secs == 0 {
            return Err(MonitorError::Config(
                "providers.timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    pub fn archive_dir(&self) -> PathBuf {
        if self.ledger.archive_dir.is_absolute() {
            self.ledger.archive_dir.clone()
        } else {
            self.ledger.data_dir.join(&self.ledger.archive_dir)
        }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.ledger.data_dir.join(&self.ledger.file_name)
    }
}

impl From<ConfigError> for MonitorError {
    fn from(error: ConfigError) -> Self {
        MonitorError::Config(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.recognition.threshold, 0.5);
        assert_eq!(config.providers.timeout(), Duration::from_secs(30));
        assert_eq!(
            config.archive_dir(),
            PathBuf::from("data/attendance").join("archive")
        );
        assert_eq!(
            config.ledger_path(),
            PathBuf::from("data/attendance").join("attendance.json")
        );
    }

    #[test]
    fn test_rejects_bad_recognition_settings() {
        let mut config = Config::default();
        config.recognition.threshold = 0.0;
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        let mut config = Config::default();
        config.recognition.tolerance = 0.4;
        assert!(matches!(config.validate(), Err(MonitorError::Config(_))));

        let mut config = Config::default();
        config.recognition.threshold = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_port_and_timeout() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_nested_keys() {
        std::env::set_var("MONITOR_SERVER__PORT", "6123");
        std::env::set_var("MONITOR_RECOGNITION__THRESHOLD", "0.45");
        let config = Config::new();
        std::env::remove_var("MONITOR_SERVER__PORT");
        std::env::remove_var("MONITOR_RECOGNITION__THRESHOLD");

        let config = config.unwrap();
        assert_eq!(config.server.port, 6123);
        assert_eq!(config.recognition.threshold, 0.45);
        assert_eq!(config.recognition.tolerance, 0.6);
    }

    #[test]
    fn test_absolute_archive_dir_is_kept() {
        let mut config = Config::default();
        config.ledger.archive_dir = PathBuf::from("/var/lib/monitor/archive");
        assert_eq!(config.archive_dir(), PathBuf::from("/var/lib/monitor/archive"));
    }
}
