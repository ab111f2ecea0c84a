// src/utils/config.rs
use std::path::Path;
use std::time::Duration;

use config::{builder::DefaultState, Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::utils::error::{AppError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub mission: MissionConfig,
    pub verification: VerificationConfig,
    pub upload: UploadConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 0 keeps actix's default of one worker per core.
    pub workers: usize,
    pub cors_max_age_secs: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 0,
            cors_max_age_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MissionConfig {
    pub expiry_minutes: i64,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self { expiry_minutes: 10 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VerificationConfig {
    pub target_latitude: f64,
    pub target_longitude: f64,
    pub max_distance_meters: f64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            target_latitude: 37.632,
            target_longitude: 127.056,
            max_distance_meters: 1000.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_size: usize,
    pub extraction_timeout_secs: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: 10_485_760, // 10MB
            extraction_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: Option<String>,
    pub file_prefix: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "ecostep.log".to_string(),
            json: false,
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        let builder = ConfigLib::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (e.g., APP_SERVER__PORT)
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::load(builder)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let builder = ConfigLib::builder().add_source(File::from(path.as_ref()));
        Self::load(builder)
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Config("Invalid port number".into()));
        }

        if self.mission.expiry_minutes <= 0 {
            return Err(AppError::Config("expiry_minutes must be greater than 0".into()));
        }

        let verification = &self.verification;
        if !verification.max_distance_meters.is_finite() || verification.max_distance_meters <= 0.0 {
            return Err(AppError::Config("max_distance_meters must be a positive number".into()));
        }
        if !(-90.0..=90.0).contains(&verification.target_latitude) {
            return Err(AppError::Config("target_latitude must be within [-90, 90]".into()));
        }
        if !(-180.0..=180.0).contains(&verification.target_longitude) {
            return Err(AppError::Config("target_longitude must be within [-180, 180]".into()));
        }

        if self.upload.max_file_size == 0 {
            return Err(AppError::Config("max_file_size must be greater than 0".into()));
        }
        if self.upload.extraction_timeout_secs == 0 {
            return Err(AppError::Config("extraction_timeout_secs must be greater than 0".into()));
        }

        Ok(())
    }

    /// Advertised to clients as `expires_in`.
    pub fn mission_window_secs(&self) -> i64 {
        self.mission.expiry_minutes * 60
    }

    pub fn get_extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.upload.extraction_timeout_secs)
    }

    pub fn get_cors_max_age(&self) -> usize {
        self.server.cors_max_age_secs
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        AppError::Config(error.to_string())
    }
}
