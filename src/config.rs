// src/config.rs
use crate::domain::errors::{AppError, AppResult};
use crate::domain::model::AccountIdentity;
use crate::infrastructure::broker::DEFAULT_API_ROOT;
use crate::infrastructure::session::DEFAULT_TOKEN_FILE;
use dotenv::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DISPLAY_NAME: &str = "Naitik";
pub const DEFAULT_USER_ID: &str = "VTE578";

/// Order tool configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Session and account binding
    pub session: SessionConfig,

    /// Broker API endpoint
    pub broker: BrokerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// File holding the enctoken
    pub token_file: PathBuf,

    /// Display name the client is created with
    pub display_name: String,

    /// Broker user id
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerConfig {
    /// API root, e.g. "https://kite.zerodha.com/oms"
    pub api_root: String,

    /// Per-request timeout; none means wait for the transport
    pub request_timeout_secs: Option<u64>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Log to file
    pub to_file: bool,

    /// Log file path
    pub file_path: Option<String>,
}

impl SessionConfig {
    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity::new(&self.display_name, &self.user_id)
    }
}

impl BrokerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup; unset keys take defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let session_config = SessionConfig {
            token_file: lookup("KITE_TOKEN_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session.token_file),
            display_name: lookup("KITE_DISPLAY_NAME").unwrap_or(defaults.session.display_name),
            user_id: lookup("KITE_USER_ID").unwrap_or(defaults.session.user_id),
        };

        let request_timeout_secs = match lookup("KITE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                AppError::Config(format!("Invalid KITE_REQUEST_TIMEOUT_SECS {:?}: {}", raw, e))
            })?),
            None => None,
        };

        let broker_config = BrokerConfig {
            api_root: lookup("KITE_API_ROOT").unwrap_or(defaults.broker.api_root),
            request_timeout_secs,
        };

        let to_file = match lookup("LOG_TO_FILE") {
            Some(raw) => raw.trim().parse::<bool>().map_err(|e| {
                AppError::Config(format!("Invalid LOG_TO_FILE {:?}: {}", raw, e))
            })?,
            None => defaults.logging.to_file,
        };

        let logging_config = LoggingConfig {
            level: lookup("LOG_LEVEL").unwrap_or(defaults.logging.level),
            to_file,
            file_path: lookup("LOG_FILE_PATH"),
        };

        let config = Config {
            session: session_config,
            broker: broker_config,
            logging: logging_config,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let mut file = File::open(path).map_err(|e| {
            AppError::Config(format!("Failed to open config file: {}", e))
        })?;

        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(|e| {
            AppError::Config(format!("Failed to read config file: {}", e))
        })?;

        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            AppError::Config(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(path, contents).map_err(|e| {
            AppError::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    fn validate(&self) -> AppResult<()> {
        let root = &self.broker.api_root;
        if !(root.starts_with("https://") || root.starts_with("http://")) {
            return Err(AppError::Config(format!(
                "API root must be an http(s) URL, got {:?}",
                root
            )));
        }
        if self.broker.request_timeout_secs == Some(0) {
            return Err(AppError::Config("Request timeout must be at least 1 second".to_string()));
        }
        if self.logging.to_file && self.logging.file_path.is_none() {
            return Err(AppError::Config("LOG_TO_FILE is set but LOG_FILE_PATH is missing".to_string()));
        }
        Ok(())
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        // Set log level
        let log_level = match self.logging.level.to_lowercase().as_str() {
            "trace" => log::LevelFilter::Trace,
            "debug" => log::LevelFilter::Debug,
            "info" => log::LevelFilter::Info,
            "warn" => log::LevelFilter::Warn,
            "error" => log::LevelFilter::Error,
            "off" => log::LevelFilter::Off,
            _ => log::LevelFilter::Info,
        };

        builder.filter_level(log_level);
        builder.target(env_logger::Target::Stderr);

        // Configure output
        if self.logging.to_file {
            if let Some(file_path) = &self.logging.file_path {
                let file = File::create(file_path).map_err(|e| {
                    AppError::Config(format!("Failed to create log file: {}", e))
                })?;

                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
        }

        builder.try_init().map_err(|e| {
            AppError::Config(format!("Failed to initialize logger: {}", e))
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionConfig {
                token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
                display_name: DEFAULT_DISPLAY_NAME.to_string(),
                user_id: DEFAULT_USER_ID.to_string(),
            },
            broker: BrokerConfig {
                api_root: DEFAULT_API_ROOT.to_string(),
                request_timeout_secs: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                to_file: false,
                file_path: None,
            },
        }
    }
}
