use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::donors::{BatchPolicy, Locale};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the evaluator service and CLI.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub evaluation: EvaluationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                ansi: environment == AppEnvironment::Development,
            },
            evaluation: EvaluationSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub ansi: bool,
}

/// Defaults applied to every evaluation session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationSettings {
    pub locale: Locale,
    pub batch_policy: BatchPolicy,
    pub max_donor_age: u8,
    pub audit_log_path: Option<PathBuf>,
}

impl EvaluationSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let locale = match env::var("APP_LOCALE") {
            Ok(raw) => Locale::parse(&raw).ok_or(ConfigError::InvalidLocale(raw))?,
            Err(_) => Locale::default(),
        };

        let batch_policy = match env::var("APP_BATCH_POLICY") {
            Ok(raw) => BatchPolicy::parse(&raw).ok_or(ConfigError::InvalidBatchPolicy(raw))?,
            Err(_) => BatchPolicy::default(),
        };

        let max_donor_age = env::var("APP_MAX_DONOR_AGE")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<u8>()
            .map_err(|_| ConfigError::InvalidMaxDonorAge)?;

        let audit_log_path = env::var("APP_AUDIT_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            locale,
            batch_policy,
            max_donor_age,
            audit_log_path,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLocale(String),
    InvalidBatchPolicy(String),
    InvalidMaxDonorAge,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLocale(value) => {
                write!(f, "APP_LOCALE must be 'es' or 'en' (found '{value}')")
            }
            ConfigError::InvalidBatchPolicy(value) => {
                write!(
                    f,
                    "APP_BATCH_POLICY must be 'abort' or 'collect' (found '{value}')"
                )
            }
            ConfigError::InvalidMaxDonorAge => {
                write!(f, "APP_MAX_DONOR_AGE must be an age between 0 and 255")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLocale(_)
            | ConfigError::InvalidBatchPolicy(_)
            | ConfigError::InvalidMaxDonorAge => None,
        }
    }
}
