use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::progression::POINTS_PER_PERSON;

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

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub ranking: RankingConfig,
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
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw)?,
            Err(_) if environment == AppEnvironment::Production => LogFormat::Json,
            Err(_) => LogFormat::Compact,
        };

        let points_per_person = match env::var("APP_POINTS_PER_PERSON") {
            Ok(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => return Err(ConfigError::InvalidPointsPerPerson(raw)),
            },
            Err(_) => POINTS_PER_PERSON,
        };

        let ladder = match env::var("APP_RANK_LADDER") {
            Ok(raw) => LadderPreset::parse(&raw)?,
            Err(_) => LadderPreset::Swarajya,
        };

        let ladder_path = env::var("APP_RANK_LADDER_PATH")
            .ok()
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                format: log_format,
            },
            ranking: RankingConfig {
                points_per_person,
                ladder,
                ladder_path,
            },
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

/// Output shape of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(raw.to_string())),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub format: LogFormat,
}

/// Built-in rank ladders shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LadderPreset {
    /// Ten Marathi-named tiers, Sevak through Chhava.
    Swarajya,
    /// Five tiers, Sevak through Senapati, spaced every 500 points.
    Classic,
}

impl LadderPreset {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "swarajya" | "standard" => Ok(Self::Swarajya),
            "classic" => Ok(Self::Classic),
            _ => Err(ConfigError::UnknownLadder(raw.to_string())),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Swarajya => "swarajya",
            Self::Classic => "classic",
        }
    }
}

/// Deployment-time rank settings: the ladder and the points multiplier.
///
/// A `ladder_path` takes precedence over the preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    pub points_per_person: u32,
    pub ladder: LadderPreset,
    pub ladder_path: Option<PathBuf>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            points_per_person: POINTS_PER_PERSON,
            ladder: LadderPreset::Swarajya,
            ladder_path: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidPointsPerPerson(String),
    UnknownLadder(String),
    InvalidLogFormat(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidPointsPerPerson(raw) => write!(
                f,
                "APP_POINTS_PER_PERSON must be a positive integer, got '{}'",
                raw
            ),
            ConfigError::UnknownLadder(raw) => write!(
                f,
                "APP_RANK_LADDER must be 'swarajya' or 'classic', got '{}'",
                raw
            ),
            ConfigError::InvalidLogFormat(raw) => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json', got '{}'", raw)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidPointsPerPerson(_)
            | ConfigError::UnknownLadder(_)
            | ConfigError::InvalidLogFormat(_) => None,
        }
    }
}
