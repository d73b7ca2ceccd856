use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::leave::{LeaveServiceSettings, TransitionPolicy, DEFAULT_ALLOWANCE_DAYS};

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
    pub leave: LeaveConfig,
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

        let leave = LeaveConfig::from_env(environment)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            leave,
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
}

/// Where leave records live and how the review workflow behaves.
#[derive(Debug, Clone)]
pub struct LeaveConfig {
    pub store_dir: PathBuf,
    pub allowance_days: i64,
    pub latency_ms: u64,
    pub transition_policy: TransitionPolicy,
    pub seed_demo_data: bool,
}

impl LeaveConfig {
    fn from_env(environment: AppEnvironment) -> Result<Self, ConfigError> {
        let store_dir = env::var("LEAVE_STORE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".leavedesk"));

        let allowance_days = match env::var("LEAVE_ALLOWANCE_DAYS") {
            Ok(raw) => raw
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidAllowance)?,
            Err(_) => DEFAULT_ALLOWANCE_DAYS,
        };

        let latency_ms = match env::var("LEAVE_LATENCY_MS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidLatency)?,
            Err(_) => 0,
        };

        let transition_policy = match env::var("LEAVE_TRANSITIONS") {
            Ok(raw) => raw
                .parse::<TransitionPolicy>()
                .map_err(|_| ConfigError::InvalidTransitionPolicy { value: raw })?,
            Err(_) => TransitionPolicy::Strict,
        };

        let seed_demo_data = match env::var("LEAVE_SEED_DEMO") {
            Ok(raw) => parse_flag(&raw).ok_or(ConfigError::InvalidSeedFlag)?,
            Err(_) => environment != AppEnvironment::Production,
        };

        Ok(Self {
            store_dir,
            allowance_days,
            latency_ms,
            transition_policy,
            seed_demo_data,
        })
    }

    pub fn service_settings(&self) -> LeaveServiceSettings {
        LeaveServiceSettings {
            policy: self.transition_policy,
            allowance_days: self.allowance_days,
            latency: Duration::from_millis(self.latency_ms),
            seed_demo_data: self.seed_demo_data,
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidAllowance,
    InvalidLatency,
    InvalidTransitionPolicy { value: String },
    InvalidSeedFlag,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidAllowance => {
                write!(f, "LEAVE_ALLOWANCE_DAYS must be a whole number of days")
            }
            ConfigError::InvalidLatency => {
                write!(f, "LEAVE_LATENCY_MS must be a non-negative number of milliseconds")
            }
            ConfigError::InvalidTransitionPolicy { value } => write!(
                f,
                "LEAVE_TRANSITIONS must be 'strict' or 'permissive' (got '{}')",
                value
            ),
            ConfigError::InvalidSeedFlag => write!(f, "LEAVE_SEED_DEMO must be true or false"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
