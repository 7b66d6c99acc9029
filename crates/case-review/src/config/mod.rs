use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::workflows::status_update::Actor;

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

/// Top-level configuration for the review service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub review: ReviewConfig,
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
        let ansi = environment == AppEnvironment::Development;

        let review = ReviewConfig::from_env()?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level, ansi },
            review,
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

/// Acting reviewer used when a request carries no session identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewConfig {
    pub actor_name: String,
    pub actor_role: String,
}

impl ReviewConfig {
    pub const DEFAULT_ACTOR_NAME: &'static str = "Admin User";
    pub const DEFAULT_ACTOR_ROLE: &'static str = "admin";

    fn from_env() -> Result<Self, ConfigError> {
        let actor_name = env::var("REVIEW_ACTOR_NAME")
            .unwrap_or_else(|_| Self::DEFAULT_ACTOR_NAME.to_string());
        let actor_role = env::var("REVIEW_ACTOR_ROLE")
            .unwrap_or_else(|_| Self::DEFAULT_ACTOR_ROLE.to_string());

        if actor_name.trim().is_empty() {
            return Err(ConfigError::BlankActor {
                variable: "REVIEW_ACTOR_NAME",
            });
        }
        if actor_role.trim().is_empty() {
            return Err(ConfigError::BlankActor {
                variable: "REVIEW_ACTOR_ROLE",
            });
        }

        Ok(Self {
            actor_name: actor_name.trim().to_string(),
            actor_role: actor_role.trim().to_string(),
        })
    }

    pub fn default_actor(&self) -> Actor {
        Actor::new(self.actor_name.clone(), self.actor_role.clone())
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            actor_name: Self::DEFAULT_ACTOR_NAME.to_string(),
            actor_role: Self::DEFAULT_ACTOR_ROLE.to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    BlankActor { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::BlankActor { variable } => {
                write!(f, "{variable} must not be blank when set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::BlankActor { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
