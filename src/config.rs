use crate::db::validate_database_url;
use crate::errors::{AppError, Result};
use config::builder::{ConfigBuilder, DefaultState};
use serde::Deserialize;
use std::env;
use std::time::Duration;

const ENV_PREFIX: &str = "SERVICE_MONITOR";
const LOG_FORMATS: &[&str] = &["json", "pretty"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub service: ServiceConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    pub log_level: String,
    pub log_format: String,
}

impl DatabaseConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

// The URL usually carries credentials
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("connect_timeout_seconds", &self.connect_timeout_seconds)
            .finish()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        // Determine environment
        let environment =
            env::var("SERVICE_MONITOR_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = Self::defaults(env::var("DATABASE_URL").ok())?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(
                config::File::with_name(&format!("config/{}", environment)).required(false),
            )
            // e.g., SERVICE_MONITOR__SERVER__PORT=8080
            .add_source(Self::environment());

        Self::from_builder(builder)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(AppError::Configuration("Invalid port number".to_string()));
        }

        validate_database_url(&self.database.url)?;

        if self.database.connect_timeout_seconds == 0 {
            return Err(AppError::Configuration(
                "Database connect timeout must be at least 1 second".to_string(),
            ));
        }

        if !LOG_FORMATS.contains(&self.observability.log_format.as_str()) {
            return Err(AppError::Configuration(format!(
                "Unknown log format '{}' (expected one of: {})",
                self.observability.log_format,
                LOG_FORMATS.join(", ")
            )));
        }

        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Built-in defaults; `database_url` seeds `database.url` when given.
    fn defaults(database_url: Option<String>) -> Result<ConfigBuilder<DefaultState>> {
        let service = ServiceConfig::default();

        config::Config::builder()
            .set_default("server.host", "0.0.0.0")
            .and_then(|b| b.set_default("server.port", 8000_i64))
            .and_then(|b| b.set_default("database.url", database_url.unwrap_or_default()))
            .and_then(|b| b.set_default("database.connect_timeout_seconds", 3_i64))
            .and_then(|b| b.set_default("service.name", service.name))
            .and_then(|b| b.set_default("service.version", service.version))
            .and_then(|b| b.set_default("observability.log_level", "info"))
            .and_then(|b| b.set_default("observability.log_format", "json"))
            .map_err(|e| AppError::Configuration(e.to_string()))
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        builder
            .build()
            .map_err(|e| AppError::Configuration(e.to_string()))?
            .try_deserialize()
            .map_err(|e| AppError::Configuration(e.to_string()))
    }
}
