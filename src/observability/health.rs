use crate::config::DatabaseConfig;
use async_trait::async_trait;
use std::time::Duration;

/// Outcome of one dependency check. Computed per call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthResult {
    Healthy,
    Unhealthy(String),
}

impl HealthResult {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthResult::Healthy)
    }
}

/// Something that can tell whether this instance is able to serve traffic.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self) -> HealthResult;
}

/// Checks database reachability with one short-lived connection per call.
pub struct HealthProber {
    database_url: String,
    connect_timeout: Duration,
}

impl HealthProber {
    pub fn new(database_url: impl Into<String>, connect_timeout: Duration) -> Self {
        Self {
            database_url: database_url.into(),
            connect_timeout,
        }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.url.clone(), config.connect_timeout())
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

#[async_trait]
impl Probe for HealthProber {
    async fn probe(&self) -> HealthResult {
        match crate::db::check_connection(&self.database_url, self.connect_timeout).await {
            Ok(()) => {
                tracing::info!("Database connection successful");
                HealthResult::Healthy
            }
            Err(e) => {
                tracing::error!(error = %e, error_detail = ?e, "Database health check failed");
                HealthResult::Unhealthy(e.to_string())
            }
        }
    }
}
