pub mod health;
pub mod logging;
pub mod metrics;

pub use health::{HealthProber, HealthResult, Probe};
pub use logging::init_logging;
pub use metrics::Metrics;
