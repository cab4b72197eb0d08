use crate::config::ObservabilityConfig;
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Install the process-wide log sink.
///
/// JSON output writes one object per event to stdout with `timestamp`
/// (RFC 3339, UTC), `level`, `target` and the flattened event fields,
/// `message` included. Records from the `log` facade are bridged into the
/// same sink.
///
/// Meant to be called once at startup. A later call leaves the installed
/// sink in place and returns `false` instead of failing.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format.as_str() {
        "json" => registry
            .with(json_layer(std::io::stdout))
            .try_init()
            .is_ok(),
        _ => {
            // Pretty format for development
            registry
                .with(fmt::layer().pretty().with_writer(std::io::stdout))
                .try_init()
                .is_ok()
        }
    };

    if installed {
        log_initialized(config);
    }

    installed
}

/// One JSON object per event. Event fields are flattened into the top
/// level, so they must not reuse `timestamp`, `level`, `message` or `target`.
fn json_layer<S, W>(writer: W) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true)
        .with_writer(writer)
}

fn log_initialized(config: &ObservabilityConfig) {
    tracing::info!(
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Logging initialized"
    );
}
