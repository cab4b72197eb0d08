use service_monitor::{
    api::{create_router, AppState},
    config::Config,
    observability::{init_logging, HealthProber, Metrics},
};
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize logging
    init_logging(&config.observability);

    tracing::info!(service = %config.service.name, version = %config.service.version, "Starting service");
    tracing::info!("Configuration loaded: {:?}", config.server);

    let metrics = Metrics::new(&config.service)?;
    let prober = HealthProber::from_config(&config.database);
    tracing::info!(
        connect_timeout_seconds = config.database.connect_timeout_seconds,
        "Health prober configured"
    );

    let state = AppState::new(metrics, Arc::new(prober), config.service.clone());
    let app = create_router(state);

    // Bind server
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(address = %addr, error = %e, "Failed to bind listener");
        anyhow::anyhow!("Failed to bind {}: {}", addr, e)
    })?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Service stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
