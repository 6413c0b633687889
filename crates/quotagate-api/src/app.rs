//! Application builder: wires store, relay client, services, enforcer, and
//! router into a running server.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use quotagate_cache::StoreManager;
use quotagate_core::config::AppConfig;
use quotagate_core::error::AppError;
use quotagate_core::result::AppResult;
use quotagate_relay::RelayControlClient;
use quotagate_service::QuotaService;
use quotagate_worker::{Enforcer, EnforcerRunner};

use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Connect the store and relay client and build the shared state.
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    info!(provider = %config.store.provider, "Initializing state store");
    let store = StoreManager::new(&config.store).await?;

    let relay = RelayControlClient::new(&config.relay)?;
    info!(kick_url = %relay.kick_url(), "Relay control client ready");

    let service = QuotaService::new(store.store(), Arc::new(relay), &config);
    Ok(AppState::new(config, service))
}

/// Start the enforcer loop if enabled.
pub fn spawn_enforcer(state: &AppState, cancel: watch::Receiver<bool>) -> Option<JoinHandle<()>> {
    if !state.config.enforcer.enabled {
        info!("Enforcer disabled by configuration");
        return None;
    }

    let enforcer = Enforcer::new(
        state.quota_service.as_ref().clone(),
        state.config.enforcer.clone(),
    );
    let runner = EnforcerRunner::new(Arc::new(enforcer));
    Some(tokio::spawn(async move {
        runner.run(cancel).await;
    }))
}

/// Runs the QuotaGate server until `shutdown` resolves.
pub async fn run_server<F>(config: AppConfig, shutdown: F) -> AppResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    info!("Starting QuotaGate v{}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.bind_addr();
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = build_state(config).await?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let enforcer_handle = spawn_enforcer(&state, shutdown_rx);

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!(addr = %addr, "QuotaGate listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    let _ = shutdown_tx.send(true);
    if let Some(handle) = enforcer_handle {
        match tokio::time::timeout(grace, handle).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!(error = %e, "Enforcer task panicked"),
            Err(_) => warn!("Enforcer did not stop within the shutdown grace period"),
        }
    }

    info!("QuotaGate stopped");
    served
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
