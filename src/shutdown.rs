use crate::database::DatabaseManager;
use std::{sync::Arc, time::Duration};
use tokio::{signal, sync::watch, time::timeout};
use tracing::{error, info, warn};

/// Broadcasts a single "stop serving" event to whoever subscribed
#[derive(Clone)]
pub struct ShutdownCoordinator {
    shutdown_tx: watch::Sender<bool>,
    shutdown_rx: watch::Receiver<bool>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        Self {
            shutdown_tx,
            shutdown_rx,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.shutdown_rx.clone()
    }

    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown_rx.borrow()
    }

    pub fn initiate_shutdown(&self) {
        if self.is_shutdown_requested() {
            return;
        }
        info!("Initiating graceful shutdown");
        if let Err(e) = self.shutdown_tx.send(true) {
            error!("Failed to broadcast shutdown signal: {}", e);
        }
    }

    /// Wait for Ctrl+C or SIGTERM, then notify subscribers
    pub async fn wait_for_shutdown_signal(&self) {
        let ctrl_c = async {
            if let Err(e) = signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
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
                    warn!("Failed to install SIGTERM handler: {}", e);
                    std::future::pending::<()>().await;
                }
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C signal"),
            _ = terminate => info!("Received terminate signal"),
        }

        self.initiate_shutdown();
    }

    /// Resolves once shutdown has been initiated
    pub async fn wait(&self) {
        let mut rx = self.subscribe();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Closes the shared connection pool once the HTTP server has drained
pub struct DatabaseShutdown {
    database: Arc<dyn DatabaseManager>,
    timeout_duration: Duration,
}

impl DatabaseShutdown {
    pub fn new(database: Arc<dyn DatabaseManager>, timeout_duration: Duration) -> Self {
        Self {
            database,
            timeout_duration,
        }
    }

    pub async fn shutdown(&self) {
        info!("Closing database connections");
        let connection = self.database.connection().clone();

        match timeout(self.timeout_duration, connection.close()).await {
            Ok(Ok(())) => info!("Database shutdown completed"),
            Ok(Err(e)) => error!("Error closing database connections: {}", e),
            Err(_) => error!("Timeout closing database connections"),
        }
    }
}
