pub mod config;
pub mod route_builder;

use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    listing::ListingService,
    routes::{
        create_health_routes, create_listing_routes, create_seed_routes,
        create_statistics_routes,
    },
    seed::{HttpSeedSource, SeedService, SeedSource},
    server::route_builder::middleware_factories::request_response_logger,
    shutdown::{DatabaseShutdown, ShutdownCoordinator},
    statistics::StatisticsService,
    utils::request_id_middleware,
};
use axum::{Router, middleware};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tracing::{error, info};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub health_service: Arc<HealthService>,
    pub listing_service: Arc<ListingService>,
    pub statistics_service: Arc<StatisticsService>,
    pub seed_service: Arc<SeedService>,
    pub seed_source: Arc<dyn SeedSource>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config.database)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        let seed_source: Arc<dyn SeedSource> = Arc::new(HttpSeedSource::new(
            config.seed.url.clone(),
            Duration::from_secs(config.seed.timeout_secs),
        )?);

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        let listing_service = Arc::new(ListingService::new(database.clone()));
        let statistics_service = Arc::new(StatisticsService::new(
            database.clone(),
            listing_service.clone(),
        ));
        let seed_service = Arc::new(SeedService::new(
            database.clone(),
            config.seed.batch_size,
        ));

        Ok(Self {
            config: Arc::new(config),
            database,
            health_service,
            listing_service,
            statistics_service,
            seed_service,
            seed_source,
            shutdown_coordinator: Arc::new(ShutdownCoordinator::new()),
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            self.database.migrate().await.map_err(AppError::Database)?;
        }

        let app = self.create_app();

        let addr = self.config.server.bind_address();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to {}: {}", addr, e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        let result = axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move {
            shutdown_coordinator.wait().await;
            info!("Graceful shutdown initiated");
        })
        .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
        }

        DatabaseShutdown::new(self.database.clone(), SHUTDOWN_TIMEOUT)
            .shutdown()
            .await;
        info!("Server shutdown complete");

        Ok(())
    }

    /// Creates the application router
    pub fn create_app(&self) -> Router {
        let mut app = Router::new()
            .merge(create_health_routes())
            .merge(create_listing_routes())
            .merge(create_statistics_routes())
            .merge(create_seed_routes())
            .with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }

        // Outermost, so the logger and handlers see the request id
        app.layer(middleware::from_fn(request_id_middleware))
    }
}
