pub mod api;
pub mod core;
pub mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    dev::ServerHandle,
    middleware,
    web::{self, Data},
    App, HttpServer,
};
use parking_lot::Mutex;
use tracing::info;

use crate::{
    api::handlers,
    core::{
        exif::{ExifGpsExtractor, GpsExtractor},
        mission::MissionRegistry,
        services::{HealthService, VerificationPolicy, VerificationService},
    },
    utils::{
        config::Config,
        error::{AppError, Result},
        metrics::Metrics,
    },
};

/// Shared state handed to every actix worker.
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub registry: Arc<MissionRegistry>,
    pub verification_service: Arc<VerificationService>,
    pub extractor: Arc<dyn GpsExtractor>,
    pub metrics: Arc<Metrics>,
    pub health_service: Arc<HealthService>,
}

impl AppContext {
    pub fn new(config: Config) -> Self {
        Self::with_extractor(config, Arc::new(ExifGpsExtractor::new()))
    }

    pub fn with_extractor(config: Config, extractor: Arc<dyn GpsExtractor>) -> Self {
        let verification_service = Arc::new(VerificationService::new(VerificationPolicy::from(&config)));
        let registry = Arc::new(MissionRegistry::new());
        let metrics = Arc::new(Metrics::new());
        let health_service = Arc::new(HealthService::new(registry.clone(), metrics.clone()));

        Self {
            config: Arc::new(config),
            registry,
            verification_service,
            extractor,
            metrics,
            health_service,
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(Data::from(self.config.clone()))
            .app_data(Data::from(self.registry.clone()))
            .app_data(Data::from(self.verification_service.clone()))
            .app_data(Data::from(self.extractor.clone()))
            .app_data(Data::from(self.metrics.clone()))
            .app_data(Data::from(self.health_service.clone()))
            .service(handlers::mission::resource())
            .service(handlers::verification::resource())
            .service(handlers::health::resource());
    }
}

pub struct Application {
    context: AppContext,
    server: Mutex<Option<ServerHandle>>,
}

impl Application {
    pub fn new(config: Config) -> Self {
        info!("Initializing services...");
        Self {
            context: AppContext::new(config),
            server: Mutex::new(None),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    /// Binds the HTTP server and runs it on the current actix system.
    pub async fn start(&self) -> Result<()> {
        let config = self.context.config.clone();
        let context = self.context.clone();
        let cors_max_age = config.get_cors_max_age();

        let mut server = HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                .allow_any_header()
                .max_age(cors_max_age);

            App::new()
                .wrap(middleware::Logger::default())
                .wrap(cors)
                .configure(|cfg| context.configure(cfg))
        })
        .disable_signals()
        .bind((config.server.host.as_str(), config.server.port))
        .map_err(|e| AppError::Server(format!("Failed to bind API server: {}", e)))?;

        if config.server.workers > 0 {
            server = server.workers(config.server.workers);
        }

        for addr in server.addrs() {
            info!("Listening on {}", addr);
        }

        let server = server.run();
        *self.server.lock() = Some(server.handle());
        actix_rt::spawn(server);

        info!("API server started");
        Ok(())
    }

    pub async fn shutdown(&self) {
        info!("Shutting down application...");

        let handle = self.server.lock().take();
        if let Some(handle) = handle {
            handle.stop(true).await;
        }

        info!(
            missions = self.context.registry.len(),
            "Application shutdown complete"
        );
    }
}
