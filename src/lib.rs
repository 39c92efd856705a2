pub mod api;
pub mod core;
pub mod storage;
pub mod utils;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use parking_lot::Mutex;
use tracing::info;

use crate::{
    core::{
        identity::{Gallery, IdentityMatcher},
        providers::RemoteModels,
        services::MonitorService,
    },
    storage::{SharedLedger, SheetLedger},
    utils::{
        config::Config,
        error::{MonitorError, Result},
    },
};

pub struct Application {
    config: Arc<Config>,
    monitor: Arc<MonitorService>,
}

impl Application {
    pub async fn new(config: Config) -> Result<Self> {
        let config = Arc::new(config);

        info!("Initializing attendance ledger...");
        let ledger: SharedLedger = Arc::new(Mutex::new(SheetLedger::from_config(&config)?));

        info!("Connecting to model service at {}...", config.providers.endpoint);
        let models = Arc::new(RemoteModels::new(&config.providers)?);

        info!("Loading known identities...");
        let gallery = Gallery::load(&config.recognition.gallery_dir, models.as_ref()).await?;

        let monitor = Arc::new(MonitorService::new(
            models.clone(),
            models.clone(),
            models,
            Arc::new(gallery),
            IdentityMatcher::from_config(&config.recognition),
            ledger,
        ));

        Ok(Self { config, monitor })
    }

    pub fn monitor(&self) -> Arc<MonitorService> {
        self.monitor.clone()
    }

    /// Serves the API until the server receives a shutdown signal.
    pub async fn run(self) -> Result<()> {
        let monitor = web::Data::from(self.monitor.clone());
        let server_config = self.config.server.clone();
        let allowed_origin = server_config.allowed_origin.clone();
        let frame_limit = server_config.max_frame_bytes;

        info!(
            "Starting API server on {}:{}",
            server_config.host, server_config.port
        );

        HttpServer::new(move || {
            let cors = match &allowed_origin {
                Some(origin) => Cors::default()
                    .allowed_origin(origin)
                    .allow_any_method()
                    .allow_any_header(),
                None => Cors::permissive(),
            };

            App::new()
                .wrap(cors)
                .app_data(monitor.clone())
                .app_data(web::JsonConfig::default().limit(frame_limit))
                .service(api::scope())
        })
        .bind((server_config.host.as_str(), server_config.port))
        .map_err(|e| MonitorError::Config(format!("Failed to bind API server: {}", e)))?
        .run()
        .await
        .map_err(|e| MonitorError::Task(format!("API server failed: {}", e)))?;

        info!("API server stopped");
        Ok(())
    }
}
