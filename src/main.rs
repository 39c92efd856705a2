use anyhow::Context;
use classroom_monitor::{
    utils::{config::Config, logging::init_tracing},
    Application,
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::new().context("Failed to load configuration")?;
    let _log_guard = init_tracing(&config.logging);

    info!("Starting Classroom Monitor v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config).await.map_err(|e| {
        error!("Failed to initialize application: {}", e);
        e
    })?;

    // Actix stops the server on ctrl-c / SIGTERM.
    app.run().await.map_err(|e| {
        error!("Application error: {}", e);
        e
    })?;

    info!("Application shutdown complete");
    Ok(())
}
