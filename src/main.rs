use anyhow::Context;
use ecostep::{
    utils::{config::Config, logging},
    Application,
};
use tokio::signal;
use tracing::{error, info};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::new().context("Failed to load configuration")?;
    let _log_guard = logging::init(&config.logging);

    info!("Starting Ecostep mission verifier v{}", env!("CARGO_PKG_VERSION"));

    let app = Application::new(config);
    app.start().await.map_err(|e| {
        error!("Failed to start application: {}", e);
        e
    })?;

    shutdown_signal().await;
    app.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", err);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                error!("Failed to install terminate handler: {}", err);
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
}
