use std::process::ExitCode;

use reviewbot_core::{AppBuilder, Config};
use tokio::sync::watch;
use tracing::{error, info};

mod setup_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env is optional; real environment variables win.
    dotenvy::dotenv().ok();
    let _log_guard = setup_tracing::register();

    let config = match Config::load(std::env::vars()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    info!(?config, "configuration loaded");

    let driver = match AppBuilder::from_config(&config).and_then(|builder| builder.build()) {
        Ok(driver) => driver,
        Err(e) => {
            error!(error = %e, "failed to build driver");
            return ExitCode::FAILURE;
        }
    };

    // shutdown_tx を drop しても driver は止まる
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("ctrl-c received, shutting down");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                // keep the sender alive so the driver keeps running
                error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
        }
    });

    let watermark = driver.run(shutdown_rx).await;
    info!(%watermark, "exited");
    ExitCode::SUCCESS
}
