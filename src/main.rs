use std::env;
use std::error::Error;
use dotenv::dotenv;
use log::info;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use chat_activity_tracker::core::{AppState, TrackerConfig};
use chat_activity_tracker::init_router;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();
    let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    let config = TrackerConfig::new_config(&run_mode)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    info!("Starting chat activity tracker in {run_mode} mode.");

    let url = format!("{}:{}", config.server_url, config.server_port);
    let app_state = AppState::init(config)?;
    let shutdown = app_state.shutdown.clone();
    let app = init_router(app_state)?;

    let listener = TcpListener::bind(url.clone()).await?;
    info!("Server is listening on: {url}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;
    info!("Stopping chat activity tracker...");
    Ok(())
}

/// Waits for ctrl-c, then stops running fetch sessions so in-flight requests answer with what they have.
async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Unable to listen for the shutdown signal: {err}");
    }
    shutdown.cancel();
}
