use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
use workout_log::{config::StorageKind, router, AppState, Config, StoreStatus, WorkoutStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    match config.storage {
        StorageKind::File => info!("storing workouts in {}", config.data_path.display()),
        StorageKind::Memory => info!("storing workouts in memory for this process only"),
        StorageKind::Disabled => info!("workout storage disabled"),
    }

    let store = WorkoutStore::open(config.storage_backend()).await;
    if store.status() == StoreStatus::Degraded {
        warn!("running without durable storage");
    }

    let app = router(AppState::new(store));
    let addr = config.addr();

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
