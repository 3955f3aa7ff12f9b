use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use inventory_server::clock::SystemClock;
use inventory_server::config::Config;
use inventory_server::events::TracingPublisher;
use inventory_server::routes::create_routes;
use inventory_server::state::AppState;
use inventory_server::store::PgStore;
use inventory_server::telemetry::init_tracing;
use inventory_server::workers::ExpiryScheduler;

#[tokio::main]
async fn main() {
    let config = Config::from_env().expect("Invalid configuration");
    init_tracing(&config.log).expect("Failed to install tracing subscriber");

    let store = PgStore::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Successfully connected to database");

    store.migrate().await.expect("Failed to run migrations");

    tracing::info!("Migrations run successfully");

    let state = AppState::new(
        Arc::new(store),
        Arc::new(SystemClock),
        Arc::new(TracingPublisher),
    );
    let scheduler = ExpiryScheduler::new(state.reservations.clone(), &config.expiry).spawn();

    let app: Router = create_routes(state, &config.server);

    let addr = config.server.addr();
    tracing::info!("🚀 Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    scheduler.shutdown(config.expiry.shutdown_grace).await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
