use anyhow::Context;
use dotenvy::dotenv;
use tokio::signal;

use coffeeshop::logging::init_tracing;
use coffeeshop::metrics::init_metrics;
use coffeeshop::modules::drinks::repository::DrinkRepository;
use coffeeshop::router::init_router_with_metrics;
use coffeeshop::state::init_app_state;
use coffeeshop_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let server_config = ServerConfig::from_env();

    init_tracing(&server_config.log_dir).context("Failed to initialize tracing")?;
    let metrics_handle = init_metrics().context("Failed to install Prometheus recorder")?;

    let state = init_app_state()
        .await
        .context("Failed to initialize database")?;

    if server_config.reset_db_on_startup {
        DrinkRepository::reset(&state.db)
            .await
            .map_err(|e| e.error)?;
    }

    let db = state.db.clone();
    let app = init_router_with_metrics(state, metrics_handle);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("🚀 Server running on http://{}", address);
    tracing::info!("📚 Swagger UI available at http://{}/swagger-ui", address);
    tracing::info!("📖 Scalar UI available at http://{}/scalar", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
