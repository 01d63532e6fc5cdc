use anyhow::{Context, Result};
use axum::{Router, routing::get};
use genproto::product::{
    product_command_service_server::ProductCommandServiceServer,
    product_query_service_server::ProductQueryServiceServer,
};
use product::{
    config::{myconfig::Config, server_config::ServerConfig},
    handler::{command::ProductCommandServiceImpl, query::ProductQueryServiceImpl},
    metrics::{health_check, metrics_handler},
    state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{LoggerOptions, Telemetry, init_logger},
};
use std::{net::SocketAddr, sync::Arc};
use tokio::{sync::broadcast, task::JoinHandle};
use tonic::transport::Server;
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "product-service";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;
    let server_config = ServerConfig::from_config(&config)?;

    let telemetry = Telemetry::init(SERVICE_NAME, &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    let _log_guard = init_logger(
        telemetry.logger_provider(),
        SERVICE_NAME,
        LoggerOptions {
            is_dev: config.is_dev,
            enable_file: config.enable_file_log,
        },
    );

    info!("🚀 Starting Product Service initialization...");

    let db_pool = ConnectionManager::new_pool(&server_config.database_url, server_config.pool)
        .await
        .context("Failed to initialize database pool")?;

    if server_config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let state = Arc::new(AppState::new(db_pool));

    info!("✅ Application setup completed successfully.");

    let (shutdown_tx, _) = broadcast::channel::<()>(1);

    let grpc_handle = spawn_grpc_server(state.clone(), server_config.grpc_addr, &shutdown_tx);
    let metrics_handle =
        spawn_metrics_server(state.clone(), server_config.metrics_addr, &shutdown_tx);

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🛑 Shutdown signal received (Ctrl+C)."),
        Err(e) => error!("Failed to listen for shutdown signal: {e}"),
    }

    if let Err(e) = shutdown_tx.send(()) {
        warn!("Failed to broadcast shutdown signal: {e}");
    }

    info!("🛑 Shutting down all servers...");

    let shutdown_timeout = tokio::time::Duration::from_secs(30);
    let shutdown_result = tokio::time::timeout(shutdown_timeout, async {
        let _ = tokio::join!(grpc_handle, metrics_handle);
    })
    .await;

    match shutdown_result {
        Ok(()) => info!("✅ All servers shutdown gracefully"),
        Err(_) => warn!("⚠️  Shutdown timeout reached, forcing exit"),
    }

    state.close().await;

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    info!("✅ Product Service shutdown complete.");

    Ok(())
}

fn spawn_grpc_server(
    state: Arc<AppState>,
    grpc_addr: SocketAddr,
    shutdown_tx: &broadcast::Sender<()>,
) -> JoinHandle<()> {
    let command_service =
        ProductCommandServiceImpl::new(state.di_container.product_command.clone());
    let query_service = ProductQueryServiceImpl::new(state.di_container.product_query.clone());
    let shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        loop {
            match start_grpc_server(
                command_service.clone(),
                query_service.clone(),
                grpc_addr,
                shutdown_rx.resubscribe(),
            )
            .await
            {
                Ok(()) => {
                    info!("✅ gRPC server stopped gracefully");
                    break;
                }
                Err(e) => {
                    error!("❌ gRPC server failed: {e:#}. Restarting in 5s...");
                    tokio::time::sleep(tokio::time::Duration::from_secs(5)).await;
                }
            }
        }
    })
}

fn spawn_metrics_server(
    state: Arc<AppState>,
    metrics_addr: SocketAddr,
    shutdown_tx: &broadcast::Sender<()>,
) -> JoinHandle<()> {
    let shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        loop {
            match start_metrics_server(state.clone(), metrics_addr, shutdown_rx.resubscribe())
                .await
            {
                Ok(()) => {
                    info!("✅ Metrics server stopped gracefully");
                    break;
                }
                Err(e) => {
                    error!("❌ Metrics server failed: {e:#}. Retrying in 3s...");
                    tokio::time::sleep(tokio::time::Duration::from_secs(3)).await;
                }
            }
        }
    })
}

async fn start_grpc_server(
    command_service: ProductCommandServiceImpl,
    query_service: ProductQueryServiceImpl,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("📡 Starting gRPC server on {addr}");

    let shutdown_future = async move {
        let _ = shutdown_rx.recv().await;
        info!("gRPC server received shutdown signal");
    };

    Server::builder()
        .add_service(ProductCommandServiceServer::new(command_service))
        .add_service(ProductQueryServiceServer::new(query_service))
        .serve_with_shutdown(addr, shutdown_future)
        .await
        .with_context(|| format!("gRPC server failed to start on {addr}"))
}

async fn start_metrics_server(
    state: Arc<AppState>,
    addr: SocketAddr,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<()> {
    info!("🔧 Starting metrics server on {addr}");

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_check))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind metrics listener on {addr}"))?;

    let shutdown_future = async move {
        let _ = shutdown_rx.recv().await;
        info!("Metrics server received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_future)
        .await
        .context("Metrics server failed to start or serve")
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("📜 Database migrations applied");
    Ok(())
}
