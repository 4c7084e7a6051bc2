//! pkgstatus server binary.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use pkgstatus_server::store::memory::MemoryStore;
use pkgstatus_server::store::pg::PgStore;
use pkgstatus_server::store::RecordStore;
use pkgstatus_server::{metrics, router, AppState, PkgstatusConfig};

#[derive(Parser)]
#[command(name = "pkgstatus", about = "Build farm status browser")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "PKGSTATUS_PORT", default_value = "5000")]
    port: u16,

    /// PostgreSQL connection URL
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost/pkgstatus"
    )]
    database_url: String,

    /// Maximum pooled database connections
    #[arg(long, env = "PKGSTATUS_DB_POOL", default_value = "8")]
    pool_size: usize,

    /// Serve records from a JSON fixture file instead of the database
    #[arg(long)]
    fixtures: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    tracing::info!("Starting pkgstatus...");

    let store: Arc<dyn RecordStore> = match &cli.fixtures {
        Some(path) => Arc::new(MemoryStore::load(path)?),
        None => {
            tracing::info!(pool_size = cli.pool_size, "Using PostgreSQL record store");
            Arc::new(PgStore::connect(&cli.database_url, cli.pool_size)?)
        }
    };

    let config = PkgstatusConfig::from_env();
    let app = router(AppState::new(store, config));

    metrics::init_metrics();

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!("pkgstatus listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
