//! Rhythm API server binary.
//!
//! Builds the document store and payment processor once, then serves the
//! REST API until Ctrl-C.

use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use rhythm_api::config::ApiConfig;
use rhythm_core::payment::StripeProcessor;
use rhythm_core::store::{DocumentStore, MemoryStore, PgDocumentStore};

/// CLI arguments; each falls back to the environment.
#[derive(Parser, Debug)]
#[command(name = "rhythm_api_server", about = "Rhythm REST API server")]
struct Args {
    /// Port to listen on; overrides `BIND_ADDR`/`PORT`.
    #[arg(long)]
    port: Option<u16>,

    /// PostgreSQL connection URL. Without one, data is kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let default_filter = "info,rhythm_api=debug,rhythm_core=debug";
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))?,
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(port) = args.port {
        config.bind_addr = format!("0.0.0.0:{port}");
    }
    if args.database_url.is_some() {
        config.database_url = args.database_url;
    }

    let store: Arc<dyn DocumentStore> = match &config.database_url {
        Some(url) => Arc::new(PgDocumentStore::connect(url, args.max_connections).await?),
        None => {
            warn!("DATABASE_URL not set, using in-memory store; data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let payments = StripeProcessor::new(
        config.payment_secret_key.clone(),
        config.payment_api_base.clone(),
    );
    if !payments.is_configured() {
        warn!("PAYMENT_SECRET_KEY not set, payment intents will fail");
    }

    let state = rhythm_api::AppState::new(config.clone(), store, Arc::new(payments));
    let app = rhythm_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "Server is running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
