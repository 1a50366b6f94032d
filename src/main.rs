//! StoreHub API - HTTP gateway over three independent stores
//!
//! - Products live in a PostgreSQL table (relational adapter)
//! - Users live in a MongoDB collection (document adapter)
//! - Files live in S3 buckets (object-storage adapter)
//!
//! Every route is a single pass-through to one of the adapters. Failures are
//! mapped to HTTP statuses by `AppError` and logged once by the diagnostics
//! middleware. The OpenAPI description is served at `/swagger`.

mod config;
mod db;
mod diagnostics;
mod docs;
mod documents;
mod error;
mod models;
mod routes;
mod state;
mod storage;

#[cfg(test)]
mod testing;

use crate::config::Settings;
use crate::db::PgProductStore;
use crate::documents::MongoUserStore;
use crate::routes::create_router;
use crate::state::AppState;
use crate::storage::S3ObjectStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    init_tracing();

    info!("🚀 Starting StoreHub API...");
    info!("📋 Configuration loaded successfully");

    let products = PgProductStore::new(&settings.relational)?;
    match products.ping().await {
        Ok(()) => info!(
            "✅ PostgreSQL reachable at {}:{} (pool size {}, queue limit {})",
            settings.relational.host,
            settings.relational.port,
            settings.relational.pool.max_size,
            settings.relational.pool.queue_limit
        ),
        Err(e) => warn!("⚠️  PostgreSQL not reachable yet: {}", e),
    }

    let users = MongoUserStore::new(&settings.document).await?;
    info!("✅ MongoDB client ready (database: {})", users.database());

    if !settings.storage.has_credentials() {
        warn!("⚠️  AWS_ACCESS_KEY_ID/AWS_SECRET_ACCESS_KEY not set, bucket routes will fail");
    }
    let objects = S3ObjectStore::new(&settings.storage);

    let state = Arc::new(AppState::new(products, users, objects));
    let app = create_router(state, &settings);

    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("📚 API documentation at http://{}{}", addr, docs::DOCS_PATH);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging; `LOG_FORMAT=json` switches
/// to one JSON object per line.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,storehub_api=debug,tower_http=info"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .compact(),
            )
            .init();
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
