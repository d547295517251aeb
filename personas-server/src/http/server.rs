//! Axum server setup
//!
//! Server skeleton with:
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C
//! - Listener bound before the database is ready, so the port is
//!   reachable while the readiness probe is still retrying

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::Router;
use sqlx::MySqlPool;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::db::{ensure_schema, wait_for_database};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Database to select and initialize the schema in
    pub database: String,

    /// Return the freshly stored row from PUT /users/{id} instead of
    /// echoing the submitted values back (default: false)
    pub refetch_after_update: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database: "personas".into(),
            refetch_after_update: false,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub pool: MySqlPool,
    pub refetch_after_update: bool,
    schema_ready: AtomicBool,
}

impl AppState {
    pub fn new(pool: MySqlPool, refetch_after_update: bool) -> Self {
        Self {
            pool,
            refetch_after_update,
            schema_ready: AtomicBool::new(true),
        }
    }

    /// Whether schema initialization succeeded at startup.
    pub fn schema_ready(&self) -> bool {
        self.schema_ready.load(Ordering::Relaxed)
    }

    /// Record that schema initialization failed. The server keeps
    /// running; /health reports the degraded state.
    pub fn mark_schema_degraded(&self) {
        self.schema_ready.store(false, Ordering::Relaxed);
    }
}

/// Build the full application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::root::router())
        .merge(routes::ping::router())
        .merge(routes::health::router())
        .merge(routes::users::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP server.
///
/// Binds the listener first so the port answers TCP while the database
/// is still starting, then blocks on the readiness probe, initializes
/// the schema, and only then begins serving requests.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::default());
/// let config = ServerConfig::default();
/// run_server(pool, config).await?;
/// ```
pub async fn run_server(pool: MySqlPool, config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    wait_for_database(&pool).await;

    let state = Arc::new(AppState::new(pool, config.refetch_after_update));
    if let Err(e) = ensure_schema(&state.pool, &config.database).await {
        tracing::error!("Schema initialization failed: {}", e);
        state.mark_schema_degraded();
    }

    let app = build_router(state);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
