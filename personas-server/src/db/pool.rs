//! Database connection pool management
//!
//! Uses a lazy sqlx MySqlPool: constructing the pool never dials the
//! database, so the process can come up while MySQL is still starting.
//! The readiness probe drives the first real connection.

use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{FromRow, MySqlPool};

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// How long a single acquisition may take before failing.
///
/// Kept equal to the readiness probe interval so a probe attempt against a
/// database that is still down fails within one probe period.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection parameters for the MySQL instance.
///
/// Defaults match the docker-compose service this server is deployed
/// next to; every field can be overridden by the CLI flags / environment.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "mysqldb".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: "1234".to_string(),
            database: "personas".to_string(),
        }
    }
}

impl DbConfig {
    /// Build sqlx connect options from the discrete parameters.
    pub fn connect_options(&self) -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
    }
}

/// Create a lazy MySQL connection pool.
///
/// No connection is attempted here; acquisition happens on first use.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&DbConfig::default());
/// ```
pub fn create_pool(config: &DbConfig) -> MySqlPool {
    create_pool_with_options(config, DEFAULT_MAX_CONNECTIONS)
}

/// Create a lazy MySQL connection pool with a custom connection limit.
pub fn create_pool_with_options(config: &DbConfig, max_connections: u32) -> MySqlPool {
    MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect_lazy_with(config.connect_options())
}

/// Row returned by the connectivity probe query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PingRow {
    pub now: NaiveDateTime,
}

/// Round-trip one query to verify connectivity.
pub async fn ping(pool: &MySqlPool) -> Result<Vec<PingRow>, sqlx::Error> {
    sqlx::query_as::<_, PingRow>("SELECT NOW() AS now")
        .fetch_all(pool)
        .await
}
