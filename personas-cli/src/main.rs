//! personas - HTTP CRUD server for a MySQL user directory
//!
//! Binds the HTTP port immediately, waits for MySQL to accept
//! connections, initializes the schema, and serves the JSON API.
//!
//! All connection parameters can come from flags, the environment, or a
//! `.env` file in the working directory; defaults match the
//! docker-compose deployment.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use personas_server::db::{create_pool, DbConfig};
use personas_server::http::{run_server, ServerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "personas",
    author,
    version,
    about = "HTTP CRUD service over a MySQL users table",
    long_about = "Serves a small JSON API for creating, listing, fetching, updating, and \
                  deleting users. The port is bound immediately; requests are answered once \
                  the database has come up and the schema is in place."
)]
struct Cli {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// MySQL host
    #[arg(long, env = "DB_HOST", default_value = "mysqldb")]
    db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER", default_value = "root")]
    db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", default_value = "1234")]
    db_password: String,

    /// Database to select and initialize the schema in
    #[arg(long, env = "DB_NAME", default_value = "personas")]
    db_name: String,

    /// Return the stored row from PUT /users/{id} instead of echoing the request
    #[arg(long, env = "REFETCH_AFTER_UPDATE")]
    refetch_after_update: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

fn init_tracing(debug: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(debug)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so clap's env fallbacks see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.debug).ok();

    tracing::info!("Starting personas server on {}", cli.bind);

    let db_config = DbConfig {
        host: cli.db_host,
        port: cli.db_port,
        user: cli.db_user,
        password: cli.db_password,
        database: cli.db_name,
    };
    let pool = create_pool(&db_config);

    let config = ServerConfig {
        bind_addr: cli.bind,
        database: db_config.database.clone(),
        refetch_after_update: cli.refetch_after_update,
    };

    run_server(pool, config).await.context("Server error")?;
    Ok(())
}
