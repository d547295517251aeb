//! Schema initialization
//!
//! One idempotent DDL statement, run on every start. Failure here is
//! survivable: the caller logs it and keeps serving (queries then fail
//! individually until an operator fixes permissions or the schema).

use sqlx::MySqlPool;

/// Select the target database, then create the users table if needed.
///
/// Both statements run on a single acquired connection, which returns to
/// the pool when `conn` drops on any path. Executed unprepared because
/// `USE` cannot go through the prepared-statement protocol.
pub async fn ensure_schema(pool: &MySqlPool, database: &str) -> Result<(), sqlx::Error> {
    tracing::info!(database, "Initializing schema...");

    let mut conn = pool.acquire().await?;

    let use_db = format!("USE `{}`", database);
    sqlx::raw_sql(&use_db).execute(&mut *conn).await?;

    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(100) NOT NULL UNIQUE
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    tracing::info!("Schema initialized");
    Ok(())
}
