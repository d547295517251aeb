//! Database connectivity check endpoint

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};

use crate::db::{ping, PingRow};
use crate::http::error::ApiError;
use crate::http::server::AppState;

/// GET /ping - round-trip the database with SELECT NOW()
async fn ping_db(State(state): State<Arc<AppState>>) -> Result<Json<Vec<PingRow>>, ApiError> {
    let rows = ping(&state.pool)
        .await
        .map_err(|e| ApiError::db(e.into(), "Error connecting to the database"))?;
    Ok(Json(rows))
}

/// Ping routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/ping", get(ping_db))
}

#[cfg(test)]
mod tests {
    // Exercised end to end in tests/api.rs against a live database.
}
