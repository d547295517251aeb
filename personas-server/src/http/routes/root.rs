//! Root endpoint

use axum::{routing::get, Router};

/// GET / - plain-text greeting
async fn root() -> &'static str {
    "hello world"
}

/// Root routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(root))
}
