//! personas-server: HTTP CRUD service over a MySQL `users` table
//!
//! The server binds its port immediately, waits for the database to
//! come up, initializes the schema, and then serves a small JSON API
//! for creating, listing, fetching, updating, and deleting users.

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, DbConfig};
pub use http::{run_server, ServerConfig};
