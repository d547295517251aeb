//! Database layer - pool, readiness probe, schema, repositories
//!
//! # Design Principles
//!
//! - Bounded lazy connection pool, dependency-injected - no module-level singleton
//! - Readiness is polled, not assumed - the database may start after us
//! - Schema init is idempotent and survivable - failure degrades, never crashes

pub mod pool;
pub mod readiness;
pub mod repos;
pub mod schema;

pub use pool::{create_pool, ping, DbConfig, PingRow};
pub use readiness::{wait_for_database, ConnectionSource, ProbeState, ReadinessProbe};
pub use repos::{DbError, User, UserRepo};
pub use schema::ensure_schema;
