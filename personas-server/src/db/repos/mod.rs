//! Repository implementations for database access
//!
//! One parameterized statement per operation; positional placeholders
//! only, never string-built SQL. Constraints are the database's job:
//! no check-then-insert.

pub mod users;

pub use users::{DbError, User, UserRepo};
