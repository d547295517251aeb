//! Route handlers organized by resource

pub mod health;
pub mod ping;
pub mod root;
pub mod users;
