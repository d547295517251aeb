//! Validation error types

use std::fmt;

/// Validation error for request payloads.
///
/// Display output is the exact message returned to the client in the
/// 400 response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Create payload is missing `name`, `email`, or both
    MissingNameAndEmail,

    /// Update payload carries neither `name` nor `email`
    MissingNameOrEmail,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingNameAndEmail => write!(f, "Name and email are required"),
            Self::MissingNameOrEmail => write!(f, "Name or email is required"),
        }
    }
}

impl std::error::Error for ValidationError {}
