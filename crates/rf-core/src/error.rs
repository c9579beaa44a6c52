//! # AppError
//!
//! Centralized error handling for the Rusty-Fund ecosystem.
//! Adapters raise these inside `anyhow::Error`; the API layer downcasts
//! them to pick a status code.

use thiserror::Error;

/// The primary error type for all rf-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Project, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., unknown category or sort key)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Resource already exists (e.g., user backing the same reward twice)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Stored data that no longer decodes (e.g., an unknown category in a row)
    #[error("internal service error: {0}")]
    Internal(String),
}
