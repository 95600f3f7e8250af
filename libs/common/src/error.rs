//! Custom error types for the common library
//!
//! This module defines the error types raised by the document store and
//! the database plumbing underneath it.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for store operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// A document could not be encoded or decoded
    #[error("Document serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error occurred while creating collections
    #[error("Collection bootstrap error: {0}")]
    Bootstrap(String),

    /// A document clashes with an existing one on a unique field
    #[error("Duplicate document in {collection}: {field} already taken")]
    Conflict {
        collection: &'static str,
        field: &'static str,
    },

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),

    /// The backing store cannot serve requests
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;
