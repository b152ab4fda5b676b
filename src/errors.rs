//! Unified error types for the pet pantry.
//!
//! Every fallible operation in the crate returns [`Result`]. Lookups that miss
//! (selecting or updating an unknown pet) are not errors; the store reports
//! them through [`crate::core::store::MutationOutcome`] instead.

use thiserror::Error;

/// Errors produced by pet pantry operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Invalid input: {message}")]
    Validation { message: String },

    #[error("A pet with id '{id}' already exists")]
    DuplicatePet { id: String },

    #[error("Pet store has already been initialized")]
    AlreadyInitialized,

    #[error("Pet store is still loading")]
    StillLoading,

    #[error("Failed to fetch initial pets: {message}")]
    Fetch { message: String },
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
