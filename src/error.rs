//! Error handling module for oilguide
//!
//! Provides centralized error handling with proper error types using thiserror.
//! All errors in the application should use these types for consistency.
//!
//! Failures from collaborators (catalog lookups, the entitlement store)
//! propagate unchanged to the immediate caller: no retry, no backoff, no
//! silent suppression. The cascade and gate expose their own typed errors,
//! wrapped transparently so callers can still match on the inner variant.

// Library API - exported for external consumers, not all of it is used by the binary
#![allow(dead_code)]

use thiserror::Error;

use crate::gate::GateError;
use crate::selection::SelectionError;

/// Main error type for oilguide
#[derive(Error, Debug)]
pub enum OilGuideError {
    /// IO errors (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Vehicle catalog collaborator failures (unreachable or corrupt data)
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Entitlement store collaborator failures
    #[error("Store error: {0}")]
    Store(String),

    /// Selection cascade errors (unknown option, missing upstream choice)
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Quota gate errors (consume without authorization)
    #[error(transparent)]
    Gate(#[from] GateError),

    /// Account errors (unknown account, bad credentials, duplicates)
    #[error("Account error: {0}")]
    Account(String),

    /// Validation errors (catalog integrity, user input)
    #[error("Validation error: {0}")]
    Validation(String),

    /// General errors (catch-all for edge cases)
    #[error("{0}")]
    General(String),
}

/// Result type alias for oilguide operations
pub type Result<T> = std::result::Result<T, OilGuideError>;

// Convenient error constructors
impl OilGuideError {
    /// Create a catalog collaborator error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create an entitlement store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an account error
    pub fn account(msg: impl Into<String>) -> Self {
        Self::Account(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a general error
    pub fn general(msg: impl Into<String>) -> Self {
        Self::General(msg.into())
    }
}
