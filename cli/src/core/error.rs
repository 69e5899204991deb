//! # Folio Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout Folio. It provides a
//! consistent approach to error management with detailed error information
//! and context.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `FolioError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error types cover:
//! - Configuration errors (bad keyword rules, empty response pools, ...)
//! - Contact form validation
//! - Outbound delivery failures (email API, document store, contact relay)
//!
//! ## Examples
//!
//! ```rust
//! // Fail fast on a configuration defect
//! if pool.is_empty() {
//!     return Err(FolioError::Config(format!("Response pool for '{}' is empty", category)))?;
//! }
//!
//! // Add context to errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Custom error type for the Folio application.
#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email delivery failed: {0}")]
    Mail(String),

    #[error("Document store write failed: {0}")]
    Store(String),

    #[error("Contact relay failed: {0}")]
    Relay(String),

    #[error("'{operation}' timed out after {millis} ms")]
    Timeout { operation: String, millis: u64 },

    #[error("HTTP request failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Anyhow allows for easy context addition and flexible error handling.
pub type Result<T> = anyhow::Result<T>;
