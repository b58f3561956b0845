//! Error types for the dsteg generation pipeline.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`SheetError`] - DST sheet fetching/parsing errors
//! - [`ValidationError`] - per-row validation errors
//! - [`TargetError`] - Drupal target-system errors
//! - [`ConfigError`] - environment configuration errors
//! - [`GenerateError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Validation errors never abort a run: the offending row is skipped and
//! reported. Sheet and config errors abort the run for that entity kind.

use thiserror::Error;

// =============================================================================
// Sheet Errors
// =============================================================================

/// Errors while fetching or parsing DST sheet ranges.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read a CSV export file.
    #[error("Failed to read sheet export: {0}")]
    IoError(#[from] std::io::Error),

    /// HTTP request to the Sheets API failed.
    #[error("Sheets API request failed: {0}")]
    HttpError(String),

    /// The Sheets API answered with an error status.
    #[error("Sheets API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Could not decode the export bytes.
    #[error("Failed to decode sheet export: {0}")]
    EncodingError(String),

    /// Malformed CSV export.
    #[error("Invalid CSV export: {0}")]
    CsvError(String),

    /// A range has no header row.
    #[error("Range '{0}' has no header row")]
    NoHeaders(String),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors raised while validating a single sheet row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required column is absent or empty.
    #[error("Missing required field: {0}")]
    MissingRequiredField(String),

    /// The machine name does not match the kind's identifier syntax.
    #[error("Invalid machine name '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: String },
}

// =============================================================================
// Target-System Errors
// =============================================================================

/// Errors from the Drupal target system.
#[derive(Debug, Error)]
pub enum TargetError {
    /// HTTP request failed before reaching the server.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Authentication was rejected.
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// The server answered with an unexpected status.
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// The server returned a body the client could not interpret.
    #[error("Invalid response body: {0}")]
    InvalidBody(String),
}

impl From<reqwest::Error> for TargetError {
    fn from(err: reqwest::Error) -> Self {
        TargetError::HttpError(err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading environment configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("Missing environment variable: {0}")]
    MissingVar(&'static str),

    /// A variable is set but unusable.
    #[error("Invalid value for {var}: {message}")]
    InvalidVar { var: &'static str, message: String },
}

// =============================================================================
// Generate Errors (top-level)
// =============================================================================

/// Top-level orchestration errors.
///
/// This is the main error type returned by [`crate::pipeline::generate`].
/// Per-record problems never surface here; they become outcomes in the run
/// report instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Sheet fetching error.
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Target-system error while taking the existing-entity snapshot.
    #[error("Target error: {0}")]
    Target(#[from] TargetError),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;

/// Result type for validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for target-system operations.
pub type TargetResult<T> = Result<T, TargetError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for generation runs.
pub type GenerateResult<T> = Result<T, GenerateError>;
