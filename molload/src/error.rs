//! Error types for the molload pipeline.
//!
//! Every fatal condition of a run has its own type:
//!
//! - [`ConfigError`] - Parameter blob and environment errors
//! - [`DialectError`] - Delimiter/encoding sniffing errors
//! - [`FormatError`] - Mandatory column contract violations
//! - [`ToolkitError`] - Faults raised by the chemistry toolkit
//! - [`SchemaError`] - Field schema document errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries. Per-record failures
//! are not errors: they are [`crate::transform::RecordOutcome`] values.

use thiserror::Error;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A parameter piece is not of the form `key=value`.
    #[error("Problem decoding parameters - expected key=value, found '{0}'")]
    MalformedParameter(String),

    /// A boolean parameter has an unrecognised value.
    #[error("Invalid value '{value}' for parameter '{key}' - expected true or false")]
    InvalidBoolean { key: String, value: String },

    /// A required setting was not provided.
    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

// =============================================================================
// Dialect Errors
// =============================================================================

/// Errors while sniffing the file dialect.
#[derive(Debug, Error)]
pub enum DialectError {
    /// None of the candidate delimiters splits the sample consistently.
    #[error("Problem with file delimiter - must be one of {candidates}")]
    Undetectable { candidates: String },

    /// Failed to read the sample.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Format Errors
// =============================================================================

/// Violations of the leading-column contract.
#[derive(Debug, Error)]
pub enum FormatError {
    /// No rows at all.
    #[error("Problem with file - it contains no rows")]
    EmptyFile,

    /// Column 0 is not a smiles column.
    #[error("Problem with file - first column must be smiles (found '{0}')")]
    SmilesColumn(String),

    /// Column 1 is not a uuid column and uuids are not being generated.
    #[error("Problem with file - second column must be uuid (found '{0}')")]
    IdentifierColumn(String),

    /// The heading row could not be decoded.
    #[error("Problem reading first row: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Toolkit Errors
// =============================================================================

/// A fault raised by the chemistry toolkit.
///
/// Distinct from a structure that simply fails to standardize, which the
/// toolkit reports as `Ok(None)`.
#[derive(Debug, Error)]
#[error("{smiles} caused a failure in the chemistry toolkit: {message}")]
pub struct ToolkitError {
    pub smiles: String,
    pub message: String,
}

impl ToolkitError {
    pub fn new(smiles: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            smiles: smiles.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Schema Errors
// =============================================================================

/// Errors reading or writing the field schema document.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// IO error.
    #[error("Schema IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error.
    #[error("Schema JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The document does not match the field schema format.
    #[error("Invalid field schema document: {errors:?}")]
    Invalid { errors: Vec<String> },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the error type returned by [`crate::transform::pipeline::run`].
/// Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dialect error.
    #[error("Dialect error: {0}")]
    Dialect(#[from] DialectError),

    /// Heading contract error.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Chemistry toolkit fault.
    #[error("Toolkit error: {0}")]
    Toolkit(#[from] ToolkitError),

    /// Field schema error.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// CSV read/write error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for dialect detection.
pub type DialectResult<T> = Result<T, DialectError>;

/// Result type for heading reconciliation.
pub type FormatResult<T> = Result<T, FormatError>;

/// Result type for toolkit calls.
pub type ToolkitResult<T> = Result<T, ToolkitError>;

/// Result type for schema operations.
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
