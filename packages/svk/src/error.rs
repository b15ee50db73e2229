//! Error types for the SVK profile.
//!
//! Wraps the core builder's `ErmsError` and adds the format and profile
//! rules of the Church of Sweden case-file profile.

use erms_create::ErmsError;
use thiserror::Error;

/// Main error type for the SVK profile library.
#[derive(Debug, Error)]
pub enum SvkError {
    /// Error raised by the core ERMS builder.
    #[error(transparent)]
    Erms(#[from] ErmsError),

    /// Case number does not match `<code> <year>-<serial>`.
    #[error("Invalid case number: '{0}'. Expected <code> <year>-<serial> (e.g., F 2019-0032)")]
    InvalidCaseNumber(String),

    /// Document number does not match `<case number>:<n>`.
    #[error("Invalid document number: '{0}'. Expected <case number>:<n> (e.g., F 2019-0032:1)")]
    InvalidDocumentNumber(String),

    /// Organisation number is not 10 digits.
    #[error("Invalid organisation number: '{0}'. Expected 10 digits without hyphen")]
    InvalidOrgNumber(String),

    /// Status outside the SVK status list.
    #[error("Invalid status: '{0}'. Must be one of: closed, obliterated")]
    InvalidStatus(String),

    /// Direction outside incoming/outgoing/other+internal.
    #[error("Invalid direction: '{0}'. Must be incoming, outgoing, or other with 'internal'")]
    InvalidDirection(String),

    /// Neither organisation number nor archive creator id was given.
    #[error("Either an organisation number or an archive creator id (aid) is required")]
    MissingArchiveCreatorId,

    /// Extension element not allowed on this kind of section.
    #[error("{element} can only be added to {allowed}, not to {actual}")]
    ExtensionKindMismatch {
        element: String,
        allowed: String,
        actual: String,
    },

    /// Document failed SVK validation.
    #[error("Validation failed with {} error(s): {}", .errors.len(), .errors.join("; "))]
    ValidationFailed { errors: Vec<String> },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Manifest could not be parsed.
    #[error("Manifest parsing failed: {0}")]
    Manifest(#[from] serde_yaml_ng::Error),

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for SVK operations.
pub type Result<T> = std::result::Result<T, SvkError>;
