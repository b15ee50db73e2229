//! Error types for building ERMS documents.
//!
//! Every builder operation validates its inputs before touching the tree, so
//! an `Err` from any builder call means the document is unchanged.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the ERMS builder library.
#[derive(Debug, Error)]
pub enum ErmsError {
    /// A value was not a member of its controlled value list.
    #[error("Invalid {field}: '{value}'. Must be one of: {}", .allowed.join(", "))]
    InvalidControlledValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A conditional companion field was missing, e.g. `otherDateType` when
    /// the date type is `other`.
    #[error("{field} is required when {required_by}")]
    MissingRequiredField { field: String, required_by: String },

    /// Operation does not fit the document's mode.
    #[error("Cannot {operation}: document was created in {mode} mode")]
    InvalidDocumentMode {
        operation: String,
        mode: crate::builder::DocumentMode,
    },

    /// Strict placement policy met a parent without a schema order table.
    #[error("No schema order table for container <{tag}>")]
    UnsupportedContainerKind { tag: String },

    /// An aggregation already holds the other kind of child content.
    #[error("Aggregation already contains {existing}; sub-aggregations and records cannot be mixed")]
    InvalidAggregationContent { existing: String },

    /// A handle id did not belong to this document.
    #[error("Unknown handle: {0}")]
    UnknownHandle(String),

    /// XML writing failed.
    #[error("XML serialization failed: {0}")]
    Serialization(String),

    /// Writing the serialized document to disk failed.
    #[error("Failed to write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ErmsError {
    /// Shorthand for a missing companion field.
    pub(crate) fn missing(field: &str, required_by: impl Into<String>) -> Self {
        Self::MissingRequiredField {
            field: field.to_string(),
            required_by: required_by.into(),
        }
    }
}

/// Result type alias for ERMS builder operations.
pub type Result<T> = std::result::Result<T, ErmsError>;
