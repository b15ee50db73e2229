//! ERMS-SVK - Church of Sweden case-file profile for ERMS documents.
//!
//! Wraps the generic `erms_create` builders with the rules of the
//! Svenska kyrkan profile: case and document number formats, restricted
//! status and direction lists, required dates, and the `ermsSvkArende`
//! extension elements. Finished documents can be linted against the same
//! rules.
//!
//! # Example
//!
//! ```
//! use erms_svk::config;
//!
//! assert!(config::validate_case_number("F 2019-0032").is_ok());
//! assert!(config::validate_document_number("F 2019-0032:1").is_ok());
//! assert!(config::validate_org_number("2520028553").is_ok());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: namespaces, defaults and number format checks
//! - [`value_lists`]: profile vocabularies
//! - [`error`]: error types and Result alias
//! - [`extensions`]: the `ermsSvkArende` extension subtree
//! - [`case`] and [`record`]: profile wrappers around aggregations and records
//! - [`document`]: the SVK document and its control section
//! - [`validation`]: rule checks over serialized documents
//! - [`xml`]: roxmltree helpers
//! - [`manifest`]: YAML manifests
//! - [`cli`]: command-line interface

pub mod case;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extensions;
pub mod manifest;
pub mod record;
pub mod validation;
pub mod value_lists;
pub mod xml;

pub use case::{CaseAgents, Counterpart, SvkCase};
pub use document::{ControlInfo, NewCase, SimpleCase, SvkErms};
pub use error::{Result, SvkError};
pub use extensions::{
    AppendixSpec, AuditEvent, ContractSpec, ExtensionKind, RelatedObject, SvkExtensions, SvkNote,
};
pub use manifest::Manifest;
pub use record::{DocumentAgents, SvkRecord};
pub use validation::{validate_document, SvkValidator, ValidationReport};
