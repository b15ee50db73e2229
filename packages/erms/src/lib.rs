//! ERMS Create - build ERMS records-management XML documents.
//!
//! Documents are assembled through builder calls in any order; every child
//! element is placed at the position the ERMS schema requires inside its
//! parent, and the finished tree is serialized as XML, UTF-8 by default.
//!
//! # Example
//!
//! ```
//! use erms_create::{AgentSpec, DocumentMode, Erms, Section, SerializeOptions};
//!
//! let mut erms = Erms::new(DocumentMode::Aggregations);
//! erms.control().add_identification("Sunne pastorat", "arkivbildare");
//!
//! let mut case = erms.add_aggregation("caseFile")?;
//! case.add_date("2024-03-01T00:00:00", "closed", None)?;
//! case.set_status("closed")?;
//! case.set_title("Renovering av kyrktaket");
//! case.add_agent(&AgentSpec::new("creator", "Anna Andersson"))?;
//!
//! let xml = erms.to_xml_string(&SerializeOptions::default())?;
//! assert!(xml.starts_with("<?xml"));
//! # Ok::<(), erms_create::ErmsError>(())
//! ```
//!
//! # Architecture
//!
//! - [`element`] and [`tree`]: namespaced element nodes in an arena
//! - [`ordering`]: schema order tables and the placement engine
//! - [`builder`]: document, control, aggregation, record and restriction builders
//! - [`value_lists`]: controlled vocabularies
//! - [`serialize`]: XML output
//! - [`config`]: namespaces and output constants
//! - [`error`]: error types and Result alias

pub mod builder;
pub mod config;
pub mod element;
pub mod error;
pub mod ordering;
pub mod serialize;
pub mod tree;
pub mod value_lists;

pub use builder::{
    AgentSpec, Aggregation, AggregationId, ClassificationSpec, Control, DocumentMode,
    DocumentStatistics, Erms, MaintenanceEvent, Record, RecordId, Restriction, RestrictionId,
    RestrictionSpec, Section,
};
pub use element::{Element, QName};
pub use error::{ErmsError, Result};
pub use ordering::{insert_in_schema_order, insert_with_policy, ContainerPolicy};
pub use serialize::{
    save_to_file, to_xml_bytes, to_xml_string, OutputEncoding, SerializeOptions,
};
pub use tree::{ElementTree, NodeId};
pub use value_lists::{check_membership, ValueList};
