//! YAML manifests describing a complete SVK delivery.
//!
//! A manifest holds the control information and the cases with their
//! documents. Organisation numbers must be quoted in YAML so they stay
//! strings.
//!
//! ```yaml
//! control:
//!   archive_creator: Domkyrkoförsamlingen
//!   org_number: "2520028553"
//!   case_number: F 2024-0001
//! cases:
//!   - number: F 2024-0001
//!     title: Renovering av kyrktaket
//!     dates: { opened: 2024-01-10, closed: 2024-04-30 }
//!     documents:
//!       - number: F 2024-0001:1
//!         title: Offert
//!         direction: incoming
//!         dates: { created: 2024-01-12, originated: 2024-01-11 }
//!         agents: { sender: Takläggarna AB }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::case::{CaseAgents, SvkCase};
use crate::config::{now_timestamp, DEFAULT_RECORD_TYPE};
use crate::document::{ControlInfo, NewCase, SvkErms};
use crate::error::Result;
use crate::extensions::{AppendixSpec, AuditEvent, ContractSpec, RelatedObject, SvkNote};
use crate::record::DocumentAgents;

fn default_status() -> String {
    "closed".to_string()
}

fn default_record_type() -> String {
    DEFAULT_RECORD_TYPE.to_string()
}

/// Top level of a manifest file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub control: ControlInfo,
    #[serde(default)]
    pub cases: Vec<CaseManifest>,
}

/// A case and its documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseManifest {
    pub number: String,
    pub title: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub dates: CaseDates,
    #[serde(default)]
    pub agents: CaseAgents,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initiative: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_objects: Vec<RelatedObject>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<SvkNote>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audit_events: Vec<AuditEvent>,
    #[serde(default)]
    pub documents: Vec<DocumentManifest>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CaseDates {
    pub opened: String,
    pub closed: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

/// A document of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default = "default_record_type")]
    pub record_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// `incoming`, `outgoing` or `internal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_direction: Option<String>,
    pub dates: DocumentDates,
    #[serde(default)]
    pub agents: DocumentAgents,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<SvkNote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<ContractSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub appendices: Vec<AppendixSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentDates {
    pub created: String,
    pub originated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expedited: Option<String>,
}

impl Manifest {
    /// Parse a manifest from YAML text.
    ///
    /// # Errors
    /// `Manifest` for malformed YAML, missing fields or unknown fields.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Read and parse a manifest file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, otherwise as [`Manifest::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Build the document, stamped with the current local time.
    ///
    /// # Errors
    /// The first builder error; see [`Manifest::build_at`].
    pub fn build(&self) -> Result<SvkErms> {
        self.build_at(&now_timestamp())
    }

    /// Build the document with `timestamp` as creation time.
    ///
    /// Every case records the archive creator of the control section as
    /// its extra ids.
    ///
    /// # Errors
    /// The first builder error, in manifest order.
    pub fn build_at(&self, timestamp: &str) -> Result<SvkErms> {
        let mut document = SvkErms::created_at(timestamp)?;
        document.setup_control_info(&self.control)?;
        for case in &self.cases {
            case.apply(&mut document, &self.control)?;
        }
        info!(
            cases = self.cases.len(),
            documents = self.cases.iter().map(|c| c.documents.len()).sum::<usize>(),
            "Built SVK document from manifest"
        );
        Ok(document)
    }
}

impl CaseManifest {
    fn apply(&self, document: &mut SvkErms, control: &ControlInfo) -> Result<()> {
        let new_case = NewCase {
            case_number: self.number.clone(),
            title: self.title.clone(),
            archive_creator: None,
            org_number: control.org_number.clone(),
            aid: control.aid.clone(),
        };
        let mut case = document.add_case(&new_case)?;
        case.set_status(&self.status)?
            .add_required_dates(
                &self.dates.opened,
                &self.dates.closed,
                self.dates.created.as_deref(),
            )?
            .add_case_agents(&self.agents)?;
        if let Some(initiative) = self.initiative.as_deref() {
            case.set_initiative(initiative)?;
        }
        {
            let mut extensions = case.extensions();
            for object in &self.related_objects {
                extensions.add_related_object(object)?;
            }
            for note in &self.notes {
                extensions.add_note(note)?;
            }
            for event in &self.audit_events {
                extensions.add_audit_event(event)?;
            }
        }
        for entry in &self.documents {
            entry.apply(&mut case)?;
        }
        Ok(())
    }
}

impl DocumentManifest {
    fn apply(&self, case: &mut SvkCase<'_>) -> Result<()> {
        let mut record =
            case.add_document(self.number.as_deref(), self.title.as_deref(), &self.record_type)?;
        if let Some(status) = self.status.as_deref() {
            record.set_status(status)?;
        }
        if let Some(direction) = self.direction.as_deref() {
            record.set_direction(direction, self.other_direction.as_deref())?;
        }
        record
            .add_required_dates(
                &self.dates.created,
                &self.dates.originated,
                self.dates.received.as_deref(),
                self.dates.expedited.as_deref(),
            )?
            .add_document_agents(&self.agents)?;
        for note in &self.notes {
            record.add_note(note)?;
        }
        if let Some(contract) = &self.contract {
            record.add_contract_info(contract)?;
        }
        for appendix in &self.appendices {
            record.add_appendix(appendix)?;
        }
        Ok(())
    }
}
