//! SVK documents ("handlingar"): records with profile rules.

use std::ops::{Deref, DerefMut};

use erms_create::{AgentSpec, Record, Section};
use serde::{Deserialize, Serialize};

use crate::config::{normalize, validate_document_number};
use crate::error::{Result, SvkError};
use crate::extensions::{AppendixSpec, ContractSpec, SvkExtensions, SvkNote};
use crate::value_lists::{DIRECTION_SVK, STATUS_SVK};

/// Agents of a document, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocumentAgents {
    pub creator: Option<String>,
    pub responsible_person: Option<String>,
    /// Sender of an incoming document.
    pub sender: Option<String>,
    /// Receiver of an outgoing document.
    pub receiver: Option<String>,
}

impl DocumentAgents {
    fn specs(&self) -> Vec<AgentSpec> {
        [
            ("creator", self.creator.as_deref()),
            ("responsible_person", self.responsible_person.as_deref()),
            ("sender", self.sender.as_deref()),
            ("receiver", self.receiver.as_deref()),
        ]
        .into_iter()
        .filter_map(|(agent_type, name)| name.map(|name| AgentSpec::new(agent_type, name)))
        .collect()
    }
}

/// A document of an SVK case.
///
/// Dereferences to the wrapped [`Record`], so the generic record builder
/// methods stay available; the methods defined here apply the profile's
/// stricter rules.
#[derive(Debug)]
pub struct SvkRecord<'d> {
    record: Record<'d>,
}

impl<'d> SvkRecord<'d> {
    #[must_use]
    pub fn new(record: Record<'d>) -> Self {
        Self { record }
    }

    #[must_use]
    pub fn into_inner(self) -> Record<'d> {
        self.record
    }

    /// Set the document number (`<case number>:<n>`) as object id.
    ///
    /// # Errors
    /// `InvalidDocumentNumber` if the format is wrong.
    pub fn set_document_number(&mut self, document_number: &str) -> Result<&mut Self> {
        let document_number = normalize(document_number);
        validate_document_number(&document_number)?;
        self.record.set_object_id(&document_number);
        Ok(self)
    }

    pub fn document_number(&self) -> Option<&str> {
        self.record.object_id()
    }

    /// # Errors
    /// `InvalidStatus` unless the status is `closed` or `obliterated`.
    pub fn set_status(&mut self, status: &str) -> Result<&mut Self> {
        if !STATUS_SVK.contains(status) {
            return Err(SvkError::InvalidStatus(status.to_string()));
        }
        self.record.set_status(status)?;
        Ok(self)
    }

    /// Set the direction: `incoming`, `outgoing`, or `other` with
    /// `internal`. The shorthand `internal` is written as the latter.
    ///
    /// # Errors
    /// `InvalidDirection` for any other combination.
    pub fn set_direction(&mut self, direction: &str, other_direction: Option<&str>) -> Result<&mut Self> {
        let (direction, other) = match (direction, other_direction) {
            ("internal", None) | ("other", Some("internal")) => ("other", Some("internal")),
            (kind, None) if DIRECTION_SVK.contains(kind) => (kind, None),
            (kind, other) => {
                let shown = match other {
                    Some(other) => format!("{kind}/{other}"),
                    None => kind.to_string(),
                };
                return Err(SvkError::InvalidDirection(shown));
            }
        };
        self.record.set_direction(direction, other)?;
        Ok(self)
    }

    /// Add the `created` and `originated` dates plus the optional
    /// `received` and `expedited` dates.
    ///
    /// # Errors
    /// Propagates date validation errors.
    pub fn add_required_dates(
        &mut self,
        created: &str,
        originated: &str,
        received: Option<&str>,
        expedited: Option<&str>,
    ) -> Result<&mut Self> {
        self.record.add_date(created, "created", None)?;
        self.record.add_date(originated, "originated", None)?;
        if let Some(received) = received {
            self.record.add_date(received, "received", None)?;
        }
        if let Some(expedited) = expedited {
            self.record.add_date(expedited, "expedited", None)?;
        }
        Ok(self)
    }

    /// # Errors
    /// Propagates agent validation errors; nothing is added on error.
    pub fn add_document_agents(&mut self, agents: &DocumentAgents) -> Result<&mut Self> {
        let specs = agents.specs();
        for spec in &specs {
            spec.validate()?;
        }
        for spec in &specs {
            self.record.add_agent(spec)?;
        }
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown note type.
    pub fn add_note(&mut self, note: &SvkNote) -> Result<&mut Self> {
        self.extensions().add_note(note)?;
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown agreement type.
    pub fn add_contract_info(&mut self, contract: &ContractSpec) -> Result<&mut Self> {
        self.extensions().add_contract_info(contract)?;
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown file variant.
    pub fn add_appendix(&mut self, appendix: &AppendixSpec) -> Result<&mut Self> {
        self.extensions().add_appendix(appendix)?;
        Ok(self)
    }

    /// Writer for this document's SVK extension subtree.
    pub fn extensions(&mut self) -> SvkExtensions<'_, Record<'d>> {
        SvkExtensions::new(&mut self.record)
    }
}

impl<'d> Deref for SvkRecord<'d> {
    type Target = Record<'d>;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl DerefMut for SvkRecord<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erms_create::{DocumentMode, ElementTree, Erms, NodeId, QName};
    use pretty_assertions::assert_eq;

    fn local_names(tree: &ElementTree, node: NodeId) -> Vec<String> {
        tree.children(node)
            .iter()
            .map(|c| tree.element(*c).name().local_name().to_string())
            .collect()
    }

    fn with_record(test: impl FnOnce(&mut SvkRecord<'_>)) {
        let mut erms = Erms::new(DocumentMode::Records);
        let record = erms.add_record(Some("ärendedokument"), Some("digital")).unwrap();
        test(&mut SvkRecord::new(record));
    }

    #[test]
    fn test_document_number_format() {
        with_record(|record| {
            assert!(matches!(
                record.set_document_number("F 2024-0001"),
                Err(SvkError::InvalidDocumentNumber(_))
            ));
            record.set_document_number("F 2024-0001:3").unwrap();
            assert_eq!(record.document_number(), Some("F 2024-0001:3"));
        });
    }

    #[test]
    fn test_status_limited_to_svk_list() {
        with_record(|record| {
            assert!(matches!(
                record.set_status("open"),
                Err(SvkError::InvalidStatus(_))
            ));
            record.set_status("obliterated").unwrap();
            assert_eq!(record.status(), Some("obliterated"));
        });
    }

    #[test]
    fn test_direction_variants() {
        with_record(|record| {
            assert!(record.set_direction("other", Some("memo")).is_err());
            assert!(record.set_direction("other", None).is_err());
            assert!(record.set_direction("case_draft", None).is_err());
            record.set_direction("internal", None).unwrap();
            let direction = record
                .tree()
                .first_child_by_tag(record.node(), &QName::erms("direction"))
                .unwrap();
            let element = record.tree().element(direction);
            assert_eq!(element.attribute("directionDefinition"), Some("other"));
            assert_eq!(element.attribute("otherDirectionDefinition"), Some("internal"));
        });
    }

    #[test]
    fn test_required_dates_and_agents() {
        with_record(|record| {
            record
                .add_required_dates("2024-01-02", "2024-01-03", Some("2024-01-01"), None)
                .unwrap();
            record
                .add_document_agents(&DocumentAgents {
                    sender: Some("Byggfirman AB".to_string()),
                    creator: Some("Anna".to_string()),
                    ..DocumentAgents::default()
                })
                .unwrap();
            record.set_title("Offert");

            let tree = record.tree();
            assert_eq!(local_names(tree, record.node()), vec!["title", "agents", "dates"]);
            let agents = tree.children(record.node())[1];
            let kinds: Vec<&str> = tree
                .children(agents)
                .iter()
                .filter_map(|a| tree.element(*a).attribute("agentType"))
                .collect();
            assert_eq!(kinds, vec!["creator", "sender"]);
            let dates = tree.children(record.node())[2];
            assert_eq!(tree.children(dates).len(), 3);
        });
    }

    #[test]
    fn test_contract_goes_to_additional_information() {
        with_record(|record| {
            record
                .add_contract_info(&ContractSpec::new("avtal").with_values(None, Some(5000)))
                .unwrap();
            record.set_title("Avtal");
            record.set_direction("incoming", None).unwrap();
            assert_eq!(
                local_names(record.tree(), record.node()),
                vec!["title", "direction", "additionalInformation"]
            );
        });
    }
}
