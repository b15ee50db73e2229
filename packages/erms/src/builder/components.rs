//! Reusable subtrees: agents, dates, classifications, physical locations.

use crate::config::PROTECTED_IDENTITY_TEXT;
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::tree::{ElementTree, NodeId};
use crate::value_lists::{AGENT_TYPE, DATE_TYPE, EVENT_TYPE};

/// Description of one `agent` entry.
///
/// # Examples
/// ```
/// use erms_create::AgentSpec;
///
/// let agent = AgentSpec::new("creator", "Anna Andersson")
///     .with_organisation("Sunne pastorat")
///     .with_role("Handläggare");
/// assert!(agent.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentSpec {
    pub agent_type: String,
    pub other_agent_type: Option<String>,
    pub name: String,
    pub organisation: Option<String>,
    pub unit_name: Option<String>,
    pub id_number: Option<String>,
    pub id_number_type: Option<String>,
    pub role: Option<String>,
    pub protected_identity: bool,
}

impl AgentSpec {
    /// Create an agent with a type and a name.
    #[must_use]
    pub fn new(agent_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            agent_type: agent_type.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Label for agent type `other`.
    #[must_use]
    pub fn with_other_agent_type(mut self, other: impl Into<String>) -> Self {
        self.other_agent_type = Some(other.into());
        self
    }

    #[must_use]
    pub fn with_organisation(mut self, organisation: impl Into<String>) -> Self {
        self.organisation = Some(organisation.into());
        self
    }

    #[must_use]
    pub fn with_unit_name(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = Some(unit_name.into());
        self
    }

    /// Identity number, optionally typed (e.g. `personnummer`).
    #[must_use]
    pub fn with_id_number(mut self, number: impl Into<String>, kind: Option<&str>) -> Self {
        self.id_number = Some(number.into());
        self.id_number_type = kind.map(str::to_string);
        self
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_protected_identity(mut self, protected: bool) -> Self {
        self.protected_identity = protected;
        self
    }

    /// Check the agent type and its `other` companion.
    ///
    /// # Errors
    /// `InvalidControlledValue` for an unknown agent type, and
    /// `MissingRequiredField` when type `other` has no label.
    pub fn validate(&self) -> Result<()> {
        AGENT_TYPE.check(&self.agent_type)?;
        if self.agent_type == "other" && is_blank(self.other_agent_type.as_deref()) {
            return Err(ErmsError::missing("otherAgentType", "agentType is 'other'"));
        }
        Ok(())
    }

    /// Build the detached `agent` subtree. Call [`AgentSpec::validate`] first.
    ///
    /// Extension profiles use this to embed agents in their own elements.
    pub fn build(&self, tree: &mut ElementTree) -> NodeId {
        let mut attributes = vec![("agentType", self.agent_type.as_str())];
        if let Some(other) = self.other_agent_type.as_deref() {
            attributes.push(("otherAgentType", other));
        }
        let agent = tree.create_with_attributes(QName::erms("agent"), attributes);

        append_text(tree, agent, "name", &self.name);
        if let Some(organisation) = self.organisation.as_deref() {
            append_text(tree, agent, "organisation", organisation);
        }
        if let Some(unit) = self.unit_name.as_deref() {
            append_text(tree, agent, "unitName", unit);
        }
        if let Some(number) = self.id_number.as_deref() {
            let id = append_text(tree, agent, "idNumber", number);
            if let Some(kind) = self.id_number_type.as_deref() {
                tree.set_attribute(id, "idNumberType", kind);
            }
        }
        if let Some(role) = self.role.as_deref() {
            append_text(tree, agent, "role", role);
        }
        if self.protected_identity {
            append_text(tree, agent, "protectedIdentity", PROTECTED_IDENTITY_TEXT);
        }
        agent
    }
}

/// Attributes of a `classification` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationSpec {
    pub text: String,
    pub classification_id: Option<String>,
    pub classification_code: Option<String>,
    pub fully_qualified_code: Option<String>,
    pub new_fully_qualified_code: Option<String>,
}

impl ClassificationSpec {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.classification_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.classification_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_fully_qualified_code(mut self, code: impl Into<String>) -> Self {
        self.fully_qualified_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn with_new_fully_qualified_code(mut self, code: impl Into<String>) -> Self {
        self.new_fully_qualified_code = Some(code.into());
        self
    }

    pub(crate) fn build(&self, tree: &mut ElementTree) -> NodeId {
        let attributes = [
            ("classificationId", self.classification_id.as_deref()),
            ("classificationCode", self.classification_code.as_deref()),
            ("fullyQualifiedClassificationCode", self.fully_qualified_code.as_deref()),
            (
                "newFullyQualifiedClassificationCode",
                self.new_fully_qualified_code.as_deref(),
            ),
        ];
        let node = tree.create_with_attributes(
            QName::erms("classification"),
            attributes
                .into_iter()
                .filter_map(|(key, value)| value.map(|v| (key, v))),
        );
        tree.set_text(node, &self.text);
        node
    }
}

/// An entry of the control's maintenance history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceEvent {
    pub event_type: String,
    pub date_time: String,
    pub agent: AgentSpec,
}

impl MaintenanceEvent {
    #[must_use]
    pub fn new(event_type: impl Into<String>, date_time: impl Into<String>, agent: AgentSpec) -> Self {
        Self {
            event_type: event_type.into(),
            date_time: date_time.into(),
            agent,
        }
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown event type or agent type.
    pub fn validate(&self) -> Result<()> {
        EVENT_TYPE.check(&self.event_type)?;
        self.agent.validate()
    }

    pub(crate) fn build(&self, tree: &mut ElementTree) -> NodeId {
        let event = tree.create(QName::erms("maintenanceEvent"));
        let kind = tree.create_with_attributes(
            QName::erms("eventType"),
            [("value", self.event_type.as_str())],
        );
        tree.append_child(event, kind);
        append_text(tree, event, "eventDateTime", &self.date_time);
        let agent = self.agent.build(tree);
        tree.append_child(event, agent);
        event
    }
}

/// Check a date type and its `other` companion.
///
/// # Errors
/// `InvalidControlledValue` for an unknown date type, `MissingRequiredField`
/// for `other` without a label.
pub fn validate_date(date_type: &str, other_date_type: Option<&str>) -> Result<()> {
    DATE_TYPE.check(date_type)?;
    if date_type == "other" && is_blank(other_date_type) {
        return Err(ErmsError::missing("otherDateType", "dateType is 'other'"));
    }
    Ok(())
}

/// Build a detached `date` element. Validate with [`validate_date`] first.
pub fn build_date(
    tree: &mut ElementTree,
    date: &str,
    date_type: &str,
    other_date_type: Option<&str>,
) -> NodeId {
    let mut attributes = vec![("dateType", date_type)];
    if let Some(other) = other_date_type {
        attributes.push(("otherDateType", other));
    }
    let node = tree.create_with_attributes(QName::erms("date"), attributes);
    tree.set_text(node, date);
    node
}

/// Build a detached `physicalLocation` with current and home locations.
pub(crate) fn build_physical_location(
    tree: &mut ElementTree,
    current: Option<&str>,
    homes: &[&str],
) -> NodeId {
    let location = tree.create(QName::erms("physicalLocation"));
    if let Some(current) = current {
        append_text(tree, location, "currentLocation", current);
    }
    for home in homes {
        append_text(tree, location, "homeLocation", home);
    }
    location
}

/// Create an ERMS text element and append it to `parent`.
pub(crate) fn append_text(tree: &mut ElementTree, parent: NodeId, local: &str, text: &str) -> NodeId {
    let node = tree.create_text(QName::erms(local), text);
    tree.append_child(parent, node);
    node
}

pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn child_names(tree: &ElementTree, node: NodeId) -> Vec<&str> {
        tree.children(node)
            .iter()
            .map(|c| tree.element(*c).name().local_name())
            .collect()
    }

    #[test]
    fn test_agent_other_requires_label() {
        let agent = AgentSpec::new("other", "Per");
        assert!(matches!(
            agent.validate(),
            Err(ErmsError::MissingRequiredField { .. })
        ));
        let agent = agent.with_other_agent_type("closing_person");
        assert!(agent.validate().is_ok());
    }

    #[test]
    fn test_agent_unknown_type_rejected() {
        assert!(matches!(
            AgentSpec::new("wizard", "Merlin").validate(),
            Err(ErmsError::InvalidControlledValue { .. })
        ));
    }

    #[test]
    fn test_agent_subtree_order() {
        let mut tree = ElementTree::new();
        let agent = AgentSpec::new("creator", "Anna")
            .with_role("Handläggare")
            .with_id_number("197001011234", Some("personnummer"))
            .with_organisation("Pastoratet")
            .with_protected_identity(true)
            .build(&mut tree);

        assert_eq!(
            child_names(&tree, agent),
            vec!["name", "organisation", "idNumber", "role", "protectedIdentity"]
        );
        let id_number = tree.children(agent)[2];
        assert_eq!(tree.element(id_number).attribute("idNumberType"), Some("personnummer"));
    }

    #[test]
    fn test_date_other_requires_label() {
        assert!(validate_date("other", None).is_err());
        assert!(validate_date("other", Some("  ")).is_err());
        assert!(validate_date("other", Some("inventoried")).is_ok());
        assert!(validate_date("created", None).is_ok());
        assert!(validate_date("yesterday", None).is_err());
    }

    #[test]
    fn test_classification_skips_absent_attributes() {
        let mut tree = ElementTree::new();
        let node = ClassificationSpec::new("Ekonomi")
            .with_code("2.1")
            .with_fully_qualified_code("1.2.1")
            .build(&mut tree);
        let element = tree.element(node);
        assert_eq!(element.attributes().len(), 2);
        assert_eq!(element.attribute("classificationCode"), Some("2.1"));
        assert_eq!(element.text(), Some("Ekonomi"));
    }

    #[test]
    fn test_physical_location_children() {
        let mut tree = ElementTree::new();
        let node = build_physical_location(&mut tree, Some("Hylla 3"), &["Arkiv A", "Arkiv B"]);
        assert_eq!(
            child_names(&tree, node),
            vec!["currentLocation", "homeLocation", "homeLocation"]
        );
    }
}
