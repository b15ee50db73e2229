//! SVK extension elements below `additionalInformation/additionalXMLData`.
//!
//! The extension root `ermsSvkArende` lives in the SVK namespace and holds
//! one body element, `ermsSvkAggregation` or `ermsSvkRecord`, matching the
//! section it is attached to. Children of the body have no schema order
//! table and are appended in call order.

use erms_create::builder::build_date;
use erms_create::{AgentSpec, ElementTree, NodeId, QName, Section};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{
    DEFAULT_CURRENCY, DEFAULT_FILE_VARIANT, EXTENSION_ROOT, EXTENSION_VERSIONS, SVK_NAMESPACE,
};
use crate::error::{Result, SvkError};
use crate::value_lists::{
    AGREEMENT_TYPE, AUDIT_ACTION, AUDIT_SCOPE, FILE_VARIANT, INITIATIVE, NOTE_TYPE, OBJECT_TYPE,
};

/// Name in the SVK namespace.
pub fn svk_name(local: &str) -> QName {
    QName::new(SVK_NAMESPACE, local)
}

/// Which body the extension root carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionKind {
    Aggregation,
    Record,
}

impl ExtensionKind {
    /// Kind matching a section element (`aggregation` or `record`).
    pub fn of_section<S: Section>(section: &S) -> Self {
        if section.tree().element(section.node()).name().local_name() == "record" {
            Self::Record
        } else {
            Self::Aggregation
        }
    }

    /// Local name of the body element.
    pub fn body_name(self) -> &'static str {
        match self {
            Self::Aggregation => "ermsSvkAggregation",
            Self::Record => "ermsSvkRecord",
        }
    }

    fn section_name(self) -> &'static str {
        match self {
            Self::Aggregation => "aggregation",
            Self::Record => "record",
        }
    }
}

/// An object a case relates to, such as a project or a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedObject {
    /// `project` or `realEstate`.
    pub object_type: String,
    pub name: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivering_system_id: Option<String>,
}

impl RelatedObject {
    #[must_use]
    pub fn new(object_type: &str, name: &str, id: &str) -> Self {
        Self {
            object_type: object_type.to_string(),
            name: name.to_string(),
            id: id.to_string(),
            delivering_system_id: None,
        }
    }

    #[must_use]
    pub fn with_delivering_system_id(mut self, system_id: impl Into<String>) -> Self {
        self.delivering_system_id = Some(system_id.into());
        self
    }

    fn build(&self, tree: &mut ElementTree) -> NodeId {
        let node = tree.create_with_attributes(
            svk_name("relatedObject"),
            [("typeOfObject", self.object_type.as_str())],
        );
        append_svk_text(tree, node, "objectName", &self.name);
        append_svk_text(tree, node, "objectId", &self.id);
        if let Some(system_id) = self.delivering_system_id.as_deref() {
            append_svk_text(tree, node, "deliveringSystemId", system_id);
        }
        node
    }
}

/// A typed SVK note with its creator and creation date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SvkNote {
    pub note_type: String,
    pub text: String,
    pub creator: String,
    pub created: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_organisation: Option<String>,
}

impl SvkNote {
    #[must_use]
    pub fn new(note_type: &str, text: &str, creator: &str, created: &str) -> Self {
        Self {
            note_type: note_type.to_string(),
            text: text.to_string(),
            creator: creator.to_string(),
            created: created.to_string(),
            creator_organisation: None,
        }
    }

    #[must_use]
    pub fn with_creator_organisation(mut self, organisation: impl Into<String>) -> Self {
        self.creator_organisation = Some(organisation.into());
        self
    }

    fn creator_agent(&self) -> AgentSpec {
        let agent = AgentSpec::new("creator", self.creator.as_str());
        match self.creator_organisation.as_deref() {
            Some(organisation) => agent.with_organisation(organisation),
            None => agent,
        }
    }

    fn build(&self, tree: &mut ElementTree) -> NodeId {
        let note = tree.create_with_attributes(
            svk_name("svkNote"),
            [("typeOfNote", self.note_type.as_str())],
        );
        append_svk_text(tree, note, "noteText", &self.text);

        let agents = tree.create(QName::erms("agents"));
        let agent = self.creator_agent().build(tree);
        tree.append_child(agents, agent);
        tree.append_child(note, agents);

        let dates = tree.create(QName::erms("dates"));
        let date = build_date(tree, &self.created, "created", None);
        tree.append_child(dates, date);
        tree.append_child(note, dates);
        note
    }
}

/// One entry of the audit log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditEvent {
    pub event_time: String,
    pub user: String,
    pub scope: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_before: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_after: Option<String>,
}

impl AuditEvent {
    #[must_use]
    pub fn new(event_time: &str, user: &str, scope: &str, action: &str) -> Self {
        Self {
            event_time: event_time.to_string(),
            user: user.to_string(),
            scope: scope.to_string(),
            action: action.to_string(),
            value_before: None,
            value_after: None,
        }
    }

    /// Values before and after the change.
    #[must_use]
    pub fn with_change(mut self, before: Option<&str>, after: Option<&str>) -> Self {
        self.value_before = before.map(str::to_string);
        self.value_after = after.map(str::to_string);
        self
    }

    fn build(&self, tree: &mut ElementTree) -> NodeId {
        let event = tree.create(svk_name("auditLogEvent"));
        append_svk_text(tree, event, "eventTime", &self.event_time);
        append_svk_text(tree, event, "user", &self.user);
        append_svk_text(tree, event, "scope", &self.scope);
        append_svk_text(tree, event, "action", &self.action);
        if let Some(before) = self.value_before.as_deref() {
            append_svk_text(tree, event, "valueBeforeChange", before);
        }
        if let Some(after) = self.value_after.as_deref() {
            append_svk_text(tree, event, "valueAfterChange", after);
        }
        event
    }
}

/// Contract details of an agreement document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractSpec {
    pub agreement_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_off_value: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_value: Option<u64>,
    /// Currency of both values, `SEK` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

impl ContractSpec {
    #[must_use]
    pub fn new(agreement_type: &str) -> Self {
        Self {
            agreement_type: agreement_type.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_external_reference(mut self, reference: impl Into<String>) -> Self {
        self.external_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn with_values(mut self, call_off: Option<u64>, contract: Option<u64>) -> Self {
        self.call_off_value = call_off;
        self.contract_value = contract;
        self
    }

    #[must_use]
    pub fn with_period(mut self, start: Option<&str>, end: Option<&str>) -> Self {
        self.start = start.map(str::to_string);
        self.end = end.map(str::to_string);
        self
    }

    fn build(&self, tree: &mut ElementTree) -> NodeId {
        let contract = tree.create(svk_name("contractInfo"));
        append_svk_text(tree, contract, "typeOfAgreement", &self.agreement_type);
        if let Some(reference) = self.external_reference.as_deref() {
            append_svk_text(tree, contract, "externalReference", reference);
        }
        let currency = self.currency.as_deref().unwrap_or(DEFAULT_CURRENCY);
        for (local, value) in [
            ("callOffValue", self.call_off_value),
            ("contractValue", self.contract_value),
        ] {
            if let Some(value) = value {
                let node = tree.create_with_attributes(svk_name(local), [("currency", currency)]);
                tree.set_text(node, &value.to_string());
                tree.append_child(contract, node);
            }
        }

        let period = [("start", self.start.as_deref()), ("end", self.end.as_deref())];
        if period.iter().any(|(_, date)| date.is_some()) {
            let dates = tree.create(QName::erms("dates"));
            for (date_type, date) in period {
                if let Some(date) = date {
                    let node = build_date(tree, date, date_type, None);
                    tree.append_child(dates, node);
                }
            }
            tree.append_child(contract, dates);
        }
        contract
    }
}

/// A file attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendixSpec {
    pub name: String,
    /// Path relative to the archive package.
    pub path: String,
    /// File extension without the dot.
    pub file_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<u32>,
    /// `preservation` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl AppendixSpec {
    #[must_use]
    pub fn new(name: &str, path: &str, file_format: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            file_format: file_format.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: u32) -> Self {
        self.version_number = Some(version);
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    fn variant(&self) -> &str {
        self.variant.as_deref().unwrap_or(DEFAULT_FILE_VARIANT)
    }

    fn build(&self, tree: &mut ElementTree) -> NodeId {
        let wrapper = tree.create(svk_name("svkAppendix"));
        let mut attributes = vec![
            ("name", self.name.as_str()),
            ("path", self.path.as_str()),
            ("fileFormat", self.file_format.as_str()),
        ];
        if let Some(description) = self.description.as_deref() {
            attributes.push(("description", description));
        }
        let appendix = tree.create_with_attributes(svk_name("appendix"), attributes);
        tree.append_child(wrapper, appendix);

        let file_info = tree.create(svk_name("fileInfo"));
        if let Some(version) = self.version_number {
            append_svk_text(tree, file_info, "versionNumber", &version.to_string());
        }
        append_svk_text(tree, file_info, "variant", self.variant());
        tree.append_child(wrapper, file_info);
        wrapper
    }
}

/// Writer for the SVK extension subtree of one section.
///
/// The subtree is created on the first successful call; a call that fails
/// validation leaves the section untouched.
///
/// # Examples
/// ```
/// use erms_create::Erms;
/// use erms_svk::extensions::{RelatedObject, SvkExtensions};
///
/// let mut erms = Erms::default();
/// let mut case = erms.add_aggregation("caseFile")?;
/// SvkExtensions::new(&mut case)
///     .set_initiative("eget")?
///     .add_related_object(&RelatedObject::new("project", "Nytt tak", "P-17"))?;
/// assert_eq!(erms.statistics().extended_sections, 1);
/// # Ok::<(), erms_svk::SvkError>(())
/// ```
#[derive(Debug)]
pub struct SvkExtensions<'s, S: Section> {
    section: &'s mut S,
    kind: ExtensionKind,
}

impl<'s, S: Section> SvkExtensions<'s, S> {
    pub fn new(section: &'s mut S) -> Self {
        let kind = ExtensionKind::of_section(&*section);
        Self { section, kind }
    }

    pub fn kind(&self) -> ExtensionKind {
        self.kind
    }

    /// Existing `ermsSvkAggregation`/`ermsSvkRecord` body, if any.
    pub fn body(&self) -> Option<NodeId> {
        find_body(&*self.section, self.kind)
    }

    /// Set the case initiative. Only the first call has an effect.
    ///
    /// # Errors
    /// `ExtensionKindMismatch` on a record; `InvalidControlledValue` for a
    /// value outside `eget`/`externt`.
    pub fn set_initiative(&mut self, initiative: &str) -> Result<&mut Self> {
        self.require(ExtensionKind::Aggregation, "initiative")?;
        INITIATIVE.check(initiative)?;
        let body = self.ensure_body();
        let tree = self.section.tree_mut();
        if tree.first_child_by_tag(body, &svk_name("initiative")).is_some() {
            debug!(initiative, "Initiative already set, ignoring");
        } else {
            append_svk_text(tree, body, "initiative", initiative);
        }
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown object type.
    pub fn add_related_object(&mut self, object: &RelatedObject) -> Result<&mut Self> {
        OBJECT_TYPE.check(&object.object_type)?;
        let container = self.container("relatedObjects");
        let tree = self.section.tree_mut();
        let node = object.build(tree);
        tree.append_child(container, node);
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown note type.
    pub fn add_note(&mut self, note: &SvkNote) -> Result<&mut Self> {
        NOTE_TYPE.check(&note.note_type)?;
        let container = self.container("svkNotes");
        let tree = self.section.tree_mut();
        let node = note.build(tree);
        tree.append_child(container, node);
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown scope or action.
    pub fn add_audit_event(&mut self, event: &AuditEvent) -> Result<&mut Self> {
        AUDIT_SCOPE.check(&event.scope)?;
        AUDIT_ACTION.check(&event.action)?;
        let container = self.container("auditLogEvents");
        let tree = self.section.tree_mut();
        let node = event.build(tree);
        tree.append_child(container, node);
        Ok(self)
    }

    /// Add the record's `contractInfo`. Only the first call has an effect.
    ///
    /// # Errors
    /// `ExtensionKindMismatch` on an aggregation; `InvalidControlledValue`
    /// for an unknown agreement type.
    pub fn add_contract_info(&mut self, contract: &ContractSpec) -> Result<&mut Self> {
        self.require(ExtensionKind::Record, "contractInfo")?;
        AGREEMENT_TYPE.check(&contract.agreement_type)?;
        let body = self.ensure_body();
        let tree = self.section.tree_mut();
        if tree.first_child_by_tag(body, &svk_name("contractInfo")).is_some() {
            debug!("Contract info already set, ignoring");
        } else {
            let node = contract.build(tree);
            tree.append_child(body, node);
        }
        Ok(self)
    }

    /// Add an `svkAppendix` entry.
    ///
    /// # Errors
    /// `ExtensionKindMismatch` on an aggregation; `InvalidControlledValue`
    /// for an unknown file variant.
    pub fn add_appendix(&mut self, appendix: &AppendixSpec) -> Result<&mut Self> {
        self.require(ExtensionKind::Record, "svkAppendix")?;
        FILE_VARIANT.check(appendix.variant())?;
        let body = self.ensure_body();
        let tree = self.section.tree_mut();
        let node = appendix.build(tree);
        tree.append_child(body, node);
        Ok(self)
    }

    fn require(&self, allowed: ExtensionKind, element: &str) -> Result<()> {
        if self.kind == allowed {
            Ok(())
        } else {
            Err(SvkError::ExtensionKindMismatch {
                element: element.to_string(),
                allowed: allowed.section_name().to_string(),
                actual: self.kind.section_name().to_string(),
            })
        }
    }

    /// Get or create the body, creating the whole path below
    /// `additionalInformation` on first use.
    fn ensure_body(&mut self) -> NodeId {
        if let Some(body) = self.body() {
            return body;
        }
        let information = self.section.additional_information();
        let tree = self.section.tree_mut();
        let data = tree.create(QName::erms("additionalXMLData"));
        let root = tree.create_with_attributes(svk_name(EXTENSION_ROOT), EXTENSION_VERSIONS);
        let body = tree.create(svk_name(self.kind.body_name()));
        tree.append_child(root, body);
        tree.append_child(data, root);
        tree.append_child(information, data);
        debug!(body = self.kind.body_name(), "Created SVK extension root");
        body
    }

    /// Get or create a container element directly below the body.
    fn container(&mut self, local: &str) -> NodeId {
        let body = self.ensure_body();
        let name = svk_name(local);
        let tree = self.section.tree_mut();
        if let Some(existing) = tree.first_child_by_tag(body, &name) {
            return existing;
        }
        let container = tree.create(name);
        tree.append_child(body, container);
        container
    }
}

fn find_body<S: Section>(section: &S, kind: ExtensionKind) -> Option<NodeId> {
    let tree = section.tree();
    let information = tree.first_child_by_tag(section.node(), &QName::erms("additionalInformation"))?;
    let root_name = svk_name(EXTENSION_ROOT);
    let body_name = svk_name(kind.body_name());
    tree.children_by_tag(information, &QName::erms("additionalXMLData"))
        .filter_map(move |data| tree.first_child_by_tag(data, &root_name))
        .find_map(move |root| tree.first_child_by_tag(root, &body_name))
}

fn append_svk_text(tree: &mut ElementTree, parent: NodeId, local: &str, text: &str) -> NodeId {
    let node = tree.create_text(svk_name(local), text);
    tree.append_child(parent, node);
    node
}
