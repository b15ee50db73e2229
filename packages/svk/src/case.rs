//! SVK cases ("ärendeakter"): `caseFile` aggregations with profile rules.

use std::ops::{Deref, DerefMut};

use erms_create::{AgentSpec, Aggregation, Section};
use serde::{Deserialize, Serialize};

use crate::config::{
    normalize, validate_case_number, validate_document_number, validate_org_number, CLOSING_PERSON,
};
use crate::error::{Result, SvkError};
use crate::extensions::{AuditEvent, RelatedObject, SvkExtensions, SvkNote};
use crate::record::SvkRecord;
use crate::value_lists::{ID_NUMBER_TYPE, ID_TYPE, RECORD_TYPE_SVK, STATUS_SVK};

/// External party of a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Counterpart {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    /// One of `username`, `organisationsnummer`, `personnummer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number_type: Option<String>,
}

impl Counterpart {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn spec(&self) -> AgentSpec {
        let mut agent = AgentSpec::new("counterpart", self.name.as_str());
        if let Some(organisation) = self.organisation.as_deref() {
            agent = agent.with_organisation(organisation);
        }
        if let Some(number) = self.id_number.as_deref() {
            agent = agent.with_id_number(number, self.id_number_type.as_deref());
        }
        agent
    }
}

/// Agents of a case, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaseAgents {
    pub creator: Option<String>,
    pub responsible_person: Option<String>,
    pub counterparts: Vec<Counterpart>,
    /// Written as agent type `other` with `otherAgentType="closing_person"`.
    pub closing_person: Option<String>,
}

impl CaseAgents {
    fn specs(&self) -> Vec<AgentSpec> {
        let mut specs = Vec::new();
        if let Some(creator) = self.creator.as_deref() {
            specs.push(AgentSpec::new("creator", creator));
        }
        if let Some(responsible) = self.responsible_person.as_deref() {
            specs.push(AgentSpec::new("responsible_person", responsible));
        }
        specs.extend(self.counterparts.iter().map(Counterpart::spec));
        if let Some(closing) = self.closing_person.as_deref() {
            specs.push(AgentSpec::new("other", closing).with_other_agent_type(CLOSING_PERSON));
        }
        specs
    }
}

/// A case of an SVK document.
///
/// Dereferences to the wrapped [`Aggregation`]; the methods defined here
/// apply the profile's rules on top of the generic builder.
///
/// # Examples
/// ```
/// use erms_create::{Erms, Section};
/// use erms_svk::SvkCase;
///
/// let mut erms = Erms::default();
/// let mut case = SvkCase::new(erms.add_aggregation("caseFile")?);
/// case.set_case_number("F 2024-0001")?
///     .set_status("closed")?
///     .add_required_dates("2024-01-10T00:00:00", "2024-03-01T00:00:00", None)?;
/// case.set_title("Renovering av kyrktaket");
/// assert_eq!(case.case_number(), Some("F 2024-0001"));
/// # Ok::<(), erms_svk::SvkError>(())
/// ```
#[derive(Debug)]
pub struct SvkCase<'d> {
    aggregation: Aggregation<'d>,
}

impl<'d> SvkCase<'d> {
    #[must_use]
    pub fn new(aggregation: Aggregation<'d>) -> Self {
        Self { aggregation }
    }

    #[must_use]
    pub fn into_inner(self) -> Aggregation<'d> {
        self.aggregation
    }

    /// Set the case number as object id.
    ///
    /// # Errors
    /// `InvalidCaseNumber` if the format is wrong.
    pub fn set_case_number(&mut self, case_number: &str) -> Result<&mut Self> {
        let case_number = normalize(case_number);
        validate_case_number(&case_number)?;
        self.aggregation.set_object_id(&case_number);
        Ok(self)
    }

    pub fn case_number(&self) -> Option<&str> {
        self.aggregation.object_id()
    }

    /// Record the archive creator as `extraId` entries.
    ///
    /// # Errors
    /// `MissingArchiveCreatorId` when both are absent, `InvalidOrgNumber`
    /// for a malformed organisation number.
    pub fn set_archive_creator_info(
        &mut self,
        org_number: Option<&str>,
        aid: Option<&str>,
    ) -> Result<&mut Self> {
        if org_number.is_none() && aid.is_none() {
            return Err(SvkError::MissingArchiveCreatorId);
        }
        if let Some(org_number) = org_number {
            self.add_archive_creator_id(org_number, "organisationsnummer")?;
        }
        if let Some(aid) = aid {
            self.add_archive_creator_id(aid, "aid")?;
        }
        Ok(self)
    }

    /// Add one archive creator `extraId`.
    ///
    /// # Errors
    /// `InvalidControlledValue` unless `id_type` is `aid` or
    /// `organisationsnummer`; `InvalidOrgNumber` for a malformed
    /// organisation number.
    pub fn add_archive_creator_id(&mut self, value: &str, id_type: &str) -> Result<&mut Self> {
        ID_TYPE.check(id_type)?;
        if id_type == "organisationsnummer" {
            validate_org_number(value)?;
        }
        self.aggregation.add_extra_id(value, id_type);
        Ok(self)
    }

    /// # Errors
    /// `InvalidStatus` unless the status is `closed` or `obliterated`.
    pub fn set_status(&mut self, status: &str) -> Result<&mut Self> {
        if !STATUS_SVK.contains(status) {
            return Err(SvkError::InvalidStatus(status.to_string()));
        }
        self.aggregation.set_status(status)?;
        Ok(self)
    }

    /// Add the `opened` and `closed` dates, preceded by `created` when given.
    ///
    /// # Errors
    /// Propagates date validation errors.
    pub fn add_required_dates(
        &mut self,
        opened: &str,
        closed: &str,
        created: Option<&str>,
    ) -> Result<&mut Self> {
        if let Some(created) = created {
            self.aggregation.add_date(created, "created", None)?;
        }
        self.aggregation.add_date(opened, "opened", None)?;
        self.aggregation.add_date(closed, "closed", None)?;
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown id number type; nothing is
    /// added on error.
    pub fn add_case_agents(&mut self, agents: &CaseAgents) -> Result<&mut Self> {
        for counterpart in &agents.counterparts {
            if let Some(kind) = counterpart.id_number_type.as_deref() {
                ID_NUMBER_TYPE.check(kind)?;
            }
        }
        let specs = agents.specs();
        for spec in &specs {
            spec.validate()?;
        }
        for spec in &specs {
            self.aggregation.add_agent(spec)?;
        }
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` unless `eget` or `externt`.
    pub fn set_initiative(&mut self, initiative: &str) -> Result<&mut Self> {
        self.extensions().set_initiative(initiative)?;
        Ok(self)
    }

    /// # Errors
    /// Propagates extension errors.
    pub fn add_related_project(
        &mut self,
        name: &str,
        id: &str,
        system_id: Option<&str>,
    ) -> Result<&mut Self> {
        self.add_related_object(related("project", name, id, system_id))
    }

    /// # Errors
    /// Propagates extension errors.
    pub fn add_related_property(
        &mut self,
        name: &str,
        id: &str,
        system_id: Option<&str>,
    ) -> Result<&mut Self> {
        self.add_related_object(related("realEstate", name, id, system_id))
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown note type.
    pub fn add_note(&mut self, note: &SvkNote) -> Result<&mut Self> {
        self.extensions().add_note(note)?;
        Ok(self)
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown scope or action.
    pub fn add_audit_event(&mut self, event: &AuditEvent) -> Result<&mut Self> {
        self.extensions().add_audit_event(event)?;
        Ok(self)
    }

    /// Add a digital document to the case.
    ///
    /// # Errors
    /// `InvalidControlledValue` for a record type outside the SVK list,
    /// `InvalidDocumentNumber` for a malformed number; `InvalidAggregationContent`
    /// if the case already holds sub-aggregations.
    pub fn add_document(
        &mut self,
        document_number: Option<&str>,
        title: Option<&str>,
        record_type: &str,
    ) -> Result<SvkRecord<'_>> {
        RECORD_TYPE_SVK.check(record_type)?;
        if let Some(number) = document_number {
            validate_document_number(&normalize(number))?;
        }
        let record = self.aggregation.add_record(Some(record_type), Some("digital"))?;
        let mut document = SvkRecord::new(record);
        if let Some(number) = document_number {
            document.set_document_number(number)?;
        }
        if let Some(title) = title {
            document.set_title(title);
        }
        Ok(document)
    }

    /// Writer for this case's SVK extension subtree.
    pub fn extensions(&mut self) -> SvkExtensions<'_, Aggregation<'d>> {
        SvkExtensions::new(&mut self.aggregation)
    }

    fn add_related_object(&mut self, object: RelatedObject) -> Result<&mut Self> {
        self.extensions().add_related_object(&object)?;
        Ok(self)
    }
}

fn related(object_type: &str, name: &str, id: &str, system_id: Option<&str>) -> RelatedObject {
    let object = RelatedObject::new(object_type, name, id);
    match system_id {
        Some(system_id) => object.with_delivering_system_id(system_id),
        None => object,
    }
}

impl<'d> Deref for SvkCase<'d> {
    type Target = Aggregation<'d>;

    fn deref(&self) -> &Self::Target {
        &self.aggregation
    }
}

impl DerefMut for SvkCase<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.aggregation
    }
}
