//! SVK documents: an aggregation-mode [`Erms`] prepared for delivery.

use std::path::Path;

use erms_create::{
    AgentSpec, AggregationId, Control, DocumentMode, DocumentStatistics, Erms, MaintenanceEvent,
    RecordId, Section, SerializeOptions,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::case::{CaseAgents, SvkCase};
use crate::config::{
    normalize, now_timestamp, today, validate_case_number, validate_org_number,
    DEFAULT_CLASSIFICATION_SCHEMA, DELIVERER_NAME, DELIVERER_ORGANISATION,
};
use crate::error::{Result, SvkError};
use crate::record::SvkRecord;
use crate::validation::{validate_document, ValidationReport};
use crate::value_lists::{CLASSIFICATION_SCHEMA, STATUS_SVK};

fn default_classification_schema() -> String {
    DEFAULT_CLASSIFICATION_SCHEMA.to_string()
}

/// Archive creator and classification details of the control section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlInfo {
    /// Name of the archive creator ("arkivbildare").
    pub archive_creator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    /// Archive creator id, used when there is no organisation number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    #[serde(default = "default_classification_schema")]
    pub classification_schema: String,
}

impl ControlInfo {
    #[must_use]
    pub fn new(archive_creator: &str) -> Self {
        Self {
            archive_creator: archive_creator.to_string(),
            org_number: None,
            aid: None,
            case_number: None,
            classification_schema: default_classification_schema(),
        }
    }

    #[must_use]
    pub fn with_org_number(mut self, org_number: impl Into<String>) -> Self {
        self.org_number = Some(org_number.into());
        self
    }

    #[must_use]
    pub fn with_aid(mut self, aid: impl Into<String>) -> Self {
        self.aid = Some(aid.into());
        self
    }

    #[must_use]
    pub fn with_case_number(mut self, case_number: impl Into<String>) -> Self {
        self.case_number = Some(case_number.into());
        self
    }

    #[must_use]
    pub fn with_classification_schema(mut self, schema: impl Into<String>) -> Self {
        self.classification_schema = schema.into();
        self
    }
}

/// Input of [`SvkErms::add_case`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCase {
    pub case_number: String,
    pub title: String,
    /// Sets up the control section when it has no identifications yet.
    pub archive_creator: Option<String>,
    pub org_number: Option<String>,
    pub aid: Option<String>,
}

impl NewCase {
    #[must_use]
    pub fn new(case_number: &str, title: &str) -> Self {
        Self {
            case_number: case_number.to_string(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_archive_creator(
        mut self,
        archive_creator: &str,
        org_number: Option<&str>,
        aid: Option<&str>,
    ) -> Self {
        self.archive_creator = Some(archive_creator.to_string());
        self.org_number = org_number.map(str::to_string);
        self.aid = aid.map(str::to_string);
        self
    }
}

/// Input of [`SvkErms::create_simple_case`].
///
/// Missing dates default to today; the status defaults to `closed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleCase {
    pub case: NewCase,
    pub opened: Option<String>,
    pub closed: Option<String>,
    pub status: String,
    pub creator: Option<String>,
    pub responsible_person: Option<String>,
}

impl SimpleCase {
    #[must_use]
    pub fn new(case: NewCase) -> Self {
        Self {
            case,
            opened: None,
            closed: None,
            status: "closed".to_string(),
            creator: None,
            responsible_person: None,
        }
    }
}

/// An ERMS document following the SVK case-file profile.
///
/// # Examples
/// ```
/// use erms_svk::{NewCase, SimpleCase, SvkErms};
///
/// let mut document = SvkErms::created_at("2024-05-01T12:00:00")?;
/// let case = NewCase::new("F 2024-0001", "Renovering av kyrktaket").with_archive_creator(
///     "Domkyrkoförsamlingen",
///     Some("2520028553"),
///     None,
/// );
/// let mut simple = SimpleCase::new(case);
/// simple.opened = Some("2024-01-10T00:00:00".to_string());
/// simple.closed = Some("2024-04-30T00:00:00".to_string());
/// document.create_simple_case(&simple)?;
///
/// assert!(document.validate()?.valid);
/// # Ok::<(), erms_svk::SvkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SvkErms {
    erms: Erms,
}

impl SvkErms {
    /// Create a document stamped with the current local time.
    ///
    /// # Errors
    /// Propagates control builder errors.
    pub fn new() -> Result<Self> {
        Self::created_at(&now_timestamp())
    }

    /// Create a document whose `created` maintenance event carries
    /// `timestamp`.
    ///
    /// # Errors
    /// Propagates control builder errors.
    pub fn created_at(timestamp: &str) -> Result<Self> {
        let mut erms = Erms::new(DocumentMode::Aggregations);
        let deliverer =
            AgentSpec::new("deliverer", DELIVERER_NAME).with_organisation(DELIVERER_ORGANISATION);
        erms.control()
            .set_maintenance_status("new")?
            .add_maintenance_event(&MaintenanceEvent::new("created", timestamp, deliverer))?;
        Ok(Self { erms })
    }

    pub fn erms(&self) -> &Erms {
        &self.erms
    }

    pub fn erms_mut(&mut self) -> &mut Erms {
        &mut self.erms
    }

    pub fn into_inner(self) -> Erms {
        self.erms
    }

    pub fn control(&mut self) -> Control<'_> {
        self.erms.control()
    }

    /// Fill the control section: identifications, classification schema,
    /// agency code and agency name.
    ///
    /// # Errors
    /// `MissingArchiveCreatorId` without organisation number and aid,
    /// format errors for the numbers, `InvalidControlledValue` for an
    /// unknown classification schema. Nothing is written on error.
    pub fn setup_control_info(&mut self, info: &ControlInfo) -> Result<()> {
        let (agency_code, agency_type) = match (info.org_number.as_deref(), info.aid.as_deref()) {
            (Some(org_number), _) => {
                validate_org_number(org_number)?;
                (org_number, "organisationsnummer")
            }
            (None, Some(aid)) => (aid, "aid"),
            (None, None) => return Err(SvkError::MissingArchiveCreatorId),
        };
        let case_number = info.case_number.as_deref().map(normalize);
        if let Some(case_number) = &case_number {
            validate_case_number(case_number)?;
        }
        CLASSIFICATION_SCHEMA.check(&info.classification_schema)?;

        let mut control = self.erms.control();
        control.add_identification(&info.archive_creator, "arkivbildare");
        if let Some(org_number) = info.org_number.as_deref() {
            control.add_identification(org_number, "organisationsnummer");
        }
        if let Some(aid) = info.aid.as_deref() {
            control.add_identification(aid, "aid");
        }
        if let Some(case_number) = &case_number {
            control.add_identification(case_number, "ärendenummer");
        }
        control
            .set_classification_schema(&info.classification_schema)
            .set_agency_code(agency_code, agency_type);
        if let (Some(_), Some(aid)) = (info.org_number.as_deref(), info.aid.as_deref()) {
            control.add_other_agency_code(aid, Some("aid"));
        }
        control.add_agency_name(&info.archive_creator);

        debug!(archive_creator = %info.archive_creator, "Control information set up");
        Ok(())
    }

    /// Add a `caseFile` aggregation with case number and title.
    ///
    /// With an archive creator given and no identifications in the control
    /// yet, the control section is set up from the same data.
    ///
    /// # Errors
    /// Format errors for the case or organisation number, and the errors
    /// of [`SvkErms::setup_control_info`].
    pub fn add_case(&mut self, case: &NewCase) -> Result<SvkCase<'_>> {
        let case_number = normalize(&case.case_number);
        validate_case_number(&case_number)?;
        if let Some(org_number) = case.org_number.as_deref() {
            validate_org_number(org_number)?;
        }

        if let Some(archive_creator) = case.archive_creator.as_deref() {
            if !self.erms.control().has_identifications() {
                self.setup_control_info(&ControlInfo {
                    archive_creator: archive_creator.to_string(),
                    org_number: case.org_number.clone(),
                    aid: case.aid.clone(),
                    case_number: Some(case_number.clone()),
                    classification_schema: default_classification_schema(),
                })?;
            }
        }

        let mut svk_case = SvkCase::new(self.erms.add_aggregation("caseFile")?);
        svk_case.set_case_number(&case_number)?;
        svk_case.set_title(&case.title);
        if case.org_number.is_some() || case.aid.is_some() {
            svk_case.set_archive_creator_info(case.org_number.as_deref(), case.aid.as_deref())?;
        }
        debug!(case_number = %case_number, "Added SVK case");
        Ok(svk_case)
    }

    /// Add a case with status, opened and closed dates and its agents.
    ///
    /// # Errors
    /// `InvalidStatus` before anything is written, then the errors of
    /// [`SvkErms::add_case`].
    pub fn create_simple_case(&mut self, case: &SimpleCase) -> Result<SvkCase<'_>> {
        if !STATUS_SVK.contains(&case.status) {
            return Err(SvkError::InvalidStatus(case.status.clone()));
        }
        let today = today();
        let opened = case.opened.as_deref().unwrap_or(&today);
        let closed = case.closed.as_deref().unwrap_or(&today);
        let agents = CaseAgents {
            creator: case.creator.clone(),
            responsible_person: case.responsible_person.clone(),
            ..CaseAgents::default()
        };

        let mut svk_case = self.add_case(&case.case)?;
        svk_case
            .set_status(&case.status)?
            .add_required_dates(opened, closed, None)?
            .add_case_agents(&agents)?;
        Ok(svk_case)
    }

    /// # Errors
    /// `UnknownHandle` if the id belongs to another document.
    pub fn case(&mut self, id: AggregationId) -> Result<SvkCase<'_>> {
        Ok(SvkCase::new(self.erms.aggregation(id)?))
    }

    /// # Errors
    /// `UnknownHandle` if the id belongs to another document.
    pub fn document(&mut self, id: RecordId) -> Result<SvkRecord<'_>> {
        Ok(SvkRecord::new(self.erms.record(id)?))
    }

    pub fn case_ids(&self) -> Vec<AggregationId> {
        self.erms.aggregation_ids()
    }

    /// # Errors
    /// `Serialization` if the writer fails.
    pub fn to_xml_string(&self, options: &SerializeOptions) -> Result<String> {
        Ok(self.erms.to_xml_string(options)?)
    }

    /// Save without validation.
    ///
    /// # Errors
    /// `FileWrite` carrying the path.
    pub fn save_to_file(&self, path: impl AsRef<Path>, options: &SerializeOptions) -> Result<()> {
        Ok(self.erms.save_to_file(path, options)?)
    }

    /// Run the SVK rule checks over the serialized document.
    ///
    /// # Errors
    /// `Serialization` if the document cannot be serialized.
    pub fn validate(&self) -> Result<ValidationReport> {
        let xml = self.erms.to_xml_string(&SerializeOptions::compact())?;
        Ok(validate_document(&xml))
    }

    /// Validate, then save only if the document is valid.
    ///
    /// # Errors
    /// `ValidationFailed` listing the rule violations; nothing is written.
    pub fn save_with_validation(
        &self,
        path: impl AsRef<Path>,
        options: &SerializeOptions,
    ) -> Result<ValidationReport> {
        let report = self.validate()?;
        if !report.valid {
            warn!(
                path = %path.as_ref().display(),
                errors = report.error_count,
                "Refusing to save document that fails SVK validation"
            );
            return Err(SvkError::ValidationFailed {
                errors: report.errors,
            });
        }
        self.save_to_file(path, options)?;
        Ok(report)
    }

    /// Counts over the cases; the control section is not included.
    pub fn statistics(&self) -> DocumentStatistics {
        self.erms.statistics()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use erms_create::ErmsError;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const TIMESTAMP: &str = "2024-05-01T12:00:00";

    fn control_info() -> ControlInfo {
        ControlInfo::new("Domkyrkoförsamlingen")
            .with_org_number("2520028553")
            .with_case_number("F 2024-0001")
    }

    fn simple_case() -> SimpleCase {
        let case = NewCase::new("F 2024-0001", "Renovering av kyrktaket").with_archive_creator(
            "Domkyrkoförsamlingen",
            Some("2520028553"),
            None,
        );
        SimpleCase {
            opened: Some("2024-01-10T00:00:00".to_string()),
            closed: Some("2024-04-30T00:00:00".to_string()),
            creator: Some("Anna Andersson".to_string()),
            ..SimpleCase::new(case)
        }
    }

    fn compact(document: &SvkErms) -> String {
        document.to_xml_string(&SerializeOptions::compact()).unwrap()
    }

    #[test]
    fn test_new_document_control() {
        let document = SvkErms::created_at(TIMESTAMP).unwrap();
        let xml = compact(&document);
        assert!(xml.contains(r#"<maintenanceStatus value="new"/>"#));
        assert!(xml.contains(&format!(
            concat!(
                r#"<maintenanceEvent><eventType value="created"/><eventDateTime>{}</eventDateTime>"#,
                r#"<agent agentType="deliverer"><name>erms-svk-arende</name>"#,
                r#"<organisation>Svenska kyrkan</organisation></agent></maintenanceEvent>"#
            ),
            TIMESTAMP
        )));
    }

    #[test]
    fn test_setup_control_info() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        document.setup_control_info(&control_info()).unwrap();

        let xml = compact(&document);
        assert!(xml.starts_with(concat!(
            r#"<erms xmlns="https://DILCIS.eu/XML/ERMS" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<control>",
            r#"<identification identificationType="arkivbildare">Domkyrkoförsamlingen</identification>"#,
            r#"<identification identificationType="organisationsnummer">2520028553</identification>"#,
            r#"<identification identificationType="ärendenummer">F 2024-0001</identification>"#,
            "<classificationSchema><textualDescriptionOfClassificationSchema><p>KlaSL2016_1.0</p>"
        )));
        assert!(xml.contains(concat!(
            r#"<maintenanceAgency><agencyCode type="organisationsnummer">2520028553</agencyCode>"#,
            "<agencyName>Domkyrkoförsamlingen</agencyName></maintenanceAgency>"
        )));
    }

    #[test]
    fn test_setup_control_info_validates_first() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        let before = compact(&document);

        let missing = document.setup_control_info(&ControlInfo::new("X"));
        assert!(matches!(missing, Err(SvkError::MissingArchiveCreatorId)));

        let schema = document.setup_control_info(
            &control_info().with_classification_schema("KlaSX"),
        );
        assert!(matches!(
            schema,
            Err(SvkError::Erms(ErmsError::InvalidControlledValue { .. }))
        ));

        let case = document.setup_control_info(&control_info().with_case_number("F 24-1"));
        assert!(matches!(case, Err(SvkError::InvalidCaseNumber(_))));
        assert_eq!(compact(&document), before);
    }

    #[test]
    fn test_aid_only_agency() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        document
            .setup_control_info(&ControlInfo::new("Pastorat").with_aid("SE/2120001"))
            .unwrap();
        assert!(compact(&document).contains(r#"<agencyCode type="aid">SE/2120001</agencyCode>"#));
    }

    #[test]
    fn test_add_case_sets_up_control_once() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        let first = NewCase::new("F 2024-0001", "Första").with_archive_creator(
            "Församlingen",
            Some("2520028553"),
            None,
        );
        let second = NewCase::new("F 2024-0002", "Andra").with_archive_creator(
            "Annan",
            Some("2520028553"),
            None,
        );
        document.add_case(&first).unwrap();
        let case_number = document.add_case(&second).unwrap().case_number().map(str::to_string);
        assert_eq!(case_number.as_deref(), Some("F 2024-0002"));

        let xml = compact(&document);
        assert_eq!(xml.matches(r#"identificationType="arkivbildare""#).count(), 1);
        assert_eq!(xml.matches(r#"extraIdType="organisationsnummer""#).count(), 2);
        assert_eq!(document.statistics().aggregations, 2);
    }

    #[test]
    fn test_add_case_rejects_bad_number_before_writing() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        let before = compact(&document);
        let result = document.add_case(
            &NewCase::new("F 2024-1", "Fel").with_archive_creator("X", Some("2520028553"), None),
        );
        assert!(matches!(result, Err(SvkError::InvalidCaseNumber(_))));
        assert_eq!(compact(&document), before);
    }

    #[test]
    fn test_simple_case_is_valid() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        document.create_simple_case(&simple_case()).unwrap();

        let report = document.validate().unwrap();
        assert_eq!(report.errors, Vec::<String>::new());
        assert!(report.valid);

        let stats = document.statistics();
        assert_eq!(stats.aggregations, 1);
        assert_eq!(stats.dates, 2);
        // The case creator; the deliverer in control is not counted.
        assert_eq!(stats.agents, 1);
    }

    #[test]
    fn test_simple_case_rejects_open_status() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        let case = SimpleCase {
            status: "open".to_string(),
            ..simple_case()
        };
        assert!(matches!(
            document.create_simple_case(&case),
            Err(SvkError::InvalidStatus(_))
        ));
        assert_eq!(document.statistics().aggregations, 0);
    }

    #[test]
    fn test_handles_reopen_cases_and_documents() {
        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        let record_id = {
            let mut case = document.create_simple_case(&simple_case()).unwrap();
            let record = case
                .add_document(Some("F 2024-0001:1"), Some("Offert"), "ärendedokument")
                .unwrap();
            record.id()
        };
        let case_id = document.case_ids()[0];
        assert_eq!(
            document.case(case_id).unwrap().case_number(),
            Some("F 2024-0001")
        );
        assert_eq!(
            document.document(record_id).unwrap().document_number(),
            Some("F 2024-0001:1")
        );
    }

    #[test]
    fn test_save_with_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("arende.xml");

        let document = SvkErms::created_at(TIMESTAMP).unwrap();
        let result = document.save_with_validation(&path, &SerializeOptions::default());
        assert!(matches!(result, Err(SvkError::ValidationFailed { .. })));
        assert!(!path.exists());

        let mut document = SvkErms::created_at(TIMESTAMP).unwrap();
        document.create_simple_case(&simple_case()).unwrap();
        let report = document
            .save_with_validation(&path, &SerializeOptions::default())
            .unwrap();
        assert!(report.valid);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
    }
}
