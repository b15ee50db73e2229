//! SVK rule checks.
//!
//! [`SvkValidator`] collects errors and warnings from individual checks;
//! [`validate_document`] runs every check over a serialized ERMS document.
//! Checks work on the serialized output only, so documents written by
//! other tools can be linted the same way.

use roxmltree::{Document, Node};
use serde::Serialize;
use tracing::warn;

use crate::config::{is_case_number, is_document_number, is_org_number, is_person_number, normalize};
use crate::value_lists::{
    AGENT_TYPE_EXTENSIONS, CLASSIFICATION_SCHEMA, DATE_TYPE_SVK, IDENTIFICATION_TYPE, ID_TYPE,
    RECORD_TYPE_SVK, STATUS_SVK,
};
use crate::xml::{
    child_text, entry_attributes, find_by_path, find_child, find_children, find_descendants,
    get_attribute, get_text, is_erms,
};

/// Outcome of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub error_count: usize,
    pub warning_count: usize,
}

/// Accumulates the findings of SVK rule checks.
///
/// Each check returns `true` when it added no error.
///
/// # Examples
/// ```
/// use erms_svk::validation::SvkValidator;
///
/// let mut validator = SvkValidator::new();
/// assert!(validator.validate_case_number("F 2024-0001"));
/// assert!(!validator.validate_org_number("252002-8553"));
///
/// let report = validator.report();
/// assert!(!report.valid);
/// assert_eq!(report.error_count, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SvkValidator {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl SvkValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all findings.
    pub fn reset(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport {
            valid: self.is_valid(),
            errors: self.errors.clone(),
            warnings: self.warnings.clone(),
            error_count: self.errors.len(),
            warning_count: self.warnings.len(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    pub fn validate_case_number(&mut self, case_number: &str) -> bool {
        if is_case_number(case_number) {
            return true;
        }
        self.error(format!(
            "Invalid case number '{case_number}', expected <code> <year>-<serial> (e.g. F 2019-0032)"
        ));
        false
    }

    pub fn validate_document_number(&mut self, document_number: &str) -> bool {
        if is_document_number(document_number) {
            return true;
        }
        self.error(format!(
            "Invalid document number '{document_number}', expected <case number>:<n> (e.g. F 2019-0032:1)"
        ));
        false
    }

    pub fn validate_org_number(&mut self, org_number: &str) -> bool {
        if is_org_number(org_number) {
            return true;
        }
        self.error(format!(
            "Invalid organisation number '{org_number}', expected 10 digits without hyphen"
        ));
        false
    }

    pub fn validate_person_number(&mut self, person_number: &str) -> bool {
        if is_person_number(person_number) {
            return true;
        }
        self.error(format!(
            "Invalid person number '{person_number}', expected 12 digits without hyphen"
        ));
        false
    }

    /// Check the control identifications, given as `(type, value)` pairs.
    ///
    /// `arkivbildare` and `ärendenummer` are required, plus either
    /// `organisationsnummer` or `aid`. Unknown types are warnings.
    pub fn validate_identification_types(&mut self, identifications: &[(&str, &str)]) -> bool {
        let before = self.errors.len();
        let has = |kind: &str| identifications.iter().any(|(t, _)| *t == kind);

        for required in ["arkivbildare", "ärendenummer"] {
            if !has(required) {
                self.error(format!("Missing required identification '{required}' in control"));
            }
        }
        if !has("organisationsnummer") && !has("aid") {
            self.error("Control needs an 'organisationsnummer' or 'aid' identification");
        }
        for (kind, value) in identifications {
            match *kind {
                "organisationsnummer" => {
                    self.validate_org_number(value);
                }
                "ärendenummer" => {
                    self.validate_case_number(&normalize(value));
                }
                other if !IDENTIFICATION_TYPE.contains(other) => {
                    self.warning(format!("Unknown identification type '{other}'"));
                }
                _ => {}
            }
        }
        self.errors.len() == before
    }

    pub fn validate_classification_schema(&mut self, schema: &str) -> bool {
        if CLASSIFICATION_SCHEMA.contains(schema) {
            return true;
        }
        self.error(format!(
            "Invalid classification schema '{schema}', must be one of: {}",
            CLASSIFICATION_SCHEMA.values.join(", ")
        ));
        false
    }

    pub fn validate_status(&mut self, status: &str) -> bool {
        if STATUS_SVK.contains(status) {
            return true;
        }
        self.error(format!(
            "Invalid status '{status}', must be one of: {}",
            STATUS_SVK.values.join(", ")
        ));
        false
    }

    pub fn validate_record_type(&mut self, record_type: &str) -> bool {
        if RECORD_TYPE_SVK.contains(record_type) {
            return true;
        }
        self.error(format!(
            "Invalid record type '{record_type}', must be one of: {}",
            RECORD_TYPE_SVK.values.join(", ")
        ));
        false
    }

    /// Check a written direction: `incoming`, `outgoing` or `other` with
    /// `otherDirectionDefinition="internal"`.
    pub fn validate_direction(&mut self, direction: &str, other_direction: Option<&str>) -> bool {
        match (direction, other_direction) {
            ("incoming" | "outgoing", None) | ("other", Some("internal")) => true,
            ("other", other) => {
                self.error(format!(
                    "Direction 'other' requires otherDirectionDefinition 'internal', got '{}'",
                    other.unwrap_or_default()
                ));
                false
            }
            (direction, _) => {
                self.error(format!(
                    "Invalid direction '{direction}', must be incoming, outgoing or other"
                ));
                false
            }
        }
    }

    /// Incoming documents need a sender, outgoing documents a receiver.
    pub fn validate_agents_for_direction(&mut self, direction: &str, agent_types: &[&str]) -> bool {
        let required = match direction {
            "incoming" => "sender",
            "outgoing" => "receiver",
            _ => return true,
        };
        if agent_types.contains(&required) {
            return true;
        }
        self.error(format!("An {direction} document requires a {required} agent"));
        false
    }

    /// `opened` and `closed` are required; `created` may appear once.
    pub fn validate_case_dates(&mut self, date_types: &[&str]) -> bool {
        let before = self.errors.len();
        for required in ["opened", "closed"] {
            if !date_types.contains(&required) {
                self.error(format!("Case is missing the required '{required}' date"));
            }
        }
        self.check_at_most_once("Case", date_types, &["created"]);
        self.warn_unknown_date_types(date_types);
        self.errors.len() == before
    }

    /// `created` and `originated` are required; these and `received` and
    /// `expedited` may each appear once.
    pub fn validate_record_dates(&mut self, date_types: &[&str]) -> bool {
        let before = self.errors.len();
        for required in ["created", "originated"] {
            if !date_types.contains(&required) {
                self.error(format!("Document is missing the required '{required}' date"));
            }
        }
        self.check_at_most_once(
            "Document",
            date_types,
            &["created", "originated", "received", "expedited"],
        );
        self.warn_unknown_date_types(date_types);
        self.errors.len() == before
    }

    fn check_at_most_once(&mut self, owner: &str, date_types: &[&str], unique: &[&str]) {
        for kind in unique {
            let count = date_types.iter().filter(|t| *t == kind).count();
            if count > 1 {
                self.error(format!("{owner} has {count} '{kind}' dates, at most one allowed"));
            }
        }
    }

    fn warn_unknown_date_types(&mut self, date_types: &[&str]) {
        for kind in date_types {
            if !DATE_TYPE_SVK.contains(kind) {
                self.warning(format!("Date type '{kind}' is not used by the SVK profile"));
            }
        }
    }

    fn lint_control(&mut self, control: Node<'_, '_>) {
        let identifications: Vec<(&str, String)> = find_children(control, "identification")
            .map(|node| {
                (
                    get_attribute(node, "identificationType").unwrap_or_default(),
                    get_text(node),
                )
            })
            .collect();
        let pairs: Vec<(&str, &str)> = identifications
            .iter()
            .map(|(kind, value)| (*kind, value.as_str()))
            .collect();
        self.validate_identification_types(&pairs);

        match find_by_path(
            control,
            "classificationSchema/textualDescriptionOfClassificationSchema/p",
        ) {
            Some(p) => {
                self.validate_classification_schema(&get_text(p));
            }
            None => self.warning("Control has no classification schema"),
        }
    }

    fn lint_case(&mut self, case: Node<'_, '_>, position: usize) {
        match child_text(case, "objectId") {
            Some(number) => {
                self.validate_case_number(&normalize(&number));
            }
            None => self.error(format!("Case #{position} has no case number (objectId)")),
        }
        match find_child(case, "status").and_then(|s| get_attribute(s, "value")) {
            Some(status) => {
                self.validate_status(status);
            }
            None => self.warning(format!("Case #{position} has no status")),
        }
        for extra_id in find_children(case, "extraId") {
            match get_attribute(extra_id, "extraIdType") {
                Some("organisationsnummer") => {
                    self.validate_org_number(&get_text(extra_id));
                }
                Some(kind) if !ID_TYPE.contains(kind) => {
                    self.warning(format!("Case #{position} has unknown extraIdType '{kind}'"));
                }
                Some(_) => {}
                None => self.warning(format!("Case #{position} has an extraId without type")),
            }
        }
        self.validate_case_dates(&entry_attributes(case, "dates", "date", "dateType"));
    }

    fn lint_record(&mut self, record: Node<'_, '_>, case_number: Option<&str>) {
        let document_number = child_text(record, "objectId").map(|n| normalize(&n));
        match document_number.as_deref() {
            Some(number) => {
                if self.validate_document_number(number) {
                    if let Some(case_number) = case_number {
                        if !number.starts_with(&format!("{case_number}:")) {
                            self.warning(format!(
                                "Document number '{number}' does not belong to case '{case_number}'"
                            ));
                        }
                    }
                }
            }
            None => self.warning("Document has no document number (objectId)"),
        }
        if let Some(record_type) = get_attribute(record, "recordType") {
            self.validate_record_type(record_type);
        }
        if let Some(status) = find_child(record, "status").and_then(|s| get_attribute(s, "value")) {
            self.validate_status(status);
        }
        if let Some(direction) = find_child(record, "direction") {
            let definition = get_attribute(direction, "directionDefinition").unwrap_or_default();
            let other = get_attribute(direction, "otherDirectionDefinition");
            if self.validate_direction(definition, other) {
                let agent_types = entry_attributes(record, "agents", "agent", "agentType");
                self.validate_agents_for_direction(definition, &agent_types);
            }
        }
        self.validate_record_dates(&entry_attributes(record, "dates", "date", "dateType"));
    }

    fn lint_agent(&mut self, agent: Node<'_, '_>) {
        if get_attribute(agent, "agentType") == Some("other") {
            match get_attribute(agent, "otherAgentType") {
                Some(other) if AGENT_TYPE_EXTENSIONS.contains(other) => {}
                other => self.warning(format!(
                    "Agent type 'other' with otherAgentType '{}' is not defined by the SVK profile",
                    other.unwrap_or_default()
                )),
            }
        }
        if let Some(id_number) = find_child(agent, "idNumber") {
            let value = get_text(id_number);
            match get_attribute(id_number, "idNumberType") {
                Some("personnummer") => {
                    self.validate_person_number(&value);
                }
                Some("organisationsnummer") => {
                    self.validate_org_number(&value);
                }
                _ => {}
            }
        }
    }
}

/// Validate a serialized ERMS document against the SVK rules.
///
/// A document that is not well-formed XML yields a report with a single
/// syntax error instead of an `Err`.
///
/// # Examples
/// ```
/// use erms_svk::validate_document;
///
/// let report = validate_document("<erms><control>");
/// assert!(!report.valid);
/// assert!(report.errors[0].starts_with("XML syntax error"));
/// ```
pub fn validate_document(xml: &str) -> ValidationReport {
    let mut validator = SvkValidator::new();
    match Document::parse(xml) {
        Ok(document) => lint_document(&mut validator, &document),
        Err(e) => validator.error(format!("XML syntax error: {e}")),
    }
    let report = validator.report();
    if !report.valid {
        warn!(
            errors = report.error_count,
            warnings = report.warning_count,
            "SVK validation failed"
        );
    }
    report
}

fn lint_document(validator: &mut SvkValidator, document: &Document<'_>) {
    let root = document.root_element();
    if !is_erms(root, "erms") {
        validator.error(format!(
            "Root element is <{}>, expected <erms> in the ERMS namespace",
            root.tag_name().name()
        ));
        return;
    }

    match find_child(root, "control") {
        Some(control) => validator.lint_control(control),
        None => validator.error("Document has no <control> section"),
    }

    let cases: Vec<Node<'_, '_>> = find_descendants(root, "aggregation")
        .filter(|node| get_attribute(*node, "aggregationType") == Some("caseFile"))
        .collect();
    let records: Vec<Node<'_, '_>> = find_descendants(root, "record").collect();
    if cases.is_empty() && records.is_empty() {
        validator.warning("Document contains no cases or documents");
    }

    for (index, case) in cases.iter().enumerate() {
        validator.lint_case(*case, index + 1);
    }
    for record in &records {
        let case_number = record
            .ancestors()
            .skip(1)
            .find(|node| is_erms(*node, "aggregation"))
            .and_then(|case| child_text(case, "objectId"))
            .map(|number| normalize(&number));
        validator.lint_record(*record, case_number.as_deref());
    }
    for agent in find_descendants(root, "agent") {
        validator.lint_agent(agent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VALID: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<erms xmlns="https://DILCIS.eu/XML/ERMS">
  <control>
    <identification identificationType="arkivbildare">Domkyrkoförsamlingen</identification>
    <identification identificationType="organisationsnummer">2520028553</identification>
    <identification identificationType="ärendenummer">F 2024-0001</identification>
    <classificationSchema>
      <textualDescriptionOfClassificationSchema><p>KlaSL2016_1.0</p></textualDescriptionOfClassificationSchema>
    </classificationSchema>
  </control>
  <aggregations>
    <aggregation aggregationType="caseFile">
      <objectId>F 2024-0001</objectId>
      <status value="closed"/>
      <agents><agent agentType="other" otherAgentType="closing_person"><name>Eva</name></agent></agents>
      <dates><date dateType="opened">2024-01-01</date><date dateType="closed">2024-03-01</date></dates>
      <record recordType="ärendedokument">
        <objectId>F 2024-0001:1</objectId>
        <direction directionDefinition="incoming"/>
        <agents><agent agentType="sender"><name>Byggfirman AB</name>
          <idNumber idNumberType="organisationsnummer">5560000000</idNumber></agent></agents>
        <dates><date dateType="created">2024-01-02</date><date dateType="originated">2024-01-01</date></dates>
      </record>
    </aggregation>
  </aggregations>
</erms>"#;

    #[test]
    fn test_valid_document() {
        let report = validate_document(VALID);
        assert_eq!(report.errors, Vec::<String>::new());
        assert_eq!(report.warnings, Vec::<String>::new());
        assert!(report.valid);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let report = validate_document("<erms><control></erms>");
        assert!(!report.valid);
        assert_eq!(report.error_count, 1);
        assert!(report.errors[0].starts_with("XML syntax error"));
    }

    #[test]
    fn test_wrong_root() {
        let report = validate_document("<ead/>");
        assert_eq!(report.error_count, 1);
        assert!(report.errors[0].contains("<ead>"));
    }

    #[test]
    fn test_missing_sender_for_incoming() {
        let xml = VALID.replace("agentType=\"sender\"", "agentType=\"creator\"");
        let report = validate_document(&xml);
        assert_eq!(
            report.errors,
            vec!["An incoming document requires a sender agent".to_string()]
        );
    }

    #[test]
    fn test_case_extra_ids() {
        let with_ids = |ids: &str| {
            VALID.replace(
                "<objectId>F 2024-0001</objectId>\n      <status",
                &format!("<objectId>F 2024-0001</objectId>{ids}\n      <status"),
            )
        };

        let known = with_ids(concat!(
            r#"<extraId extraIdType="organisationsnummer">2520028553</extraId>"#,
            r#"<extraId extraIdType="aid">SE/2120001</extraId>"#
        ));
        assert_eq!(validate_document(&known).warnings, Vec::<String>::new());

        let report = validate_document(&with_ids(
            r#"<extraId extraIdType="diarienummer">D-1</extraId>"#,
        ));
        assert!(report.valid);
        assert_eq!(
            report.warnings,
            vec!["Case #1 has unknown extraIdType 'diarienummer'".to_string()]
        );

        let report = validate_document(&with_ids(
            r#"<extraId extraIdType="organisationsnummer">25200285</extraId>"#,
        ));
        assert!(!report.valid);
    }

    #[test]
    fn test_foreign_document_number_is_warning() {
        let xml = VALID.replace("F 2024-0001:1", "F 2024-0002:1");
        let report = validate_document(&xml);
        assert!(report.valid);
        assert_eq!(report.warning_count, 1);
    }

    #[test]
    fn test_identification_rules() {
        let mut validator = SvkValidator::new();
        assert!(!validator.validate_identification_types(&[("arkivbildare", "X")]));
        assert_eq!(validator.errors().len(), 2);

        validator.reset();
        assert!(validator.validate_identification_types(&[
            ("arkivbildare", "X"),
            ("aid", "SE/123"),
            ("ärendenummer", "F 2024-0001"),
            ("diarienummer", "1"),
        ]));
        assert_eq!(validator.warnings().len(), 1);
    }

    #[test]
    fn test_case_dates() {
        let mut validator = SvkValidator::new();
        assert!(validator.validate_case_dates(&["created", "opened", "closed"]));
        assert!(!validator.validate_case_dates(&["created", "created", "opened", "closed"]));
        assert!(!validator.validate_case_dates(&["opened"]));
        assert_eq!(validator.errors().len(), 2);
    }

    #[test]
    fn test_record_dates() {
        let mut validator = SvkValidator::new();
        assert!(validator.validate_record_dates(&["created", "originated", "received"]));
        assert!(!validator.validate_record_dates(&[
            "created",
            "originated",
            "expedited",
            "expedited"
        ]));
        assert!(validator.validate_record_dates(&["created", "originated", "meeting"]));
        assert_eq!(validator.warnings().len(), 1);
    }

    #[test]
    fn test_direction_rules() {
        let mut validator = SvkValidator::new();
        assert!(validator.validate_direction("other", Some("internal")));
        assert!(!validator.validate_direction("other", None));
        assert!(!validator.validate_direction("internal", None));
        assert!(validator.validate_agents_for_direction("outgoing", &["receiver"]));
        assert!(validator.validate_agents_for_direction("other", &[]));
        assert!(!validator.validate_agents_for_direction("outgoing", &["sender"]));
    }

    #[test]
    fn test_number_formats() {
        let mut validator = SvkValidator::new();
        assert!(validator.validate_person_number("197001011234"));
        assert!(!validator.validate_person_number("19700101-1234"));
        assert!(validator.validate_document_number("KS 2024-0001:12"));
        assert!(!validator.validate_case_number("F2024-0001"));
        assert_eq!(validator.report().error_count, 2);
    }
}
