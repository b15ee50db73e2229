//! Configuration constants and validation functions for the SVK profile.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Result, SvkError};

/// Namespace of the SVK extension elements.
pub const SVK_NAMESPACE: &str = "https://xml.svenskakyrkan.se/ERMS-SVK-element";

/// Local name of the extension root below `additionalXMLData`.
pub const EXTENSION_ROOT: &str = "ermsSvkArende";

/// Version attributes written on the extension root, in output order.
pub const EXTENSION_VERSIONS: [(&str, &str); 4] = [
    ("schemaVersion", "1.0"),
    ("ermsSchemaVersion", "2.1.2"),
    ("elementSchemaVersion", "1.0"),
    ("schematronVersion", "1.0"),
];

/// Classification schema used when none is given.
pub const DEFAULT_CLASSIFICATION_SCHEMA: &str = "KlaSL2016_1.0";

/// Name of the delivering system in the `created` maintenance event.
pub const DELIVERER_NAME: &str = "erms-svk-arende";

/// Organisation of the delivering system.
pub const DELIVERER_ORGANISATION: &str = "Svenska kyrkan";

/// `otherAgentType` of the agent who closed a case.
pub const CLOSING_PERSON: &str = "closing_person";

/// Record type used when a document is added without one.
pub const DEFAULT_RECORD_TYPE: &str = "ärendedokument";

/// Currency of contract values when none is given.
pub const DEFAULT_CURRENCY: &str = "SEK";

/// File variant of appendices when none is given.
pub const DEFAULT_FILE_VARIANT: &str = "preservation";

/// Timestamp format of maintenance events.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format of default case dates (midnight of the current day).
pub const DAY_FORMAT: &str = "%Y-%m-%dT00:00:00";

/// Case number: diary code, space, year, hyphen, four-digit serial.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CASE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Ö]+ [0-9]{4}-[0-9]{4}$").expect("valid regex"));

/// Document number: case number, colon, serial without leading zero.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DOCUMENT_NUMBER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Ö]+ [0-9]{4}-[0-9]{4}:[1-9][0-9]*$").expect("valid regex")
});

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ORG_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PERSON_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{12}$").expect("valid regex"));

/// Normalize text to Unicode NFC.
///
/// Decomposed input such as `O` + combining diaeresis becomes `Ö`, so
/// identifiers typed on different systems compare equal.
///
/// # Examples
/// ```
/// use erms_svk::config::normalize;
///
/// assert_eq!(normalize("O\u{0308}"), "Ö");
/// ```
pub fn normalize(value: &str) -> String {
    value.nfc().collect()
}

/// Check whether a case number is well formed, after NFC normalization.
pub fn is_case_number(value: &str) -> bool {
    CASE_NUMBER_PATTERN.is_match(&normalize(value))
}

/// Check whether a document number is well formed, after NFC normalization.
pub fn is_document_number(value: &str) -> bool {
    DOCUMENT_NUMBER_PATTERN.is_match(&normalize(value))
}

/// Check whether an organisation number is 10 digits.
pub fn is_org_number(value: &str) -> bool {
    ORG_NUMBER_PATTERN.is_match(value)
}

/// Check whether a person number is 12 digits.
pub fn is_person_number(value: &str) -> bool {
    PERSON_NUMBER_PATTERN.is_match(value)
}

/// Validate a case number.
///
/// # Arguments
/// * `case_number` - Case number such as `F 2019-0032`
///
/// # Returns
/// * `Ok(())` if valid
/// * `Err(SvkError::InvalidCaseNumber)` if invalid
///
/// # Examples
/// ```
/// use erms_svk::config::validate_case_number;
///
/// assert!(validate_case_number("F 2019-0032").is_ok());
/// assert!(validate_case_number("KS 2024-0001").is_ok());
/// assert!(validate_case_number("F 2019-32").is_err());
/// ```
pub fn validate_case_number(case_number: &str) -> Result<()> {
    if is_case_number(case_number) {
        Ok(())
    } else {
        Err(SvkError::InvalidCaseNumber(case_number.to_string()))
    }
}

/// Validate a document number.
///
/// # Examples
/// ```
/// use erms_svk::config::validate_document_number;
///
/// assert!(validate_document_number("F 2019-0032:1").is_ok());
/// assert!(validate_document_number("F 2019-0032:01").is_err());
/// ```
pub fn validate_document_number(document_number: &str) -> Result<()> {
    if is_document_number(document_number) {
        Ok(())
    } else {
        Err(SvkError::InvalidDocumentNumber(document_number.to_string()))
    }
}

/// Validate an organisation number (10 digits, no hyphen).
///
/// # Examples
/// ```
/// use erms_svk::config::validate_org_number;
///
/// assert!(validate_org_number("2520028553").is_ok());
/// assert!(validate_org_number("252002-8553").is_err());
/// ```
pub fn validate_org_number(org_number: &str) -> Result<()> {
    if is_org_number(org_number) {
        Ok(())
    } else {
        Err(SvkError::InvalidOrgNumber(org_number.to_string()))
    }
}

/// Current local time as a maintenance event timestamp.
pub fn now_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Midnight of the current local day, the default for case dates.
pub fn today() -> String {
    chrono::Local::now().format(DAY_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_number_accepts_swedish_codes() {
        assert!(is_case_number("F 2019-0032"));
        assert!(is_case_number("ÄÖ 2024-1234"));
        assert!(!is_case_number("F2019-0032"));
        assert!(!is_case_number("F 19-0032"));
        assert!(!is_case_number(" F 2019-0032"));
    }

    #[test]
    fn test_case_number_normalizes_decomposed_input() {
        assert!(is_case_number("O\u{0308} 2024-0001"));
    }

    #[test]
    fn test_document_number_rejects_zero_serial() {
        assert!(is_document_number("F 2019-0032:10"));
        assert!(!is_document_number("F 2019-0032:0"));
        assert!(!is_document_number("F 2019-0032"));
    }

    #[test]
    fn test_number_lengths() {
        assert!(is_org_number("2520028553"));
        assert!(!is_org_number("252002855"));
        assert!(is_person_number("197001011234"));
        assert!(!is_person_number("7001011234"));
        assert!(!is_person_number("19700101-1234"));
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(now_timestamp().len(), "2024-01-01T10:00:00".len());
        assert!(today().ends_with("T00:00:00"));
    }
}
