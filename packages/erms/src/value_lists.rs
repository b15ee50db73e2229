//! Controlled value lists and membership checks.
//!
//! Each list is a closed set of permitted attribute values. Builders check
//! membership before creating any node.

use crate::error::{ErmsError, Result};

/// A named, closed set of permitted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueList {
    /// Label used in error messages.
    pub field: &'static str,
    /// Permitted values in their documented order.
    pub values: &'static [&'static str],
}

impl ValueList {
    /// Create a value list.
    #[must_use]
    pub const fn new(field: &'static str, values: &'static [&'static str]) -> Self {
        Self { field, values }
    }

    /// Check whether `value` is permitted. Comparison is exact and
    /// case-sensitive.
    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.values.contains(&value)
    }

    /// Fail with `InvalidControlledValue` unless `value` is permitted.
    ///
    /// # Errors
    /// Returns `InvalidControlledValue` carrying this list's field label.
    pub fn check(&self, value: &str) -> Result<()> {
        check_membership(value, self.values, self.field)
    }
}

/// Check that `value` is one of `allowed`.
///
/// # Arguments
/// * `value` - Candidate value
/// * `allowed` - Permitted values
/// * `field` - Label for the error message
///
/// # Returns
/// * `Ok(())` if permitted
/// * `Err(ErmsError::InvalidControlledValue)` otherwise
///
/// # Examples
/// ```
/// use erms_create::value_lists::{check_membership, STATUS};
///
/// assert!(check_membership("closed", STATUS.values, STATUS.field).is_ok());
/// assert!(check_membership("Closed", STATUS.values, STATUS.field).is_err());
/// ```
pub fn check_membership(value: &str, allowed: &[&str], field: &str) -> Result<()> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ErmsError::InvalidControlledValue {
            field: field.to_string(),
            value: value.to_string(),
            allowed: allowed.iter().map(|v| (*v).to_string()).collect(),
        })
    }
}

/// Aggregation types.
pub const AGGREGATION_TYPE: ValueList = ValueList::new(
    "aggregation type",
    &[
        "caseFile",
        "class",
        "component",
        "file",
        "subfile",
        "volume",
        "own_aggregation_definition",
    ],
);

/// Physical or digital nature of a record.
pub const RECORD_PHYSICAL_OR_DIGITAL: ValueList = ValueList::new(
    "record physical or digital",
    &["physical", "digital", "physical_and_digital", "does_not_apply"],
);

/// Date types.
pub const DATE_TYPE: ValueList = ValueList::new(
    "date type",
    &[
        "aggregated",
        "appraisal",
        "archived",
        "archiving",
        "captured",
        "checked_in",
        "checked_out",
        "classification",
        "closed",
        "confidentiality_assessed",
        "created",
        "decision",
        "decision_date",
        "decision_deadline",
        "decrypted",
        "deleted",
        "destroyed",
        "dispatch",
        "encrypted",
        "end",
        "expedited",
        "expiration",
        "finished",
        "first_used",
        "last_addition",
        "last_addition_timestamp",
        "last_reviewed",
        "loan",
        "main_signature",
        "modified",
        "moved",
        "opened",
        "opening_date",
        "originated",
        "other_signature",
        "ownership_start",
        "prepared",
        "received",
        "received_at_location",
        "relocated",
        "rendered",
        "reviewed",
        "sent",
        "start",
        "take_back",
        "transferred",
        "other",
    ],
);

/// Agent types.
pub const AGENT_TYPE: ValueList = ValueList::new(
    "agent type",
    &[
        "administrator",
        "agent",
        "archiver",
        "authorising_person",
        "borrower",
        "counterpart",
        "creator",
        "custodian",
        "deliverer",
        "dispatcher",
        "editor",
        "ipp_owner",
        "main_signatory",
        "mover",
        "opening_person",
        "other_signatory",
        "owner",
        "reader",
        "recipient",
        "receiver",
        "relocator",
        "responsible_person",
        "sender",
        "user",
        "other",
    ],
);

/// Maintenance statuses.
pub const MAINTENANCE_STATUS: ValueList = ValueList::new(
    "maintenance status",
    &[
        "cancelled",
        "created",
        "deleted",
        "derived",
        "new",
        "revised",
        "unknown",
        "updated",
    ],
);

/// Maintenance event types.
pub const EVENT_TYPE: ValueList = ValueList::new(
    "event type",
    &[
        "created",
        "revised",
        "deleted",
        "cancelled",
        "derived",
        "updated",
        "unknown",
    ],
);

/// Relation types.
pub const RELATION_TYPE: ValueList = ValueList::new(
    "relation type",
    &[
        "replaces",
        "is_replaced_with",
        "reference",
        "referenced_by",
        "demands",
        "needed_by",
        "contains",
        "part_of",
        "other_format_version",
        "another_format_version_of",
        "has_version",
        "is_version_of",
        "is_redacted_version_of",
        "has_redacted_version",
        "rendition_version_of",
        "has_rendition_version",
        "is_child_of",
        "is_parent_of",
        "moved",
        "moved_from",
        "deleted",
        "own_relation_definition",
    ],
);

/// Case and document statuses.
pub const STATUS: ValueList = ValueList::new(
    "status",
    &[
        "ad_acta",
        "closed",
        "expedited",
        "initiated",
        "in_progress",
        "obliterated",
        "on_hold",
        "open",
        "prepared",
        "received",
    ],
);

/// Record direction definitions.
pub const DIRECTION_TYPE: ValueList = ValueList::new(
    "direction",
    &[
        "incoming",
        "outgoing",
        "internal_memo_for_follow-up",
        "internal_memo_without_follow-up",
        "case_draft",
        "other",
    ],
);

/// Restriction types.
pub const RESTRICTION_TYPE: ValueList = ValueList::new(
    "restriction type",
    &["confidential", "gdpr", "integrity", "other_type"],
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_accepts_member() {
        assert!(AGGREGATION_TYPE.check("caseFile").is_ok());
        assert!(DIRECTION_TYPE.check("internal_memo_for_follow-up").is_ok());
    }

    #[test]
    fn test_check_is_case_sensitive() {
        let err = AGGREGATION_TYPE.check("casefile").unwrap_err();
        match err {
            ErmsError::InvalidControlledValue {
                field,
                value,
                allowed,
            } => {
                assert_eq!(field, "aggregation type");
                assert_eq!(value, "casefile");
                assert_eq!(allowed.len(), AGGREGATION_TYPE.values.len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_value_rejected() {
        assert!(STATUS.check("").is_err());
    }

    #[test]
    fn test_other_is_member_of_open_ended_lists() {
        for list in [DATE_TYPE, AGENT_TYPE, DIRECTION_TYPE] {
            assert!(list.contains("other"), "{} should allow 'other'", list.field);
        }
    }
}
