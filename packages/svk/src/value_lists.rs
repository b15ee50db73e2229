//! SVK value lists.
//!
//! Same [`ValueList`] shape as the core lists; several narrow a core list
//! (status, direction, record type) for the case-file profile.

pub use erms_create::ValueList;

pub const IDENTIFICATION_TYPE: ValueList = ValueList::new(
    "identification type",
    &["aid", "arkivbildare", "organisationsnummer", "ärendenummer"],
);

pub const CLASSIFICATION_SCHEMA: ValueList = ValueList::new(
    "classification schema",
    &["KlaSL2016_1.0", "KlaSN2018_1.0", "KlaSS2016_1.0"],
);

/// Statuses allowed for delivered cases and documents.
pub const STATUS_SVK: ValueList = ValueList::new("status", &["closed", "obliterated"]);

pub const ID_NUMBER_TYPE: ValueList = ValueList::new(
    "id number type",
    &["username", "organisationsnummer", "personnummer"],
);

pub const INITIATIVE: ValueList = ValueList::new("initiative", &["eget", "externt"]);

pub const NOTE_TYPE: ValueList = ValueList::new(
    "note type",
    &[
        "arkivanteckning",
        "generell anteckning",
        "intern anteckning",
        "expedieringsanteckning",
        "chattanteckning",
    ],
);

/// Fields an audit log event can refer to.
pub const AUDIT_SCOPE: ValueList = ValueList::new(
    "audit scope",
    &[
        "ankomstdatum",
        "ansvarig",
        "anteckning",
        "avsändare",
        "beskrivning",
        "beslut",
        "dokumentnummer",
        "dokumentreferens",
        "dokumentstatus",
        "dokumenttitel",
        "expedieringsdatum",
        "fastighet",
        "fil",
        "form",
        "handling",
        "initiativ",
        "klassificering",
        "kommentar",
        "medhandläggare",
        "mottagare",
        "nyckelord",
        "projekt",
        "riktning",
        "sekretess",
        "status",
        "ärende",
        "ärendemening",
        "ärendenummer",
        "ärendepart",
        "ärendereferens",
        "ärendestatus",
    ],
);

pub const AUDIT_ACTION: ValueList =
    ValueList::new("audit action", &["create", "read", "update", "delete"]);

pub const RECORD_TYPE_SVK: ValueList = ValueList::new(
    "record type",
    &[
        "ärendedokument",
        "avtalsdokument",
        "personalaktsdokument",
        "projektdokument",
        "bild",
        "video",
        "fil",
    ],
);

/// Directions as reported by SVK systems; `internal` is written as
/// `other` + `otherDirectionDefinition="internal"`.
pub const DIRECTION_SVK: ValueList =
    ValueList::new("direction", &["incoming", "outgoing", "internal"]);

pub const AGREEMENT_TYPE: ValueList = ValueList::new(
    "agreement type",
    &["avtal", "kontrakt", "licens", "uppgörelse", "överenskommelse"],
);

pub const FILE_VARIANT: ValueList = ValueList::new(
    "file variant",
    &["display", "production", "preservation", "public", "signed"],
);

pub const OBJECT_TYPE: ValueList = ValueList::new("object type", &["project", "realEstate"]);

/// Date types used by SVK cases and documents.
pub const DATE_TYPE_SVK: ValueList = ValueList::new(
    "date type",
    &[
        "closed",
        "created",
        "decision_date",
        "end",
        "finished",
        "expedited",
        "modified",
        "opened",
        "originated",
        "received",
        "sent",
        "start",
    ],
);

/// `otherAgentType` labels the profile defines for agent type `other`.
pub const AGENT_TYPE_EXTENSIONS: ValueList =
    ValueList::new("other agent type", &["closing_person", "delegator"]);

/// `extraIdType` values identifying the archive creator of a case.
pub const ID_TYPE: ValueList = ValueList::new("id type", &["aid", "organisationsnummer"]);

#[cfg(test)]
mod tests {
    use super::*;
    use erms_create::value_lists::{DATE_TYPE, DIRECTION_TYPE, STATUS};

    #[test]
    fn test_svk_statuses_are_core_statuses() {
        for status in STATUS_SVK.values {
            assert!(STATUS.contains(status), "{status} missing from core list");
        }
    }

    #[test]
    fn test_svk_date_types_are_core_date_types() {
        for date_type in DATE_TYPE_SVK.values {
            assert!(DATE_TYPE.contains(date_type), "{date_type} missing from core list");
        }
    }

    #[test]
    fn test_written_directions_are_core_directions() {
        assert!(DIRECTION_TYPE.contains("incoming"));
        assert!(DIRECTION_TYPE.contains("outgoing"));
        assert!(DIRECTION_TYPE.contains("other"));
        assert!(DIRECTION_SVK.contains("internal"));
    }

    #[test]
    fn test_note_types_contain_spaces() {
        assert!(NOTE_TYPE.check("intern anteckning").is_ok());
        assert!(NOTE_TYPE.check("intern").is_err());
    }
}
