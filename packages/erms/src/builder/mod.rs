//! Section builders.
//!
//! [`Erms`] owns the document. Section builders ([`Control`],
//! [`Aggregation`], [`Record`], [`Restriction`]) are short-lived views that
//! borrow it mutably; their ids re-open them later.

mod aggregation;
mod components;
mod control;
mod document;
mod record;
mod restriction;
mod section;
mod store;

pub use aggregation::{Aggregation, AggregationId};
pub use components::{build_date, validate_date, AgentSpec, ClassificationSpec, MaintenanceEvent};
pub use control::Control;
pub use document::{DocumentMode, DocumentStatistics, Erms};
pub use record::{Record, RecordId};
pub use restriction::{Restriction, RestrictionId, RestrictionSpec};
pub use section::Section;
pub use store::{DocumentStore, SectionKey, SectionKind};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::QName;
    use crate::error::ErmsError;
    use crate::serialize::SerializeOptions;
    use crate::tree::{ElementTree, NodeId};
    use pretty_assertions::assert_eq;

    fn names(tree: &ElementTree, node: NodeId) -> Vec<String> {
        tree.children(node)
            .iter()
            .map(|c| tree.element(*c).name().local_name().to_string())
            .collect()
    }

    #[test]
    fn test_new_document_layout() {
        let erms = Erms::new(DocumentMode::Aggregations);
        let tree = erms.tree();
        assert_eq!(names(tree, erms.root()), vec!["control", "aggregations"]);
        let control = tree.children(erms.root())[0];
        assert_eq!(
            names(tree, control),
            vec!["classificationSchema", "maintenanceInformation"]
        );
        let info = tree.children(control)[1];
        assert_eq!(
            names(tree, info),
            vec!["maintenanceStatus", "maintenanceAgency", "maintenanceHistory"]
        );
    }

    #[test]
    fn test_mode_exclusivity() {
        let mut aggregations = Erms::new(DocumentMode::Aggregations);
        assert!(matches!(
            aggregations.add_record(None, None),
            Err(ErmsError::InvalidDocumentMode { .. })
        ));

        let mut records = Erms::new(DocumentMode::Records);
        assert!(matches!(
            records.add_aggregation("caseFile"),
            Err(ErmsError::InvalidDocumentMode { .. })
        ));
        assert!(records.add_record(Some("letter"), Some("digital")).is_ok());
        assert_eq!(records.statistics().records, 1);
    }

    #[test]
    fn test_set_once_first_write_wins() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.set_title("First").set_title("Second");
        case.set_status("open").unwrap().set_status("closed").unwrap();

        let node = case.node();
        let tree = case.tree();
        let titles: Vec<NodeId> = tree.children_by_tag(node, &QName::erms("title")).collect();
        assert_eq!(titles.len(), 1);
        assert_eq!(tree.element(titles[0]).text(), Some("First"));
        assert_eq!(case.status(), Some("open"));
    }

    #[test]
    fn test_invalid_value_leaves_tree_unchanged() {
        let mut erms = Erms::default();
        let before = erms.tree().len();
        assert!(erms.add_aggregation("folder").is_err());
        assert_eq!(erms.tree().len(), before);

        let mut case = erms.add_aggregation("caseFile").unwrap();
        let before = case.tree().len();
        assert!(case.set_status("finished").is_err());
        assert!(case.add_date("2024-01-01", "someday", None).is_err());
        assert!(case.add_agent(&AgentSpec::new("other", "X")).is_err());
        assert_eq!(case.tree().len(), before);
        assert!(case.tree().children(case.node()).is_empty());
    }

    #[test]
    fn test_own_relation_definition_needs_label() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        let before = case.tree().len();

        for other in [None, Some(""), Some("   ")] {
            let err = case
                .add_relation("F 2023-0101", "own_relation_definition", other)
                .unwrap_err();
            assert!(matches!(
                err,
                ErmsError::MissingRequiredField { ref field, .. } if field == "otherRelationType"
            ));
        }
        assert_eq!(case.tree().len(), before);
        assert!(case.tree().children(case.node()).is_empty());

        case.add_relation("F 2023-0101", "own_relation_definition", Some("föregående"))
            .unwrap();
        let relation = case.tree().children(case.node())[0];
        assert_eq!(
            case.tree().element(relation).attribute("otherRelationType"),
            Some("föregående")
        );
    }

    #[test]
    fn test_builder_calls_in_any_order() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.add_note("Note", Some("intern"), None);
        case.add_date("2024-02-01T00:00:00", "closed", None).unwrap();
        case.add_agent(&AgentSpec::new("creator", "Anna")).unwrap();
        case.set_description("Beskrivning");
        case.set_status("closed").unwrap();
        case.add_subject("Tak");
        case.set_title("Takrenovering");
        case.add_keyword("tak").add_keyword("renovering");
        case.add_classification(&ClassificationSpec::new("Fastigheter").with_code("3.1"));
        case.set_object_id("F 2024-0001");
        case.add_date("2024-01-01T00:00:00", "opened", None).unwrap();

        assert_eq!(
            names(case.tree(), case.node()),
            vec![
                "objectId",
                "classification",
                "keywords",
                "title",
                "subject",
                "status",
                "agents",
                "description",
                "dates",
                "notes",
            ]
        );
        let dates = case
            .tree()
            .first_child_by_tag(case.node(), &QName::erms("dates"))
            .unwrap();
        let kinds: Vec<&str> = case
            .tree()
            .children(dates)
            .iter()
            .filter_map(|d| case.tree().element(*d).attribute("dateType"))
            .collect();
        assert_eq!(kinds, vec!["closed", "opened"]);
    }

    #[test]
    fn test_aggregation_content_exclusive() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.add_record(None, None).unwrap();
        let err = case.add_sub_aggregation("subfile").unwrap_err();
        assert!(matches!(err, ErmsError::InvalidAggregationContent { ref existing } if existing == "records"));

        let mut class = erms.add_aggregation("class").unwrap();
        class.add_sub_aggregation("caseFile").unwrap();
        assert!(class.add_record(None, None).is_err());
    }

    #[test]
    fn test_record_children_follow_aggregation_fields() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.add_record(Some("ärendedokument"), None).unwrap();
        case.set_title("Ärende");
        let node = case.node();
        assert_eq!(names(case.tree(), node), vec!["title", "record"]);
        let record = case.tree().children(node)[1];
        assert!(case.tree().element(record).attribute("systemIdentifier").is_some());
    }

    #[test]
    fn test_reopen_handles() {
        let mut erms = Erms::default();
        let case_id = erms.add_aggregation("caseFile").unwrap().id();
        let record_id = {
            let mut case = erms.aggregation(case_id).unwrap();
            case.set_title("Reopened");
            let mut record = case.add_record(None, Some("physical")).unwrap();
            record.set_running_number(3);
            record.id()
        };
        erms.record(record_id).unwrap().set_title("Dokument");

        let mut other = Erms::default();
        assert!(matches!(
            other.aggregation(case_id),
            Err(ErmsError::UnknownHandle(_))
        ));
        assert_eq!(erms.aggregation_ids(), vec![case_id]);
        assert!(erms.record_ids().is_empty());
    }

    #[test]
    fn test_restriction_layout() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.set_title("T");
        let restriction_id = {
            let mut restriction = case
                .add_restriction(&RestrictionSpec::new("confidential", "OSL 21:1"))
                .unwrap();
            restriction.set_duration("70 år");
            restriction.add_date("2024-01-01", "start", None).unwrap();
            restriction.set_explanatory_text("Personuppgifter");
            restriction.id()
        };
        case.set_object_id("X");
        assert_eq!(names(case.tree(), case.node()), vec!["objectId", "title", "restriction"]);

        let restriction = erms.restriction(restriction_id).unwrap();
        let node = restriction.node();
        assert_eq!(
            names(erms.tree(), node),
            vec!["explanatoryText", "regulation", "dates", "duration"]
        );
    }

    #[test]
    fn test_control_builder() {
        let mut erms = Erms::default();
        let mut control = erms.control();
        assert!(!control.has_identifications());
        control
            .set_system_information("erms-svk-arende")
            .add_identification("Sunne pastorat", "arkivbildare")
            .set_classification_schema("KlaSL2016_1.0")
            .set_classification_schema("ignored")
            .set_agency_code("252002-8553", "organisationsnummer")
            .add_agency_name("Svenska kyrkan")
            .add_other_agency_code("A", None)
            .add_other_agency_code("B", Some("local"));
        control.set_maintenance_status("new").unwrap();
        control
            .add_maintenance_event(&MaintenanceEvent::new(
                "created",
                "2024-01-01T10:00:00",
                AgentSpec::new("deliverer", "erms-svk-arende"),
            ))
            .unwrap();
        control.add_date("2024-01-01", "created", None).unwrap();
        assert!(control.has_identifications());
        assert_eq!(control.classification_schema(), Some("KlaSL2016_1.0"));
        assert!(control.set_maintenance_status("bogus").is_err());

        let control_node = control.node();
        let tree = erms.tree();
        assert_eq!(
            names(tree, control_node),
            vec![
                "identification",
                "classificationSchema",
                "dates",
                "maintenanceInformation",
                "systemInformation",
            ]
        );
        let agency = tree.children(tree.children(control_node)[3])[1];
        assert_eq!(
            names(tree, agency),
            vec!["agencyCode", "otherAgencyCode", "otherAgencyCode", "agencyName"]
        );
        let first_other = tree.children(agency)[1];
        assert_eq!(tree.element(first_other).text(), Some("A"));

        let xml = erms.to_xml_string(&SerializeOptions::compact()).unwrap();
        assert!(xml.contains(r#"<maintenanceStatus value="new"/>"#));
    }

    #[test]
    fn test_record_direction_and_location() {
        let mut erms = Erms::new(DocumentMode::Records);
        let mut record = erms.add_record(None, None).unwrap();
        assert!(matches!(
            record.set_direction("other", None),
            Err(ErmsError::MissingRequiredField { .. })
        ));
        record.set_direction("other", Some("internal")).unwrap();
        record.set_physical_location(Some("Hylla 1"), &["Arkiv"]);
        record.set_physical_location(Some("Hylla 2"), &[]);
        record.set_title("Brev");
        let node = record.node();
        assert_eq!(
            names(record.tree(), node),
            vec!["title", "direction", "physicalLocation"]
        );
    }

    #[test]
    fn test_statistics_counts() {
        let mut erms = Erms::default();
        let mut case = erms.add_aggregation("caseFile").unwrap();
        case.add_agent(&AgentSpec::new("creator", "A")).unwrap();
        case.add_date("2024-01-01", "opened", None).unwrap();
        let mut record = case.add_record(None, None).unwrap();
        record.add_date("2024-01-02", "created", None).unwrap();

        assert_eq!(
            erms.statistics(),
            DocumentStatistics {
                aggregations: 1,
                records: 1,
                agents: 1,
                dates: 2,
                extended_sections: 0,
            }
        );
    }

    #[test]
    fn test_statistics_skip_control() {
        let mut erms = Erms::default();
        let mut control = erms.control();
        control
            .add_maintenance_event(&MaintenanceEvent::new(
                "created",
                "2024-01-01T00:00:00",
                AgentSpec::new("deliverer", "Leverantör"),
            ))
            .unwrap();
        control.add_date("2024-01-01", "created", None).unwrap();

        let mut case = erms.add_aggregation("caseFile").unwrap();
        for _ in 0..2 {
            let mut record = case.add_record(None, None).unwrap();
            let info = record.additional_information();
            let tree = record.tree_mut();
            let data = tree.create(QName::erms("additionalXMLData"));
            tree.append_child(info, data);
        }
        erms.add_aggregation("caseFile").unwrap();

        let stats = erms.statistics();
        assert_eq!(stats.agents, 0);
        assert_eq!(stats.dates, 0);
        assert_eq!(stats.aggregations, 2);
        assert_eq!(stats.records, 2);
        assert_eq!(stats.extended_sections, 1);
    }
}
