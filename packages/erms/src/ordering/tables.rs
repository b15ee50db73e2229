//! Schema order tables and the registry that maps container tags to them.

use std::collections::HashMap;

use crate::element::QName;

/// Child order of `control`.
pub const CONTROL_ORDER: &[&str] = &[
    "identification",
    "informationClass",
    "classificationSchema",
    "securityClass",
    "dates",
    "maintenanceInformation",
    "systemInformation",
];

/// Child order of `aggregation`.
pub const AGGREGATION_ORDER: &[&str] = &[
    "objectId",
    "extraId",
    "informationClass",
    "securityClass",
    "identification",
    "classification",
    "parentAggregationId",
    "hierarchicalParentClassId",
    "maxLevelsOfAggregation",
    "levelName",
    "keywords",
    "title",
    "otherTitle",
    "subject",
    "status",
    "relation",
    "additionalInformation",
    "restriction",
    "IPPInformation",
    "loan",
    "disposal",
    "agents",
    "description",
    "dates",
    "action",
    "archivalHistory",
    "dispatchMode",
    "access",
    "physicalLocations",
    "notes",
    "eSignatures",
    "aggregation",
    "record",
];

/// Child order of `record`.
pub const RECORD_ORDER: &[&str] = &[
    "objectId",
    "extraId",
    "informationClass",
    "securityClass",
    "identification",
    "classification",
    "parentAggregationId",
    "levelName",
    "keywords",
    "title",
    "otherTitle",
    "subject",
    "status",
    "runningNumber",
    "relation",
    "restriction",
    "IPPInformation",
    "loan",
    "disposal",
    "direction",
    "agents",
    "description",
    "dates",
    "action",
    "archivalHistory",
    "dispatchMode",
    "access",
    "physicalLocation",
    "notes",
    "eSignatures",
    "additionalInformation",
];

/// Child order of `restriction`.
pub const RESTRICTION_ORDER: &[&str] = &[
    "explanatoryText",
    "regulation",
    "informationClass",
    "securityClass",
    "dates",
    "duration",
];

/// Registry mapping container tags to their schema order tables.
///
/// Tables hold local names; a child matches a table entry only when it also
/// shares the container's namespace.
#[derive(Debug, Clone)]
pub struct SchemaOrderRegistry {
    tables: HashMap<QName, &'static [&'static str]>,
}

impl SchemaOrderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Register the order table for a container tag.
    pub fn register(&mut self, container: QName, table: &'static [&'static str]) {
        self.tables.insert(container, table);
    }

    /// Order table for a container, if one is registered.
    #[must_use]
    pub fn table_for(&self, container: &QName) -> Option<&'static [&'static str]> {
        self.tables.get(container).copied()
    }

    /// Check whether a container has a table.
    #[must_use]
    pub fn has_table(&self, container: &QName) -> bool {
        self.tables.contains_key(container)
    }

    /// All container tags with a table.
    #[must_use]
    pub fn registered_containers(&self) -> Vec<&QName> {
        let mut names: Vec<&QName> = self.tables.keys().collect();
        names.sort();
        names
    }
}

impl Default for SchemaOrderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create the registry for the four ERMS table-bearing containers.
#[must_use]
pub fn create_erms_registry() -> SchemaOrderRegistry {
    let mut registry = SchemaOrderRegistry::new();
    registry.register(QName::erms("control"), CONTROL_ORDER);
    registry.register(QName::erms("aggregation"), AGGREGATION_ORDER);
    registry.register(QName::erms("record"), RECORD_ORDER);
    registry.register(QName::erms("restriction"), RESTRICTION_ORDER);
    registry
}
