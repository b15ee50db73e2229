//! The ERMS document root.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use super::aggregation::{Aggregation, AggregationId};
use super::control::{Control, ControlNodes};
use super::record::{Record, RecordId};
use super::restriction::{Restriction, RestrictionId};
use super::store::{DocumentStore, SectionKey, SectionKind};
use crate::config::{XSI_NAMESPACE, XSI_PREFIX};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::serialize::{self, SerializeOptions};
use crate::tree::{ElementTree, NodeId};

/// Which collection the document carries below `control`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentMode {
    /// `aggregations` container holding `aggregation` elements.
    #[default]
    Aggregations,
    /// `records` container holding `record` elements.
    Records,
}

impl DocumentMode {
    fn collection_tag(self) -> &'static str {
        match self {
            Self::Aggregations => "aggregations",
            Self::Records => "records",
        }
    }
}

impl fmt::Display for DocumentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection_tag())
    }
}

/// Element counts of a document's collection. The `control` section is
/// not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DocumentStatistics {
    pub aggregations: usize,
    pub records: usize,
    pub agents: usize,
    pub dates: usize,
    /// Top-level aggregations or records holding `additionalXMLData`
    /// anywhere below them.
    pub extended_sections: usize,
}

/// An ERMS document under construction.
///
/// # Examples
/// ```
/// use erms_create::{DocumentMode, Erms, Section, SerializeOptions};
///
/// let mut erms = Erms::new(DocumentMode::Aggregations);
/// let mut case = erms.add_aggregation("caseFile").unwrap();
/// case.set_title("Renovering av kyrktaket").set_object_id("F 2024-0001");
///
/// let xml = erms.to_xml_string(&SerializeOptions::compact()).unwrap();
/// assert!(xml.contains("<objectId>F 2024-0001</objectId><title>"));
/// ```
#[derive(Debug, Clone)]
pub struct Erms {
    store: DocumentStore,
    control: ControlNodes,
    root: NodeId,
    collection: NodeId,
    mode: DocumentMode,
}

impl Erms {
    /// Create a document with `control` and an empty collection.
    #[must_use]
    pub fn new(mode: DocumentMode) -> Self {
        let mut tree = ElementTree::new();
        let root = tree.create(QName::erms("erms"));
        tree.declare_prefix(root, XSI_PREFIX, XSI_NAMESPACE);
        let mut store = DocumentStore::new(tree);

        let control = ControlNodes::create(&mut store, root);
        let collection = store.tree.create(QName::erms(mode.collection_tag()));
        store.tree.append_child(root, collection);

        Self {
            store,
            control,
            root,
            collection,
            mode,
        }
    }

    /// Document mode chosen at construction.
    #[must_use]
    pub fn mode(&self) -> DocumentMode {
        self.mode
    }

    /// Root `erms` node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Read access to the element tree.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        self.store.tree()
    }

    /// Builder for the `control` section.
    pub fn control(&mut self) -> Control<'_> {
        Control::new(&mut self.store, &self.control)
    }

    /// Add an aggregation to the `aggregations` collection.
    ///
    /// # Errors
    /// `InvalidDocumentMode` in records mode; `InvalidControlledValue` for
    /// an unknown aggregation type.
    pub fn add_aggregation(&mut self, aggregation_type: &str) -> Result<Aggregation<'_>> {
        self.require_mode(DocumentMode::Aggregations, "add aggregation")?;
        let collection = self.collection;
        Aggregation::create(&mut self.store, aggregation_type, |store, node| {
            store.tree.append_child(collection, node);
        })
    }

    /// Add a record to the `records` collection.
    ///
    /// # Errors
    /// `InvalidDocumentMode` in aggregations mode; `InvalidControlledValue`
    /// for an unknown physical/digital mode.
    pub fn add_record(
        &mut self,
        record_type: Option<&str>,
        physical_or_digital: Option<&str>,
    ) -> Result<Record<'_>> {
        self.require_mode(DocumentMode::Records, "add record")?;
        let collection = self.collection;
        Record::create(&mut self.store, record_type, physical_or_digital, |store, node| {
            store.tree.append_child(collection, node);
        })
    }

    /// Re-open an aggregation builder.
    ///
    /// # Errors
    /// `UnknownHandle` if the id belongs to another document.
    pub fn aggregation(&mut self, id: AggregationId) -> Result<Aggregation<'_>> {
        let key = self.check_handle(id.0, SectionKind::Aggregation)?;
        Ok(Aggregation::reopen(&mut self.store, key))
    }

    /// Re-open a record builder.
    ///
    /// # Errors
    /// `UnknownHandle` if the id belongs to another document.
    pub fn record(&mut self, id: RecordId) -> Result<Record<'_>> {
        let key = self.check_handle(id.0, SectionKind::Record)?;
        Ok(Record::reopen(&mut self.store, key))
    }

    /// Re-open a restriction builder.
    ///
    /// # Errors
    /// `UnknownHandle` if the id belongs to another document.
    pub fn restriction(&mut self, id: RestrictionId) -> Result<Restriction<'_>> {
        let key = self.check_handle(id.0, SectionKind::Restriction)?;
        Ok(Restriction::reopen(&mut self.store, key))
    }

    /// Ids of the top-level aggregations, in document order.
    #[must_use]
    pub fn aggregation_ids(&self) -> Vec<AggregationId> {
        self.top_level(SectionKind::Aggregation)
            .map(AggregationId)
            .collect()
    }

    /// Ids of the top-level records, in document order.
    #[must_use]
    pub fn record_ids(&self) -> Vec<RecordId> {
        self.top_level(SectionKind::Record).map(RecordId).collect()
    }

    /// Serialize the whole document.
    ///
    /// # Errors
    /// `Serialization` if the writer fails.
    pub fn to_xml_string(&self, options: &SerializeOptions) -> Result<String> {
        serialize::to_xml_string(self.store.tree(), self.root, options)
    }

    /// Serialize the document into `path`.
    ///
    /// # Errors
    /// `FileWrite` carrying the path if the file cannot be written.
    pub fn save_to_file(&self, path: impl AsRef<Path>, options: &SerializeOptions) -> Result<()> {
        serialize::save_to_file(self.store.tree(), self.root, path.as_ref(), options)
    }

    /// Count aggregations, records, agents and dates below the collection,
    /// and the top-level sections that carry extension data.
    #[must_use]
    pub fn statistics(&self) -> DocumentStatistics {
        let tree = self.store.tree();
        let count = |local: &str| tree.count_descendants(self.collection, &QName::erms(local));
        let extension = QName::erms("additionalXMLData");
        let extended_sections = tree
            .children(self.collection)
            .iter()
            .filter(|section| tree.count_descendants(**section, &extension) > 0)
            .count();
        DocumentStatistics {
            aggregations: count("aggregation"),
            records: count("record"),
            agents: count("agent"),
            dates: count("date"),
            extended_sections,
        }
    }

    fn require_mode(&self, wanted: DocumentMode, operation: &str) -> Result<()> {
        if self.mode == wanted {
            Ok(())
        } else {
            Err(ErmsError::InvalidDocumentMode {
                operation: operation.to_string(),
                mode: self.mode,
            })
        }
    }

    fn check_handle(&self, key: SectionKey, kind: SectionKind) -> Result<SectionKey> {
        if self.store.owns(key, kind) {
            Ok(key)
        } else {
            Err(ErmsError::UnknownHandle(format!("{} {key}", kind.tag())))
        }
    }

    fn top_level(&self, kind: SectionKind) -> impl Iterator<Item = SectionKey> + '_ {
        self.store
            .sections
            .iter()
            .enumerate()
            .filter(move |(_, state)| {
                state.kind == kind
                    && self.store.tree.element(state.node).parent() == Some(self.collection)
            })
            .map(|(index, _)| SectionKey {
                document: self.store.serial,
                index,
            })
    }
}

impl Default for Erms {
    fn default() -> Self {
        Self::new(DocumentMode::default())
    }
}
