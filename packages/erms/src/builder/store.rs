//! Shared document state behind the builder handles.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::element::QName;
use crate::ordering::insert_in_schema_order;
use crate::tree::{ElementTree, NodeId};

static NEXT_DOCUMENT: AtomicU64 = AtomicU64::new(1);

pub(crate) fn next_document_serial() -> u64 {
    NEXT_DOCUMENT.fetch_add(1, Ordering::Relaxed)
}

/// Kind of a builder section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Control,
    Aggregation,
    Record,
    Restriction,
}

impl SectionKind {
    /// Local tag of the section element.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Aggregation => "aggregation",
            Self::Record => "record",
            Self::Restriction => "restriction",
        }
    }
}

/// Identifies a section inside one specific document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SectionKey {
    pub(crate) document: u64,
    pub(crate) index: usize,
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "section {} of document {}", self.index, self.document)
    }
}

/// Schema-singleton children and lazily created containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Slot {
    ObjectId,
    InformationClass,
    SecurityClass,
    ParentAggregationId,
    HierarchicalParentClassId,
    MaxLevelsOfAggregation,
    LevelName,
    Keywords,
    Title,
    Status,
    RunningNumber,
    AdditionalInformation,
    Direction,
    Agents,
    Description,
    Dates,
    ArchivalHistory,
    DispatchMode,
    Access,
    PhysicalLocations,
    PhysicalLocation,
    Notes,
    ExplanatoryText,
    Duration,
    SystemInformation,
}

impl Slot {
    pub(crate) fn tag(self) -> &'static str {
        match self {
            Self::ObjectId => "objectId",
            Self::InformationClass => "informationClass",
            Self::SecurityClass => "securityClass",
            Self::ParentAggregationId => "parentAggregationId",
            Self::HierarchicalParentClassId => "hierarchicalParentClassId",
            Self::MaxLevelsOfAggregation => "maxLevelsOfAggregation",
            Self::LevelName => "levelName",
            Self::Keywords => "keywords",
            Self::Title => "title",
            Self::Status => "status",
            Self::RunningNumber => "runningNumber",
            Self::AdditionalInformation => "additionalInformation",
            Self::Direction => "direction",
            Self::Agents => "agents",
            Self::Description => "description",
            Self::Dates => "dates",
            Self::ArchivalHistory => "archivalHistory",
            Self::DispatchMode => "dispatchMode",
            Self::Access => "access",
            Self::PhysicalLocations => "physicalLocations",
            Self::PhysicalLocation => "physicalLocation",
            Self::Notes => "notes",
            Self::ExplanatoryText => "explanatoryText",
            Self::Duration => "duration",
            Self::SystemInformation => "systemInformation",
        }
    }
}

/// Which kind of child content an aggregation holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ContentKind {
    SubAggregations,
    Records,
}

impl ContentKind {
    pub(crate) fn describe(self) -> &'static str {
        match self {
            Self::SubAggregations => "sub-aggregations",
            Self::Records => "records",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct SectionState {
    pub(crate) kind: SectionKind,
    pub(crate) node: NodeId,
    pub(crate) slots: BTreeMap<Slot, NodeId>,
    pub(crate) content: Option<ContentKind>,
}

/// Element tree plus per-section builder state of one document.
///
/// Handles such as [`crate::Aggregation`] borrow the store mutably; the
/// store itself is only reachable through [`crate::Erms`].
#[derive(Debug, Clone)]
pub struct DocumentStore {
    pub(crate) serial: u64,
    pub(crate) tree: ElementTree,
    pub(crate) sections: Vec<SectionState>,
}

impl DocumentStore {
    pub(crate) fn new(tree: ElementTree) -> Self {
        Self {
            serial: next_document_serial(),
            tree,
            sections: Vec::new(),
        }
    }

    /// Read access to the element tree.
    #[must_use]
    pub fn tree(&self) -> &ElementTree {
        &self.tree
    }

    /// Mutable access to the element tree, for extension subtrees that are
    /// appended below builder-owned containers.
    pub fn tree_mut(&mut self) -> &mut ElementTree {
        &mut self.tree
    }

    pub(crate) fn register(&mut self, kind: SectionKind, node: NodeId) -> SectionKey {
        let key = SectionKey {
            document: self.serial,
            index: self.sections.len(),
        };
        self.sections.push(SectionState {
            kind,
            node,
            slots: BTreeMap::new(),
            content: None,
        });
        key
    }

    /// Check that `key` belongs to this document and names a `kind` section.
    pub(crate) fn owns(&self, key: SectionKey, kind: SectionKind) -> bool {
        key.document == self.serial
            && self
                .sections
                .get(key.index)
                .is_some_and(|state| state.kind == kind)
    }

    pub(crate) fn state(&self, key: SectionKey) -> &SectionState {
        &self.sections[key.index]
    }

    pub(crate) fn state_mut(&mut self, key: SectionKey) -> &mut SectionState {
        &mut self.sections[key.index]
    }

    pub(crate) fn node(&self, key: SectionKey) -> NodeId {
        self.state(key).node
    }

    pub(crate) fn slot(&self, key: SectionKey, slot: Slot) -> Option<NodeId> {
        self.state(key).slots.get(&slot).copied()
    }

    /// Build and place a singleton child unless the slot is already filled.
    ///
    /// Returns the new node, or `None` when the slot was taken.
    pub(crate) fn set_once(
        &mut self,
        key: SectionKey,
        slot: Slot,
        build: impl FnOnce(&mut ElementTree) -> NodeId,
    ) -> Option<NodeId> {
        let state = &mut self.sections[key.index];
        if state.slots.contains_key(&slot) {
            debug!(
                section = state.kind.tag(),
                element = slot.tag(),
                "Element already set, ignoring"
            );
            return None;
        }
        let child = build(&mut self.tree);
        insert_in_schema_order(&mut self.tree, state.node, child);
        state.slots.insert(slot, child);
        Some(child)
    }

    /// Set-once leaf whose text is `text`.
    pub(crate) fn set_once_text(&mut self, key: SectionKey, slot: Slot, text: &str) -> Option<NodeId> {
        self.set_once(key, slot, |tree| tree.create_text(QName::erms(slot.tag()), text))
    }

    /// Get or lazily create a composite container in its schema position.
    pub(crate) fn container(&mut self, key: SectionKey, slot: Slot) -> NodeId {
        if let Some(existing) = self.slot(key, slot) {
            return existing;
        }
        let node = self.node(key);
        let container = self.tree.create(QName::erms(slot.tag()));
        insert_in_schema_order(&mut self.tree, node, container);
        self.state_mut(key).slots.insert(slot, container);
        container
    }

    /// Place a repeatable child of the section in its schema position.
    pub(crate) fn insert(&mut self, key: SectionKey, child: NodeId) {
        let node = self.node(key);
        insert_in_schema_order(&mut self.tree, node, child);
    }

    /// Append a child into a lazily created container.
    pub(crate) fn append_into(&mut self, key: SectionKey, slot: Slot, child: NodeId) {
        let container = self.container(key, slot);
        self.tree.append_child(container, child);
    }
}
