//! Builder for `aggregation` sections.

use uuid::Uuid;

use super::components::build_physical_location;
use super::record::Record;
use super::section::{Sealed, Section};
use super::store::{ContentKind, DocumentStore, SectionKey, SectionKind, Slot};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::ordering::insert_in_schema_order;
use crate::tree::NodeId;
use crate::value_lists::{AGGREGATION_TYPE, RECORD_PHYSICAL_OR_DIGITAL};

/// Re-opens an aggregation builder through [`crate::Erms::aggregation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AggregationId(pub(crate) SectionKey);

/// Builder view over one `aggregation` element.
///
/// An aggregation holds either sub-aggregations or records, never both.
#[derive(Debug)]
pub struct Aggregation<'d> {
    store: &'d mut DocumentStore,
    key: SectionKey,
}

impl<'d> Aggregation<'d> {
    /// Validate the type, then create the `aggregation` element and place it
    /// with `place`.
    pub(crate) fn create(
        store: &'d mut DocumentStore,
        aggregation_type: &str,
        place: impl FnOnce(&mut DocumentStore, NodeId),
    ) -> Result<Self> {
        AGGREGATION_TYPE.check(aggregation_type)?;
        let system_identifier = Uuid::new_v4().to_string();
        let node = store.tree.create_with_attributes(
            QName::erms("aggregation"),
            [
                ("systemIdentifier", system_identifier.as_str()),
                ("aggregationType", aggregation_type),
            ],
        );
        place(store, node);
        let key = store.register(SectionKind::Aggregation, node);
        Ok(Self { store, key })
    }

    pub(crate) fn reopen(store: &'d mut DocumentStore, key: SectionKey) -> Self {
        Self { store, key }
    }

    /// Id for re-opening this builder later.
    #[must_use]
    pub fn id(&self) -> AggregationId {
        AggregationId(self.key)
    }

    /// Value of the `aggregationType` attribute.
    #[must_use]
    pub fn aggregation_type(&self) -> Option<&str> {
        self.tree().element(self.node()).attribute("aggregationType")
    }

    pub fn set_hierarchical_parent_class_id(&mut self, value: &str) -> &mut Self {
        self.store
            .set_once_text(self.key, Slot::HierarchicalParentClassId, value);
        self
    }

    pub fn set_max_levels_of_aggregation(&mut self, value: &str) -> &mut Self {
        self.store
            .set_once_text(self.key, Slot::MaxLevelsOfAggregation, value);
        self
    }

    /// Add a `physicalLocation` to the `physicalLocations` container.
    pub fn add_physical_location(&mut self, current: Option<&str>, homes: &[&str]) -> &mut Self {
        let node = build_physical_location(&mut self.store.tree, current, homes);
        self.store
            .append_into(self.key, Slot::PhysicalLocations, node);
        self
    }

    /// Add a nested aggregation.
    ///
    /// # Errors
    /// `InvalidAggregationContent` if this aggregation already holds
    /// records; `InvalidControlledValue` for an unknown type.
    pub fn add_sub_aggregation(&mut self, aggregation_type: &str) -> Result<Aggregation<'_>> {
        self.check_content(ContentKind::SubAggregations)?;
        AGGREGATION_TYPE.check(aggregation_type)?;
        self.store.state_mut(self.key).content = Some(ContentKind::SubAggregations);
        let parent = self.node();
        Aggregation::create(&mut *self.store, aggregation_type, |store, node| {
            insert_in_schema_order(&mut store.tree, parent, node);
        })
    }

    /// Add a record below this aggregation.
    ///
    /// # Errors
    /// `InvalidAggregationContent` if this aggregation already holds
    /// sub-aggregations; `InvalidControlledValue` for an unknown
    /// physical/digital mode.
    pub fn add_record(
        &mut self,
        record_type: Option<&str>,
        physical_or_digital: Option<&str>,
    ) -> Result<Record<'_>> {
        self.check_content(ContentKind::Records)?;
        if let Some(mode) = physical_or_digital {
            RECORD_PHYSICAL_OR_DIGITAL.check(mode)?;
        }
        self.store.state_mut(self.key).content = Some(ContentKind::Records);
        let parent = self.node();
        Record::create(&mut *self.store, record_type, physical_or_digital, |store, node| {
            insert_in_schema_order(&mut store.tree, parent, node);
        })
    }

    fn check_content(&self, wanted: ContentKind) -> Result<()> {
        match self.store.state(self.key).content {
            Some(existing) if existing != wanted => Err(ErmsError::InvalidAggregationContent {
                existing: existing.describe().to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl Sealed for Aggregation<'_> {}

impl Section for Aggregation<'_> {
    fn store(&self) -> &DocumentStore {
        &*self.store
    }

    fn store_mut(&mut self) -> &mut DocumentStore {
        &mut *self.store
    }

    fn key(&self) -> SectionKey {
        self.key
    }
}
