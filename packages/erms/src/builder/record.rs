//! Builder for `record` sections.

use uuid::Uuid;

use super::components::build_physical_location;
use super::section::{Sealed, Section};
use super::store::{DocumentStore, SectionKey, SectionKind, Slot};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::tree::NodeId;
use crate::value_lists::{DIRECTION_TYPE, RECORD_PHYSICAL_OR_DIGITAL};

/// Re-opens a record builder through [`crate::Erms::record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId(pub(crate) SectionKey);

/// Builder view over one `record` element.
#[derive(Debug)]
pub struct Record<'d> {
    store: &'d mut DocumentStore,
    key: SectionKey,
}

impl<'d> Record<'d> {
    /// Validate constructor arguments, then create the `record` element and
    /// place it under `parent` with `place`.
    pub(crate) fn create(
        store: &'d mut DocumentStore,
        record_type: Option<&str>,
        physical_or_digital: Option<&str>,
        place: impl FnOnce(&mut DocumentStore, NodeId),
    ) -> Result<Self> {
        if let Some(mode) = physical_or_digital {
            RECORD_PHYSICAL_OR_DIGITAL.check(mode)?;
        }
        let system_identifier = Uuid::new_v4().to_string();
        let mut attributes = vec![("systemIdentifier", system_identifier.as_str())];
        if let Some(kind) = record_type {
            attributes.push(("recordType", kind));
        }
        if let Some(mode) = physical_or_digital {
            attributes.push(("recordPhysicalOrDigital", mode));
        }
        let node = store
            .tree
            .create_with_attributes(QName::erms("record"), attributes);
        place(store, node);
        let key = store.register(SectionKind::Record, node);
        Ok(Self { store, key })
    }

    pub(crate) fn reopen(store: &'d mut DocumentStore, key: SectionKey) -> Self {
        Self { store, key }
    }

    /// Id for re-opening this builder later.
    #[must_use]
    pub fn id(&self) -> RecordId {
        RecordId(self.key)
    }

    /// Value of the `recordType` attribute.
    #[must_use]
    pub fn record_type(&self) -> Option<&str> {
        self.tree().element(self.node()).attribute("recordType")
    }

    pub fn set_running_number(&mut self, number: u32) -> &mut Self {
        self.store
            .set_once_text(self.key, Slot::RunningNumber, &number.to_string());
        self
    }

    /// Set the record's `direction`.
    ///
    /// # Errors
    /// `InvalidControlledValue` for an unknown direction;
    /// `MissingRequiredField` for `other` without `other_direction`.
    pub fn set_direction(&mut self, direction: &str, other_direction: Option<&str>) -> Result<&mut Self> {
        DIRECTION_TYPE.check(direction)?;
        if direction == "other" && other_direction.is_none() {
            return Err(ErmsError::missing(
                "otherDirectionDefinition",
                "directionDefinition is 'other'",
            ));
        }
        self.store.set_once(self.key, Slot::Direction, |tree| {
            let mut attributes = vec![("directionDefinition", direction)];
            if let Some(other) = other_direction {
                attributes.push(("otherDirectionDefinition", other));
            }
            tree.create_with_attributes(QName::erms("direction"), attributes)
        });
        Ok(self)
    }

    /// Set the single `physicalLocation` of the record.
    pub fn set_physical_location(&mut self, current: Option<&str>, homes: &[&str]) -> &mut Self {
        self.store.set_once(self.key, Slot::PhysicalLocation, |tree| {
            build_physical_location(tree, current, homes)
        });
        self
    }
}

impl Sealed for Record<'_> {}

impl Section for Record<'_> {
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
