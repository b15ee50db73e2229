//! Builder surface shared by aggregations and records.

use super::components::{build_date, is_blank, validate_date, AgentSpec, ClassificationSpec};
use super::restriction::{Restriction, RestrictionSpec};
use super::store::{DocumentStore, SectionKey, Slot};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::tree::{ElementTree, NodeId};
use crate::value_lists::{RELATION_TYPE, STATUS};

mod sealed {
    pub trait Sealed {}
}

pub(crate) use sealed::Sealed;

/// Methods common to the `aggregation` and `record` builders.
///
/// Set-once methods keep the first value and ignore later calls.
/// Repeatable methods always add a new element. Every child is placed
/// at its schema position regardless of call order.
pub trait Section: Sealed {
    #[doc(hidden)]
    fn store(&self) -> &DocumentStore;

    #[doc(hidden)]
    fn store_mut(&mut self) -> &mut DocumentStore;

    #[doc(hidden)]
    fn key(&self) -> SectionKey;

    /// Node of the section element.
    fn node(&self) -> NodeId {
        self.store().node(self.key())
    }

    /// Read access to the document tree.
    fn tree(&self) -> &ElementTree {
        self.store().tree()
    }

    /// Mutable access to the document tree, for extension subtrees.
    fn tree_mut(&mut self) -> &mut ElementTree {
        self.store_mut().tree_mut()
    }

    /// Value of the `systemIdentifier` attribute.
    fn system_identifier(&self) -> Option<&str> {
        self.tree().element(self.node()).attribute("systemIdentifier")
    }

    /// Text of the object id, if set.
    fn object_id(&self) -> Option<&str> {
        let node = self.store().slot(self.key(), Slot::ObjectId)?;
        self.tree().element(node).text()
    }

    /// Value of the status, if set.
    fn status(&self) -> Option<&str> {
        let node = self.store().slot(self.key(), Slot::Status)?;
        self.tree().element(node).attribute("value")
    }

    /// Set the `objectId`. Set-once.
    ///
    /// # Arguments
    /// * `object_id` - Identifier of the section, e.g. a case or document number
    fn set_object_id(&mut self, object_id: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::ObjectId, object_id);
        self
    }

    /// Add an `extraId` carrying `extraIdType`.
    ///
    /// # Arguments
    /// * `value` - Identifier text
    /// * `extra_id_type` - Free-form label written as `extraIdType`
    fn add_extra_id(&mut self, value: &str, extra_id_type: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store.tree.create_with_attributes(
            QName::erms("extraId"),
            [("extraIdType", extra_id_type)],
        );
        store.tree.set_text(node, value);
        store.insert(key, node);
        self
    }

    /// Set the `informationClass`. Set-once.
    fn set_information_class(&mut self, value: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::InformationClass, value);
        self
    }

    fn set_security_class(&mut self, value: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::SecurityClass, value);
        self
    }

    /// Add an `identification` with its `identificationType`.
    fn add_identification(&mut self, value: &str, identification_type: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store.tree.create_with_attributes(
            QName::erms("identification"),
            [("identificationType", identification_type)],
        );
        store.tree.set_text(node, value);
        store.insert(key, node);
        self
    }

    /// Add a `classification` built from `classification`.
    fn add_classification(&mut self, classification: &ClassificationSpec) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = classification.build(&mut store.tree);
        store.insert(key, node);
        self
    }

    fn set_parent_aggregation_id(&mut self, value: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::ParentAggregationId, value);
        self
    }

    fn set_level_name(&mut self, value: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::LevelName, value);
        self
    }

    /// Add a `keyword` to the `keywords` container.
    fn add_keyword(&mut self, keyword: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store.tree.create_text(QName::erms("keyword"), keyword);
        store.append_into(key, Slot::Keywords, node);
        self
    }

    /// Set the `title`. Set-once.
    ///
    /// # Arguments
    /// * `title` - Title text
    ///
    /// # Returns
    /// The builder, for chaining
    fn set_title(&mut self, title: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::Title, title);
        self
    }

    /// Add an `otherTitle`. Repeatable.
    fn add_other_title(&mut self, title: &str, title_type: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store
            .tree
            .create_with_attributes(QName::erms("otherTitle"), [("titleType", title_type)]);
        store.tree.set_text(node, title);
        store.insert(key, node);
        self
    }

    fn add_subject(&mut self, subject: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store.tree.create_text(QName::erms("subject"), subject);
        store.insert(key, node);
        self
    }

    /// Set the `status` (written as its `value` attribute).
    ///
    /// # Errors
    /// `InvalidControlledValue` if `status` is not in the status list.
    fn set_status(&mut self, status: &str) -> Result<&mut Self> {
        STATUS.check(status)?;
        let key = self.key();
        self.store_mut().set_once(key, Slot::Status, |tree| {
            tree.create_with_attributes(QName::erms("status"), [("value", status)])
        });
        Ok(self)
    }

    /// Add a `relation`.
    ///
    /// # Errors
    /// `InvalidControlledValue` for an unknown relation type;
    /// `MissingRequiredField` for `own_relation_definition` without a
    /// non-blank `other_type`.
    fn add_relation(
        &mut self,
        text: &str,
        relation_type: &str,
        other_type: Option<&str>,
    ) -> Result<&mut Self> {
        RELATION_TYPE.check(relation_type)?;
        if relation_type == "own_relation_definition" && is_blank(other_type) {
            return Err(ErmsError::missing(
                "otherRelationType",
                "relationType is 'own_relation_definition'",
            ));
        }
        let key = self.key();
        let store = self.store_mut();
        let mut attributes = vec![("relationType", relation_type)];
        if let Some(other) = other_type {
            attributes.push(("otherRelationType", other));
        }
        let node = store
            .tree
            .create_with_attributes(QName::erms("relation"), attributes);
        store.tree.set_text(node, text);
        store.insert(key, node);
        Ok(self)
    }

    /// Add a `restriction` and return its builder.
    ///
    /// # Errors
    /// See [`RestrictionSpec::validate`].
    fn add_restriction(&mut self, spec: &RestrictionSpec) -> Result<Restriction<'_>> {
        spec.validate()?;
        let key = self.key();
        Ok(Restriction::attach(self.store_mut(), key, spec))
    }

    /// Add an `agent` to the `agents` container.
    ///
    /// # Errors
    /// See [`AgentSpec::validate`].
    fn add_agent(&mut self, agent: &AgentSpec) -> Result<&mut Self> {
        agent.validate()?;
        let key = self.key();
        let store = self.store_mut();
        let node = agent.build(&mut store.tree);
        store.append_into(key, Slot::Agents, node);
        Ok(self)
    }

    /// Set the `description`. Set-once.
    fn set_description(&mut self, description: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::Description, description);
        self
    }

    /// Add a `date` to the `dates` container.
    ///
    /// # Errors
    /// `InvalidControlledValue` for an unknown date type;
    /// `MissingRequiredField` for `other` without `other_date_type`.
    fn add_date(
        &mut self,
        date: &str,
        date_type: &str,
        other_date_type: Option<&str>,
    ) -> Result<&mut Self> {
        validate_date(date_type, other_date_type)?;
        let key = self.key();
        let store = self.store_mut();
        let node = build_date(&mut store.tree, date, date_type, other_date_type);
        store.append_into(key, Slot::Dates, node);
        Ok(self)
    }

    /// Add a `historyLine` to the `archivalHistory` container.
    fn add_history_line(&mut self, line: &str) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let node = store.tree.create_text(QName::erms("historyLine"), line);
        store.append_into(key, Slot::ArchivalHistory, node);
        self
    }

    /// Set the `dispatchMode`. Set-once.
    fn set_dispatch_mode(&mut self, mode: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::DispatchMode, mode);
        self
    }

    fn set_access(&mut self, access: &str) -> &mut Self {
        let key = self.key();
        self.store_mut().set_once_text(key, Slot::Access, access);
        self
    }

    /// Add a `note` to the `notes` container.
    fn add_note(&mut self, text: &str, note_type: Option<&str>, note_date: Option<&str>) -> &mut Self {
        let key = self.key();
        let store = self.store_mut();
        let mut attributes = Vec::new();
        if let Some(kind) = note_type {
            attributes.push(("noteType", kind));
        }
        if let Some(date) = note_date {
            attributes.push(("noteDate", date));
        }
        let node = store.tree.create_with_attributes(QName::erms("note"), attributes);
        store.tree.set_text(node, text);
        store.append_into(key, Slot::Notes, node);
        self
    }

    /// Get or create the `additionalInformation` container.
    ///
    /// Extension profiles attach their own subtrees below it.
    fn additional_information(&mut self) -> NodeId {
        let key = self.key();
        self.store_mut().container(key, Slot::AdditionalInformation)
    }
}
