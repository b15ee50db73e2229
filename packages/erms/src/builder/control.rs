//! Builder for the document `control` section.

use super::components::{build_date, validate_date, MaintenanceEvent};
use super::store::{DocumentStore, SectionKey, SectionKind, Slot};
use crate::element::QName;
use crate::error::Result;
use crate::ordering::insert_in_schema_order;
use crate::tree::NodeId;
use crate::value_lists::MAINTENANCE_STATUS;

/// Fixed nodes created together with the control section.
#[derive(Debug, Clone)]
pub(crate) struct ControlNodes {
    pub(crate) key: SectionKey,
    pub(crate) classification_schema: NodeId,
    pub(crate) maintenance_status: NodeId,
    pub(crate) maintenance_agency: NodeId,
    pub(crate) agency_code: NodeId,
    pub(crate) maintenance_history: NodeId,
}

impl ControlNodes {
    /// Build `control` with its mandatory children and append it to `root`.
    pub(crate) fn create(store: &mut DocumentStore, root: NodeId) -> Self {
        let tree = &mut store.tree;
        let control = tree.create(QName::erms("control"));
        tree.append_child(root, control);

        let classification_schema = tree.create(QName::erms("classificationSchema"));
        insert_in_schema_order(tree, control, classification_schema);

        let information = tree.create(QName::erms("maintenanceInformation"));
        let maintenance_status = tree.create(QName::erms("maintenanceStatus"));
        let maintenance_agency = tree.create(QName::erms("maintenanceAgency"));
        let agency_code = tree.create(QName::erms("agencyCode"));
        let maintenance_history = tree.create(QName::erms("maintenanceHistory"));
        tree.append_child(information, maintenance_status);
        tree.append_child(information, maintenance_agency);
        tree.append_child(maintenance_agency, agency_code);
        tree.append_child(information, maintenance_history);
        insert_in_schema_order(tree, control, information);

        let key = store.register(SectionKind::Control, control);
        Self {
            key,
            classification_schema,
            maintenance_status,
            maintenance_agency,
            agency_code,
            maintenance_history,
        }
    }
}

/// Builder view over the document's `control` section.
#[derive(Debug)]
pub struct Control<'d> {
    store: &'d mut DocumentStore,
    nodes: &'d ControlNodes,
}

impl<'d> Control<'d> {
    pub(crate) fn new(store: &'d mut DocumentStore, nodes: &'d ControlNodes) -> Self {
        Self { store, nodes }
    }

    /// Node of the `control` element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.store.node(self.nodes.key)
    }

    /// Add an `identification` of the given type.
    pub fn add_identification(&mut self, value: &str, identification_type: &str) -> &mut Self {
        let node = self.store.tree.create_with_attributes(
            QName::erms("identification"),
            [("identificationType", identification_type)],
        );
        self.store.tree.set_text(node, value);
        self.store.insert(self.nodes.key, node);
        self
    }

    /// Check whether any `identification` has been added.
    #[must_use]
    pub fn has_identifications(&self) -> bool {
        self.store
            .tree
            .first_child_by_tag(self.node(), &QName::erms("identification"))
            .is_some()
    }

    pub fn set_information_class(&mut self, value: &str) -> &mut Self {
        self.store
            .set_once_text(self.nodes.key, Slot::InformationClass, value);
        self
    }

    pub fn set_security_class(&mut self, value: &str) -> &mut Self {
        self.store
            .set_once_text(self.nodes.key, Slot::SecurityClass, value);
        self
    }

    /// Describe the classification schema in
    /// `classificationSchema/textualDescriptionOfClassificationSchema/p`.
    ///
    /// Only the first call has an effect.
    pub fn set_classification_schema(&mut self, schema: &str) -> &mut Self {
        let tree = &mut self.store.tree;
        let description = QName::erms("textualDescriptionOfClassificationSchema");
        if tree
            .first_child_by_tag(self.nodes.classification_schema, &description)
            .is_some()
        {
            tracing::debug!("Classification schema already set, ignoring");
            return self;
        }
        let wrapper = tree.create(description);
        let paragraph = tree.create_text(QName::erms("p"), schema);
        tree.append_child(wrapper, paragraph);
        tree.append_child(self.nodes.classification_schema, wrapper);
        self
    }

    /// Text of the classification schema description, if set.
    #[must_use]
    pub fn classification_schema(&self) -> Option<&str> {
        let tree = &self.store.tree;
        let wrapper = tree.first_child_by_tag(
            self.nodes.classification_schema,
            &QName::erms("textualDescriptionOfClassificationSchema"),
        )?;
        let paragraph = tree.first_child_by_tag(wrapper, &QName::erms("p"))?;
        tree.element(paragraph).text()
    }

    /// Add a `date` to the control's `dates` container.
    ///
    /// # Errors
    /// Same as [`crate::Section::add_date`].
    pub fn add_date(
        &mut self,
        date: &str,
        date_type: &str,
        other_date_type: Option<&str>,
    ) -> Result<&mut Self> {
        validate_date(date_type, other_date_type)?;
        let node = build_date(&mut self.store.tree, date, date_type, other_date_type);
        self.store.append_into(self.nodes.key, Slot::Dates, node);
        Ok(self)
    }

    /// Set the `value` of `maintenanceStatus`, replacing any earlier value.
    ///
    /// # Errors
    /// `InvalidControlledValue` if `status` is not a maintenance status.
    pub fn set_maintenance_status(&mut self, status: &str) -> Result<&mut Self> {
        MAINTENANCE_STATUS.check(status)?;
        self.store
            .tree
            .set_attribute(self.nodes.maintenance_status, "value", status);
        Ok(self)
    }

    /// Set text and `type` of `agencyCode`, replacing earlier values.
    pub fn set_agency_code(&mut self, code: &str, code_type: &str) -> &mut Self {
        let tree = &mut self.store.tree;
        tree.set_text(self.nodes.agency_code, code);
        tree.set_attribute(self.nodes.agency_code, "type", code_type);
        self
    }

    /// Add an `otherAgencyCode`. Codes follow `agencyCode` in call order.
    pub fn add_other_agency_code(&mut self, code: &str, code_type: Option<&str>) -> &mut Self {
        let tree = &mut self.store.tree;
        let node = tree.create_text(QName::erms("otherAgencyCode"), code);
        if let Some(kind) = code_type {
            tree.set_attribute(node, "type", kind);
        }
        let anchor = tree
            .last_child_by_tag(self.nodes.maintenance_agency, &QName::erms("otherAgencyCode"))
            .unwrap_or(self.nodes.agency_code);
        if tree.insert_after(anchor, node).is_none() {
            tree.append_child(self.nodes.maintenance_agency, node);
        }
        self
    }

    /// Append an `agencyName`.
    pub fn add_agency_name(&mut self, name: &str) -> &mut Self {
        let tree = &mut self.store.tree;
        let node = tree.create_text(QName::erms("agencyName"), name);
        tree.append_child(self.nodes.maintenance_agency, node);
        self
    }

    /// Append a `maintenanceEvent` to the maintenance history.
    ///
    /// # Errors
    /// See [`MaintenanceEvent::validate`].
    pub fn add_maintenance_event(&mut self, event: &MaintenanceEvent) -> Result<&mut Self> {
        event.validate()?;
        let tree = &mut self.store.tree;
        let node = event.build(tree);
        tree.append_child(self.nodes.maintenance_history, node);
        Ok(self)
    }

    pub fn set_system_information(&mut self, text: &str) -> &mut Self {
        self.store
            .set_once_text(self.nodes.key, Slot::SystemInformation, text);
        self
    }
}
