//! Builder for `restriction` sections.

use super::components::{build_date, validate_date};
use super::store::{DocumentStore, SectionKey, SectionKind, Slot};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::tree::NodeId;
use crate::value_lists::RESTRICTION_TYPE;

/// Parameters for a new restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionSpec {
    pub restriction_type: String,
    pub other_restriction_type: Option<String>,
    pub regulation: String,
}

impl RestrictionSpec {
    /// A restriction of a listed type based on `regulation`.
    #[must_use]
    pub fn new(restriction_type: impl Into<String>, regulation: impl Into<String>) -> Self {
        Self {
            restriction_type: restriction_type.into(),
            other_restriction_type: None,
            regulation: regulation.into(),
        }
    }

    /// A restriction of type `other_type` with a custom label.
    #[must_use]
    pub fn other(label: impl Into<String>, regulation: impl Into<String>) -> Self {
        Self {
            restriction_type: "other_type".to_string(),
            other_restriction_type: Some(label.into()),
            regulation: regulation.into(),
        }
    }

    /// # Errors
    /// `InvalidControlledValue` for an unknown restriction type;
    /// `MissingRequiredField` for `other_type` without a label.
    pub fn validate(&self) -> Result<()> {
        RESTRICTION_TYPE.check(&self.restriction_type)?;
        if self.restriction_type == "other_type" && self.other_restriction_type.is_none() {
            return Err(ErmsError::missing(
                "otherRestrictionType",
                "restrictionType is 'other_type'",
            ));
        }
        Ok(())
    }
}

/// Re-opens a restriction builder through [`crate::Erms::restriction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RestrictionId(pub(crate) SectionKey);

/// Builder view over one `restriction` element.
#[derive(Debug)]
pub struct Restriction<'d> {
    store: &'d mut DocumentStore,
    key: SectionKey,
}

impl<'d> Restriction<'d> {
    /// Create the restriction and place it under the owning section.
    pub(crate) fn attach(
        store: &'d mut DocumentStore,
        owner: SectionKey,
        spec: &RestrictionSpec,
    ) -> Self {
        let mut attributes = vec![("restrictionType", spec.restriction_type.as_str())];
        if let Some(other) = spec.other_restriction_type.as_deref() {
            attributes.push(("otherRestrictionType", other));
        }
        let node = store
            .tree
            .create_with_attributes(QName::erms("restriction"), attributes);
        store.insert(owner, node);

        let key = store.register(SectionKind::Restriction, node);
        let regulation = store
            .tree
            .create_text(QName::erms("regulation"), &spec.regulation);
        store.insert(key, regulation);
        Self { store, key }
    }

    pub(crate) fn reopen(store: &'d mut DocumentStore, key: SectionKey) -> Self {
        Self { store, key }
    }

    /// Id for re-opening this builder later.
    #[must_use]
    pub fn id(&self) -> RestrictionId {
        RestrictionId(self.key)
    }

    /// Node of the `restriction` element.
    #[must_use]
    pub fn node(&self) -> NodeId {
        self.store.node(self.key)
    }

    pub fn set_explanatory_text(&mut self, text: &str) -> &mut Self {
        self.store.set_once_text(self.key, Slot::ExplanatoryText, text);
        self
    }

    pub fn set_information_class(&mut self, value: &str) -> &mut Self {
        self.store.set_once_text(self.key, Slot::InformationClass, value);
        self
    }

    pub fn set_security_class(&mut self, value: &str) -> &mut Self {
        self.store.set_once_text(self.key, Slot::SecurityClass, value);
        self
    }

    pub fn set_duration(&mut self, duration: &str) -> &mut Self {
        self.store.set_once_text(self.key, Slot::Duration, duration);
        self
    }

    /// Add a `date` to the restriction's `dates` container.
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
        self.store.append_into(self.key, Slot::Dates, node);
        Ok(self)
    }
}
