//! Element nodes and qualified names.

use std::fmt;

use crate::config::ERMS_NAMESPACE;
use crate::tree::NodeId;

/// A namespace-qualified tag name.
///
/// Two names are equal only when both the namespace and the local part
/// match, so `{ERMS}objectId` and `{SVK}objectId` are different tags.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    namespace: Option<&'static str>,
    local: String,
}

impl QName {
    /// Create a name in the given namespace.
    #[must_use]
    pub fn new(namespace: &'static str, local: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace),
            local: local.into(),
        }
    }

    /// Create a name in the ERMS namespace.
    ///
    /// # Examples
    /// ```
    /// use erms_create::QName;
    ///
    /// let title = QName::erms("title");
    /// assert_eq!(title.local_name(), "title");
    /// assert_eq!(title.namespace(), Some("https://DILCIS.eu/XML/ERMS"));
    /// ```
    #[must_use]
    pub fn erms(local: impl Into<String>) -> Self {
        Self::new(ERMS_NAMESPACE, local)
    }

    /// Create a name without a namespace.
    #[must_use]
    pub fn unqualified(local: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local: local.into(),
        }
    }

    /// Namespace URI, if any.
    #[must_use]
    pub fn namespace(&self) -> Option<&'static str> {
        self.namespace
    }

    /// Local part of the name.
    #[must_use]
    pub fn local_name(&self) -> &str {
        &self.local
    }

    /// Build a sibling name sharing this name's namespace.
    #[must_use]
    pub fn sibling(&self, local: &str) -> Self {
        Self {
            namespace: self.namespace,
            local: local.to_string(),
        }
    }
}

/// Clark notation, `{namespace}local`.
impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// A single node of the element tree.
///
/// Nodes are owned by an [`crate::ElementTree`] and refer to their parent
/// and children by [`NodeId`].
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) name: QName,
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) text: Option<String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) prefixes: Vec<(&'static str, &'static str)>,
}

impl Element {
    pub(crate) fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            parent: None,
            prefixes: Vec::new(),
        }
    }

    /// Qualified tag of this element.
    #[must_use]
    pub fn name(&self) -> &QName {
        &self.name
    }

    /// Attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Text content, if set.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Child ids in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent id, `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Prefixed namespace declarations carried by this element.
    #[must_use]
    pub fn namespace_prefixes(&self) -> &[(&'static str, &'static str)] {
        &self.prefixes
    }

    pub(crate) fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self
                .attributes
                .push((name.to_string(), value.to_string())),
        }
    }
}
