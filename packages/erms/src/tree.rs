//! Arena-backed element tree.
//!
//! All nodes of a document live in one [`ElementTree`] and are addressed by
//! [`NodeId`]. A node is created detached, placed once under a parent, and
//! never moved or removed afterwards. This layer does no validation.

use std::fmt;

use crate::element::{Element, QName};

/// Index of a node inside an [`ElementTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Owner of every element in a document.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    nodes: Vec<Element>,
}

impl ElementTree {
    /// Create an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes ever created, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether no node has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create a detached element.
    pub fn create(&mut self, name: QName) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Element::new(name));
        id
    }

    /// Create a detached element with attributes in the given order.
    ///
    /// # Examples
    /// ```
    /// use erms_create::{ElementTree, QName};
    ///
    /// let mut tree = ElementTree::new();
    /// let date = tree.create_with_attributes(QName::erms("date"), [("dateType", "created")]);
    /// assert_eq!(tree.element(date).attribute("dateType"), Some("created"));
    /// ```
    pub fn create_with_attributes<'a>(
        &mut self,
        name: QName,
        attributes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> NodeId {
        let id = self.create(name);
        for (key, value) in attributes {
            self.nodes[id.0].set_attribute(key, value);
        }
        id
    }

    /// Create a detached element holding text.
    pub fn create_text(&mut self, name: QName, text: &str) -> NodeId {
        let id = self.create(name);
        self.set_text(id, text);
        id
    }

    /// Read access to a node.
    ///
    /// Ids are only handed out by this tree, so lookups cannot miss.
    #[must_use]
    pub fn element(&self, id: NodeId) -> &Element {
        &self.nodes[id.0]
    }

    /// Replace a node's text.
    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id.0].text = Some(text.to_string());
    }

    /// Set an attribute, overwriting an existing value in place.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id.0].set_attribute(name, value);
    }

    /// Declare a prefixed namespace on a node.
    pub fn declare_prefix(&mut self, id: NodeId, prefix: &'static str, uri: &'static str) {
        let prefixes = &mut self.nodes[id.0].prefixes;
        if !prefixes.iter().any(|(p, _)| *p == prefix) {
            prefixes.push((prefix, uri));
        }
    }

    /// Append a detached child as the parent's last child.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let position = self.nodes[parent.0].children.len();
        self.attach(parent, position, child);
    }

    /// Insert a detached child right before an attached sibling.
    ///
    /// Returns the new child's position, or `None` if `sibling` has no
    /// parent (nothing is inserted then).
    pub fn insert_before(&mut self, sibling: NodeId, child: NodeId) -> Option<usize> {
        let (parent, position) = self.position_of(sibling)?;
        self.attach(parent, position, child);
        Some(position)
    }

    /// Insert a detached child right after an attached sibling.
    ///
    /// Returns the new child's position, or `None` if `sibling` has no
    /// parent (nothing is inserted then).
    pub fn insert_after(&mut self, sibling: NodeId, child: NodeId) -> Option<usize> {
        let (parent, position) = self.position_of(sibling)?;
        self.attach(parent, position + 1, child);
        Some(position + 1)
    }

    /// Children of a node in document order.
    #[must_use]
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        &self.nodes[parent.0].children
    }

    /// First child of a node.
    #[must_use]
    pub fn first_child(&self, parent: NodeId) -> Option<NodeId> {
        self.nodes[parent.0].children.first().copied()
    }

    /// Children with exactly the given qualified tag, in document order.
    pub fn children_by_tag<'a>(
        &'a self,
        parent: NodeId,
        name: &'a QName,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(move |child| self.nodes[child.0].name == *name)
    }

    /// Last child with the given qualified tag.
    #[must_use]
    pub fn last_child_by_tag(&self, parent: NodeId, name: &QName) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .rev()
            .copied()
            .find(|child| self.nodes[child.0].name == *name)
    }

    /// First child with the given qualified tag.
    #[must_use]
    pub fn first_child_by_tag(&self, parent: NodeId, name: &QName) -> Option<NodeId> {
        self.children_by_tag(parent, name).next()
    }

    /// All descendants of `root` (excluding `root`) in document order.
    #[must_use]
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[root.0].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }

    /// Count descendants of `root` with the given qualified tag.
    #[must_use]
    pub fn count_descendants(&self, root: NodeId, name: &QName) -> usize {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.nodes[id.0].name == *name)
            .count()
    }

    fn position_of(&self, node: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.nodes[node.0].parent?;
        let position = self.nodes[parent.0]
            .children
            .iter()
            .position(|c| *c == node)?;
        Some((parent, position))
    }

    fn attach(&mut self, parent: NodeId, position: usize, child: NodeId) {
        debug_assert!(
            self.nodes[child.0].parent.is_none(),
            "{child} is already attached"
        );
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(position, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn local_names(tree: &ElementTree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .iter()
            .map(|c| tree.element(*c).name().local_name().to_string())
            .collect()
    }

    #[test]
    fn test_append_keeps_call_order() {
        let mut tree = ElementTree::new();
        let root = tree.create(QName::erms("root"));
        for name in ["a", "b", "c"] {
            let child = tree.create(QName::erms(name));
            tree.append_child(root, child);
        }
        assert_eq!(local_names(&tree, root), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut tree = ElementTree::new();
        let root = tree.create(QName::erms("root"));
        let b = tree.create(QName::erms("b"));
        tree.append_child(root, b);

        let a = tree.create(QName::erms("a"));
        assert_eq!(tree.insert_before(b, a), Some(0));
        let c = tree.create(QName::erms("c"));
        assert_eq!(tree.insert_after(b, c), Some(2));

        assert_eq!(local_names(&tree, root), vec!["a", "b", "c"]);
        assert_eq!(tree.element(c).parent(), Some(root));
    }

    #[test]
    fn test_insert_next_to_detached_sibling_is_noop() {
        let mut tree = ElementTree::new();
        let lonely = tree.create(QName::erms("lonely"));
        let child = tree.create(QName::erms("child"));
        assert_eq!(tree.insert_after(lonely, child), None);
        assert!(tree.element(child).parent().is_none());
    }

    #[test]
    fn test_children_by_tag_uses_full_name() {
        let mut tree = ElementTree::new();
        let root = tree.create(QName::erms("root"));
        let erms_id = tree.create(QName::erms("objectId"));
        let ext_id = tree.create(QName::new("urn:ext", "objectId"));
        let second = tree.create(QName::erms("objectId"));
        tree.append_child(root, erms_id);
        tree.append_child(root, ext_id);
        tree.append_child(root, second);

        let name = QName::erms("objectId");
        let found: Vec<NodeId> = tree.children_by_tag(root, &name).collect();
        assert_eq!(found, vec![erms_id, second]);
        assert_eq!(tree.last_child_by_tag(root, &name), Some(second));
        assert_eq!(tree.first_child_by_tag(root, &name), Some(erms_id));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut tree = ElementTree::new();
        let root = tree.create(QName::erms("root"));
        let a = tree.create(QName::erms("a"));
        let a1 = tree.create(QName::erms("a1"));
        let b = tree.create(QName::erms("b"));
        tree.append_child(root, a);
        tree.append_child(a, a1);
        tree.append_child(root, b);

        assert_eq!(tree.descendants(root), vec![a, a1, b]);
        assert_eq!(tree.count_descendants(root, &QName::erms("a1")), 1);
    }
}
