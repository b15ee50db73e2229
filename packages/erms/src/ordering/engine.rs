//! Ordering engine that places new children at their schema position.

use std::sync::LazyLock;

use tracing::debug;

use super::tables::{create_erms_registry, SchemaOrderRegistry};
use crate::element::QName;
use crate::error::{ErmsError, Result};
use crate::tree::{ElementTree, NodeId};

/// What to do when the parent has no order table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerPolicy {
    /// Append in call order.
    #[default]
    Append,
    /// Refuse with [`ErmsError::UnsupportedContainerKind`].
    Strict,
}

/// Where a new child goes relative to the existing children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After every existing child.
    Append,
    /// Before every existing child.
    First,
    /// Immediately after the given sibling.
    After(NodeId),
}

/// Engine that resolves placements against a [`SchemaOrderRegistry`].
#[derive(Debug, Clone)]
pub struct OrderingEngine {
    registry: SchemaOrderRegistry,
    policy: ContainerPolicy,
}

impl OrderingEngine {
    /// Create a new engine with the given registry and the append policy.
    #[must_use]
    pub fn new(registry: SchemaOrderRegistry) -> Self {
        Self {
            registry,
            policy: ContainerPolicy::default(),
        }
    }

    /// Use a different policy for untabled parents.
    #[must_use]
    pub fn with_policy(mut self, policy: ContainerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Get a reference to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &SchemaOrderRegistry {
        &self.registry
    }

    /// Current policy for untabled parents.
    #[must_use]
    pub fn policy(&self) -> ContainerPolicy {
        self.policy
    }

    /// Decide where a child named `child` goes under `parent`.
    ///
    /// Returns `None` when the parent has no order table.
    #[must_use]
    pub fn resolve(&self, tree: &ElementTree, parent: NodeId, child: &QName) -> Option<Placement> {
        let parent_name = tree.element(parent).name();
        let table = self.registry.table_for(parent_name)?;

        if tree.children(parent).is_empty() {
            return Some(Placement::Append);
        }

        if let Some(last_same) = tree.last_child_by_tag(parent, child) {
            return Some(Placement::After(last_same));
        }

        let in_namespace = child.namespace() == parent_name.namespace();
        let index = match table.iter().position(|t| *t == child.local_name()) {
            Some(index) if in_namespace => index,
            _ => return Some(Placement::Append),
        };

        if index == 0 {
            return Some(Placement::First);
        }

        let preceding = table[..index].iter().rev().find_map(|tag| {
            tree.last_child_by_tag(parent, &parent_name.sibling(tag))
        });

        Some(match preceding {
            Some(sibling) => Placement::After(sibling),
            None => Placement::First,
        })
    }

    /// Insert a detached child under `parent` at its schema position.
    ///
    /// # Arguments
    /// * `tree` - Tree owning both nodes
    /// * `parent` - Attached or root container
    /// * `child` - Freshly created, detached node
    ///
    /// # Errors
    /// Returns `UnsupportedContainerKind` if the parent has no table and the
    /// engine uses [`ContainerPolicy::Strict`].
    pub fn insert(&self, tree: &mut ElementTree, parent: NodeId, child: NodeId) -> Result<()> {
        let child_name = tree.element(child).name().clone();
        let placement = match self.resolve(tree, parent, &child_name) {
            Some(placement) => placement,
            None if self.policy == ContainerPolicy::Strict => {
                return Err(ErmsError::UnsupportedContainerKind {
                    tag: tree.element(parent).name().local_name().to_string(),
                });
            }
            None => Placement::Append,
        };
        place(tree, parent, child, placement);
        Ok(())
    }
}

impl Default for OrderingEngine {
    fn default() -> Self {
        Self::new(create_erms_registry())
    }
}

static ERMS_ENGINE: LazyLock<OrderingEngine> = LazyLock::new(OrderingEngine::default);

/// Insert a detached child at its schema position using the ERMS tables.
///
/// Parents without a table get the child appended. Existing children are
/// never reordered.
///
/// # Examples
/// ```
/// use erms_create::{insert_in_schema_order, ElementTree, QName};
///
/// let mut tree = ElementTree::new();
/// let record = tree.create(QName::erms("record"));
/// let title = tree.create(QName::erms("title"));
/// let object_id = tree.create(QName::erms("objectId"));
/// insert_in_schema_order(&mut tree, record, title);
/// insert_in_schema_order(&mut tree, record, object_id);
///
/// assert_eq!(tree.children(record), &[object_id, title]);
/// ```
pub fn insert_in_schema_order(tree: &mut ElementTree, parent: NodeId, child: NodeId) {
    let child_name = tree.element(child).name().clone();
    let placement = ERMS_ENGINE
        .resolve(tree, parent, &child_name)
        .unwrap_or(Placement::Append);
    place(tree, parent, child, placement);
}

/// Insert using the ERMS tables with an explicit untabled-parent policy.
///
/// # Errors
/// Returns `UnsupportedContainerKind` under [`ContainerPolicy::Strict`] when
/// the parent has no table.
pub fn insert_with_policy(
    tree: &mut ElementTree,
    parent: NodeId,
    child: NodeId,
    policy: ContainerPolicy,
) -> Result<()> {
    let parent_name = tree.element(parent).name();
    if policy == ContainerPolicy::Strict && !ERMS_ENGINE.registry().has_table(parent_name) {
        return Err(ErmsError::UnsupportedContainerKind {
            tag: parent_name.local_name().to_string(),
        });
    }
    insert_in_schema_order(tree, parent, child);
    Ok(())
}

fn place(tree: &mut ElementTree, parent: NodeId, child: NodeId, placement: Placement) {
    debug!(
        parent = %tree.element(parent).name().local_name(),
        child = %tree.element(child).name().local_name(),
        ?placement,
        "Placing element"
    );
    let placed = match placement {
        Placement::Append => None,
        Placement::First => tree
            .first_child(parent)
            .and_then(|first| tree.insert_before(first, child)),
        Placement::After(sibling) => tree.insert_after(sibling, child),
    };
    if placed.is_none() {
        tree.append_child(parent, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(tree: &ElementTree, parent: NodeId) -> Vec<String> {
        tree.children(parent)
            .iter()
            .map(|c| tree.element(*c).name().local_name().to_string())
            .collect()
    }

    fn insert_all(tree: &mut ElementTree, parent: NodeId, tags: &[&str]) -> Vec<NodeId> {
        tags.iter()
            .map(|tag| {
                let child = tree.create(QName::erms(*tag));
                insert_in_schema_order(tree, parent, child);
                child
            })
            .collect()
    }

    #[test]
    fn test_reverse_calls_give_table_order() {
        let mut tree = ElementTree::new();
        let agg = tree.create(QName::erms("aggregation"));
        insert_all(&mut tree, agg, &["notes", "dates", "title", "objectId"]);
        assert_eq!(names(&tree, agg), vec!["objectId", "title", "dates", "notes"]);
    }

    #[test]
    fn test_same_tag_keeps_call_order() {
        let mut tree = ElementTree::new();
        let agg = tree.create(QName::erms("aggregation"));
        let subjects: Vec<NodeId> = ["A", "B", "C"]
            .iter()
            .map(|text| {
                let s = tree.create_text(QName::erms("subject"), text);
                insert_in_schema_order(&mut tree, agg, s);
                s
            })
            .collect();
        insert_all(&mut tree, agg, &["title", "status"]);

        assert_eq!(names(&tree, agg), vec!["title", "subject", "subject", "subject", "status"]);
        let texts: Vec<&str> = subjects.iter().filter_map(|s| tree.element(*s).text()).collect();
        assert_eq!(texts, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_index_zero_goes_first() {
        let mut tree = ElementTree::new();
        let record = tree.create(QName::erms("record"));
        insert_all(&mut tree, record, &["title", "objectId"]);
        assert_eq!(names(&tree, record), vec!["objectId", "title"]);
    }

    #[test]
    fn test_no_preceding_tag_goes_first() {
        let mut tree = ElementTree::new();
        let record = tree.create(QName::erms("record"));
        insert_all(&mut tree, record, &["notes", "title"]);
        assert_eq!(names(&tree, record), vec!["title", "notes"]);
    }

    #[test]
    fn test_tag_missing_from_table_appends() {
        let mut tree = ElementTree::new();
        let record = tree.create(QName::erms("record"));
        insert_all(&mut tree, record, &["title", "somethingElse", "objectId"]);
        assert_eq!(names(&tree, record), vec!["objectId", "title", "somethingElse"]);
    }

    #[test]
    fn test_foreign_namespace_child_appends() {
        let mut tree = ElementTree::new();
        let record = tree.create(QName::erms("record"));
        insert_all(&mut tree, record, &["title"]);
        let foreign = tree.create(QName::new("urn:ext", "objectId"));
        insert_in_schema_order(&mut tree, record, foreign);
        assert_eq!(tree.children(record).last(), Some(&foreign));
    }

    #[test]
    fn test_untabled_parent_appends_by_default() {
        let mut tree = ElementTree::new();
        let agents = tree.create(QName::erms("agents"));
        insert_all(&mut tree, agents, &["zeta", "alpha"]);
        assert_eq!(names(&tree, agents), vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_strict_policy_rejects_untabled_parent() {
        let mut tree = ElementTree::new();
        let agents = tree.create(QName::erms("agents"));
        let agent = tree.create(QName::erms("agent"));
        let err = insert_with_policy(&mut tree, agents, agent, ContainerPolicy::Strict)
            .unwrap_err();
        assert!(matches!(err, ErmsError::UnsupportedContainerKind { ref tag } if tag == "agents"));
        assert!(tree.children(agents).is_empty());
    }

    #[test]
    fn test_strict_policy_places_tabled_parent() {
        let mut tree = ElementTree::new();
        let restriction = tree.create(QName::erms("restriction"));
        let duration = tree.create(QName::erms("duration"));
        let text = tree.create(QName::erms("explanatoryText"));
        insert_with_policy(&mut tree, restriction, duration, ContainerPolicy::Strict).unwrap();
        insert_with_policy(&mut tree, restriction, text, ContainerPolicy::Strict).unwrap();
        assert_eq!(names(&tree, restriction), vec!["explanatoryText", "duration"]);
    }

    #[test]
    fn test_engine_with_custom_registry() {
        let mut registry = SchemaOrderRegistry::new();
        registry.register(QName::new("urn:ext", "box"), &["first", "second"]);
        let engine = OrderingEngine::new(registry).with_policy(ContainerPolicy::Strict);
        assert_eq!(engine.policy(), ContainerPolicy::Strict);

        let mut tree = ElementTree::new();
        let container = tree.create(QName::new("urn:ext", "box"));
        let second = tree.create(QName::new("urn:ext", "second"));
        let first = tree.create(QName::new("urn:ext", "first"));
        engine.insert(&mut tree, container, second).unwrap();
        engine.insert(&mut tree, container, first).unwrap();
        assert_eq!(tree.children(container), &[first, second]);

        let erms_record = tree.create(QName::erms("record"));
        let title = tree.create(QName::erms("title"));
        assert!(engine.insert(&mut tree, erms_record, title).is_err());
    }

    #[test]
    fn test_resolve_reports_placement() {
        let mut tree = ElementTree::new();
        let control = tree.create(QName::erms("control"));
        let ids = insert_all(&mut tree, control, &["identification", "maintenanceInformation"]);
        let engine = OrderingEngine::default();

        assert_eq!(
            engine.resolve(&tree, control, &QName::erms("dates")),
            Some(Placement::After(ids[0]))
        );
        assert_eq!(
            engine.resolve(&tree, control, &QName::erms("systemInformation")),
            Some(Placement::After(ids[1]))
        );
        let untabled = tree.create(QName::erms("dates"));
        assert_eq!(engine.resolve(&tree, untabled, &QName::erms("date")), None);
    }
}
