//! Property tests for schema-order placement.
//!
//! Inserting any permutation of distinct table tags must reproduce the
//! table's order, and same-tag runs must keep call order.

use erms_create::ordering::{AGGREGATION_ORDER, CONTROL_ORDER, RECORD_ORDER, RESTRICTION_ORDER};
use erms_create::{insert_in_schema_order, ElementTree, NodeId, QName};
use proptest::prelude::*;

fn local_names(tree: &ElementTree, parent: NodeId) -> Vec<String> {
    tree.children(parent)
        .iter()
        .map(|c| tree.element(*c).name().local_name().to_string())
        .collect()
}

/// A shuffled, non-empty subset of `table`.
fn shuffled_subset(table: &'static [&'static str]) -> impl Strategy<Value = Vec<&'static str>> {
    proptest::sample::subsequence(table.to_vec(), 1..=table.len()).prop_shuffle()
}

fn check_table_order(container: &str, table: &'static [&'static str], calls: &[&str]) {
    let mut tree = ElementTree::new();
    let parent = tree.create(QName::erms(container));
    for tag in calls {
        let child = tree.create(QName::erms(*tag));
        insert_in_schema_order(&mut tree, parent, child);
    }

    let expected: Vec<String> = table
        .iter()
        .filter(|t| calls.contains(t))
        .map(|t| (*t).to_string())
        .collect();
    assert_eq!(local_names(&tree, parent), expected);
}

proptest! {
    #[test]
    fn aggregation_permutations_follow_table(calls in shuffled_subset(AGGREGATION_ORDER)) {
        check_table_order("aggregation", AGGREGATION_ORDER, &calls);
    }

    #[test]
    fn record_permutations_follow_table(calls in shuffled_subset(RECORD_ORDER)) {
        check_table_order("record", RECORD_ORDER, &calls);
    }

    #[test]
    fn control_permutations_follow_table(calls in shuffled_subset(CONTROL_ORDER)) {
        check_table_order("control", CONTROL_ORDER, &calls);
    }

    #[test]
    fn restriction_permutations_follow_table(calls in shuffled_subset(RESTRICTION_ORDER)) {
        check_table_order("restriction", RESTRICTION_ORDER, &calls);
    }

    #[test]
    fn repeated_tags_keep_call_order(
        calls in proptest::collection::vec(
            proptest::sample::select(vec!["subject", "relation", "extraId", "title"]),
            1..24,
        )
    ) {
        let mut tree = ElementTree::new();
        let parent = tree.create(QName::erms("aggregation"));
        for (index, tag) in calls.iter().enumerate() {
            let child = tree.create_text(QName::erms(*tag), &index.to_string());
            insert_in_schema_order(&mut tree, parent, child);
        }

        for tag in ["subject", "relation", "extraId", "title"] {
            let name = QName::erms(tag);
            let seen: Vec<usize> = tree
                .children_by_tag(parent, &name)
                .filter_map(|c| tree.element(c).text())
                .filter_map(|t| t.parse().ok())
                .collect();
            let mut sorted = seen.clone();
            sorted.sort_unstable();
            prop_assert_eq!(seen, sorted);
        }

        let order: Vec<usize> = local_names(&tree, parent)
            .iter()
            .filter_map(|n| AGGREGATION_ORDER.iter().position(|t| t == n))
            .collect();
        prop_assert!(order.windows(2).all(|w| w[0] <= w[1]));
    }
}

#[test]
fn existing_children_never_move() {
    let mut tree = ElementTree::new();
    let parent = tree.create(QName::erms("record"));
    let mut previous: Vec<NodeId> = Vec::new();
    for tag in ["notes", "title", "dates", "objectId", "agents", "title"] {
        let child = tree.create(QName::erms(tag));
        insert_in_schema_order(&mut tree, parent, child);

        let others: Vec<NodeId> = tree
            .children(parent)
            .iter()
            .copied()
            .filter(|c| *c != child)
            .collect();
        assert_eq!(others, previous);
        previous = tree.children(parent).to_vec();
    }
    assert_eq!(
        local_names(&tree, parent),
        vec!["objectId", "title", "title", "agents", "dates", "notes"]
    );
}
