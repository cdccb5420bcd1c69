//! Integration tests for building and querying weighted trees.

use rstest::{fixture, rstest};

use rstreemap::domain::{DomainError, NodeId, TreeBuilder, TreeDisplay, WeightedTree};
use rstreemap::util::testing;

struct Sample {
    tree: WeightedTree,
    root: NodeId,
    docs: NodeId,
    a: NodeId,
    b: NodeId,
    c: NodeId,
}

/// root (100) = [docs (40) = [a (30), b (10)], c (60)]
#[fixture]
fn sample() -> Sample {
    testing::init_test_setup();
    let mut builder = TreeBuilder::new();
    let a = builder.leaf("a.txt", 30).unwrap();
    let b = builder.leaf("b.txt", 10).unwrap();
    let docs = builder.group("docs", vec![a, b]).unwrap();
    let c = builder.leaf("c.bin", 60).unwrap();
    let root = builder.group("root", vec![docs, c]).unwrap();
    let tree = builder.build(root).unwrap();
    Sample {
        tree,
        root,
        docs,
        a,
        b,
        c,
    }
}

// ============================================================
// Construction
// ============================================================

#[rstest]
fn given_nested_groups_when_building_then_weights_are_aggregated(sample: Sample) {
    let tree = &sample.tree;

    assert_eq!(tree.root(), Some(sample.root));
    assert_eq!(tree.total_weight(), 100);
    assert_eq!(tree.weight(sample.docs).unwrap(), 40);
    assert_eq!(tree.children(sample.root).unwrap(), &[sample.docs, sample.c]);
    assert_eq!(tree.parent(sample.a).unwrap(), Some(sample.docs));
    assert_eq!(tree.parent(sample.root).unwrap(), None);
    assert!(tree.check_invariants().is_ok());
}

#[rstest]
#[case(-1)]
#[case(i64::MIN)]
fn given_negative_weight_when_adding_leaf_then_invalid_input(#[case] weight: i64) {
    // Arrange
    let mut builder = TreeBuilder::new();

    // Act
    let result = builder.leaf("bad", weight);

    // Assert
    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[test]
fn given_no_children_when_adding_group_then_invalid_input() {
    let mut builder = TreeBuilder::new();

    let result = builder.group("empty", Vec::new());

    assert!(matches!(result, Err(DomainError::InvalidInput(_))));
}

#[test]
fn given_unused_nodes_when_building_then_only_reachable_nodes_kept() {
    // Arrange
    let mut builder = TreeBuilder::new();
    let kept = builder.leaf("kept", 5).unwrap();
    let stray = builder.leaf("stray", 7).unwrap();
    let root = builder.group("root", vec![kept]).unwrap();

    // Act
    let tree = builder.build(root).unwrap();

    // Assert
    assert_eq!(tree.len(), 2);
    assert!(!tree.contains(stray));
    assert!(matches!(tree.weight(stray), Err(DomainError::StaleNode(_))));
    assert!(tree.check_invariants().is_ok());
}

#[test]
fn given_single_leaf_when_building_then_leaf_is_root() {
    let mut builder = TreeBuilder::new();
    let only = builder.leaf("only", 9).unwrap();

    let tree = builder.build(only).unwrap();

    assert_eq!(tree.root(), Some(only));
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.leaves(), vec![only]);
}

#[test]
fn given_zero_weight_leaves_when_building_then_tree_is_empty_but_valid() {
    let mut builder = TreeBuilder::new();
    let a = builder.leaf("a", 0).unwrap();
    let root = builder.group("root", vec![a]).unwrap();

    let tree = builder.build(root).unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 2);
    assert!(tree.check_invariants().is_ok());
}

// ============================================================
// Queries
// ============================================================

#[rstest]
fn given_leaf_when_building_path_string_then_labels_joined_from_root(sample: Sample) {
    assert_eq!(
        sample.tree.path_string(sample.b, "/").unwrap(),
        "root/docs/b.txt"
    );
    assert_eq!(sample.tree.path_string(sample.root, "/").unwrap(), "root");
}

#[rstest]
fn given_tree_when_iterating_then_pre_and_post_order(sample: Sample) {
    let pre: Vec<&str> = sample.tree.iter().map(|(_, n)| n.label()).collect();
    let post: Vec<&str> = sample
        .tree
        .iter_postorder()
        .map(|(_, n)| n.label())
        .collect();

    assert_eq!(pre, vec!["root", "docs", "a.txt", "b.txt", "c.bin"]);
    assert_eq!(post, vec!["a.txt", "b.txt", "docs", "c.bin", "root"]);
}

#[rstest]
fn given_tree_when_querying_shape_then_depth_leaves_and_ancestors(sample: Sample) {
    let tree = &sample.tree;

    let ancestors: Vec<NodeId> = tree.ancestors(sample.a).unwrap().map(|(id, _)| id).collect();

    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.leaves(), vec![sample.a, sample.b, sample.c]);
    assert_eq!(ancestors, vec![sample.docs, sample.root]);
}

#[rstest]
fn given_tree_when_rendering_then_each_node_shows_weight(sample: Sample) {
    let rendered = sample.tree.to_tree_string().to_string();

    assert!(rendered.starts_with("root (100)"));
    assert!(rendered.contains("docs (40)"));
    assert!(rendered.contains("b.txt (10)"));
}

// ============================================================
// Display tags
// ============================================================

#[test]
fn given_same_labels_when_building_twice_then_same_tags() {
    let build = || {
        let mut builder = TreeBuilder::new();
        let a = builder.leaf("a", 1).unwrap();
        let root = builder.group("root", vec![a]).unwrap();
        let tree = builder.build(root).unwrap();
        tree.node(a).unwrap().tag()
    };

    assert_eq!(build(), build());
}
