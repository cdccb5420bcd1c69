//! Property-based invariant tests for the treemap core.
//!
//! For arbitrary trees, rectangles and mutation sequences:
//!
//! 1. The aggregate weight rule and parent links survive any mutation sequence.
//! 2. Tiles cover the rectangle exactly once when the tree has weight.
//! 3. Every point of the rectangle hits a leaf whose tile contains it.
//! 4. The interior of each tile hits that tile's leaf.
//! 5. Grow and shrink move the leaf and each ancestor by the same delta.
//! 6. Deleting a leaf subtracts its weight from every ancestor.

use proptest::prelude::*;
use proptest::sample::Index;

use rstreemap::domain::{Mutation, NodeId, Point, Rect, TreeBuilder, WeightedTree};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Shape {
    Leaf(i64),
    Group(Vec<Shape>),
}

fn shape_strategy() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![1 => Just(0i64), 9 => 1i64..1_000].prop_map(Shape::Leaf);
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::vec(inner, 1..5).prop_map(Shape::Group)
    })
}

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-50i32..50, -50i32..50, 0u32..400, 0u32..400)
        .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Grow,
    Shrink,
    Delete,
}

fn ops_strategy() -> impl Strategy<Value = Vec<(Op, Index)>> {
    let op = prop_oneof![Just(Op::Grow), Just(Op::Shrink), Just(Op::Delete)];
    prop::collection::vec((op, any::<Index>()), 0..24)
}

fn build(shape: &Shape) -> WeightedTree {
    fn add(builder: &mut TreeBuilder, shape: &Shape, label: String) -> NodeId {
        match shape {
            Shape::Leaf(weight) => builder.leaf(label, *weight).unwrap(),
            Shape::Group(children) => {
                let ids = children
                    .iter()
                    .enumerate()
                    .map(|(i, child)| add(builder, child, format!("{}.{}", label, i)))
                    .collect();
                builder.group(label, ids).unwrap()
            }
        }
    }

    let mut builder = TreeBuilder::new();
    let root = add(&mut builder, shape, "n".to_string());
    builder.build(root).unwrap()
}

fn chain_weights(tree: &WeightedTree, leaf: NodeId) -> Vec<u64> {
    let mut weights = vec![tree.weight(leaf).unwrap()];
    weights.extend(tree.ancestors(leaf).unwrap().map(|(_, node)| node.weight()));
    weights
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Aggregate invariant under mutation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn invariants_hold_after_any_mutation_sequence(
        shape in shape_strategy(),
        ops in ops_strategy(),
    ) {
        let mut tree = build(&shape);
        prop_assert!(tree.check_invariants().is_ok());

        for (op, index) in ops {
            let leaves = tree.leaves();
            if leaves.is_empty() {
                break;
            }
            let target = *index.get(&leaves);
            match op {
                Op::Grow => { tree.grow(target).unwrap(); }
                Op::Shrink => { tree.shrink(target).unwrap(); }
                Op::Delete => { tree.delete(target).unwrap(); }
            }
            let checked = tree.check_invariants();
            prop_assert!(checked.is_ok(), "after {:?}: {:?}", op, checked);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Exact coverage without overlap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tiles_cover_rect_exactly(shape in shape_strategy(), rect in rect_strategy()) {
        let tree = build(&shape);
        let tiles = tree.layout(rect);

        if tree.total_weight() == 0 {
            prop_assert!(tiles.is_empty());
        } else {
            let covered: u64 = tiles.iter().map(|tile| tile.rect.area()).sum();
            prop_assert_eq!(covered, rect.area());
            for (i, first) in tiles.iter().enumerate() {
                prop_assert!(first.rect.left() >= rect.left() && first.rect.right() <= rect.right());
                prop_assert!(first.rect.top() >= rect.top() && first.rect.bottom() <= rect.bottom());
                for second in &tiles[i + 1..] {
                    prop_assert_eq!(first.rect.overlap_area(&second.rect), 0);
                }
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Every point in the rectangle resolves to a containing tile
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hit_test_agrees_with_layout(
        shape in shape_strategy(),
        rect in rect_strategy(),
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
    ) {
        let tree = build(&shape);
        let point = Point::new(
            rect.x + (f64::from(rect.width) * fx) as i32,
            rect.y + (f64::from(rect.height) * fy) as i32,
        );

        let hit = tree.hit_test(point, rect);

        if tree.total_weight() == 0 {
            prop_assert_eq!(hit, None);
        } else {
            let hit = hit.expect("weighted tree must resolve a point inside its rect");
            let tiles = tree.layout(rect);
            let tile = tiles.iter().find(|tile| tile.node == hit);
            prop_assert!(tile.is_some_and(|tile| tile.rect.contains(point)));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Tile interiors resolve to their own leaf
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tile_interior_hits_its_leaf(shape in shape_strategy(), rect in rect_strategy()) {
        let tree = build(&shape);

        for tile in tree.layout(rect) {
            if tile.rect.width < 2 || tile.rect.height < 2 {
                continue;
            }
            let center = Point::new(
                tile.rect.x + (tile.rect.width / 2) as i32,
                tile.rect.y + (tile.rect.height / 2) as i32,
            );
            prop_assert_eq!(tree.hit_test(center, rect), Some(tile.node));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Grow / shrink monotonicity along the ancestor chain
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn grow_and_shrink_move_whole_chain_by_delta(
        shape in shape_strategy(),
        index in any::<Index>(),
        fraction in 0.001f64..=1.0,
    ) {
        let mut tree = build(&shape);
        let leaf = *index.get(&tree.leaves());
        let before = chain_weights(&tree, leaf);

        match tree.grow_by(leaf, fraction).unwrap() {
            Mutation::Grown { delta } => {
                let after = chain_weights(&tree, leaf);
                for (old, new) in before.iter().zip(&after) {
                    prop_assert_eq!(*new, old + delta);
                }
            }
            Mutation::Unchanged => {
                prop_assert_eq!(before[0], 0);
            }
            other => {
                prop_assert!(false, "unexpected {:?}", other);
            }
        }

        let before = chain_weights(&tree, leaf);
        match tree.shrink_by(leaf, fraction).unwrap() {
            Mutation::Shrunk { delta } => {
                prop_assert!(delta <= before[0]);
                let after = chain_weights(&tree, leaf);
                for (old, new) in before.iter().zip(&after) {
                    prop_assert_eq!(*new, old - delta);
                }
            }
            Mutation::Unchanged => {
                prop_assert!(before[0] <= 1);
            }
            other => {
                prop_assert!(false, "unexpected {:?}", other);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Deletion propagation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_subtracts_leaf_weight_from_ancestors(
        shape in shape_strategy(),
        index in any::<Index>(),
    ) {
        let mut tree = build(&shape);
        let leaf = *index.get(&tree.leaves());
        let weight = tree.weight(leaf).unwrap();
        let ancestors: Vec<(NodeId, u64)> = tree
            .ancestors(leaf)
            .unwrap()
            .map(|(id, node)| (id, node.weight()))
            .collect();

        let outcome = tree.delete(leaf).unwrap();

        if ancestors.is_empty() {
            prop_assert!(matches!(outcome, Mutation::Cleared { .. }), "expected Mutation::Cleared");
            prop_assert_eq!(tree.root(), None);
        } else {
            prop_assert!(matches!(outcome, Mutation::Deleted { .. }), "expected Mutation::Deleted");
            for (id, old) in ancestors {
                prop_assert_eq!(tree.weight(id).unwrap(), old - weight);
                prop_assert!(!tree.children(id).unwrap().contains(&leaf));
            }
        }
        prop_assert!(!tree.contains(leaf));
    }
}
