//! Strip-subdivision treemap layout.
//!
//! One recursive routine, [`subdivide`], owns the geometry. Layout and hit
//! testing are two visitors over it, so they cannot disagree about where a
//! node ends up.

use std::ops::ControlFlow;

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, NodeKind, WeightedTree};
use crate::domain::geometry::{Rect, SplitAxis};

/// A laid out leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub rect: Rect,
    pub node: NodeId,
}

/// Receives the rectangles produced by [`subdivide`].
pub trait SubdivisionVisitor {
    /// Whether to descend into a non-empty node occupying `rect`.
    fn enter(&mut self, _rect: Rect) -> bool {
        true
    }

    /// Called once per non-empty leaf, in child order.
    fn leaf(&mut self, node: NodeId, rect: Rect) -> ControlFlow<()>;
}

/// Cuts `rect` into contiguous strips, one per weight, proportional to
/// `weight / total`.
///
/// Each strip is floored, except the last one with non-zero weight, which
/// takes whatever extent remains so the strips cover `rect` exactly.
/// Zero-weight entries after it get zero-size strips at the far edge.
/// `total` must be positive and equal to the sum of `weights`.
pub fn strips(rect: Rect, total: u64, weights: &[u64]) -> Vec<Rect> {
    let axis = rect.split_axis();
    let extent = rect.extent(axis);
    let (origin, far_edge) = match axis {
        SplitAxis::X => (rect.left(), rect.right()),
        SplitAxis::Y => (rect.top(), rect.bottom()),
    };
    let last_weighted = weights.iter().rposition(|&w| w > 0);

    let mut offset = origin;
    let mut result = Vec::with_capacity(weights.len());
    for (i, &weight) in weights.iter().enumerate() {
        let size = if Some(i) == last_weighted {
            (far_edge - offset).max(0) as u32
        } else {
            let scaled = u128::from(weight) * u128::from(extent) / u128::from(total.max(1));
            scaled.min(u128::from(extent)) as u32
        };
        result.push(rect.strip(axis, offset, size));
        offset += i64::from(size);
    }
    result
}

/// Recursively subdivides `rect` among the subtree at `node`.
///
/// Weightless nodes contribute nothing and are never divided by.
pub fn subdivide<V>(tree: &WeightedTree, node: NodeId, rect: Rect, visitor: &mut V) -> ControlFlow<()>
where
    V: SubdivisionVisitor + ?Sized,
{
    let Some(current) = tree.get(node) else {
        return ControlFlow::Continue(());
    };
    if current.weight() == 0 || !visitor.enter(rect) {
        return ControlFlow::Continue(());
    }
    match current.kind() {
        NodeKind::Leaf => visitor.leaf(node, rect),
        NodeKind::Internal(children) => {
            let weights: Vec<u64> = children
                .iter()
                .map(|&child| tree.get(child).map_or(0, |n| n.weight()))
                .collect();
            let cells = strips(rect, current.weight(), &weights);
            for (&child, cell) in children.iter().zip(cells) {
                subdivide(tree, child, cell, visitor)?;
            }
            ControlFlow::Continue(())
        }
    }
}

struct Collector {
    tiles: Vec<Tile>,
}

impl SubdivisionVisitor for Collector {
    fn leaf(&mut self, node: NodeId, rect: Rect) -> ControlFlow<()> {
        self.tiles.push(Tile { rect, node });
        ControlFlow::Continue(())
    }
}

/// One tile per non-empty leaf of the whole tree, in child order.
#[instrument(level = "debug", skip(tree))]
pub fn layout(tree: &WeightedTree, rect: Rect) -> Vec<Tile> {
    match tree.root() {
        Some(root) => layout_subtree(tree, root, rect),
        None => Vec::new(),
    }
}

/// Lays out the subtree at `node` inside `rect`.
pub fn layout_subtree(tree: &WeightedTree, node: NodeId, rect: Rect) -> Vec<Tile> {
    let mut collector = Collector { tiles: Vec::new() };
    let _ = subdivide(tree, node, rect, &mut collector);
    debug!("laid out {} tiles in {}", collector.tiles.len(), rect);
    collector.tiles
}

impl WeightedTree {
    /// See [`layout`].
    pub fn layout(&self, rect: Rect) -> Vec<Tile> {
        layout(self, rect)
    }
}
