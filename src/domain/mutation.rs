//! Grow, shrink and delete.
//!
//! Every operation touches only the target and its ancestor chain, so the
//! cost is O(depth). Any layout computed before a mutation is stale
//! afterwards.

use tracing::{debug, instrument};

use crate::domain::arena::{NodeId, NodeKind, WeightedTree};
use crate::domain::error::{DomainError, DomainResult};

/// Fraction used by [`WeightedTree::grow`] and [`WeightedTree::shrink`].
pub const DEFAULT_GROWTH_FRACTION: f64 = 0.01;

/// What a mutation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Target was internal, or too small to shrink.
    Unchanged,
    Grown { delta: u64 },
    Shrunk { delta: u64 },
    /// A non-root subtree was removed; `weight` was subtracted from every ancestor.
    Deleted { label: String, weight: u64 },
    /// The root was deleted and the tree is now empty.
    Cleared { label: String, weight: u64 },
}

impl Mutation {
    pub fn is_change(&self) -> bool {
        !matches!(self, Mutation::Unchanged)
    }
}

fn validate_fraction(fraction: f64) -> DomainResult<()> {
    if fraction.is_finite() && fraction > 0.0 && fraction <= 1.0 {
        Ok(())
    } else {
        Err(DomainError::InvalidInput(format!(
            "growth fraction {} outside (0, 1]",
            fraction
        )))
    }
}

/// Fractions with at most nine decimals are applied in integer arithmetic.
const DECIMAL_SCALE: u128 = 1_000_000_000;

/// `ceil(weight * fraction)`, never more than `weight`.
///
/// Decimal fractions such as `0.01` or `1.0` are exact for every `u64`
/// weight. Other fractions go through `f64` and lose precision above 2^53.
fn step(weight: u64, fraction: f64) -> u64 {
    let scaled = (fraction * DECIMAL_SCALE as f64).round();
    let delta = if scaled / DECIMAL_SCALE as f64 == fraction {
        (u128::from(weight) * scaled as u128).div_ceil(DECIMAL_SCALE)
    } else {
        (weight as f64 * fraction).ceil() as u128
    };
    delta.min(u128::from(weight)) as u64
}

impl WeightedTree {
    /// Grows a leaf by 1%, rounded up.
    pub fn grow(&mut self, id: NodeId) -> DomainResult<Mutation> {
        self.grow_by(id, DEFAULT_GROWTH_FRACTION)
    }

    /// Grows a leaf by `ceil(weight * fraction)` and adds the same amount
    /// to every ancestor. Internal nodes are left alone.
    #[instrument(level = "debug", skip(self))]
    pub fn grow_by(&mut self, id: NodeId, fraction: f64) -> DomainResult<Mutation> {
        validate_fraction(fraction)?;
        let node = self.node(id)?;
        if !node.is_leaf() {
            return Ok(Mutation::Unchanged);
        }
        let delta = step(node.weight(), fraction);
        if delta == 0 {
            return Ok(Mutation::Unchanged);
        }
        // The root carries the largest weight on the chain.
        if self.total_weight().checked_add(delta).is_none() {
            return Err(DomainError::InvalidInput(format!(
                "growing {} by {} overflows the total weight",
                node.label(),
                delta
            )));
        }

        self.apply_along_chain(id, |weight| weight + delta)?;
        debug!(delta, "grew leaf");
        Ok(Mutation::Grown { delta })
    }

    /// Shrinks a leaf by 1%, rounded up.
    pub fn shrink(&mut self, id: NodeId) -> DomainResult<Mutation> {
        self.shrink_by(id, DEFAULT_GROWTH_FRACTION)
    }

    /// Shrinks a leaf by `ceil(weight * fraction)` and subtracts the same
    /// amount from every ancestor. Internal nodes and leaves of weight one
    /// or less are left alone.
    #[instrument(level = "debug", skip(self))]
    pub fn shrink_by(&mut self, id: NodeId, fraction: f64) -> DomainResult<Mutation> {
        validate_fraction(fraction)?;
        let node = self.node(id)?;
        if !node.is_leaf() || node.weight() <= 1 {
            return Ok(Mutation::Unchanged);
        }
        let delta = step(node.weight(), fraction);

        self.apply_along_chain(id, |weight| weight.saturating_sub(delta))?;
        debug!(delta, "shrank leaf");
        Ok(Mutation::Shrunk { delta })
    }

    /// Removes `id` and its descendants, subtracting its weight from every
    /// ancestor.
    ///
    /// Deleting the root empties the tree: every node is dropped and
    /// [`root`](Self::root) becomes `None`. Handles to removed nodes stop
    /// resolving and fail with [`DomainError::StaleNode`].
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: NodeId) -> DomainResult<Mutation> {
        let node = self.node(id)?;
        let label = node.label().to_string();
        let weight = node.weight();

        let Some(parent) = node.parent() else {
            self.arena.clear();
            self.root = None;
            debug!(%label, "deleted root, tree is empty");
            return Ok(Mutation::Cleared { label, weight });
        };

        if let NodeKind::Internal(children) = &mut self.node_mut(parent)?.kind {
            children.retain(|&child| child != id);
        }
        self.apply_along_chain(parent, |w| w.saturating_sub(weight))?;
        self.remove_subtree(id);
        debug!(%label, weight, "deleted subtree");
        Ok(Mutation::Deleted { label, weight })
    }

    /// Applies `f` to the weight of `id` and each of its ancestors.
    fn apply_along_chain(&mut self, id: NodeId, f: impl Fn(u64) -> u64) -> DomainResult<()> {
        let mut next = Some(id);
        while let Some(current) = next {
            let node = self.node_mut(current)?;
            node.weight = f(node.weight);
            next = node.parent;
        }
        Ok(())
    }

    fn remove_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current.0) {
                stack.extend(node.children().iter().copied());
            }
        }
    }
}
