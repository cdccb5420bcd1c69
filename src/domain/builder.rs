//! Bottom-up construction of weighted trees.

use std::collections::HashSet;

use generational_arena::Arena;
use tracing::{debug, instrument, trace};

use crate::domain::arena::{NodeId, NodeKind, TreeNode, WeightedTree};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::source::{Entry, TreeSource};
use crate::domain::tags::{HashedPalette, TagAssigner};

/// Constructs a [`WeightedTree`] from leaves upward.
///
/// Leaves get an explicit weight, groups derive theirs from already built
/// children. [`build`](Self::build) picks the root and discards anything not
/// reachable from it, so a failed construction never leaks into a tree.
pub struct TreeBuilder<T = HashedPalette> {
    arena: Arena<TreeNode>,
    tags: T,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::with_tags(HashedPalette::default())
    }
}

impl<T: TagAssigner> TreeBuilder<T> {
    pub fn with_tags(tags: T) -> Self {
        Self {
            arena: Arena::new(),
            tags,
        }
    }

    /// Adds a detached leaf. Negative weights are rejected.
    #[instrument(level = "trace", skip(self, label))]
    pub fn leaf(&mut self, label: impl Into<String>, weight: i64) -> DomainResult<NodeId> {
        let label = label.into();
        let weight = u64::try_from(weight).map_err(|_| {
            DomainError::InvalidInput(format!("negative weight {} for leaf {}", weight, label))
        })?;
        let tag = self.tags.assign(&label);
        let id = NodeId(self.arena.insert(TreeNode {
            label,
            weight,
            parent: None,
            kind: NodeKind::Leaf,
            tag,
        }));
        Ok(id)
    }

    /// Adds a group owning `children`, which must be detached nodes of this
    /// builder. The group's weight is the sum of theirs.
    #[instrument(level = "trace", skip(self, label))]
    pub fn group(&mut self, label: impl Into<String>, children: Vec<NodeId>) -> DomainResult<NodeId> {
        let label = label.into();
        if children.is_empty() {
            return Err(DomainError::InvalidInput(format!(
                "group {} has no children",
                label
            )));
        }

        let mut unique = HashSet::with_capacity(children.len());
        let mut weight: u64 = 0;
        for &child in &children {
            if !unique.insert(child) {
                return Err(DomainError::InvalidInput(format!(
                    "child {} listed twice in group {}",
                    child, label
                )));
            }
            let node = self.arena.get(child.0).ok_or_else(|| {
                DomainError::InvalidInput(format!("unknown child {} in group {}", child, label))
            })?;
            if node.parent.is_some() {
                return Err(DomainError::InvalidInput(format!(
                    "child {} already belongs to another group",
                    node.label
                )));
            }
            weight = weight.checked_add(node.weight).ok_or_else(|| {
                DomainError::InvalidInput(format!("weight of group {} overflows", label))
            })?;
        }

        let tag = self.tags.assign(&label);
        let id = NodeId(self.arena.insert(TreeNode {
            label,
            weight,
            parent: None,
            kind: NodeKind::Internal(children.clone()),
            tag,
        }));
        for child in children {
            if let Some(node) = self.arena.get_mut(child.0) {
                node.parent = Some(id);
            }
        }
        Ok(id)
    }

    /// Finishes construction with `root` as the root. Nodes not reachable
    /// from `root` are dropped.
    #[instrument(level = "debug", skip(self))]
    pub fn build(mut self, root: NodeId) -> DomainResult<WeightedTree> {
        let root_node = self
            .arena
            .get(root.0)
            .ok_or_else(|| DomainError::InvalidInput(format!("unknown root {}", root)))?;
        if root_node.parent.is_some() {
            return Err(DomainError::InvalidInput(format!(
                "root {} is a child of another group",
                root_node.label
            )));
        }

        let mut reachable = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.arena.get(id.0) {
                reachable.insert(id.0);
                stack.extend(node.children().iter().copied());
            }
        }
        let before = self.arena.len();
        self.arena.retain(|idx, _| reachable.contains(&idx));
        if before != self.arena.len() {
            debug!("dropped {} unreachable nodes", before - self.arena.len());
        }

        Ok(WeightedTree::from_parts(self.arena, root))
    }

    /// Builds the whole tree by expanding `root` through `source` depth first.
    #[instrument(level = "debug", skip(self, source, root))]
    pub fn from_source<S>(mut self, source: &S, root: &S::Item) -> Result<WeightedTree, S::Error>
    where
        S: TreeSource,
    {
        let root_id = self.expand(source, root)?;
        Ok(self.build(root_id)?)
    }

    fn expand<S>(&mut self, source: &S, item: &S::Item) -> Result<NodeId, S::Error>
    where
        S: TreeSource,
    {
        match source.expand(item)? {
            Entry::Leaf { label, weight } => {
                trace!(%label, weight, "leaf");
                Ok(self.leaf(label, weight)?)
            }
            Entry::Group { label, children } => {
                let mut ids = Vec::with_capacity(children.len());
                for child in &children {
                    ids.push(self.expand(source, child)?);
                }
                trace!(%label, children = ids.len(), "group");
                Ok(self.group(label, ids)?)
            }
        }
    }
}
