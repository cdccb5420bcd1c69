use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::tags::Rgb;

/// Handle to a node stored in a [`WeightedTree`].
///
/// Handles are generational: once a node is deleted its handle stops
/// resolving, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "{}v{}", slot, generation)
    }
}

/// Leaf or internal node. Only leaves carry an independently assigned weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Internal(Vec<NodeId>),
}

/// Tree node in the arena-based hierarchy.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub(crate) label: String,
    /// For internal nodes always the sum of the children's weights
    pub(crate) weight: u64,
    /// Index of parent node in the arena, None for the root
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
    pub(crate) tag: Rgb,
}

impl TreeNode {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Ordered children; empty for leaves.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Internal(children) => children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// A weightless node without children.
    pub fn is_empty(&self) -> bool {
        self.weight == 0 && self.children().is_empty()
    }

    pub fn tag(&self) -> Rgb {
        self.tag
    }
}

/// Arena-based weighted tree.
///
/// Parent and child links are [`NodeId`] handles into one arena, so upward
/// traversal costs O(depth) and no node owns another. Construction goes
/// through [`TreeBuilder`](crate::domain::TreeBuilder); afterwards only the
/// mutation operations change weights or structure.
#[derive(Debug, Clone)]
pub struct WeightedTree {
    pub(crate) arena: Arena<TreeNode>,
    /// None once the whole tree has been deleted
    pub(crate) root: Option<NodeId>,
}

impl Default for WeightedTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WeightedTree {
    /// A tree without any node.
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub(crate) fn from_parts(arena: Arena<TreeNode>, root: NodeId) -> Self {
        Self {
            arena,
            root: Some(root),
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Nothing left to lay out: no root, or a root of weight zero.
    pub fn is_empty(&self) -> bool {
        self.root
            .and_then(|root| self.get(root))
            .map_or(true, |node| node.weight == 0)
    }

    pub fn total_weight(&self) -> u64 {
        self.root
            .and_then(|root| self.get(root))
            .map_or(0, TreeNode::weight)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.arena.get(id.0)
    }

    /// Like [`get`](Self::get) but a handle that no longer resolves is an error.
    pub fn node(&self, id: NodeId) -> DomainResult<&TreeNode> {
        self.get(id)
            .ok_or_else(|| DomainError::StaleNode(id.to_string()))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> DomainResult<&mut TreeNode> {
        self.arena
            .get_mut(id.0)
            .ok_or_else(|| DomainError::StaleNode(id.to_string()))
    }

    pub fn label(&self, id: NodeId) -> DomainResult<&str> {
        Ok(self.node(id)?.label())
    }

    pub fn weight(&self, id: NodeId) -> DomainResult<u64> {
        Ok(self.node(id)?.weight)
    }

    pub fn children(&self, id: NodeId) -> DomainResult<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    pub fn parent(&self, id: NodeId) -> DomainResult<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> DomainResult<Ancestors<'_>> {
        let start = self.node(id)?.parent;
        Ok(Ancestors {
            tree: self,
            next: start,
        })
    }

    /// Labels from the root down to `id`, joined by `separator`.
    #[instrument(level = "debug", skip(self))]
    pub fn path_string(&self, id: NodeId, separator: &str) -> DomainResult<String> {
        let mut labels = vec![self.node(id)?.label()];
        labels.extend(self.ancestors(id)?.map(|(_, node)| node.label()));
        Ok(labels.into_iter().rev().join(separator))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, id: NodeId) -> usize {
        if let Some(node) = self.get(id) {
            1 + node
                .children()
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaves in child order, empty ones included.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(id, _)| id)
            .collect()
    }

    /// Verifies parent links, uniqueness of ownership and the aggregate
    /// weight rule for every reachable node, and that nothing unreachable is
    /// left in the arena.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> DomainResult<()> {
        let Some(root) = self.root else {
            return if self.arena.is_empty() {
                Ok(())
            } else {
                Err(DomainError::InvariantViolated {
                    label: "<none>".to_string(),
                    message: format!("{} nodes left without a root", self.arena.len()),
                })
            };
        };
        let violation = |node: &TreeNode, message: String| DomainError::InvariantViolated {
            label: node.label.clone(),
            message,
        };

        let root_node = self.node(root)?;
        if root_node.parent.is_some() {
            return Err(violation(root_node, "root has a parent".to_string()));
        }

        let mut seen = HashSet::new();
        for (id, node) in self.iter() {
            if !seen.insert(id) {
                return Err(violation(node, "reachable more than once".to_string()));
            }
            if let NodeKind::Internal(children) = &node.kind {
                let mut sum: u64 = 0;
                for &child in children {
                    let child_node = self.node(child)?;
                    if child_node.parent != Some(id) {
                        return Err(violation(
                            child_node,
                            format!("parent link does not point at {}", node.label),
                        ));
                    }
                    sum = sum.saturating_add(child_node.weight);
                }
                if !children.is_empty() && sum != node.weight {
                    return Err(violation(
                        node,
                        format!("weight {} but children sum to {}", node.weight, sum),
                    ));
                }
            }
        }
        if seen.len() != self.arena.len() {
            return Err(DomainError::InvariantViolated {
                label: root_node.label.clone(),
                message: format!(
                    "{} nodes stored, {} reachable",
                    self.arena.len(),
                    seen.len()
                ),
            });
        }
        debug!("invariants hold for {} nodes", seen.len());
        Ok(())
    }
}

/// Walks parent links upward.
pub struct Ancestors<'a> {
    tree: &'a WeightedTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some((id, node))
    }
}

/// Pre-order traversal in child order.
pub struct TreeIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a WeightedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push(root);
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children().iter().rev() {
                    self.stack.push(child);
                }
                return Some((current, node));
            }
        }
        None
    }
}

/// Children before parents.
pub struct PostOrderIterator<'a> {
    tree: &'a WeightedTree,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a WeightedTree) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root() {
            stack.push((root, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for &child in node.children().iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current, node));
                }
            }
        }
        None
    }
}
