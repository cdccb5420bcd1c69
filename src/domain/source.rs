//! Dataset boundary: how an external source describes one node.

use crate::domain::error::DomainError;

/// What a source yields for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<I> {
    /// A leaf with an externally supplied magnitude.
    Leaf { label: String, weight: i64 },
    /// A grouping node whose children are expanded in order.
    Group { label: String, children: Vec<I> },
}

/// A hierarchical dataset that can be walked from a root item.
///
/// Implementations do whatever I/O they need; the builder only sees
/// [`Entry`] values.
pub trait TreeSource {
    type Item;
    type Error: From<DomainError>;

    fn expand(&self, item: &Self::Item) -> Result<Entry<Self::Item>, Self::Error>;
}
