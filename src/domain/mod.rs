//! Domain layer: the weighted tree and its algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod display;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod mutation;
pub mod source;
pub mod tags;

pub use arena::{NodeId, NodeKind, TreeNode, WeightedTree};
pub use builder::TreeBuilder;
pub use display::TreeDisplay;
pub use error::{DomainError, DomainResult};
pub use geometry::{Point, Rect, SplitAxis};
pub use hit_test::hit_test;
pub use layout::{layout, layout_subtree, strips, subdivide, SubdivisionVisitor, Tile};
pub use mutation::{Mutation, DEFAULT_GROWTH_FRACTION};
pub use source::{Entry, TreeSource};
pub use tags::{HashedPalette, Rgb, TagAssigner};
