//! Strip-subdivision treemaps over weighted hierarchies.
//!
//! The [`domain`] layer holds the arena-backed [`WeightedTree`], the layout
//! and hit-test routines that share one subdivision, and the grow, shrink
//! and delete mutations. [`application`] keeps interactive session state,
//! [`infrastructure`] reads datasets from disk and [`cli`] wires it to a
//! command line.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{
    hit_test, layout, DomainError, Mutation, NodeId, Point, Rect, Tile, TreeBuilder, WeightedTree,
};
