/*
Text rendering of a weighted tree, one line per node with its aggregate weight:

root (100)
├── docs (40)
│   ├── a.txt (30)
│   └── b.txt (10)
└── c.bin (60)
 */
use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{NodeId, WeightedTree};

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for WeightedTree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(tree: &WeightedTree, id: NodeId) -> Tree<String> {
            match tree.get(id) {
                Some(node) => Tree::new(format!("{} ({})", node.label(), node.weight()))
                    .with_leaves(node.children().iter().map(|&child| build_tree(tree, child))),
                None => Tree::new(format!("<stale {}>", id)),
            }
        }

        match self.root() {
            Some(root) => build_tree(self, root),
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
