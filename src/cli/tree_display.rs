//! Terminal rendering of the weighted tree.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::WheelArena;

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for WheelArena {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn label(arena: &WheelArena, idx: Index) -> String {
            arena
                .get_node(idx)
                .map(|node| format!("{} ({})", node.data.name, node.weight))
                .unwrap_or_default()
        }

        fn build_tree(arena: &WheelArena, node_idx: Index, parent_tree: &mut Tree<String>) {
            if let Some(node) = arena.get_node(node_idx) {
                for &child_idx in &node.children {
                    let mut child_tree = Tree::new(label(arena, child_idx));
                    build_tree(arena, child_idx, &mut child_tree);
                    parent_tree.push(child_tree);
                }
            }
        }

        match self.root() {
            Some(root_idx) => {
                let mut tree = Tree::new(label(self, root_idx));
                build_tree(self, root_idx, &mut tree);
                tree
            }
            None => Tree::new("Empty tree".to_string()),
        }
    }
}
