//! Arena-backed weighted tree.

use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::geometry::Extents;
use crate::domain::path::SelectionPath;

/// Data payload for wheel nodes, as read from the tree document.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeData {
    /// Display name, also the node's segment in its selection path
    pub name: String,
    /// Optional tooltip text
    pub description: Option<String>,
    /// Optional fill color (e.g. `#9ACD32`)
    pub color: Option<String>,
}

impl NodeData {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            color: None,
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Document data for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in document order
    pub children: Vec<Index>,
    /// Distance from the root (root is 0)
    pub depth: usize,
    /// Leaf-count-equivalent mass of this subtree
    pub weight: f64,
    /// Static extents assigned by the layout engine
    pub layout: Extents,
    /// Extents currently displayed
    pub current: Extents,
    /// Extents the current (or last) transition moves towards
    pub target: Extents,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based weighted tree.
///
/// Parent links are plain arena indices, so ancestor walks never hold
/// a second owner of a node.
#[derive(Debug)]
pub struct WheelArena {
    arena: Arena<TreeNode>,
    root: Option<Index>,
}

impl Default for WheelArena {
    fn default() -> Self {
        Self::new()
    }
}

impl WheelArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Inserts a node below `parent` (or as root) with zero weight and empty extents.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let depth = parent
            .and_then(|p| self.arena.get(p))
            .map(|p| p.depth + 1)
            .unwrap_or(0);
        let node = TreeNode {
            data,
            parent,
            children: Vec::new(),
            depth,
            weight: 0.0,
            layout: Extents::default(),
            current: Extents::default(),
            target: Extents::default(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut TreeNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Pre-order traversal, children left to right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Node indices in pre-order. Useful when the arena is mutated while walking.
    pub fn indices(&self) -> Vec<Index> {
        self.iter().map(|(idx, _)| idx).collect()
    }

    /// Depth of the deepest node (0 for a lone root or an empty tree).
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_height(root)
        } else {
            0
        }
    }

    fn calculate_height(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            node.children
                .iter()
                .map(|&child| 1 + self.calculate_height(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Indices from `idx` up to the root, `idx` first.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut cursor = Some(idx);
        while let Some(current) = cursor {
            match self.get_node(current) {
                Some(node) => {
                    chain.push(current);
                    cursor = node.parent;
                }
                None => break,
            }
        }
        chain
    }

    /// Child of the root that `idx` descends from (or is).
    pub fn top_level_ancestor(&self, idx: Index) -> Option<Index> {
        let chain = self.ancestors(idx);
        // chain ends with the root; the entry before it is the branch
        if chain.len() < 2 || chain.last().copied() != self.root {
            return None;
        }
        chain.get(chain.len() - 2).copied()
    }

    /// Root-to-node name sequence.
    pub fn path_of(&self, idx: Index) -> SelectionPath {
        let names = self
            .ancestors(idx)
            .into_iter()
            .rev()
            .filter_map(|i| self.get_node(i))
            .map(|n| n.data.name.clone())
            .collect();
        SelectionPath::new(names)
    }

    pub fn child_named(&self, parent: Index, name: &str) -> Option<Index> {
        self.get_node(parent)?
            .children
            .iter()
            .copied()
            .find(|&c| self.get_node(c).is_some_and(|n| n.data.name == name))
    }

    /// Resolves a selection path back to its node. The first segment must name the root.
    #[instrument(level = "trace", skip(self))]
    pub fn find_path(&self, path: &SelectionPath) -> Option<Index> {
        let root = self.root?;
        let mut segments = path.segments().iter();
        let first = segments.next()?;
        if self.get_node(root)?.data.name != *first {
            return None;
        }
        segments.try_fold(root, |current, name| self.child_named(current, name))
    }

    /// Collects the selection paths of all leaves, in document order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<SelectionPath> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(idx, _)| self.path_of(idx))
            .collect()
    }
}

pub struct TreeIterator<'a> {
    arena: &'a WheelArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a WheelArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a WheelArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a WheelArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (WheelArena, Index, Index, Index) {
        let mut tree = WheelArena::new();
        let root = tree.insert_node(NodeData::named("Wheel"), None);
        let aroma = tree.insert_node(NodeData::named("Aroma"), Some(root));
        let floral = tree.insert_node(NodeData::named("Floral"), Some(aroma));
        (tree, root, aroma, floral)
    }

    #[test]
    fn test_depth_follows_parent() {
        let (tree, root, aroma, floral) = sample();
        assert_eq!(tree.get_node(root).unwrap().depth, 0);
        assert_eq!(tree.get_node(aroma).unwrap().depth, 1);
        assert_eq!(tree.get_node(floral).unwrap().depth, 2);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_path_and_find_are_inverse() {
        let (tree, _, aroma, floral) = sample();
        let path = tree.path_of(floral);
        assert_eq!(path.key(), "Wheel/Aroma/Floral");
        assert_eq!(tree.find_path(&path), Some(floral));
        assert_eq!(tree.top_level_ancestor(floral), Some(aroma));
        assert_eq!(tree.top_level_ancestor(aroma), Some(aroma));
    }

    #[test]
    fn test_postorder_visits_children_first() {
        let (tree, root, _, floral) = sample();
        let order: Vec<Index> = tree.iter_postorder().map(|(i, _)| i).collect();
        assert_eq!(order.first(), Some(&floral));
        assert_eq!(order.last(), Some(&root));
    }
}
