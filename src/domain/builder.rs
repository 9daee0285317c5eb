//! Hierarchy builder: nested tree documents into weighted arenas.

use std::collections::HashSet;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{NodeData, WheelArena};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::path::PATH_SEPARATOR;

/// One record of the nested tree document.
///
/// `name` is optional here so a missing name is reported with its location
/// instead of as a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub value: Option<f64>,
    #[serde(default)]
    pub children: Option<Vec<RawNode>>,
}

impl RawNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn branch(name: impl Into<String>, children: Vec<RawNode>) -> Self {
        Self {
            name: Some(name.into()),
            children: Some(children),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    fn child_records(&self) -> &[RawNode] {
        self.children.as_deref().unwrap_or_default()
    }
}

/// Converts tree documents into weighted arenas.
///
/// Leaves weigh their explicit `value` or 1; internal nodes weigh the sum
/// of their children.
pub struct HierarchyBuilder {
    // Record addresses, so a record reachable twice is caught
    visited: HashSet<usize>,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
        }
    }

    /// Parse a JSON document and build it.
    #[instrument(level = "debug", skip(self, document), fields(bytes = document.len()))]
    pub fn build_from_str(&mut self, document: &str) -> DomainResult<WheelArena> {
        let value: serde_json::Value = serde_json::from_str(document)?;
        if !value.is_object() {
            return Err(DomainError::EmptyTree);
        }
        let raw: RawNode = serde_json::from_value(value)?;
        self.build(&raw)
    }

    #[instrument(level = "debug", skip(self, raw))]
    pub fn build(&mut self, raw: &RawNode) -> DomainResult<WheelArena> {
        self.visited.clear();
        let mut tree = WheelArena::new();
        let mut stack: Vec<(&RawNode, Option<Index>)> = vec![(raw, None)];

        while let Some((record, parent_idx)) = stack.pop() {
            let parent_path = parent_idx
                .map(|p| tree.path_of(p).key())
                .unwrap_or_default();

            if !self.visited.insert(record as *const RawNode as usize) {
                return Err(DomainError::CycleDetected(parent_path));
            }

            let name = Self::validate_name(record, &parent_path)?;
            if let Some(parent) = parent_idx {
                if tree.child_named(parent, name).is_some() {
                    return Err(DomainError::DuplicateSibling {
                        path: format!("{parent_path}{PATH_SEPARATOR}{name}"),
                    });
                }
            }

            let data = NodeData {
                name: name.to_string(),
                description: record.description.clone(),
                color: record.color.clone(),
            };
            let current_idx = tree.insert_node(data, parent_idx);

            let children = record.child_records();
            if children.is_empty() {
                let weight = Self::leaf_weight(record, &tree, current_idx)?;
                if let Some(node) = tree.get_node_mut(current_idx) {
                    node.weight = weight;
                }
            } else {
                if record.value.is_some() {
                    debug!("ignoring value on internal node {}", name);
                }
                // Reverse so pops follow document order
                for child in children.iter().rev() {
                    stack.push((child, Some(current_idx)));
                }
            }
        }

        Self::accumulate_weights(&mut tree);
        debug!("built tree: {} nodes, height {}", tree.len(), tree.height());
        Ok(tree)
    }

    fn validate_name<'a>(record: &'a RawNode, parent_path: &str) -> DomainResult<&'a str> {
        let name = record
            .name
            .as_deref()
            .ok_or_else(|| DomainError::MissingName {
                parent: parent_path.to_string(),
            })?;
        let reason = if name.trim().is_empty() {
            Some("blank name")
        } else if name.contains(PATH_SEPARATOR) {
            Some("contains the path separator")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(DomainError::InvalidName {
                parent: parent_path.to_string(),
                name: name.to_string(),
                reason: reason.to_string(),
            }),
            None => Ok(name),
        }
    }

    fn leaf_weight(record: &RawNode, tree: &WheelArena, idx: Index) -> DomainResult<f64> {
        let weight = record.value.unwrap_or(1.0);
        if !weight.is_finite() || weight < 0.0 {
            return Err(DomainError::InvalidWeight {
                path: tree.path_of(idx).key(),
                value: weight,
            });
        }
        Ok(weight)
    }

    fn accumulate_weights(tree: &mut WheelArena) {
        let order: Vec<Index> = tree.iter_postorder().map(|(idx, _)| idx).collect();
        for idx in order {
            let sum = match tree.get_node(idx) {
                Some(node) if !node.is_leaf() => node
                    .children
                    .iter()
                    .filter_map(|&c| tree.get_node(c))
                    .map(|c| c.weight)
                    .sum::<f64>(),
                _ => continue,
            };
            if let Some(node) = tree.get_node_mut(idx) {
                node.weight = sum;
            }
        }
    }
}
