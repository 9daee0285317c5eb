//! Radial partition layout.
//!
//! The root owns the whole circle and ring 0. Every parent slices its own
//! angular span among its children in document order, proportional to
//! `child.weight / parent.weight`. Ring `[depth, depth + 1]` holds all nodes
//! of that depth, so the chart spans `[0, height + 1]` radially.

use std::f64::consts::TAU;

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::WheelArena;
use crate::domain::geometry::Extents;

#[derive(Debug, Default, Clone, Copy)]
pub struct RadialLayoutEngine;

impl RadialLayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Assigns static extents to every node and resets current/target to them.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn compute_layout(&self, tree: &mut WheelArena) {
        let Some(root) = tree.root() else {
            return;
        };
        if let Some(node) = tree.get_node_mut(root) {
            node.layout = Extents::new(0.0, TAU, 0.0, 1.0);
        }

        // Pre-order: a parent is placed before its children are sliced
        for idx in tree.indices() {
            let Some(parent) = tree.get_node(idx) else {
                continue;
            };
            let span = parent.layout;
            let weight = parent.weight;
            let children: Vec<(Index, f64, f64)> = parent
                .children
                .iter()
                .filter_map(|&c| tree.get_node(c).map(|n| (c, n.weight, n.depth as f64)))
                .collect();

            let mut cursor = span.angle_start;
            for (child, child_weight, depth) in children {
                let share = if weight > 0.0 { child_weight / weight } else { 0.0 };
                let width = span.angle_span() * share;
                if let Some(node) = tree.get_node_mut(child) {
                    node.layout = Extents::new(cursor, cursor + width, depth, depth + 1.0);
                }
                cursor += width;
            }
        }

        for idx in tree.indices() {
            if let Some(node) = tree.get_node_mut(idx) {
                node.current = node.layout;
                node.target = node.layout;
            }
        }
        debug!("layout: {} nodes over {} rings", tree.len(), tree.height() + 1);
    }
}
