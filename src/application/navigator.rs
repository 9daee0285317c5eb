//! Zoom navigation: focus changes and their animated transitions.
//!
//! A drill or zoom-out computes a target for every node relative to the new
//! focus, then [`ZoomNavigator::tick`] moves the displayed extents towards
//! those targets. The navigator knows nothing about clocks; callers feed
//! elapsed time units.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::{ease_cubic_in_out, Extents, WheelArena};

/// Reference duration of a focus transition, in milliseconds.
pub const DEFAULT_TRANSITION_MS: f64 = 550.0;

/// Result of a drill or zoom-out request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Started,
    /// A transition is in flight; the request was dropped.
    Busy,
    /// Leaf, unknown node, or a focus with no angular width.
    Ignored,
}

#[derive(Debug, Clone)]
struct Transition {
    elapsed: f64,
    /// Displayed extents of every node when the transition started
    origins: Vec<(Index, Extents)>,
}

#[derive(Debug, Clone)]
pub struct ZoomNavigator {
    focus: Index,
    duration: f64,
    transition: Option<Transition>,
}

impl ZoomNavigator {
    pub fn new(root: Index, duration: f64) -> Self {
        Self {
            focus: root,
            duration,
            transition: None,
        }
    }

    pub fn focus(&self) -> Index {
        self.focus
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Linear progress of the in-flight transition in `[0, 1]`.
    pub fn progress(&self) -> Option<f64> {
        self.transition.as_ref().map(|t| self.fraction(t.elapsed))
    }

    /// Centers the internal node `target`.
    #[instrument(level = "debug", skip(self, tree))]
    pub fn drill(&mut self, tree: &mut WheelArena, target: Index) -> Navigation {
        if self.is_animating() {
            debug!("drill rejected: transition in flight");
            return Navigation::Busy;
        }
        match tree.get_node(target) {
            Some(node) if !node.is_leaf() => self.focus_on(tree, target),
            _ => Navigation::Ignored,
        }
    }

    /// Centers the parent of the current focus (the root stays the root).
    #[instrument(level = "debug", skip(self, tree))]
    pub fn zoom_out(&mut self, tree: &mut WheelArena) -> Navigation {
        if self.is_animating() {
            debug!("zoom-out rejected: transition in flight");
            return Navigation::Busy;
        }
        let parent = tree
            .get_node(self.focus)
            .and_then(|node| node.parent)
            .or_else(|| tree.root());
        match parent {
            Some(parent) => self.focus_on(tree, parent),
            None => Navigation::Ignored,
        }
    }

    fn focus_on(&mut self, tree: &mut WheelArena, focus: Index) -> Navigation {
        let Some(focus_extents) = tree.get_node(focus).map(|n| n.layout) else {
            return Navigation::Ignored;
        };
        let at_root = tree.root() == Some(focus);
        if !at_root && focus_extents.angle_span() <= 0.0 {
            debug!("focus ignored: zero angular width");
            return Navigation::Ignored;
        }

        let indices = tree.indices();
        let mut origins = Vec::with_capacity(indices.len());
        for idx in indices {
            if let Some(node) = tree.get_node_mut(idx) {
                // The root layout is its own frame of reference
                node.target = if at_root {
                    node.layout
                } else {
                    node.layout.relative_to(&focus_extents)
                };
                origins.push((idx, node.current));
            }
        }

        self.focus = focus;
        self.transition = Some(Transition {
            elapsed: 0.0,
            origins,
        });
        debug!("transition started towards {:?}", focus);
        Navigation::Started
    }

    /// Advances the in-flight transition by `delta` time units.
    ///
    /// Returns true on the tick that finishes it; every node's current
    /// extents then equal its target exactly.
    pub fn tick(&mut self, tree: &mut WheelArena, delta: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        transition.elapsed += delta.max(0.0);
        let elapsed = transition.elapsed;
        let t = self.fraction(elapsed);

        if t >= 1.0 {
            for idx in tree.indices() {
                if let Some(node) = tree.get_node_mut(idx) {
                    node.current = node.target;
                }
            }
            self.transition = None;
            debug!("transition complete");
            return true;
        }

        let eased = ease_cubic_in_out(t);
        if let Some(transition) = self.transition.as_ref() {
            for (idx, origin) in &transition.origins {
                if let Some(node) = tree.get_node_mut(*idx) {
                    node.current = origin.lerp(&node.target, eased);
                }
            }
        }
        false
    }

    fn fraction(&self, elapsed: f64) -> f64 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration).min(1.0)
        }
    }
}
