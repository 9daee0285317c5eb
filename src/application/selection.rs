//! Selection model: aroma set, per-category taste picks and a single color.

use std::collections::{BTreeMap, BTreeSet};

use generational_arena::Index;
use serde::Serialize;
use tracing::{debug, warn};

use crate::domain::{Branch, BranchMap, Extents, SelectionPath, WheelArena};

/// Any number of aroma leaves.
pub type AromaSelection = BTreeSet<SelectionPath>;
/// Category name (parent of a taste leaf) to the one leaf picked in it.
pub type FlavorSelection = BTreeMap<String, SelectionPath>;
/// At most one color leaf.
pub type ColorSelection = Option<SelectionPath>;

/// What a leaf toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added(Branch),
    Removed(Branch),
    /// A different pick in the same category (taste) or the color was overwritten.
    Replaced(Branch),
    /// Taste leaf toggled before any aroma was chosen. Nothing changed.
    Blocked,
    NotALeaf,
    /// Leaf outside the three configured branches.
    Unclassified,
}

impl ToggleOutcome {
    /// Branch whose structure was mutated, if any.
    pub fn changed(&self) -> Option<Branch> {
        match self {
            ToggleOutcome::Added(b) | ToggleOutcome::Removed(b) | ToggleOutcome::Replaced(b) => {
                Some(*b)
            }
            _ => None,
        }
    }
}

/// Discrete emphasis level of a node on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OpacityTier {
    Hidden,
    Blocked,
    BranchInterior,
    UnselectedLeaf,
    Selected,
}

impl OpacityTier {
    pub fn opacity(self) -> f64 {
        match self {
            OpacityTier::Hidden => 0.0,
            OpacityTier::Blocked => 0.3,
            OpacityTier::BranchInterior => 0.6,
            OpacityTier::UnselectedLeaf => 0.4,
            OpacityTier::Selected => 1.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    aroma: AromaSelection,
    flavor: FlavorSelection,
    color: ColorSelection,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(aroma: AromaSelection, flavor: FlavorSelection, color: ColorSelection) -> Self {
        Self {
            aroma,
            flavor,
            color,
        }
    }

    pub fn aroma(&self) -> &AromaSelection {
        &self.aroma
    }

    pub fn flavor(&self) -> &FlavorSelection {
        &self.flavor
    }

    pub fn color(&self) -> Option<&SelectionPath> {
        self.color.as_ref()
    }

    pub fn has_aroma_selection(&self) -> bool {
        !self.aroma.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.aroma.is_empty() && self.flavor.is_empty() && self.color.is_none()
    }

    pub fn reset(&mut self) {
        self.aroma.clear();
        self.flavor.clear();
        self.color = None;
    }

    /// Drops entries that do not name a leaf of their own branch in `tree`.
    ///
    /// A taste entry must also be keyed by its leaf's category. Returns how many were dropped.
    pub fn retain_known(&mut self, tree: &WheelArena, branches: &BranchMap) -> usize {
        let is_leaf_in = |path: &SelectionPath, branch: Branch| {
            tree.find_path(path).is_some_and(|idx| {
                tree.get_node(idx).is_some_and(|n| n.is_leaf())
                    && branches.classify(tree, idx) == Some(branch)
            })
        };
        let mut dropped = 0;

        self.aroma.retain(|path| {
            let keep = is_leaf_in(path, Branch::Aroma);
            if !keep {
                warn!("discarding stored aroma {}: not an aroma leaf of this wheel", path);
                dropped += 1;
            }
            keep
        });
        self.flavor.retain(|category, path| {
            let keep = path.parent_name() == Some(category.as_str())
                && is_leaf_in(path, Branch::Taste);
            if !keep {
                warn!("discarding stored taste {}={}: not a leaf of that category", category, path);
                dropped += 1;
            }
            keep
        });
        if let Some(path) = &self.color {
            if !is_leaf_in(path, Branch::Color) {
                warn!("discarding stored color {}: not a color leaf of this wheel", path);
                self.color = None;
                dropped += 1;
            }
        }
        dropped
    }

    /// Applies the branch rules of the leaf at `idx`.
    pub fn toggle_leaf(&mut self, tree: &WheelArena, branches: &BranchMap, idx: Index) -> ToggleOutcome {
        let Some(node) = tree.get_node(idx) else {
            return ToggleOutcome::NotALeaf;
        };
        if !node.is_leaf() {
            return ToggleOutcome::NotALeaf;
        }
        let Some(branch) = branches.classify(tree, idx) else {
            debug!("toggle ignored, {} is outside the configured branches", node.data.name);
            return ToggleOutcome::Unclassified;
        };
        let path = tree.path_of(idx);

        let outcome = match branch {
            Branch::Aroma => self.toggle_aroma(path),
            Branch::Taste => self.toggle_taste(path),
            Branch::Color => self.toggle_color(path),
        };
        debug!("toggle {} leaf {}: {:?}", branch, node.data.name, outcome);
        outcome
    }

    fn toggle_aroma(&mut self, path: SelectionPath) -> ToggleOutcome {
        if self.aroma.remove(&path) {
            ToggleOutcome::Removed(Branch::Aroma)
        } else {
            self.aroma.insert(path);
            ToggleOutcome::Added(Branch::Aroma)
        }
    }

    fn toggle_taste(&mut self, path: SelectionPath) -> ToggleOutcome {
        if !self.has_aroma_selection() {
            return ToggleOutcome::Blocked;
        }
        let Some(category) = path.parent_name().map(str::to_string) else {
            return ToggleOutcome::Unclassified;
        };
        let same_pick = self.flavor.get(&category).map(|current| *current == path);
        match same_pick {
            Some(true) => {
                self.flavor.remove(&category);
                ToggleOutcome::Removed(Branch::Taste)
            }
            Some(false) => {
                self.flavor.insert(category, path);
                ToggleOutcome::Replaced(Branch::Taste)
            }
            None => {
                self.flavor.insert(category, path);
                ToggleOutcome::Added(Branch::Taste)
            }
        }
    }

    fn toggle_color(&mut self, path: SelectionPath) -> ToggleOutcome {
        match self.color.replace(path) {
            Some(previous) if Some(&previous) == self.color.as_ref() => {
                self.color = None;
                ToggleOutcome::Removed(Branch::Color)
            }
            Some(_) => ToggleOutcome::Replaced(Branch::Color),
            None => ToggleOutcome::Added(Branch::Color),
        }
    }

    /// Whether `path` is the current pick in its branch's structure.
    pub fn is_selected(&self, branch: Branch, path: &SelectionPath) -> bool {
        match branch {
            Branch::Aroma => self.aroma.contains(path),
            Branch::Taste => path
                .parent_name()
                .and_then(|category| self.flavor.get(category))
                .is_some_and(|picked| picked == path),
            Branch::Color => self.color.as_ref() == Some(path),
        }
    }

    /// Emphasis of the node at `idx` when displayed with `extents`.
    pub fn opacity_tier(
        &self,
        tree: &WheelArena,
        branches: &BranchMap,
        idx: Index,
        extents: &Extents,
    ) -> OpacityTier {
        let Some(node) = tree.get_node(idx) else {
            return OpacityTier::Hidden;
        };
        if !extents.is_visible() {
            return OpacityTier::Hidden;
        }
        let branch = branches.classify(tree, idx);
        if branch == Some(Branch::Taste) && !self.has_aroma_selection() {
            return OpacityTier::Blocked;
        }
        if !node.is_leaf() {
            return OpacityTier::BranchInterior;
        }
        match branch {
            Some(b) if self.is_selected(b, &tree.path_of(idx)) => OpacityTier::Selected,
            _ => OpacityTier::UnselectedLeaf,
        }
    }
}
