//! Top-level branches and their resolution against a loaded tree.

use std::fmt;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::arena::WheelArena;
use crate::domain::error::{DomainError, DomainResult};

/// Which selection rules govern a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Aroma,
    Taste,
    Color,
}

impl Branch {
    pub const ALL: [Branch; 3] = [Branch::Aroma, Branch::Taste, Branch::Color];
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Branch::Aroma => "aroma",
            Branch::Taste => "taste",
            Branch::Color => "color",
        };
        write!(f, "{name}")
    }
}

/// Names of the root's children that carry each branch's rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNames {
    pub aroma: String,
    pub taste: String,
    pub color: String,
}

impl Default for BranchNames {
    fn default() -> Self {
        Self {
            aroma: "Aroma".into(),
            taste: "Taste".into(),
            color: "Color".into(),
        }
    }
}

impl BranchNames {
    pub fn name(&self, branch: Branch) -> &str {
        match branch {
            Branch::Aroma => &self.aroma,
            Branch::Taste => &self.taste,
            Branch::Color => &self.color,
        }
    }
}

/// Branch nodes of one loaded tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchMap {
    aroma: Index,
    taste: Index,
    color: Index,
}

impl BranchMap {
    /// Finds each configured branch among the root's children.
    pub fn resolve(tree: &WheelArena, names: &BranchNames) -> DomainResult<Self> {
        let root = tree.root().ok_or(DomainError::EmptyTree)?;
        let find = |branch: Branch| {
            let name = names.name(branch);
            tree.child_named(root, name)
                .ok_or_else(|| DomainError::UnknownBranch(name.to_string()))
        };
        let map = Self {
            aroma: find(Branch::Aroma)?,
            taste: find(Branch::Taste)?,
            color: find(Branch::Color)?,
        };
        debug!("resolved branches: {:?}", map);
        Ok(map)
    }

    pub fn index(&self, branch: Branch) -> Index {
        match branch {
            Branch::Aroma => self.aroma,
            Branch::Taste => self.taste,
            Branch::Color => self.color,
        }
    }

    /// Branch a node belongs to, or None outside the three configured subtrees.
    pub fn classify(&self, tree: &WheelArena, idx: Index) -> Option<Branch> {
        let top = tree.top_level_ancestor(idx)?;
        Branch::ALL.into_iter().find(|&b| self.index(b) == top)
    }
}
