//! Domain layer: weighted tree, geometry and layout
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod branches;
pub mod builder;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod path;

pub use arena::{NodeData, TreeNode, WheelArena};
pub use branches::{Branch, BranchMap, BranchNames};
pub use builder::{HierarchyBuilder, RawNode};
pub use error::{DomainError, DomainResult};
pub use geometry::{ease_cubic_in_out, label_text, Extents, LabelTransform};
pub use layout::RadialLayoutEngine;
pub use path::{SelectionPath, PATH_SEPARATOR};

/// Expands `~`, `$VAR` and `${VAR}`; returns the input unchanged on failure.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
