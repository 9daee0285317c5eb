//! Radial drill-down flavor wheel.
//!
//! Builds a weighted tree from a JSON document, lays it out as concentric
//! rings, animates zoom transitions between foci, and records tasting
//! selections with completion tracking and persistence.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
