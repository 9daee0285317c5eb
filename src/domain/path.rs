//! Selection paths: root-to-node name sequences with a stable string key.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::DomainError;

/// Separator between names in a path key.
pub const PATH_SEPARATOR: char = '/';

/// Ordered ancestor-name sequence from the root to a node.
///
/// The string form (`Wheel/Taste/Sourness/Low`) is the key under which
/// selections are stored and compared.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionPath(Vec<String>);

impl SelectionPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn key(&self) -> String {
        self.to_string()
    }

    /// Name of the node the path points at.
    pub fn name(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Name of the node's immediate parent.
    pub fn parent_name(&self) -> Option<&str> {
        self.0.len().checked_sub(2).map(|i| self.0[i].as_str())
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.into());
        Self(segments)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SelectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{PATH_SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for SelectionPath {
    type Err = DomainError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        let segments: Vec<String> = key.split(PATH_SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(DomainError::InvalidPath(key.to_string()));
        }
        Ok(Self(segments))
    }
}
