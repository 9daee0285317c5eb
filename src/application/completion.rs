//! Edge-triggered completion tracking.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::selection::SelectionModel;

/// Taste categories that must each hold a pick before the test counts as complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredCategories {
    pub basic: Vec<String>,
    pub extra: Vec<String>,
}

impl Default for RequiredCategories {
    fn default() -> Self {
        Self {
            basic: ["Sourness", "Saltiness", "Sweetness", "Bitterness", "Umami"]
                .map(String::from)
                .to_vec(),
            extra: [
                "Astringency",
                "Aftertaste",
                "Fullness",
                "Smoothness",
                "Fineness",
                "Purity",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl RequiredCategories {
    pub fn all(&self) -> impl Iterator<Item = &String> {
        self.basic.iter().chain(self.extra.iter())
    }
}

/// Direction of a completion change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEdge {
    Complete,
    Incomplete,
}

/// Derived state of a test, as stored under the progress key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub aroma: bool,
    pub satisfied: usize,
    pub required: usize,
    pub missing: Vec<String>,
    pub color: bool,
    pub complete: bool,
}

/// Watches a selection model and reports when completeness flips.
///
/// `notice_shown` mirrors whether the host is showing the completion
/// affordance. It belongs to one chart instance.
#[derive(Debug, Clone)]
pub struct CompletionTracker {
    required: Vec<String>,
    notice_shown: bool,
}

impl CompletionTracker {
    pub fn new(required: Vec<String>) -> Self {
        Self {
            required,
            notice_shown: false,
        }
    }

    pub fn from_categories(categories: &RequiredCategories) -> Self {
        Self::new(categories.all().cloned().collect())
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    pub fn notice_shown(&self) -> bool {
        self.notice_shown
    }

    pub fn is_complete(&self, model: &SelectionModel) -> bool {
        model.has_aroma_selection()
            && self
                .required
                .iter()
                .all(|category| model.flavor().contains_key(category))
            && model.color().is_some()
    }

    pub fn progress(&self, model: &SelectionModel) -> Progress {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|category| !model.flavor().contains_key(*category))
            .cloned()
            .collect();
        Progress {
            aroma: model.has_aroma_selection(),
            satisfied: self.required.len() - missing.len(),
            required: self.required.len(),
            missing,
            color: model.color().is_some(),
            complete: self.is_complete(model),
        }
    }

    /// Recomputes completeness; returns the edge if it differs from the last check.
    pub fn recheck(&mut self, model: &SelectionModel) -> Option<CompletionEdge> {
        let complete = self.is_complete(model);
        match (self.notice_shown, complete) {
            (false, true) => {
                self.notice_shown = true;
                info!("test complete");
                Some(CompletionEdge::Complete)
            }
            (true, false) => {
                self.notice_shown = false;
                info!("test no longer complete");
                Some(CompletionEdge::Incomplete)
            }
            _ => {
                debug!("completion unchanged: {}", complete);
                None
            }
        }
    }
}
