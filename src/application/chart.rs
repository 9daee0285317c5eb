//! One flavor wheel instance: tree, navigation, selections and their events.

use std::sync::Arc;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::application::completion::{CompletionEdge, CompletionTracker, Progress, RequiredCategories};
use crate::application::error_ext::IoResultExt;
use crate::application::navigator::{Navigation, ZoomNavigator, DEFAULT_TRANSITION_MS};
use crate::application::selection::{OpacityTier, SelectionModel, ToggleOutcome};
use crate::application::ApplicationResult;
use crate::domain::{
    label_text, Branch, BranchMap, BranchNames, DomainError, Extents, HierarchyBuilder,
    LabelTransform, RadialLayoutEngine, SelectionPath, WheelArena,
};
use crate::infrastructure::persistence::{PersistenceAdapter, StorageKeys};
use crate::infrastructure::traits::{DataSource, KeyValueStore};

/// Default ring width in chart units, used for label placement.
pub const DEFAULT_CHART_RADIUS: f64 = 100.0;

/// Construction configuration of a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub storage_keys: StorageKeys,
    pub required_categories: RequiredCategories,
    pub branch_names: BranchNames,
    pub transition_ms: f64,
    pub chart_radius: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            storage_keys: StorageKeys::default(),
            required_categories: RequiredCategories::default(),
            branch_names: BranchNames::default(),
            transition_ms: DEFAULT_TRANSITION_MS,
            chart_radius: DEFAULT_CHART_RADIUS,
        }
    }
}

/// Notifications for the host, queued until drained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartEvent {
    SelectionChanged(Branch),
    TestComplete,
    TestIncomplete,
    TransitionComplete,
}

/// Result of a click on a chart segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Navigation(Navigation),
    Toggle(ToggleOutcome),
    /// The segment is not displayed and takes no pointer input.
    Ignored,
}

/// What the renderer needs to draw one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub name: String,
    /// Display text, with intensity ratings drawn as dots.
    pub label: String,
    pub path: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub extents: Extents,
    pub opacity_tier: OpacityTier,
    pub is_visible: bool,
    pub label_visible: bool,
    pub label_transform: LabelTransform,
}

pub struct FlavorWheel {
    tree: WheelArena,
    branches: BranchMap,
    selection: SelectionModel,
    tracker: CompletionTracker,
    navigator: ZoomNavigator,
    persistence: PersistenceAdapter,
    chart_radius: f64,
    events: Vec<ChartEvent>,
}

impl FlavorWheel {
    /// Fetches and builds the tree, then hydrates selections from `store`.
    ///
    /// Only a malformed document (or an unreadable source) fails.
    #[instrument(level = "debug", skip_all, fields(source = %source.describe()))]
    pub fn load(
        options: &ChartOptions,
        source: &dyn DataSource,
        store: Arc<dyn KeyValueStore>,
    ) -> ApplicationResult<Self> {
        let document = source
            .fetch()
            .with_context("fetch tree document", &source.describe())?;
        let tree = HierarchyBuilder::new().build_from_str(&document)?;
        Self::from_tree(options, tree, store)
    }

    pub fn from_tree(
        options: &ChartOptions,
        mut tree: WheelArena,
        store: Arc<dyn KeyValueStore>,
    ) -> ApplicationResult<Self> {
        RadialLayoutEngine::new().compute_layout(&mut tree);
        let root = tree.root().ok_or(DomainError::EmptyTree)?;
        let branches = BranchMap::resolve(&tree, &options.branch_names)?;
        let persistence = PersistenceAdapter::new(store, options.storage_keys.clone());
        let mut selection = persistence.load();
        let dropped = selection.retain_known(&tree, &branches);
        debug!(
            "hydrated selections: {} aroma, {} flavor, color {}, {} discarded",
            selection.aroma().len(),
            selection.flavor().len(),
            selection.color().is_some(),
            dropped
        );

        let mut chart = Self {
            tree,
            branches,
            selection,
            tracker: CompletionTracker::from_categories(&options.required_categories),
            navigator: ZoomNavigator::new(root, options.transition_ms),
            persistence,
            chart_radius: options.chart_radius,
            events: Vec::new(),
        };
        chart.recheck();
        Ok(chart)
    }

    pub fn tree(&self) -> &WheelArena {
        &self.tree
    }

    pub fn branches(&self) -> &BranchMap {
        &self.branches
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    pub fn focus(&self) -> Index {
        self.navigator.focus()
    }

    pub fn is_animating(&self) -> bool {
        self.navigator.is_animating()
    }

    pub fn is_complete(&self) -> bool {
        self.tracker.is_complete(&self.selection)
    }

    pub fn progress(&self) -> Progress {
        self.tracker.progress(&self.selection)
    }

    /// Node addressed by a path key such as `Wheel/Aroma/Floral`.
    pub fn find(&self, key: &str) -> Option<Index> {
        let path: SelectionPath = key.parse().ok()?;
        self.tree.find_path(&path)
    }

    /// Pointer input on a segment: internal nodes drill, leaves toggle.
    pub fn click(&mut self, idx: Index) -> ClickOutcome {
        let Some(node) = self.tree.get_node(idx) else {
            return ClickOutcome::Ignored;
        };
        if !node.current.is_visible() {
            return ClickOutcome::Ignored;
        }
        if node.is_leaf() {
            ClickOutcome::Toggle(self.toggle_leaf(idx))
        } else {
            ClickOutcome::Navigation(self.drill(idx))
        }
    }

    /// Pointer input on the center disc.
    pub fn click_center(&mut self) -> Navigation {
        self.zoom_out()
    }

    pub fn drill(&mut self, idx: Index) -> Navigation {
        self.navigator.drill(&mut self.tree, idx)
    }

    pub fn zoom_out(&mut self) -> Navigation {
        self.navigator.zoom_out(&mut self.tree)
    }

    /// Advances the animation by `delta` time units.
    pub fn tick(&mut self, delta: f64) {
        if self.navigator.tick(&mut self.tree, delta) {
            self.events.push(ChartEvent::TransitionComplete);
            self.recheck();
        }
    }

    pub fn toggle_leaf(&mut self, idx: Index) -> ToggleOutcome {
        let outcome = self.selection.toggle_leaf(&self.tree, &self.branches, idx);
        if let Some(branch) = outcome.changed() {
            self.persistence.save(&self.selection, branch);
            self.events.push(ChartEvent::SelectionChanged(branch));
            self.recheck();
            self.persistence.save_progress(&self.progress());
        }
        outcome
    }

    /// Clears every selection and its stored keys.
    pub fn reset(&mut self) {
        self.selection.reset();
        self.persistence.reset();
        for branch in Branch::ALL {
            self.events.push(ChartEvent::SelectionChanged(branch));
        }
        self.recheck();
        info!("selections reset");
    }

    fn recheck(&mut self) {
        match self.tracker.recheck(&self.selection) {
            Some(CompletionEdge::Complete) => self.events.push(ChartEvent::TestComplete),
            Some(CompletionEdge::Incomplete) => self.events.push(ChartEvent::TestIncomplete),
            None => {}
        }
    }

    /// Takes all events queued since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<ChartEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn node_view(&self, idx: Index) -> Option<NodeView> {
        let node = self.tree.get_node(idx)?;
        let extents = node.current;
        Some(NodeView {
            name: node.data.name.clone(),
            label: label_text(&node.data.name).into_owned(),
            path: self.tree.path_of(idx).key(),
            color: node.data.color.clone(),
            description: node.data.description.clone(),
            extents,
            opacity_tier: self
                .selection
                .opacity_tier(&self.tree, &self.branches, idx, &extents),
            is_visible: extents.is_visible(),
            label_visible: extents.label_visible(),
            label_transform: extents.label_transform(self.chart_radius),
        })
    }

    /// Views of every node except the root (drawn as the center disc), pre-order.
    pub fn views(&self) -> Vec<NodeView> {
        self.tree
            .iter()
            .filter(|(_, node)| node.parent.is_some())
            .filter_map(|(idx, _)| self.node_view(idx))
            .collect()
    }
}
