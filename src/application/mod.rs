//! Application layer: selection rules, navigation and the chart instance
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod chart;
pub mod completion;
pub mod driver;
pub mod error;
pub mod error_ext;
pub mod navigator;
pub mod selection;

pub use chart::{ChartEvent, ChartOptions, ClickOutcome, FlavorWheel, NodeView};
pub use completion::{CompletionEdge, CompletionTracker, Progress, RequiredCategories};
pub use driver::FrameDriver;
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use navigator::{Navigation, ZoomNavigator, DEFAULT_TRANSITION_MS};
pub use selection::{
    AromaSelection, ColorSelection, FlavorSelection, OpacityTier, SelectionModel, ToggleOutcome,
};
