//! Feeds clock time into a chart's animation.

use std::sync::Arc;

use tracing::trace;

use crate::application::chart::FlavorWheel;
use crate::infrastructure::traits::Clock;

/// Turns clock readings into tick deltas, one call per frame.
///
/// The first frame of a transition advances by zero, so time spent idle
/// before a drill never counts towards it.
pub struct FrameDriver {
    clock: Arc<dyn Clock>,
    last: Option<f64>,
}

impl FrameDriver {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock, last: None }
    }

    /// Runs one frame. Returns whether the chart is still animating.
    pub fn frame(&mut self, chart: &mut FlavorWheel) -> bool {
        if !chart.is_animating() {
            self.last = None;
            return false;
        }
        let now = self.clock.now_ms();
        let delta = self.last.map(|prev| now - prev).unwrap_or(0.0);
        self.last = Some(now);
        trace!("frame: delta {:.2}ms", delta);
        chart.tick(delta);
        chart.is_animating()
    }

    /// Frames until the transition settles, calling `between` after each one.
    pub fn run_until_idle(&mut self, chart: &mut FlavorWheel, mut between: impl FnMut()) {
        while self.frame(chart) {
            between();
        }
        self.last = None;
    }
}
