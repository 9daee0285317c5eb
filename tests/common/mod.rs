//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use flavorwheel::application::{ChartOptions, FlavorWheel, RequiredCategories};
use flavorwheel::domain::{HierarchyBuilder, RawNode, WheelArena};
use flavorwheel::infrastructure::{Clock, InlineDataSource, KeyValueStore, MemoryStore};
use flavorwheel::util::testing;

/// Aroma→Floral→Jasmine, Taste→Sourness→{Low, High}, Color→Amber.
pub const SMALL_WHEEL: &str = r#"{
  "name": "Wheel",
  "children": [
    {"name": "Aroma", "children": [
      {"name": "Floral", "children": [{"name": "Jasmine"}]}
    ]},
    {"name": "Taste", "children": [
      {"name": "Sourness", "children": [{"name": "Low"}, {"name": "High"}]}
    ]},
    {"name": "Color", "children": [{"name": "Amber"}]}
  ]
}"#;

/// Richer tree with weights and two taste categories.
pub fn tasting_tree() -> RawNode {
    RawNode::branch(
        "Wheel",
        vec![
            RawNode::branch(
                "Aroma",
                vec![
                    RawNode::branch(
                        "Floral",
                        vec![RawNode::leaf("Jasmine"), RawNode::leaf("Rose").with_value(3.0)],
                    ),
                    RawNode::branch("Roasted", vec![RawNode::leaf("Hojicha")]),
                ],
            ),
            RawNode::branch(
                "Taste",
                vec![
                    RawNode::branch("Sourness", vec![RawNode::leaf("Low"), RawNode::leaf("High")]),
                    RawNode::branch("Umami", vec![RawNode::leaf("Low"), RawNode::leaf("High")]),
                ],
            ),
            RawNode::branch("Color", vec![RawNode::leaf("Amber"), RawNode::leaf("Jade")]),
        ],
    )
}

pub fn build(raw: &RawNode) -> WheelArena {
    testing::init_test_setup();
    HierarchyBuilder::new().build(raw).expect("valid tree")
}

pub fn options(required: &[&str]) -> ChartOptions {
    ChartOptions {
        required_categories: RequiredCategories {
            basic: required.iter().map(|s| s.to_string()).collect(),
            extra: Vec::new(),
        },
        ..ChartOptions::default()
    }
}

pub fn small_chart(store: Arc<dyn KeyValueStore>) -> FlavorWheel {
    testing::init_test_setup();
    let source = InlineDataSource(SMALL_WHEEL.to_string());
    FlavorWheel::load(&options(&["Sourness"]), &source, store).expect("chart loads")
}

pub fn memory_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new())
}

/// Clock advanced by hand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<f64>,
}

impl ManualClock {
    pub fn advance(&self, ms: f64) {
        *self.now.lock().expect("clock lock") += ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        *self.now.lock().expect("clock lock")
    }
}
