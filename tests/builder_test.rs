//! Integration tests for HierarchyBuilder: weights, naming rules and malformed input.

mod common;

use flavorwheel::domain::{DomainError, HierarchyBuilder, RawNode, SelectionPath};
use rstest::rstest;

use common::{build, tasting_tree, SMALL_WHEEL};

fn weight_of(tree: &flavorwheel::domain::WheelArena, key: &str) -> f64 {
    let path: SelectionPath = key.parse().expect("valid path");
    let idx = tree.find_path(&path).expect("node exists");
    tree.get_node(idx).expect("node").weight
}

#[test]
fn given_document_when_building_then_preserves_hierarchy_and_order() {
    // Arrange
    let mut builder = HierarchyBuilder::new();

    // Act
    let tree = builder.build_from_str(SMALL_WHEEL).expect("build");

    // Assert
    assert_eq!(tree.len(), 10);
    let leaves: Vec<String> = tree.leaf_nodes().iter().map(SelectionPath::key).collect();
    assert_eq!(
        leaves,
        vec![
            "Wheel/Aroma/Floral/Jasmine",
            "Wheel/Taste/Sourness/Low",
            "Wheel/Taste/Sourness/High",
            "Wheel/Color/Amber",
        ]
    );
    assert_eq!(tree.height(), 3);
}

#[test]
fn given_leaf_values_when_building_then_internal_weights_are_sums() {
    // Arrange
    let raw = tasting_tree();

    // Act
    let tree = build(&raw);

    // Assert
    assert_eq!(weight_of(&tree, "Wheel/Aroma/Floral/Rose"), 3.0);
    assert_eq!(weight_of(&tree, "Wheel/Aroma/Floral"), 4.0);
    assert_eq!(weight_of(&tree, "Wheel/Aroma"), 5.0);
    assert_eq!(weight_of(&tree, "Wheel/Taste"), 4.0);
    assert_eq!(weight_of(&tree, "Wheel"), 11.0);
}

#[test]
fn given_value_on_internal_node_when_building_then_value_is_ignored() {
    // Arrange
    let raw = RawNode::branch(
        "Wheel",
        vec![RawNode::branch("Aroma", vec![RawNode::leaf("Jasmine")]).with_value(40.0)],
    );

    // Act
    let tree = build(&raw);

    // Assert
    assert_eq!(weight_of(&tree, "Wheel/Aroma"), 1.0);
}

#[test]
fn given_zero_value_leaf_when_building_then_weight_is_zero() {
    let raw = RawNode::branch("Wheel", vec![RawNode::leaf("Ghost").with_value(0.0)]);

    let tree = build(&raw);

    assert_eq!(weight_of(&tree, "Wheel/Ghost"), 0.0);
    assert_eq!(weight_of(&tree, "Wheel"), 0.0);
}

#[test]
fn given_node_without_name_when_building_then_missing_name_names_parent() {
    // Arrange
    let doc = r#"{"name": "Wheel", "children": [{"name": "Aroma", "children": [{"value": 2}]}]}"#;

    // Act
    let result = HierarchyBuilder::new().build_from_str(doc);

    // Assert
    match result {
        Err(DomainError::MissingName { parent }) => assert_eq!(parent, "Wheel/Aroma"),
        other => panic!("expected MissingName, got {other:?}"),
    }
}

#[rstest]
#[case::blank("   ")]
#[case::separator("Floral/Jasmine")]
fn given_invalid_name_when_building_then_rejected(#[case] name: &str) {
    let raw = RawNode::branch("Wheel", vec![RawNode::leaf(name)]);

    let result = HierarchyBuilder::new().build(&raw);

    assert!(
        matches!(result, Err(DomainError::InvalidName { .. })),
        "got {result:?}"
    );
}

#[rstest]
#[case::negative(-1.0)]
#[case::nan(f64::NAN)]
#[case::infinite(f64::INFINITY)]
fn given_bad_leaf_value_when_building_then_invalid_weight(#[case] value: f64) {
    let raw = RawNode::branch("Wheel", vec![RawNode::leaf("Jasmine").with_value(value)]);

    let result = HierarchyBuilder::new().build(&raw);

    match result {
        Err(DomainError::InvalidWeight { path, .. }) => assert_eq!(path, "Wheel/Jasmine"),
        other => panic!("expected InvalidWeight, got {other:?}"),
    }
}

#[test]
fn given_duplicate_siblings_when_building_then_rejected() {
    let raw = RawNode::branch(
        "Wheel",
        vec![RawNode::leaf("Jasmine"), RawNode::leaf("Jasmine")],
    );

    let result = HierarchyBuilder::new().build(&raw);

    match result {
        Err(DomainError::DuplicateSibling { path }) => assert_eq!(path, "Wheel/Jasmine"),
        other => panic!("expected DuplicateSibling, got {other:?}"),
    }
}

#[test]
fn given_same_name_under_different_parents_when_building_then_accepted() {
    let tree = build(&tasting_tree());

    assert!(tree
        .find_path(&"Wheel/Taste/Umami/Low".parse().expect("path"))
        .is_some());
    assert!(tree
        .find_path(&"Wheel/Taste/Sourness/Low".parse().expect("path"))
        .is_some());
}

#[rstest]
#[case::not_json("{ name: Wheel")]
#[case::wrong_type(r#"{"name": "Wheel", "children": [{"name": "A", "value": "heavy"}]}"#)]
fn given_malformed_document_when_building_then_malformed(#[case] doc: &str) {
    let result = HierarchyBuilder::new().build_from_str(doc);

    assert!(matches!(result, Err(DomainError::Malformed(_))), "got {result:?}");
}

#[rstest]
#[case::array("[]")]
#[case::null("null")]
fn given_non_object_document_when_building_then_empty_tree(#[case] doc: &str) {
    let result = HierarchyBuilder::new().build_from_str(doc);

    assert!(matches!(result, Err(DomainError::EmptyTree)), "got {result:?}");
}

#[test]
fn given_builder_when_reused_then_second_build_is_independent() {
    // Arrange
    let mut builder = HierarchyBuilder::new();
    let raw = tasting_tree();

    // Act
    let first = builder.build(&raw).expect("first build");
    let second = builder.build(&raw).expect("second build");

    // Assert
    assert_eq!(first.len(), second.len());
}
