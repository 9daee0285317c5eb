//! Integration tests for SelectionModel branch rules and opacity tiers.

mod common;

use flavorwheel::application::{OpacityTier, SelectionModel, ToggleOutcome};
use flavorwheel::domain::{
    Branch, BranchMap, BranchNames, Extents, RadialLayoutEngine, RawNode, SelectionPath,
    WheelArena,
};
use generational_arena::Index;
use rstest::{fixture, rstest};

use common::{build, tasting_tree};

struct Wheel {
    tree: WheelArena,
    branches: BranchMap,
}

impl Wheel {
    fn idx(&self, key: &str) -> Index {
        let path: SelectionPath = key.parse().expect("valid path");
        self.tree.find_path(&path).expect("node exists")
    }

    fn toggle(&self, model: &mut SelectionModel, key: &str) -> ToggleOutcome {
        model.toggle_leaf(&self.tree, &self.branches, self.idx(key))
    }

    fn retain_known(&self, model: &mut SelectionModel) -> usize {
        model.retain_known(&self.tree, &self.branches)
    }

    fn tier(&self, model: &SelectionModel, key: &str) -> OpacityTier {
        let idx = self.idx(key);
        let extents = self.tree.get_node(idx).expect("node").current;
        model.opacity_tier(&self.tree, &self.branches, idx, &extents)
    }
}

#[fixture]
fn wheel() -> Wheel {
    let mut tree = build(&tasting_tree());
    RadialLayoutEngine::new().compute_layout(&mut tree);
    let branches = BranchMap::resolve(&tree, &BranchNames::default()).expect("branches");
    Wheel { tree, branches }
}

fn path(key: &str) -> SelectionPath {
    key.parse().expect("valid path")
}

#[rstest]
fn given_aroma_leaf_when_toggled_twice_then_state_restored(wheel: Wheel) {
    // Arrange
    let mut model = SelectionModel::new();
    let before = model.clone();

    // Act
    let first = wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    let second = wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");

    // Assert
    assert_eq!(first, ToggleOutcome::Added(Branch::Aroma));
    assert_eq!(second, ToggleOutcome::Removed(Branch::Aroma));
    assert_eq!(model, before);
}

#[rstest]
fn given_several_aroma_leaves_when_toggled_then_all_kept(wheel: Wheel) {
    let mut model = SelectionModel::new();

    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    wheel.toggle(&mut model, "Wheel/Aroma/Roasted/Hojicha");

    assert_eq!(model.aroma().len(), 2);
    assert!(model.has_aroma_selection());
    assert!(model.aroma().contains(&path("Wheel/Aroma/Roasted/Hojicha")));
}

#[rstest]
fn given_no_aroma_when_toggling_taste_then_blocked_and_unchanged(wheel: Wheel) {
    // Arrange
    let mut model = SelectionModel::new();

    // Act
    let outcome = wheel.toggle(&mut model, "Wheel/Taste/Sourness/Low");

    // Assert
    assert_eq!(outcome, ToggleOutcome::Blocked);
    assert!(model.is_empty());
    assert_eq!(outcome.changed(), None);
}

#[rstest]
fn given_aroma_when_toggling_taste_then_one_pick_per_category(wheel: Wheel) {
    // Arrange
    let mut model = SelectionModel::new();
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");

    // Act
    let added = wheel.toggle(&mut model, "Wheel/Taste/Sourness/Low");
    let replaced = wheel.toggle(&mut model, "Wheel/Taste/Sourness/High");
    let other = wheel.toggle(&mut model, "Wheel/Taste/Umami/Low");

    // Assert
    assert_eq!(added, ToggleOutcome::Added(Branch::Taste));
    assert_eq!(replaced, ToggleOutcome::Replaced(Branch::Taste));
    assert_eq!(other, ToggleOutcome::Added(Branch::Taste));
    assert_eq!(model.flavor().len(), 2);
    assert_eq!(
        model.flavor().get("Sourness"),
        Some(&path("Wheel/Taste/Sourness/High"))
    );
}

#[rstest]
fn given_current_taste_pick_when_toggled_again_then_category_cleared(wheel: Wheel) {
    let mut model = SelectionModel::new();
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    wheel.toggle(&mut model, "Wheel/Taste/Sourness/Low");

    let outcome = wheel.toggle(&mut model, "Wheel/Taste/Sourness/Low");

    assert_eq!(outcome, ToggleOutcome::Removed(Branch::Taste));
    assert!(!model.flavor().contains_key("Sourness"));
}

#[rstest]
fn given_color_pick_when_other_color_toggled_then_replaced(wheel: Wheel) {
    // Arrange
    let mut model = SelectionModel::new();

    // Act
    let first = wheel.toggle(&mut model, "Wheel/Color/Amber");
    let second = wheel.toggle(&mut model, "Wheel/Color/Jade");
    let third = wheel.toggle(&mut model, "Wheel/Color/Jade");

    // Assert
    assert_eq!(first, ToggleOutcome::Added(Branch::Color));
    assert_eq!(second, ToggleOutcome::Replaced(Branch::Color));
    assert_eq!(third, ToggleOutcome::Removed(Branch::Color));
    assert_eq!(model.color(), None);
}

#[rstest]
fn given_color_without_aroma_when_toggled_then_accepted(wheel: Wheel) {
    let mut model = SelectionModel::new();

    let outcome = wheel.toggle(&mut model, "Wheel/Color/Amber");

    assert_eq!(outcome, ToggleOutcome::Added(Branch::Color));
}

#[rstest]
fn given_internal_node_when_toggled_then_not_a_leaf(wheel: Wheel) {
    let mut model = SelectionModel::new();

    let outcome = wheel.toggle(&mut model, "Wheel/Aroma/Floral");

    assert_eq!(outcome, ToggleOutcome::NotALeaf);
    assert!(model.is_empty());
}

#[test]
fn given_leaf_outside_branches_when_toggled_then_unclassified() {
    // Arrange
    let mut raw = tasting_tree();
    if let Some(children) = raw.children.as_mut() {
        children.push(RawNode::leaf("Notes"));
    }
    let tree = build(&raw);
    let branches = BranchMap::resolve(&tree, &BranchNames::default()).expect("branches");
    let idx = tree.find_path(&path("Wheel/Notes")).expect("node");
    let mut model = SelectionModel::new();

    // Act
    let outcome = model.toggle_leaf(&tree, &branches, idx);

    // Assert
    assert_eq!(outcome, ToggleOutcome::Unclassified);
    assert!(model.is_empty());
}

#[rstest]
fn given_selections_when_reset_then_empty(wheel: Wheel) {
    let mut model = SelectionModel::new();
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    wheel.toggle(&mut model, "Wheel/Taste/Sourness/Low");
    wheel.toggle(&mut model, "Wheel/Color/Amber");

    model.reset();

    assert!(model.is_empty());
    assert!(!model.has_aroma_selection());
}

#[rstest]
fn given_no_aroma_when_computing_tiers_then_taste_is_blocked(wheel: Wheel) {
    let model = SelectionModel::new();

    assert_eq!(wheel.tier(&model, "Wheel/Taste"), OpacityTier::Blocked);
    assert_eq!(wheel.tier(&model, "Wheel/Taste/Sourness"), OpacityTier::Blocked);
    // ring 3 lies beyond the visible rings at the root
    assert_eq!(wheel.tier(&model, "Wheel/Taste/Sourness/Low"), OpacityTier::Hidden);
    assert_eq!(wheel.tier(&model, "Wheel/Aroma"), OpacityTier::BranchInterior);
    assert_eq!(wheel.tier(&model, "Wheel/Color/Amber"), OpacityTier::UnselectedLeaf);
}

#[rstest]
fn given_picks_when_computing_tiers_then_selected_leaves_are_opaque(wheel: Wheel) {
    // Arrange
    let mut model = SelectionModel::new();
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    wheel.toggle(&mut model, "Wheel/Color/Amber");

    // Act / Assert
    assert_eq!(wheel.tier(&model, "Wheel/Color/Amber"), OpacityTier::Selected);
    assert_eq!(wheel.tier(&model, "Wheel/Color/Jade"), OpacityTier::UnselectedLeaf);
    assert_eq!(wheel.tier(&model, "Wheel/Taste/Sourness"), OpacityTier::BranchInterior);
    assert_eq!(wheel.tier(&model, "Wheel/Aroma/Floral/Jasmine"), OpacityTier::Hidden);
}

#[rstest]
fn given_taste_pick_when_checking_is_selected_then_only_current_pick(wheel: Wheel) {
    let mut model = SelectionModel::new();
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");
    wheel.toggle(&mut model, "Wheel/Taste/Umami/High");

    assert!(model.is_selected(Branch::Taste, &path("Wheel/Taste/Umami/High")));
    assert!(!model.is_selected(Branch::Taste, &path("Wheel/Taste/Umami/Low")));
    assert!(!model.is_selected(Branch::Taste, &path("Wheel/Taste/Sourness/High")));
}

#[test]
fn given_tiers_when_mapping_to_opacity_then_fixed_levels() {
    assert_eq!(OpacityTier::Hidden.opacity(), 0.0);
    assert_eq!(OpacityTier::Blocked.opacity(), 0.3);
    assert_eq!(OpacityTier::BranchInterior.opacity(), 0.6);
    assert_eq!(OpacityTier::UnselectedLeaf.opacity(), 0.4);
    assert_eq!(OpacityTier::Selected.opacity(), 1.0);
}

#[test]
fn given_invisible_extents_when_computing_tier_then_hidden() {
    let tree = build(&tasting_tree());
    let branches = BranchMap::resolve(&tree, &BranchNames::default()).expect("branches");
    let idx = tree.find_path(&path("Wheel/Color/Amber")).expect("node");
    let model = SelectionModel::new();

    let tier = model.opacity_tier(&tree, &branches, idx, &Extents::new(0.0, 0.0, 1.0, 2.0));

    assert_eq!(tier, OpacityTier::Hidden);
}

#[rstest]
fn given_aroma_picked_out_of_order_when_listing_then_sorted_by_path(wheel: Wheel) {
    let mut model = SelectionModel::new();

    wheel.toggle(&mut model, "Wheel/Aroma/Roasted/Hojicha");
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Rose");
    wheel.toggle(&mut model, "Wheel/Aroma/Floral/Jasmine");

    let keys: Vec<String> = model.aroma().iter().map(SelectionPath::key).collect();
    assert_eq!(
        keys,
        vec![
            "Wheel/Aroma/Floral/Jasmine",
            "Wheel/Aroma/Floral/Rose",
            "Wheel/Aroma/Roasted/Hojicha",
        ]
    );
}

#[rstest]
fn given_entries_outside_their_branch_when_retaining_then_only_leaves_of_own_branch_kept(
    wheel: Wheel,
) {
    // Arrange
    let aroma = [
        path("Wheel/Aroma/Floral/Jasmine"),
        path("Wheel/Aroma/Floral"),
        path("Wheel/Color/Amber"),
        path("Other/Aroma/Floral/Rose"),
    ]
    .into_iter()
    .collect();
    let flavor = [
        ("Sourness".to_string(), path("Wheel/Taste/Sourness/Low")),
        ("Umami".to_string(), path("Wheel/Taste/Sourness/High")),
    ]
    .into_iter()
    .collect();
    let mut model = SelectionModel::from_parts(aroma, flavor, Some(path("Wheel/Taste/Umami/Low")));

    // Act
    let dropped = wheel.retain_known(&mut model);

    // Assert
    assert_eq!(dropped, 5);
    assert_eq!(model.aroma().len(), 1);
    assert!(model.aroma().contains(&path("Wheel/Aroma/Floral/Jasmine")));
    assert_eq!(model.flavor().len(), 1);
    assert_eq!(
        model.flavor().get("Sourness"),
        Some(&path("Wheel/Taste/Sourness/Low"))
    );
    assert_eq!(model.color(), None);
}
