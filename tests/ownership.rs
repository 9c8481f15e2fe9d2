//! Integration tests for the single-writer rule and its two conflict
//! policies, seen from the outside of the store.

use diagram_scenegraph::{
    Axis, BBox, DiagnosticCategory, Owned, Scenegraph, Transform,
};
use pretty_assertions::assert_eq;

fn scene() -> Scenegraph {
    let mut scene = Scenegraph::new();
    scene.create_node("root", None);
    scene.create_node("n", Some("root"));
    scene.create_node("group", Some("root"));
    scene.create_ref("r", "n", "group");
    scene
}

fn categories(scene: &Scenegraph) -> Vec<DiagnosticCategory> {
    scene.diagnostics().iter().map(|d| d.category).collect()
}

#[test]
fn test_first_writer_keeps_every_field() {
    let mut scene = scene();
    let full = BBox::from_rect(1.0, 2.0, 3.0, 4.0);
    scene.set_bbox("first", "n", full).unwrap();

    let attempts = [
        BBox::default().with_width(30.0),
        BBox::default().with_height(40.0),
        BBox::default().with_left(10.0),
        BBox::default().with_top(20.0),
    ];
    for attempt in attempts {
        scene.set_bbox("second", "n", attempt).unwrap();
    }

    assert_eq!(scene.get_bbox("n").unwrap(), full);
    assert_eq!(categories(&scene), [DiagnosticCategory::Ownership; 4]);
    for axis in Axis::all() {
        assert_eq!(scene.owner_of("n", *axis).unwrap(), Some("first"));
    }
}

#[test]
fn test_size_group_is_atomic() {
    let mut scene = scene();
    scene.set_bbox("a", "n", BBox::default().with_height(5.0)).unwrap();

    // width is free, but height is not: neither lands
    scene
        .set_bbox("b", "n", BBox::default().with_width(10.0).with_height(50.0))
        .unwrap();

    let bbox = scene.get_bbox("n").unwrap();
    assert_eq!(bbox.width, None);
    assert_eq!(bbox.height, Some(5.0));
    assert_eq!(scene.owner_of("n", Axis::Width).unwrap(), None);
}

#[test]
fn test_position_fields_are_independent() {
    let mut scene = scene();
    scene.set_bbox("a", "n", BBox::default().with_top(5.0)).unwrap();

    // top (and its translate) belong to a; left is free
    scene
        .set_bbox("b", "n", BBox::default().with_left(10.0).with_top(50.0))
        .unwrap();

    let bbox = scene.get_bbox("n").unwrap();
    assert_eq!(bbox.left, Some(10.0));
    assert_eq!(bbox.top, Some(5.0));
    assert_eq!(scene.owner_of("n", Axis::X).unwrap(), Some("b"));
    assert_eq!(scene.owner_of("n", Axis::Y).unwrap(), Some("a"));
    assert_eq!(categories(&scene), [DiagnosticCategory::Ownership]);
}

#[test]
fn test_ownership_seen_through_reference() {
    let mut scene = scene();
    scene.set_bbox("stack", "r", BBox::default().with_left(0.0).with_width(8.0)).unwrap();

    assert!(!scene.owned_by_other("stack", "r", Axis::X).unwrap());
    assert!(scene.owned_by_other("align", "r", Axis::X).unwrap());
    assert!(scene.owned_by_other("align", "n", Axis::Width).unwrap());
    assert!(scene.owned_by_other_named("align", "r", "width").unwrap());
    assert!(scene.owned_by_other_named("align", "r", "depth").is_err());

    let view = scene.child_view("align", "r");
    assert_eq!(
        view.owned(&scene).unwrap(),
        Owned {
            x: true,
            width: true,
            ..Owned::default()
        }
    );
}

#[test]
fn test_nan_write_emits_one_diagnostic() {
    let mut scene = scene();
    scene.set_bbox("a", "n", BBox::from_rect(1.0, 1.0, 1.0, 1.0)).unwrap();
    scene.take_dirty();

    scene
        .set_bbox("a", "r", BBox::default().with_width(f64::NAN).with_left(3.0))
        .unwrap();

    assert_eq!(scene.get_bbox("n").unwrap(), BBox::from_rect(1.0, 1.0, 1.0, 1.0));
    assert_eq!(categories(&scene), [DiagnosticCategory::NaN]);
    // rejected before resolution: nothing was materialized either
    assert!(scene.take_dirty().is_empty());
}

#[test]
fn test_reference_node_rejects_children() {
    let mut scene = scene();
    scene.create_node("orphan", Some("r"));

    assert_eq!(categories(&scene), [DiagnosticCategory::RefChild]);
    assert!(scene.children("r").unwrap().is_empty());
    assert!(scene.children("n").unwrap().is_empty());
    assert_eq!(scene.parent("orphan").unwrap(), None);
}

#[test]
fn test_merge_claims_what_it_can() {
    let mut scene = scene();
    scene
        .merge_bbox_and_transform("a", "n", BBox::default().with_width(2.0), Transform::translate(1.0, 1.0))
        .unwrap();
    scene
        .merge_bbox_and_transform("b", "n", BBox::default().with_width(9.0).with_height(3.0), Transform::default())
        .unwrap();

    let bbox = scene.get_bbox("n").unwrap();
    assert_eq!(bbox.width, Some(2.0));
    assert_eq!(bbox.height, Some(3.0));
    assert_eq!(scene.owner_of("n", Axis::Height).unwrap(), Some("b"));
    assert_eq!(categories(&scene), [DiagnosticCategory::Ownership]);
}

#[test]
fn test_diagnostics_can_be_drained() {
    let mut scene = scene();
    scene.create_node("lost", Some("nowhere"));

    let drained = scene.take_diagnostics();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].category, DiagnosticCategory::UnknownParent);
    assert!(drained[0].to_string().starts_with("warning[unknown-parent]: "));
    assert!(scene.diagnostics().is_empty());
    assert!(scene.contains("lost"));
}
