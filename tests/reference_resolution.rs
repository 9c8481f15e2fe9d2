//! Integration tests for reference resolution: coordinate offsets through
//! the lowest common ancestor and the read/write materialization rules.

use diagram_scenegraph::{Axis, BBox, ResolveMode, SceneConfig, SceneError, Scenegraph, Transform};
use pretty_assertions::assert_eq;

/// root -> a -> b, root -> d -> c (ref to b)
fn nested_scene() -> Scenegraph {
    let mut scene = Scenegraph::new();
    scene.create_node("root", None);
    scene.create_node("a", Some("root"));
    scene.create_node("b", Some("a"));
    scene.create_node("d", Some("root"));
    scene.create_ref("c", "b", "d");
    scene
}

/// Root -> A -> B and Root -> C (ref to B): A sits at x=0, B at x=10 inside
/// A, so C must see B's left at 10.
#[test]
fn test_reference_sees_target_through_lca() {
    let mut scene: Scenegraph = Scenegraph::new();
    scene.create_node("root", None);
    scene.create_node("a", Some("root"));
    scene.create_node("b", Some("a"));
    scene.create_ref("c", "b", "root");

    scene
        .merge_bbox_and_transform("group", "a", BBox::default().with_left(0.0), Transform::translate(0.0, 0.0))
        .unwrap();
    scene
        .merge_bbox_and_transform("group", "b", BBox::default().with_left(0.0), Transform::translate(10.0, 0.0))
        .unwrap();

    assert_eq!(scene.get_bbox("b").unwrap().left, Some(10.0));
    assert_eq!(scene.get_bbox("c").unwrap().left, Some(10.0));
}

#[test]
fn test_offsets_subtract_reference_side_and_add_target_side() {
    let mut scene = nested_scene();
    scene
        .merge_bbox_and_transform("group", "a", BBox::default(), Transform::translate(5.0, 0.0))
        .unwrap();
    scene
        .merge_bbox_and_transform("group", "d", BBox::default(), Transform::translate(4.0, 0.0))
        .unwrap();
    scene
        .merge_bbox_and_transform("rect", "b", BBox::from_rect(0.0, 0.0, 8.0, 6.0), Transform::translate(0.0, 0.0))
        .unwrap();

    let through_ref = scene.get_bbox("c").unwrap();
    assert_eq!(through_ref, BBox::from_rect(1.0, 0.0, 8.0, 6.0));
    assert_eq!(through_ref.right(), Some(9.0));

    // b as seen from its own frame is unaffected
    assert_eq!(scene.get_bbox("b").unwrap(), BBox::from_rect(0.0, 0.0, 8.0, 6.0));
}

#[test]
fn test_read_does_not_fabricate_unresolved_position() {
    let mut scene = nested_scene();

    let bbox = scene.get_bbox("c").unwrap();
    assert_eq!(bbox.left, None);
    assert_eq!(bbox.top, None);
    assert_eq!(scene.owner_of("d", Axis::X).unwrap(), None);
    assert_eq!(scene.owner_of("a", Axis::X).unwrap(), None);
    assert_eq!(scene.node("d").unwrap().as_concrete().unwrap().transform, Transform::default());
}

#[test]
fn test_write_materializes_defaults() {
    let mut scene = nested_scene();
    scene.set_bbox("align", "c", BBox::default().with_left(7.0)).unwrap();

    for id in ["a", "d"] {
        let node = scene.node(id).unwrap().as_concrete().unwrap();
        assert_eq!(node.transform, Transform::translate(0.0, 0.0));
        assert_eq!(scene.owner_of(id, Axis::X).unwrap(), Some("c"));
        assert_eq!(scene.owner_of(id, Axis::Y).unwrap(), Some("c"));
    }

    let b = scene.node("b").unwrap().as_concrete().unwrap();
    assert_eq!(b.bbox.left, Some(7.0));
    assert_eq!(b.transform.x, Some(0.0));
    assert_eq!(b.bbox_owners.left.as_deref(), Some("align"));

    assert_eq!(scene.get_bbox("c").unwrap().left, Some(7.0));
}

#[test]
fn test_axes_resolve_independently() {
    let mut scene = nested_scene();
    scene.set_bbox("layout", "b", BBox::default().with_left(3.0)).unwrap();

    let bbox = scene.get_bbox("c").unwrap();
    assert_eq!(bbox.left, Some(3.0));
    assert_eq!(bbox.top, None);

    // only the x axis was materialized by the read
    let d = scene.node("d").unwrap().as_concrete().unwrap();
    assert_eq!(d.transform.x, Some(0.0));
    assert_eq!(d.transform.y, None);
}

#[test]
fn test_write_folds_reference_offset_into_target_translate() {
    let mut scene = nested_scene();
    scene
        .merge_bbox_and_transform("group", "a", BBox::default(), Transform::translate(5.0, 0.0))
        .unwrap();
    scene
        .merge_bbox_and_transform("group", "d", BBox::default(), Transform::translate(4.0, 0.0))
        .unwrap();

    scene.set_bbox("align", "c", BBox::default().with_left(20.0)).unwrap();

    let b = scene.node("b").unwrap().as_concrete().unwrap();
    assert_eq!(b.bbox.left, Some(20.0));
    assert_eq!(b.transform.x, Some(1.0));
    assert_eq!(b.transform_owners.x.as_deref(), Some("align"));
}

#[test]
fn test_repeated_reads_are_identical() {
    let mut scene = nested_scene();
    scene
        .set_bbox("layout", "b", BBox::from_rect(2.0, 3.0, 4.0, 5.0))
        .unwrap();

    let first = scene.get_bbox("c").unwrap();
    let second = scene.get_bbox("c").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.center_x(), Some(4.0));
    assert_eq!(first.center_y(), Some(5.5));
}

#[test]
fn test_unknown_inputs_propagate_to_derived_fields() {
    let mut scene = nested_scene();
    scene.set_bbox("layout", "b", BBox::default().with_width(5.0)).unwrap();

    let bbox = scene.get_bbox("c").unwrap();
    assert_eq!(bbox.left, None);
    assert_eq!(bbox.width, Some(5.0));
    assert_eq!(bbox.right(), None);
    assert_eq!(bbox.center_x(), None);
}

#[test]
fn test_fatal_resolution_errors() {
    let mut scene = nested_scene();
    scene.create_ref("dangling", "ghost", "root");
    scene.create_ref("cc", "c", "root");

    assert_eq!(
        scene.get_bbox("dangling").unwrap_err(),
        SceneError::ref_target_not_found("dangling", "ghost")
    );
    assert_eq!(
        scene.set_bbox("x", "cc", BBox::default().with_left(1.0)).unwrap_err(),
        SceneError::ref_of_ref("cc", "c")
    );
    assert_eq!(
        scene.resolve("ghost", ResolveMode::Check).unwrap_err(),
        SceneError::not_found("ghost")
    );
}

#[test]
fn test_reference_chains_when_enabled() {
    let mut scene = Scenegraph::<()>::with_config(SceneConfig::new().with_max_reference_depth(2));
    scene.create_node("root", None);
    scene.create_node("b", Some("root"));
    scene.create_ref("c", "b", "root");
    scene.create_ref("cc", "c", "root");
    scene.set_bbox("layout", "b", BBox::default().with_left(6.0)).unwrap();

    assert_eq!(scene.resolve_id("cc").unwrap(), "b");
    assert_eq!(scene.get_bbox("cc").unwrap().left, Some(6.0));
}
