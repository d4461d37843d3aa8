//! Frame hierarchy tests.
//!
//! Verifies world transforms compose along fixed-frame chains and that
//! end-effectors keep stable indices and resettable defaults.

use approx::assert_relative_eq;
use artic_core::{Frame, FrameRef, FrameTree};
use nalgebra::{Isometry3, Vector3};

use crate::common::planar_pair;

fn offset(i: usize) -> Isometry3<f64> {
    let i = i as f64;
    Isometry3::new(Vector3::new(0.1 * i, -0.2, 0.05 * i), Vector3::new(0.0, 0.3 * i, 0.1))
}

/// Test: a chain of fixed frames of depth d resolves to the product of its
/// relative transforms, for d = 0..6.
#[test]
fn transform_composition_any_depth() {
    let (mut skel, _, child) = planar_pair(1.0);
    skel.set_pose(&[0.4, -0.7, 1.1]).unwrap();

    let body_world = skel.world_transform(child.into()).unwrap();
    let mut expected = body_world;
    let mut parent = FrameRef::from(child);
    assert_relative_eq!(skel.world_transform(parent).unwrap(), expected, epsilon = 1e-12);

    for depth in 1..=6 {
        let frame = skel
            .create_fixed_frame(parent, format!("f{depth}"), offset(depth))
            .unwrap();
        expected *= offset(depth);
        parent = frame.into();

        let world = skel.world_transform(parent).unwrap();
        assert_relative_eq!(world, expected, epsilon = 1e-12);

        // Relative to the body node, only the fixed offsets remain
        let relative = skel.transform(parent, child.into()).unwrap();
        assert_relative_eq!(relative, body_world.inverse() * expected, epsilon = 1e-12);
    }
}

/// Test: the world frame is the identity, and moving a body node frame
/// directly is rejected.
#[test]
fn world_and_body_frames_are_not_assignable() {
    let (mut skel, root, _) = planar_pair(1.0);
    assert_eq!(skel.world_transform(FrameRef::World).unwrap(), Isometry3::identity());
    let err = skel
        .set_relative_transform(root.into(), Isometry3::translation(1.0, 0.0, 0.0))
        .unwrap_err();
    assert!(err.is_structural());
    let err = skel
        .set_relative_transform(FrameRef::World, Isometry3::identity())
        .unwrap_err();
    assert!(err.is_structural());
}

/// Test: end-effector indices follow registration order and do not move
/// when more are registered, including through intermediate frames.
#[test]
fn end_effector_index_stability() {
    let (mut skel, root, child) = planar_pair(1.0);
    let ee0 = skel
        .create_end_effector(child.into(), "tip", offset(1))
        .unwrap();
    let mount = skel
        .create_fixed_frame(root.into(), "mount", offset(2))
        .unwrap();
    let ee1 = skel
        .create_end_effector(mount.into(), "tool", offset(3))
        .unwrap();
    let ee2 = skel
        .create_end_effector(ee0.into(), "tip_tip", offset(4))
        .unwrap();

    for (i, id) in [ee0, ee1, ee2].into_iter().enumerate() {
        assert_eq!(id.index(), i);
        assert_eq!(skel.end_effector(id).unwrap().index(), id);
    }
    assert_eq!(skel.end_effector(ee0).unwrap().parent_body_node(), child);
    assert_eq!(skel.end_effector(ee1).unwrap().parent_body_node(), root);
    assert_eq!(skel.end_effector(ee2).unwrap().parent_body_node(), child);
    assert_eq!(skel.body_node(child).unwrap().end_effectors(), &[ee0, ee2]);
}

/// Test: registration through a chain that never reaches a body node
/// fails and registers nothing.
#[test]
fn end_effector_registration_is_atomic() {
    let (mut skel, _, child) = planar_pair(1.0);
    let floating = skel
        .create_fixed_frame(FrameRef::World, "floating", offset(1))
        .unwrap();
    let err = skel
        .create_end_effector(floating.into(), "lost", offset(2))
        .unwrap_err();
    assert!(err.is_structural());
    assert_eq!(skel.num_end_effectors(), 0);

    let next = skel
        .create_end_effector(FrameRef::BodyNode(child), "tip", offset(2))
        .unwrap();
    assert_eq!(next.index(), 0);
}

/// Test: resetting twice equals resetting once, and `use_now` applies the
/// new default immediately.
#[test]
fn end_effector_reset_idempotence() {
    let (mut skel, _, child) = planar_pair(1.0);
    let ee = skel
        .create_end_effector(child.into(), "tip", offset(1))
        .unwrap();

    skel.set_relative_transform(ee.into(), offset(5)).unwrap();
    let effector = skel.end_effector_mut(ee).unwrap();
    effector.reset_relative_transform();
    let once = effector.relative_transform();
    effector.reset_relative_transform();
    assert_eq!(effector.relative_transform(), once);
    assert_relative_eq!(once, offset(1), epsilon = 1e-15);

    effector.set_default_relative_transform(offset(2), false);
    assert_relative_eq!(effector.relative_transform(), offset(1), epsilon = 1e-15);
    effector.set_default_relative_transform(offset(3), true);
    assert_relative_eq!(effector.relative_transform(), offset(3), epsilon = 1e-15);

    let body_world = skel.world_transform(child.into()).unwrap();
    assert_relative_eq!(
        skel.world_transform(ee.into()).unwrap(),
        body_world * offset(3),
        epsilon = 1e-12
    );
}
