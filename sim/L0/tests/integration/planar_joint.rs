//! Planar joint tests through a skeleton.
//!
//! Verifies canonical plane bases and that the body-frame Jacobian agrees
//! with finite differences of the body's world pose, including at the
//! rotation coordinates 0 and π.

use std::f64::consts::PI;

use approx::assert_relative_eq;
use artic_core::{BodyNodeId, FrameTree, JointRegistry, PlanarJoint, PlaneType, Skeleton};
use nalgebra::{DVector, Matrix3, Vector3, Vector6};

use crate::common::planar_pair;

fn set_plane(skel: &mut Skeleton, body: BodyNodeId, plane: PlaneType) {
    let joint = skel
        .body_node_mut(body)
        .unwrap()
        .joint_mut()
        .downcast_mut::<PlanarJoint>()
        .unwrap();
    match plane {
        PlaneType::XY => joint.set_xy_plane(),
        PlaneType::YZ => joint.set_yz_plane(),
        PlaneType::ZX => joint.set_zx_plane(),
        PlaneType::Arbitrary => joint
            .set_arbitrary_plane(&Vector3::new(1.0, 1.0, 0.0), &Vector3::new(0.0, 1.0, 1.0))
            .unwrap(),
    }
    skel.update_kinematics();
}

/// Body twist from a forward difference of the world pose along `dq`.
fn finite_difference_twist(
    skel: &mut Skeleton,
    body: BodyNodeId,
    q: &[f64],
    dq: &[f64],
) -> Vector6<f64> {
    let eps = 1e-7;
    skel.set_pose(q).unwrap();
    let before = skel.world_transform(body.into()).unwrap();
    let stepped: Vec<f64> = q.iter().zip(dq).map(|(q, dq)| q + eps * dq).collect();
    skel.set_pose(&stepped).unwrap();
    let after = skel.world_transform(body.into()).unwrap();
    skel.set_pose(q).unwrap();

    let relative = before.inverse() * after;
    let angular = relative.rotation.scaled_axis() / eps;
    let linear = relative.translation.vector / eps;
    Vector6::new(angular.x, angular.y, angular.z, linear.x, linear.y, linear.z)
}

/// Test: canonical planes produce the documented orthonormal bases.
#[test]
fn canonical_bases() {
    let (mut skel, _, child) = planar_pair(1.0);
    let cases = [
        (PlaneType::XY, [Vector3::x(), Vector3::y(), Vector3::z()]),
        (PlaneType::YZ, [Vector3::y(), Vector3::z(), Vector3::x()]),
        (PlaneType::ZX, [Vector3::z(), Vector3::x(), Vector3::y()]),
    ];
    for (plane, axes) in cases {
        set_plane(&mut skel, child, plane);
        let joint = skel
            .body_node(child)
            .unwrap()
            .joint()
            .downcast_ref::<PlanarJoint>()
            .unwrap();
        assert_eq!(joint.plane_type(), plane);
        assert_eq!(joint.basis(), Matrix3::from_columns(&axes));
        assert_relative_eq!(joint.basis().transpose() * joint.basis(), Matrix3::identity());
    }
}

/// Test: translation coordinates move the body along the plane axes, and
/// the rotation coordinate turns it about the normal.
#[test]
fn coordinates_map_to_plane_motion() {
    let (mut skel, _, child) = planar_pair(1.0);
    set_plane(&mut skel, child, PlaneType::YZ);
    skel.set_pose(&[0.3, -0.2, 0.0]).unwrap();
    let pose = skel.world_transform(child.into()).unwrap();
    assert_relative_eq!(pose.translation.vector, Vector3::new(0.0, 0.3, -0.2), epsilon = 1e-15);

    skel.set_pose(&[0.0, 0.0, 0.5]).unwrap();
    let pose = skel.world_transform(child.into()).unwrap();
    assert_relative_eq!(pose.rotation.scaled_axis(), Vector3::new(0.5, 0.0, 0.0), epsilon = 1e-12);
}

/// Test: `J · dq` equals the finite-difference body twist and the body
/// velocity the skeleton reports, for every plane at q2 = 0 and q2 = π.
#[test]
fn jacobian_matches_finite_difference() {
    let (mut skel, _, child) = planar_pair(1.0);
    let dq = [0.7, -1.3, 0.9];
    for plane in [PlaneType::XY, PlaneType::YZ, PlaneType::ZX, PlaneType::Arbitrary] {
        set_plane(&mut skel, child, plane);
        for q2 in [0.0, PI, 0.4] {
            let q = [0.25, -0.6, q2];
            let expected = finite_difference_twist(&mut skel, child, &q, &dq);

            skel.set_pose_velocity(&dq).unwrap();
            let joint = skel.body_node(child).unwrap().joint();
            let twist = joint.local_jacobian() * DVector::from_row_slice(&dq);
            assert_relative_eq!(twist, expected, epsilon = 1e-5);
            assert_relative_eq!(skel.body_velocity(child).unwrap(), twist, epsilon = 1e-12);
        }
    }
}

/// Test: at q2 = π the translational columns flip sign in the body frame.
#[test]
fn jacobian_at_half_turn() {
    let (mut skel, _, child) = planar_pair(1.0);
    skel.set_pose(&[1.0, 2.0, PI]).unwrap();
    let jacobian = skel.body_node(child).unwrap().joint().local_jacobian();
    let expected = [
        Vector6::new(0.0, 0.0, 0.0, -1.0, 0.0, 0.0),
        Vector6::new(0.0, 0.0, 0.0, 0.0, -1.0, 0.0),
        Vector6::new(0.0, 0.0, 1.0, 0.0, 0.0, 0.0),
    ];
    for (i, column) in expected.iter().enumerate() {
        assert_relative_eq!(jacobian.column(i).into_owned(), *column, epsilon = 1e-12);
    }
}

/// Test: a registry-built planar joint behaves like a directly built one.
#[test]
fn registry_built_planar_joint() {
    let registry = JointRegistry::default();
    let (mut direct, _, direct_child) = planar_pair(2.0);

    let mut built = Skeleton::new("built");
    let child = built
        .add_body_node_boxed(
            None,
            "child",
            registry.create("PlanarJoint", "slide").unwrap(),
            artic_types::MassProperties::sphere(2.0, 0.1),
        )
        .unwrap();
    assert!(registry.create("BallJoint", "nope").is_err());

    let q = [0.1, 0.2, 0.3];
    direct.set_pose(&q).unwrap();
    built.set_pose(&q).unwrap();
    assert_relative_eq!(
        built.world_transform(child.into()).unwrap(),
        direct.world_transform(direct_child.into()).unwrap(),
        epsilon = 1e-15
    );
}
