//! Stepping tests through a world.
//!
//! Verifies generalized force vectors are validated and consumed, and the
//! semi-implicit Euler step produces the expected one-step displacement.

use approx::assert_relative_eq;
use artic_core::{CoordinateFrame, FrameTree, PrismaticJoint, Skeleton, World};
use artic_types::{ArticError, IntegrationMethod, MassProperties, SimulationConfig};
use nalgebra::{DVector, Vector3};

use crate::common::planar_pair;

/// Test: a force vector of the wrong length is rejected and changes
/// nothing; the right length is accepted and consumed by one step.
#[test]
fn force_vector_round_trip() {
    let (mut skel, _, _) = planar_pair(1.0);
    skel.set_internal_forces(&[0.5, 0.0, 0.0]).unwrap();

    for wrong in [&[][..], &[1.0, 0.0][..], &[1.0, 0.0, 0.0, 0.0][..]] {
        let err = skel.set_internal_forces(wrong).unwrap_err();
        assert!(matches!(
            err,
            ArticError::DimensionMismatch { expected: 3, actual, .. } if actual == wrong.len()
        ));
        assert_eq!(skel.internal_forces(), DVector::from_vec(vec![0.5, 0.0, 0.0]));
    }

    let mut world = World::default();
    let id = world.add_skeleton(skel);
    world.step().unwrap();
    assert_eq!(world.skeleton(id).unwrap().internal_forces(), DVector::zeros(3));
}

/// Test: a unit force along x on an XY planar child moves it h²/m in one
/// step, leaves the other coordinates at zero and translates its world
/// pose along x by the same amount.
#[test]
fn one_step_displacement() {
    for (mass, h) in [(1.0, 0.01), (2.0, 0.001), (0.5, 0.02)] {
        let (mut skel, _, child) = planar_pair(mass);
        let start = skel.world_transform(child.into()).unwrap().translation.vector;
        skel.set_internal_forces(&[1.0, 0.0, 0.0]).unwrap();

        let mut world = World::new(SimulationConfig::with_timestep(h)).unwrap();
        let id = world.add_skeleton(skel);
        world.step().unwrap();

        let skel = world.skeleton(id).unwrap();
        let q = skel.pose();
        assert_relative_eq!(q[0], h * h / mass, epsilon = 1e-15);
        assert_eq!(q[1], 0.0);
        assert_eq!(q[2], 0.0);
        assert_relative_eq!(skel.pose_velocity()[0], h / mass, epsilon = 1e-15);

        let end = skel.world_transform(child.into()).unwrap().translation.vector;
        assert_relative_eq!(end - start, Vector3::new(h * h / mass, 0.0, 0.0), epsilon = 1e-15);
    }
}

/// Test: explicit Euler moves positions with the old velocity, so the
/// first step from rest does not move the body.
#[test]
fn explicit_euler_lags_one_step() {
    let (mut skel, _, _) = planar_pair(1.0);
    skel.set_internal_forces(&[1.0, 0.0, 0.0]).unwrap();
    let config = SimulationConfig::with_timestep(0.01)
        .integration(IntegrationMethod::ExplicitEuler)
        .retain_forces();
    let mut world = World::new(config).unwrap();
    let id = world.add_skeleton(skel);

    world.step().unwrap();
    assert_eq!(world.skeleton(id).unwrap().pose()[0], 0.0);
    world.step().unwrap();
    assert_relative_eq!(world.skeleton(id).unwrap().pose()[0], 1e-4, epsilon = 1e-15);
}

/// Test: a world-frame external force on a slider matches the same
/// internal force, and is cleared after the step.
#[test]
fn external_force_drives_body() {
    let make = || {
        let mut skel = Skeleton::new("slider");
        let body = skel
            .add_body_node(
                None,
                "cart",
                PrismaticJoint::new("x", Vector3::x_axis()),
                MassProperties::point_mass(2.0),
            )
            .unwrap();
        (skel, body)
    };
    let config = SimulationConfig::with_timestep(0.01).zero_gravity();

    let (mut pushed, body) = make();
    pushed
        .add_ext_force(
            body,
            &Vector3::new(4.0, 0.0, 0.0),
            &Vector3::zeros(),
            CoordinateFrame::World,
            CoordinateFrame::Local,
        )
        .unwrap();
    let (mut driven, _) = make();
    driven.set_internal_forces(&[4.0]).unwrap();

    let mut world = World::new(config).unwrap();
    let a = world.add_skeleton(pushed);
    let b = world.add_skeleton(driven);
    world.step().unwrap();

    let qa = world.skeleton(a).unwrap().pose()[0];
    let qb = world.skeleton(b).unwrap().pose()[0];
    assert_relative_eq!(qa, 2e-4, epsilon = 1e-15);
    assert_relative_eq!(qa, qb, epsilon = 1e-15);
    assert_eq!(world.skeleton(a).unwrap().ext_force_local(body).unwrap(), nalgebra::Vector6::zeros());
}

/// Test: a slider held against gravity by its joint force stays put.
#[test]
fn gravity_compensation_holds() {
    let mut skel = Skeleton::new("lift");
    let body = skel
        .add_body_node(
            None,
            "platform",
            PrismaticJoint::new("z", Vector3::z_axis()),
            MassProperties::point_mass(3.0),
        )
        .unwrap();
    let config = SimulationConfig::with_timestep(0.01).retain_forces();
    let g = config.gravity.acceleration;
    let hold = skel.bias_forces(&g);
    assert_relative_eq!(hold[0], 3.0 * 9.81, epsilon = 1e-9);
    skel.set_internal_forces(hold.as_slice()).unwrap();

    let mut world = World::new(config).unwrap();
    let id = world.add_skeleton(skel);
    world.run(100).unwrap();
    let skel = world.skeleton(id).unwrap();
    assert_relative_eq!(skel.pose()[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(skel.body_constraint_wrench(body).unwrap().norm(), 0.0, epsilon = 1e-9);
}

/// Test: a non-finite force makes the step fail with `Diverged` and
/// leaves the pose and the clock untouched.
#[test]
fn divergence_is_reported() {
    let (mut skel, _, _) = planar_pair(1.0);
    skel.set_internal_forces(&[f64::INFINITY, 0.0, 0.0]).unwrap();
    let mut world = World::default();
    let id = world.add_skeleton(skel);

    let err = world.step().unwrap_err();
    assert!(err.is_diverged());
    assert_eq!(world.step_count(), 0);
    assert_eq!(world.skeleton(id).unwrap().pose(), DVector::zeros(3));
}
