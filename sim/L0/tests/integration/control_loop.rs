//! Control loop tests.
//!
//! Verifies the push-then-release impulse policy and PD regulation run
//! through `ControlLoop::tick` against a world.

use approx::assert_relative_eq;
use artic_core::{ControlLoop, PdController, World};
use artic_types::SimulationConfig;
use nalgebra::{DVector, Vector3};

use crate::common::planar_pair;

/// Test: a world-frame push on the planar child lasts exactly the
/// scheduled steps, after which the child coasts at constant velocity.
#[test]
fn impulse_then_coast() {
    let h = 0.01;
    let mass = 2.0;
    let (skel, _, child) = planar_pair(mass);
    let mut world = World::new(SimulationConfig::with_timestep(h)).unwrap();
    let id = world.add_skeleton(skel);

    let idle = PdController::uniform(0.0, 0.0, DVector::zeros(3));
    let mut control = ControlLoop::new(id, idle);
    control
        .impulses_mut()
        .push(child, Vector3::new(0.0, 5.0, 0.0), Vector3::zeros(), 4);

    for _ in 0..4 {
        control.tick(&mut world).unwrap();
    }
    assert!(control.impulses().active().is_none());
    let v = world.skeleton(id).unwrap().pose_velocity();
    assert_relative_eq!(v[1], 4.0 * h * 5.0 / mass, epsilon = 1e-12);
    assert_relative_eq!(v[0], 0.0, epsilon = 1e-15);

    let y = world.skeleton(id).unwrap().pose()[1];
    for _ in 0..10 {
        control.tick(&mut world).unwrap();
    }
    let skel = world.skeleton(id).unwrap();
    assert_relative_eq!(skel.pose_velocity()[1], v[1], epsilon = 1e-12);
    assert_relative_eq!(skel.pose()[1], y + 10.0 * h * v[1], epsilon = 1e-12);
    assert_eq!(world.step_count(), 14);
}

/// Test: PD regulation drives all three planar coordinates to the target.
#[test]
fn pd_regulates_planar_pose() {
    let (skel, _, _) = planar_pair(1.0);
    let mut world = World::new(SimulationConfig::with_timestep(0.001)).unwrap();
    let id = world.add_skeleton(skel);

    let target = DVector::from_vec(vec![0.2, -0.1, 0.3]);
    let pd = PdController::new(
        DVector::from_vec(vec![50.0, 50.0, 5.0]),
        DVector::from_vec(vec![20.0, 20.0, 2.0]),
        target.clone(),
    )
    .unwrap();
    let mut control = ControlLoop::new(id, pd);
    for _ in 0..6000 {
        control.tick(&mut world).unwrap();
    }
    assert_relative_eq!(world.skeleton(id).unwrap().pose(), target, epsilon = 1e-4);
}
