//! Forward kinematics: world poses and body twists.

use nalgebra::{Isometry3, Vector3, Vector6};

use super::spatial::transform_motion_inv;
use crate::body::BodyNode;

/// Kinematic state of one body node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    /// Pose of the body frame in the world.
    pub transform: Isometry3<f64>,
    /// Spatial velocity `[ω; v]` of the body origin, body frame.
    pub velocity: Vector6<f64>,
}

impl BodyState {
    /// Center of mass in world coordinates.
    #[must_use]
    pub fn world_com(&self, body: &BodyNode) -> Vector3<f64> {
        self.transform.transform_point(&(*body.local_com()).into()).coords
    }

    /// Kinetic energy `½ vᵀ I v`.
    #[must_use]
    pub fn kinetic_energy(&self, body: &BodyNode) -> f64 {
        0.5 * self.velocity.dot(&(body.spatial_inertia() * self.velocity))
    }

    /// Linear momentum of the body, world frame.
    #[must_use]
    pub fn linear_momentum(&self, body: &BodyNode) -> Vector3<f64> {
        let w = self.velocity.fixed_rows::<3>(0).into_owned();
        let v = self.velocity.fixed_rows::<3>(3).into_owned();
        let com_velocity = v + w.cross(body.local_com());
        self.transform.rotation * (com_velocity * body.mass())
    }
}

/// Compute world poses and body twists for every body, in tree order.
#[must_use]
pub fn forward_kinematics(bodies: &[BodyNode]) -> Vec<BodyState> {
    let mut states: Vec<BodyState> = Vec::with_capacity(bodies.len());
    for body in bodies {
        let joint = body.joint();
        let local = joint.local_transform();
        let (transform, velocity) = match body.parent() {
            Some(parent) => {
                let p = &states[parent.index()];
                (
                    p.transform * local,
                    transform_motion_inv(&local, &p.velocity) + joint.relative_twist(),
                )
            }
            None => (local, joint.relative_twist()),
        };
        states.push(BodyState {
            transform,
            velocity,
        });
    }
    states
}
