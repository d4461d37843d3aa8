//! Recursive Newton-Euler algorithm for inverse dynamics.
//!
//! Given positions, velocities and accelerations, computes the generalized
//! forces that produce them under gravity and external wrenches, plus the
//! wrench each joint transmits into its child body. With zero accelerations
//! the result is the bias force vector `c(q, dq)` of `M·ddq + c = τ`.
//!
//! Reference: Featherstone, "Rigid Body Dynamics Algorithms", Chapter 5

use nalgebra::{DVector, Vector3, Vector6};

use super::spatial::{
    spatial, spatial_cross_force, spatial_cross_motion, transform_force, transform_motion_inv,
};
use crate::body::BodyNode;

/// Result of an inverse dynamics pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RneOutput {
    /// Generalized forces, skeleton DOF order.
    pub forces: DVector<f64>,
    /// Wrench transmitted by each body's joint, child body frame.
    pub wrenches: Vec<Vector6<f64>>,
}

/// Recursive Newton-Euler over `bodies` in tree order.
///
/// `accelerations` has one entry per skeleton DOF. External wrenches are
/// included when `with_external` is set; gravity acts on bodies whose
/// gravity mode is enabled.
#[allow(clippy::similar_names)]
#[must_use]
pub fn rne(
    bodies: &[BodyNode],
    accelerations: &DVector<f64>,
    gravity: &Vector3<f64>,
    with_external: bool,
) -> RneOutput {
    let n = bodies.len();
    let mut rotations = Vec::with_capacity(n);
    let mut velocities: Vec<Vector6<f64>> = Vec::with_capacity(n);
    let mut body_accels: Vec<Vector6<f64>> = Vec::with_capacity(n);
    let mut wrenches: Vec<Vector6<f64>> = Vec::with_capacity(n);

    // ========== Forward pass: velocities, accelerations, body wrenches ==========
    for body in bodies {
        let joint = body.joint();
        let local = joint.local_transform();
        let offset = body.dof_offset();
        let ddq = &accelerations.as_slice()[offset..offset + joint.num_dofs()];

        let joint_twist = joint.relative_twist();
        let joint_accel = joint.jacobian_times(ddq) + joint.relative_twist_bias();

        let (rotation, v, a) = match body.parent() {
            Some(parent) => {
                let p = parent.index();
                let v = transform_motion_inv(&local, &velocities[p]) + joint_twist;
                let a = transform_motion_inv(&local, &body_accels[p])
                    + joint_accel
                    + spatial_cross_motion(v, joint_twist);
                (rotations[p] * local.rotation, v, a)
            }
            None => {
                let v = joint_twist;
                (local.rotation, v, joint_accel + spatial_cross_motion(v, joint_twist))
            }
        };

        let inertia = body.spatial_inertia();
        let mut f = inertia * a + spatial_cross_force(v, inertia * v);
        if body.gravity_mode() {
            let g_body = rotation.inverse() * gravity;
            f -= inertia * spatial(Vector3::zeros(), g_body);
        }
        if with_external {
            f -= body.external_force_local();
        }

        rotations.push(rotation);
        velocities.push(v);
        body_accels.push(a);
        wrenches.push(f);
    }

    // ========== Backward pass: accumulate child wrenches into parents ==========
    for i in (0..n).rev() {
        if let Some(parent) = bodies[i].parent() {
            let local = bodies[i].joint().local_transform();
            let carried = transform_force(&local, &wrenches[i]);
            wrenches[parent.index()] += carried;
        }
    }

    // ========== Project onto joint axes: τ = Jᵀ f ==========
    let num_dofs: usize = bodies.iter().map(BodyNode::num_dofs).sum();
    let mut projected = Vec::with_capacity(num_dofs);
    for (body, wrench) in bodies.iter().zip(&wrenches) {
        body.joint().project_wrench(wrench, &mut projected);
    }

    RneOutput {
        forces: DVector::from_vec(projected),
        wrenches,
    }
}
