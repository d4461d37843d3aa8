//! Composite Rigid Body Algorithm for mass matrix computation.
//!
//! Builds the joint-space mass matrix `M(q)` from body spatial inertias.
//!
//! ## Algorithm Overview
//!
//! 1. Initialize composite inertias from body spatial inertias
//! 2. Backward pass: `Ic[parent] += Xᵀ Ic[child] X`
//! 3. For each joint, project `Ic S` onto its own and its ancestors' axes
//!
//! Reference: Featherstone, "Rigid Body Dynamics Algorithms", Chapter 6

use nalgebra::{DMatrix, Matrix6, Matrix6xX};

use super::spatial::{motion_transform_inv_matrix, transform_force};
use crate::body::BodyNode;

/// Joint-space mass matrix of `bodies` (tree order).
#[allow(clippy::many_single_char_names, clippy::needless_range_loop)]
#[must_use]
pub fn crba(bodies: &[BodyNode]) -> DMatrix<f64> {
    let n = bodies.len();
    let num_dofs: usize = bodies.iter().map(BodyNode::num_dofs).sum();
    let mut m = DMatrix::zeros(num_dofs, num_dofs);
    if num_dofs == 0 {
        return m;
    }

    let transforms: Vec<_> = bodies.iter().map(|b| b.joint().local_transform()).collect();
    let jacobians: Vec<Matrix6xX<f64>> = bodies.iter().map(|b| b.joint().local_jacobian()).collect();

    // Composite inertias, children folded into parents.
    let mut composite: Vec<Matrix6<f64>> = bodies.iter().map(BodyNode::spatial_inertia).collect();
    for i in (0..n).rev() {
        if let Some(parent) = bodies[i].parent() {
            let x = motion_transform_inv_matrix(&transforms[i]);
            let folded = x.transpose() * composite[i] * x;
            composite[parent.index()] += folded;
        }
    }

    for i in 0..n {
        let dofs_i = bodies[i].num_dofs();
        if dofs_i == 0 {
            continue;
        }
        let row_i = bodies[i].dof_offset();
        let s_i = &jacobians[i];
        let mut f = &composite[i] * s_i;

        m.view_mut((row_i, row_i), (dofs_i, dofs_i))
            .copy_from(&(s_i.transpose() * &f));

        let mut j = i;
        while let Some(parent) = bodies[j].parent() {
            for mut column in f.column_iter_mut() {
                let carried = transform_force(&transforms[j], &column.clone_owned());
                column.copy_from(&carried);
            }
            j = parent.index();

            let dofs_j = bodies[j].num_dofs();
            if dofs_j == 0 {
                continue;
            }
            let row_j = bodies[j].dof_offset();
            let block = jacobians[j].transpose() * &f;
            m.view_mut((row_j, row_i), (dofs_j, dofs_i)).copy_from(&block);
            m.view_mut((row_i, row_j), (dofs_i, dofs_j))
                .copy_from(&block.transpose());
        }
    }

    m
}
