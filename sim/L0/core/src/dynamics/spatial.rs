//! Spatial algebra utilities for 6D motion and force vectors.
//!
//! Implements Featherstone's spatial vector algebra in the body-fixed form
//! used throughout the dynamics pipeline (forward kinematics, CRBA, RNE).
//! Functions here are pure math with no skeleton state.
//!
//! Transform arguments follow one rule: `t` is the pose of frame B
//! expressed in frame A. `Ad` maps a twist written in B into A; the
//! `*_inv` variants go the other way.

use nalgebra::{Isometry3, Matrix3, Matrix6, Vector3, Vector6};

/// 6D spatial vector: [angular (3), linear (3)].
///
/// Following Featherstone's convention:
/// - Motion vectors: [ω, v] (angular velocity, linear velocity)
/// - Force vectors: [τ, f] (torque, force)
pub type SpatialVector = Vector6<f64>;

#[inline]
fn angular(s: &SpatialVector) -> Vector3<f64> {
    Vector3::new(s[0], s[1], s[2])
}

#[inline]
fn linear(s: &SpatialVector) -> Vector3<f64> {
    Vector3::new(s[3], s[4], s[5])
}

/// Assemble a spatial vector from its angular and linear halves.
#[inline]
#[must_use]
pub fn spatial(angular: Vector3<f64>, linear: Vector3<f64>) -> SpatialVector {
    SpatialVector::new(
        angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
    )
}

/// Spatial cross product for motion vectors: v × s (Lie bracket `ad_v s`).
#[allow(clippy::inline_always)] // Called per body per pass in RNE
#[inline(always)]
#[must_use]
pub fn spatial_cross_motion(v: SpatialVector, s: SpatialVector) -> SpatialVector {
    let w = angular(&v);
    let v_lin = linear(&v);
    let s_ang = angular(&s);
    let s_lin = linear(&s);

    spatial(w.cross(&s_ang), w.cross(&s_lin) + v_lin.cross(&s_ang))
}

/// Spatial cross product for force vectors: v ×* f (equals `-ad_vᵀ f`).
#[allow(clippy::inline_always)] // Called per body per pass in RNE
#[inline(always)]
#[must_use]
pub fn spatial_cross_force(v: SpatialVector, f: SpatialVector) -> SpatialVector {
    let w = angular(&v);
    let v_lin = linear(&v);
    let f_ang = angular(&f);
    let f_lin = linear(&f);

    spatial(w.cross(&f_ang) + v_lin.cross(&f_lin), w.cross(&f_lin))
}

/// `Ad_T v`: re-express a motion vector given in frame B in frame A.
#[must_use]
pub fn transform_motion(t: &Isometry3<f64>, v: &SpatialVector) -> SpatialVector {
    let w = t.rotation * angular(v);
    let p = t.translation.vector;
    spatial(w, t.rotation * linear(v) + p.cross(&w))
}

/// `Ad_T⁻¹ v`: re-express a motion vector given in frame A in frame B.
#[must_use]
pub fn transform_motion_inv(t: &Isometry3<f64>, v: &SpatialVector) -> SpatialVector {
    let w = angular(v);
    let p = t.translation.vector;
    let r_inv = t.rotation.inverse();
    spatial(r_inv * w, r_inv * (linear(v) - p.cross(&w)))
}

/// `Ad_T⁻ᵀ f`: re-express a force vector given in frame B in frame A.
///
/// This is how a child body's wrench is carried to its parent.
#[must_use]
pub fn transform_force(t: &Isometry3<f64>, f: &SpatialVector) -> SpatialVector {
    let force = t.rotation * linear(f);
    let p = t.translation.vector;
    spatial(t.rotation * angular(f) + p.cross(&force), force)
}

/// `Ad_Tᵀ f`: re-express a force vector given in frame A in frame B.
#[must_use]
pub fn transform_force_inv(t: &Isometry3<f64>, f: &SpatialVector) -> SpatialVector {
    let r_inv = t.rotation.inverse();
    let p = t.translation.vector;
    let force = linear(f);
    spatial(r_inv * (angular(f) - p.cross(&force)), r_inv * force)
}

/// 6×6 matrix form of [`transform_motion_inv`].
///
/// Used to congruence-transform spatial inertias: a child's inertia
/// expressed at its parent is `Xᵀ I X` with `X = Ad_T⁻¹`.
#[must_use]
pub fn motion_transform_inv_matrix(t: &Isometry3<f64>) -> Matrix6<f64> {
    let r_inv = t.rotation.inverse().to_rotation_matrix().into_inner();
    let p = skew(&t.translation.vector);

    let mut x = Matrix6::zeros();
    x.fixed_view_mut::<3, 3>(0, 0).copy_from(&r_inv);
    x.fixed_view_mut::<3, 3>(3, 3).copy_from(&r_inv);
    x.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-r_inv * p));
    x
}

/// Skew-symmetric cross-product matrix `[v]×`.
#[must_use]
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    )
}

/// Compute body spatial inertia about the body origin, in the body frame.
///
/// This builds the 6×6 spatial inertia matrix from:
/// - `mass`: body mass
/// - `inertia_com`: rotational inertia about the COM, body axes
/// - `h`: COM offset from body origin, body frame
///
/// The spatial inertia has the form:
/// ```text
/// I = [I_com + m*(h·h*I - h⊗h),  m*[h]×  ]
///     [m*[h]×ᵀ,                  m*I_3×3 ]
/// ```
#[allow(clippy::inline_always)] // Called once per body per dynamics pass
#[inline(always)]
#[must_use]
pub fn compute_body_spatial_inertia(
    mass: f64,
    inertia_com: &Matrix3<f64>,
    h: &Vector3<f64>,
) -> Matrix6<f64> {
    let mut crb = Matrix6::zeros();

    // Upper-left 3x3: rotational inertia about body origin (parallel axis theorem)
    let h_dot_h = h.dot(h);
    for row in 0..3 {
        for col in 0..3 {
            let h_outer = h[row] * h[col];
            let delta = if row == col { 1.0 } else { 0.0 };
            crb[(row, col)] = inertia_com[(row, col)] + mass * (h_dot_h * delta - h_outer);
        }
    }

    // Lower-right 3x3: translational inertia (diagonal mass matrix)
    crb[(3, 3)] = mass;
    crb[(4, 4)] = mass;
    crb[(5, 5)] = mass;

    // Off-diagonal: coupling (skew-symmetric of m*h)
    let mh = skew(h) * mass;
    crb.fixed_view_mut::<3, 3>(0, 3).copy_from(&mh);
    crb.fixed_view_mut::<3, 3>(3, 0).copy_from(&mh.transpose());

    crb
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Translation3, UnitQuaternion};

    fn sample_transform() -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::new(0.3, -1.2, 0.5),
            UnitQuaternion::from_euler_angles(0.4, -0.2, 1.1),
        )
    }

    #[test]
    fn test_motion_transform_round_trip() {
        let t = sample_transform();
        let v = SpatialVector::new(0.1, 0.2, -0.3, 1.0, -2.0, 0.5);
        let back = transform_motion_inv(&t, &transform_motion(&t, &v));
        assert_relative_eq!(back, v, epsilon = 1e-12);
    }

    #[test]
    fn test_matrix_form_matches_function() {
        let t = sample_transform();
        let v = SpatialVector::new(0.7, -0.1, 0.2, 0.0, 3.0, -1.0);
        let x = motion_transform_inv_matrix(&t);
        assert_relative_eq!(x * v, transform_motion_inv(&t, &v), epsilon = 1e-12);
    }

    #[test]
    fn test_force_transform_is_dual() {
        // Power is frame invariant: f·v in A equals f·v in B.
        let t = sample_transform();
        let v_b = SpatialVector::new(0.1, 0.4, -0.2, 1.0, 0.5, 0.3);
        let f_b = SpatialVector::new(-0.3, 0.2, 0.9, 2.0, -1.0, 0.5);
        let power_b = f_b.dot(&v_b);
        let power_a = transform_force(&t, &f_b).dot(&transform_motion(&t, &v_b));
        assert_relative_eq!(power_a, power_b, epsilon = 1e-12);

        let back = transform_force_inv(&t, &transform_force(&t, &f_b));
        assert_relative_eq!(back, f_b, epsilon = 1e-12);
    }

    #[test]
    fn test_force_cross_is_negative_adjoint_transpose() {
        let v = SpatialVector::new(0.3, -0.2, 0.5, 1.0, 0.0, -0.4);
        let f = SpatialVector::new(0.1, 0.9, -0.7, 0.2, 0.3, 0.4);
        let s = SpatialVector::new(-0.6, 0.1, 0.2, 0.5, -0.5, 1.5);
        // <v ×* f, s> = -<f, v × s>
        let lhs = spatial_cross_force(v, f).dot(&s);
        let rhs = -f.dot(&spatial_cross_motion(v, s));
        assert_relative_eq!(lhs, rhs, epsilon = 1e-12);
    }

    #[test]
    fn test_point_mass_spatial_inertia() {
        let h = Vector3::new(1.0, 0.0, 0.0);
        let inertia = compute_body_spatial_inertia(2.0, &Matrix3::zeros(), &h);
        // Rotational inertia about origin: m * (|h|² I - h hᵀ)
        assert_relative_eq!(inertia[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(inertia[(1, 1)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(inertia[(2, 2)], 2.0, epsilon = 1e-12);
        assert_eq!(inertia, inertia.transpose());

        // Pure translation along y at unit speed: momentum m, angular momentum h × m v
        let v = SpatialVector::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
        let momentum = inertia * v;
        assert_relative_eq!(momentum[4], 2.0, epsilon = 1e-12);
        assert_relative_eq!(momentum[2], 2.0, epsilon = 1e-12);
    }
}
