//! Planar joint: two translations spanning a plane plus the rotation about
//! its normal.

use artic_types::{ArticError, Result};
use nalgebra::{Isometry3, Matrix3, SMatrix, SVector, Translation3, Unit, UnitQuaternion, Vector3};
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::multi_dof::{JointGeometry, MultiDofJoint};

/// Tolerance below which an axis counts as zero or two axes as parallel.
const DEGENERATE_EPS: f64 = 1e-9;

/// Tolerance for accepting caller axes as already orthonormal.
const ORTHONORMAL_EPS: f64 = 1e-12;

/// Which plane a [`PlanarJoint`] moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PlaneType {
    /// Translate along x and y, rotate about z.
    #[default]
    XY,
    /// Translate along y and z, rotate about x.
    YZ,
    /// Translate along z and x, rotate about y.
    ZX,
    /// Caller-supplied translational axes.
    Arbitrary,
}

/// Axes of a planar joint. Always an orthonormal, right-handed basis:
/// `rotational_axis = translational_axis1 × translational_axis2`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarGeometry {
    plane_type: PlaneType,
    translational_axis1: Vector3<f64>,
    translational_axis2: Vector3<f64>,
    rotational_axis: Vector3<f64>,
}

impl Default for PlanarGeometry {
    fn default() -> Self {
        Self::canonical(PlaneType::XY)
    }
}

impl PlanarGeometry {
    fn canonical(plane_type: PlaneType) -> Self {
        let (axis1, axis2) = match plane_type {
            PlaneType::YZ => (Vector3::y(), Vector3::z()),
            PlaneType::ZX => (Vector3::z(), Vector3::x()),
            PlaneType::XY | PlaneType::Arbitrary => (Vector3::x(), Vector3::y()),
        };
        Self {
            plane_type,
            translational_axis1: axis1,
            translational_axis2: axis2,
            rotational_axis: axis1.cross(&axis2),
        }
    }

    /// Build an arbitrary-plane basis from two translational axes.
    ///
    /// Axes are normalized and the second is orthogonalized against the
    /// first (Gram-Schmidt). Zero or parallel axes are rejected.
    pub fn arbitrary(axis1: &Vector3<f64>, axis2: &Vector3<f64>) -> Result<Self> {
        let norm1 = axis1.norm();
        if !norm1.is_finite() || norm1 < DEGENERATE_EPS {
            return Err(ArticError::degenerate(format!(
                "first translational axis {axis1:?} has no direction"
            )));
        }
        let norm2 = axis2.norm();
        if !norm2.is_finite() || norm2 < DEGENERATE_EPS {
            return Err(ArticError::degenerate(format!(
                "second translational axis {axis2:?} has no direction"
            )));
        }

        let u1 = axis1 / norm1;
        let projection = axis2.dot(&u1);
        let orthogonal = axis2 - u1 * projection;
        let remainder = orthogonal.norm();
        if remainder < DEGENERATE_EPS * norm2 {
            return Err(ArticError::degenerate(format!(
                "translational axes {axis1:?} and {axis2:?} are parallel"
            )));
        }
        let u2 = orthogonal / remainder;

        if (norm1 - 1.0).abs() > ORTHONORMAL_EPS
            || (norm2 - 1.0).abs() > ORTHONORMAL_EPS
            || (projection / norm2).abs() > ORTHONORMAL_EPS
        {
            warn!(
                ?axis1,
                ?axis2,
                adjusted1 = ?u1,
                adjusted2 = ?u2,
                "planar joint axes were not orthonormal; re-orthonormalized"
            );
        }

        Ok(Self {
            plane_type: PlaneType::Arbitrary,
            translational_axis1: u1,
            translational_axis2: u2,
            rotational_axis: u1.cross(&u2),
        })
    }

    /// The plane this basis describes.
    #[must_use]
    pub fn plane_type(&self) -> PlaneType {
        self.plane_type
    }

    /// First translational axis (joint frame).
    #[must_use]
    pub fn translational_axis1(&self) -> &Vector3<f64> {
        &self.translational_axis1
    }

    /// Second translational axis (joint frame).
    #[must_use]
    pub fn translational_axis2(&self) -> &Vector3<f64> {
        &self.translational_axis2
    }

    /// Rotational axis, normal to the plane (joint frame).
    #[must_use]
    pub fn rotational_axis(&self) -> &Vector3<f64> {
        &self.rotational_axis
    }

    fn rotation(&self, angle: f64) -> UnitQuaternion<f64> {
        UnitQuaternion::from_axis_angle(&Unit::new_unchecked(self.rotational_axis), angle)
    }

    /// The translational axes seen from the rotated child frame (`Rᵀ a`).
    fn rotated_axes(&self, angle: f64) -> (Vector3<f64>, Vector3<f64>) {
        let r_inv = self.rotation(-angle);
        (r_inv * self.translational_axis1, r_inv * self.translational_axis2)
    }
}

impl JointGeometry<3> for PlanarGeometry {
    const TYPE_NAME: &'static str = "PlanarJoint";

    fn motion(&self, q: &SVector<f64, 3>) -> Isometry3<f64> {
        let translation = self.translational_axis1 * q[0] + self.translational_axis2 * q[1];
        Isometry3::from_parts(Translation3::from(translation), self.rotation(q[2]))
    }

    fn motion_subspace(&self, q: &SVector<f64, 3>) -> SMatrix<f64, 6, 3> {
        let (t1, t2) = self.rotated_axes(q[2]);
        let mut s = SMatrix::<f64, 6, 3>::zeros();
        s.fixed_view_mut::<3, 1>(3, 0).copy_from(&t1);
        s.fixed_view_mut::<3, 1>(3, 1).copy_from(&t2);
        s.fixed_view_mut::<3, 1>(0, 2).copy_from(&self.rotational_axis);
        s
    }

    fn motion_subspace_deriv(&self, q: &SVector<f64, 3>, dq: &SVector<f64, 3>) -> SMatrix<f64, 6, 3> {
        let (t1, t2) = self.rotated_axes(q[2]);
        let omega = self.rotational_axis * dq[2];
        let mut ds = SMatrix::<f64, 6, 3>::zeros();
        ds.fixed_view_mut::<3, 1>(3, 0).copy_from(&(-omega.cross(&t1)));
        ds.fixed_view_mut::<3, 1>(3, 1).copy_from(&(-omega.cross(&t2)));
        ds
    }
}

/// 3-DOF joint restricted to a plane.
///
/// Coordinates are `(q0, q1, q2)`: translation `q0·axis1 + q1·axis2`
/// followed by rotation `q2` about the plane normal.
pub type PlanarJoint = MultiDofJoint<PlanarGeometry, 3>;

impl MultiDofJoint<PlanarGeometry, 3> {
    /// Create a planar joint in the XY plane.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_geometry(name, PlanarGeometry::default())
    }

    /// Move in the XY plane: axes x, y and rotation about z.
    pub fn set_xy_plane(&mut self) {
        self.modify_geometry(|g| *g = PlanarGeometry::canonical(PlaneType::XY));
    }

    /// Move in the YZ plane: axes y, z and rotation about x.
    pub fn set_yz_plane(&mut self) {
        self.modify_geometry(|g| *g = PlanarGeometry::canonical(PlaneType::YZ));
    }

    /// Move in the ZX plane: axes z, x and rotation about y.
    pub fn set_zx_plane(&mut self) {
        self.modify_geometry(|g| *g = PlanarGeometry::canonical(PlaneType::ZX));
    }

    /// Move in the plane spanned by two caller axes.
    ///
    /// Non-orthonormal axes are re-orthonormalized with a warning. Zero or
    /// parallel axes fail with `DegenerateGeometry` and leave the joint
    /// unchanged.
    pub fn set_arbitrary_plane(&mut self, axis1: &Vector3<f64>, axis2: &Vector3<f64>) -> Result<()> {
        let geometry = PlanarGeometry::arbitrary(axis1, axis2)?;
        self.modify_geometry(|g| *g = geometry);
        Ok(())
    }

    /// Current plane type.
    #[must_use]
    pub fn plane_type(&self) -> PlaneType {
        self.geometry().plane_type()
    }

    /// Rotational axis (plane normal).
    #[must_use]
    pub fn rotational_axis(&self) -> &Vector3<f64> {
        self.geometry().rotational_axis()
    }

    /// First translational axis.
    #[must_use]
    pub fn translational_axis1(&self) -> &Vector3<f64> {
        self.geometry().translational_axis1()
    }

    /// Second translational axis.
    #[must_use]
    pub fn translational_axis2(&self) -> &Vector3<f64> {
        self.geometry().translational_axis2()
    }

    /// The basis as a matrix with columns `(axis1, axis2, rotational)`.
    #[must_use]
    pub fn basis(&self) -> Matrix3<f64> {
        Matrix3::from_columns(&[
            *self.translational_axis1(),
            *self.translational_axis2(),
            *self.rotational_axis(),
        ])
    }
}
