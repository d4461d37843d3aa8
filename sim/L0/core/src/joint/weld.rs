//! Rigid attachment with no degrees of freedom.

use nalgebra::{Isometry3, SMatrix, SVector};

use super::multi_dof::{JointGeometry, MultiDofJoint};

/// Geometry of a weld joint. The child never moves relative to the parent
/// beyond the fixed joint frame offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeldGeometry;

impl JointGeometry<0> for WeldGeometry {
    const TYPE_NAME: &'static str = "WeldJoint";

    fn motion(&self, _q: &SVector<f64, 0>) -> Isometry3<f64> {
        Isometry3::identity()
    }

    fn motion_subspace(&self, _q: &SVector<f64, 0>) -> SMatrix<f64, 6, 0> {
        SMatrix::zeros()
    }

    fn motion_subspace_deriv(&self, _q: &SVector<f64, 0>, _dq: &SVector<f64, 0>) -> SMatrix<f64, 6, 0> {
        SMatrix::zeros()
    }
}

/// 0-DOF joint. Welding a root body node to the world fixes it in place.
pub type WeldJoint = MultiDofJoint<WeldGeometry, 0>;

impl MultiDofJoint<WeldGeometry, 0> {
    /// Create a weld joint.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_geometry(name, WeldGeometry)
    }
}
