//! Single-axis slider.

use nalgebra::{Isometry3, SMatrix, SVector, Translation3, Unit, UnitQuaternion, Vector3};

use super::multi_dof::{JointGeometry, MultiDofJoint};

/// Translation axis of a prismatic joint, joint frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PrismaticGeometry {
    axis: Unit<Vector3<f64>>,
}

impl JointGeometry<1> for PrismaticGeometry {
    const TYPE_NAME: &'static str = "PrismaticJoint";

    fn motion(&self, q: &SVector<f64, 1>) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::from(self.axis.into_inner() * q[0]),
            UnitQuaternion::identity(),
        )
    }

    fn motion_subspace(&self, _q: &SVector<f64, 1>) -> SMatrix<f64, 6, 1> {
        let a = self.axis.into_inner();
        SMatrix::<f64, 6, 1>::new(0.0, 0.0, 0.0, a.x, a.y, a.z)
    }

    fn motion_subspace_deriv(&self, _q: &SVector<f64, 1>, _dq: &SVector<f64, 1>) -> SMatrix<f64, 6, 1> {
        SMatrix::zeros()
    }
}

/// 1-DOF translation along a fixed axis.
pub type PrismaticJoint = MultiDofJoint<PrismaticGeometry, 1>;

impl MultiDofJoint<PrismaticGeometry, 1> {
    /// Create a prismatic joint along `axis`.
    #[must_use]
    pub fn new(name: impl Into<String>, axis: Unit<Vector3<f64>>) -> Self {
        Self::with_geometry(name, PrismaticGeometry { axis })
    }

    /// Translation axis.
    #[must_use]
    pub fn axis(&self) -> &Unit<Vector3<f64>> {
        &self.geometry().axis
    }

    /// Change the translation axis.
    pub fn set_axis(&mut self, axis: Unit<Vector3<f64>>) {
        self.modify_geometry(|g| g.axis = axis);
    }
}
