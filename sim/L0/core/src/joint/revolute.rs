//! Single-axis hinge.

use nalgebra::{Isometry3, SMatrix, SVector, Translation3, Unit, UnitQuaternion, Vector3};

use super::multi_dof::{JointGeometry, MultiDofJoint};

/// Rotation axis of a revolute joint, joint frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RevoluteGeometry {
    axis: Unit<Vector3<f64>>,
}

impl JointGeometry<1> for RevoluteGeometry {
    const TYPE_NAME: &'static str = "RevoluteJoint";

    fn motion(&self, q: &SVector<f64, 1>) -> Isometry3<f64> {
        Isometry3::from_parts(
            Translation3::identity(),
            UnitQuaternion::from_axis_angle(&self.axis, q[0]),
        )
    }

    fn motion_subspace(&self, _q: &SVector<f64, 1>) -> SMatrix<f64, 6, 1> {
        let a = self.axis.into_inner();
        SMatrix::<f64, 6, 1>::new(a.x, a.y, a.z, 0.0, 0.0, 0.0)
    }

    fn motion_subspace_deriv(&self, _q: &SVector<f64, 1>, _dq: &SVector<f64, 1>) -> SMatrix<f64, 6, 1> {
        SMatrix::zeros()
    }
}

/// 1-DOF rotation about a fixed axis.
pub type RevoluteJoint = MultiDofJoint<RevoluteGeometry, 1>;

impl MultiDofJoint<RevoluteGeometry, 1> {
    /// Create a revolute joint about `axis`.
    #[must_use]
    pub fn new(name: impl Into<String>, axis: Unit<Vector3<f64>>) -> Self {
        Self::with_geometry(name, RevoluteGeometry { axis })
    }

    /// Rotation axis.
    #[must_use]
    pub fn axis(&self) -> &Unit<Vector3<f64>> {
        &self.geometry().axis
    }

    /// Change the rotation axis.
    pub fn set_axis(&mut self, axis: Unit<Vector3<f64>>) {
        self.modify_geometry(|g| g.axis = axis);
    }
}
