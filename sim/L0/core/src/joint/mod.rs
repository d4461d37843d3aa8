//! Joints: generalized coordinates to rigid motion.
//!
//! Every joint connects a parent body node (or the world) to a child body
//! node and owns `N` generalized coordinates. From those coordinates it
//! derives three quantities, all expressed in the child body frame:
//!
//! - the local transform (child body frame in the parent body frame)
//! - the local Jacobian (6×N, maps `dq` to the child's body twist)
//! - the Jacobian time derivative (depends on `q` and `dq`)
//!
//! Spatial vectors are ordered `[angular; linear]`.
//!
//! Concrete joints are [`MultiDofJoint`] instantiations over a
//! [`JointGeometry`]. The object-safe [`Joint`] trait is what body nodes and
//! skeletons hold, and [`JointRegistry`] builds boxed joints by type name.

mod multi_dof;
mod planar;
mod prismatic;
mod registry;
mod revolute;
mod weld;

use std::any::Any;
use std::fmt::Debug;

use artic_types::Result;
use nalgebra::{Isometry3, Matrix6xX, Vector6};

pub use multi_dof::{JointGeometry, MultiDofJoint};
pub use planar::{PlanarGeometry, PlanarJoint, PlaneType};
pub use prismatic::{PrismaticGeometry, PrismaticJoint};
pub use registry::{JointFactory, JointRegistry};
pub use revolute::{RevoluteGeometry, RevoluteJoint};
pub use weld::{WeldGeometry, WeldJoint};

/// Uniform contract implemented by every joint type.
///
/// Mutating coordinates marks the cached kinematics stale. Reads never
/// return stale data: a stale joint evaluates its update rules on the fly,
/// and [`Joint::update`] writes them back into the cache.
pub trait Joint: Debug + Send + Sync {
    /// Joint name.
    fn name(&self) -> &str;

    /// Rename the joint.
    fn set_name(&mut self, name: &str);

    /// Registry name of the joint type (e.g. `"PlanarJoint"`).
    fn type_name(&self) -> &'static str;

    /// Number of generalized coordinates.
    fn num_dofs(&self) -> usize;

    /// Generalized positions.
    fn positions(&self) -> &[f64];

    /// Generalized velocities.
    fn velocities(&self) -> &[f64];

    /// Generalized accelerations from the last dynamics pass.
    fn accelerations(&self) -> &[f64];

    /// Generalized (internal) forces.
    fn forces(&self) -> &[f64];

    /// Replace all positions. Wrong length leaves the joint untouched.
    fn set_positions(&mut self, positions: &[f64]) -> Result<()>;

    /// Replace all velocities. Wrong length leaves the joint untouched.
    fn set_velocities(&mut self, velocities: &[f64]) -> Result<()>;

    /// Replace all accelerations. Wrong length leaves the joint untouched.
    fn set_accelerations(&mut self, accelerations: &[f64]) -> Result<()>;

    /// Replace all generalized forces. Wrong length leaves the joint untouched.
    fn set_forces(&mut self, forces: &[f64]) -> Result<()>;

    /// Zero the generalized forces.
    fn reset_forces(&mut self);

    /// Pose of the joint frame in the parent body frame.
    fn transform_from_parent_body_node(&self) -> &Isometry3<f64>;

    /// Pose of the joint frame in the child body frame.
    fn transform_from_child_body_node(&self) -> &Isometry3<f64>;

    /// Set the pose of the joint frame in the parent body frame.
    fn set_transform_from_parent_body_node(&mut self, transform: Isometry3<f64>);

    /// Set the pose of the joint frame in the child body frame.
    fn set_transform_from_child_body_node(&mut self, transform: Isometry3<f64>);

    /// Pose of the child body frame in the parent body frame.
    fn local_transform(&self) -> Isometry3<f64>;

    /// Body-frame Jacobian (6×N).
    fn local_jacobian(&self) -> Matrix6xX<f64>;

    /// Time derivative of [`Joint::local_jacobian`] (6×N).
    fn local_jacobian_time_deriv(&self) -> Matrix6xX<f64>;

    /// `J · dq`: the child's twist relative to its parent, body frame.
    fn relative_twist(&self) -> Vector6<f64>;

    /// `dJ · dq`.
    fn relative_twist_bias(&self) -> Vector6<f64>;

    /// `J · values` for an arbitrary vector of length N.
    fn jacobian_times(&self, values: &[f64]) -> Vector6<f64>;

    /// `Jᵀ · wrench`, appended to `out`.
    fn project_wrench(&self, wrench: &Vector6<f64>, out: &mut Vec<f64>);

    /// Whether cached kinematics are out of date.
    fn needs_update(&self) -> bool;

    /// Mark cached kinematics stale without recomputing.
    fn mark_dirty(&mut self);

    /// Recompute cached kinematics if stale.
    fn update(&mut self);

    /// Clamp commanded forces into the force limits.
    fn clamp_forces(&mut self);

    /// `dq += dt · ddq`, clamped into the velocity limits.
    fn integrate_velocities(&mut self, dt: f64);

    /// `q += dt · dq`, clamped into the position limits.
    ///
    /// A coordinate pinned at a limit loses the velocity pushing it out.
    fn integrate_positions(&mut self, dt: f64);

    /// Wrench transmitted from the parent body through this joint, child
    /// body frame, as of the last dynamics pass.
    fn wrench(&self) -> Vector6<f64>;

    /// Store the transmitted wrench.
    fn set_wrench(&mut self, wrench: Vector6<f64>);

    /// Part of the transmitted wrench carried by the joint constraint:
    /// `wrench − J · forces`.
    fn body_constraint_wrench(&self) -> Vector6<f64> {
        self.wrench() - self.jacobian_times(self.forces())
    }

    /// Upcast for downcasting to a concrete joint type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to a concrete joint type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Joint + '_ {
    /// Downcast to a concrete joint type.
    #[must_use]
    pub fn downcast_ref<T: Joint + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Mutably downcast to a concrete joint type.
    pub fn downcast_mut<T: Joint + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}
