//! Body nodes: rigid bodies in a skeleton tree.

use artic_types::{BodyNodeId, EndEffectorId, FrameRef, MassProperties, Result, SkeletonId};
use nalgebra::{Isometry3, Matrix6, Vector3, Vector6};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dynamics::spatial::compute_body_spatial_inertia;
use crate::frame::Frame;
use crate::joint::Joint;

/// Frame in which a force, torque or offset argument is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordinateFrame {
    /// The inertial world frame.
    #[default]
    World,
    /// The body node's own frame.
    Local,
}

/// A rigid body connected to its parent by exactly one joint.
///
/// The body frame is driven by the joint coordinates; it cannot be assigned
/// directly. External wrenches accumulate in the body frame, applied at the
/// body origin, until cleared.
#[derive(Debug)]
pub struct BodyNode {
    name: String,
    id: BodyNodeId,
    skeleton: SkeletonId,
    parent: Option<BodyNodeId>,
    children: Vec<BodyNodeId>,
    joint: Box<dyn Joint>,
    mass: MassProperties,
    ext_force: Vector6<f64>,
    end_effectors: Vec<EndEffectorId>,
    gravity_mode: bool,
    color: Option<[f64; 4]>,
    dof_offset: usize,
}

impl BodyNode {
    pub(crate) fn new(
        name: String,
        id: BodyNodeId,
        skeleton: SkeletonId,
        parent: Option<BodyNodeId>,
        joint: Box<dyn Joint>,
        mass: MassProperties,
        dof_offset: usize,
    ) -> Self {
        Self {
            name,
            id,
            skeleton,
            parent,
            children: Vec::new(),
            joint,
            mass,
            ext_force: Vector6::zeros(),
            end_effectors: Vec::new(),
            gravity_mode: true,
            color: None,
            dof_offset,
        }
    }

    /// Index in the owning skeleton (tree order).
    #[must_use]
    pub fn id(&self) -> BodyNodeId {
        self.id
    }

    /// Owning skeleton.
    #[must_use]
    pub fn skeleton(&self) -> SkeletonId {
        self.skeleton
    }

    /// Parent body node, `None` for roots attached to the world.
    #[must_use]
    pub fn parent(&self) -> Option<BodyNodeId> {
        self.parent
    }

    /// Child body nodes in creation order.
    #[must_use]
    pub fn children(&self) -> &[BodyNodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: BodyNodeId) {
        self.children.push(child);
    }

    /// The incoming joint.
    #[must_use]
    pub fn joint(&self) -> &dyn Joint {
        self.joint.as_ref()
    }

    /// Mutable access to the incoming joint.
    pub fn joint_mut(&mut self) -> &mut dyn Joint {
        self.joint.as_mut()
    }

    /// Number of generalized coordinates of the incoming joint.
    #[must_use]
    pub fn num_dofs(&self) -> usize {
        self.joint.num_dofs()
    }

    /// Offset of this body's coordinates in the skeleton's generalized vectors.
    #[must_use]
    pub fn dof_offset(&self) -> usize {
        self.dof_offset
    }

    /// Mass properties.
    #[must_use]
    pub fn mass_properties(&self) -> &MassProperties {
        &self.mass
    }

    /// Replace mass properties after validating them.
    pub fn set_mass_properties(&mut self, mass: MassProperties) -> Result<()> {
        mass.validate()?;
        self.mass = mass;
        Ok(())
    }

    /// Body mass.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.mass.mass
    }

    /// Local center of mass.
    #[must_use]
    pub fn local_com(&self) -> &Vector3<f64> {
        &self.mass.center_of_mass
    }

    /// 6×6 spatial inertia about the body origin, body frame.
    #[must_use]
    pub fn spatial_inertia(&self) -> Matrix6<f64> {
        compute_body_spatial_inertia(self.mass.mass, &self.mass.inertia, &self.mass.center_of_mass)
    }

    /// End-effectors attached to this body, in registration order.
    #[must_use]
    pub fn end_effectors(&self) -> &[EndEffectorId] {
        &self.end_effectors
    }

    pub(crate) fn push_end_effector(&mut self, id: EndEffectorId) {
        self.end_effectors.push(id);
    }

    /// Whether gravity acts on this body.
    #[must_use]
    pub fn gravity_mode(&self) -> bool {
        self.gravity_mode
    }

    /// Enable or disable gravity for this body.
    pub fn set_gravity_mode(&mut self, enabled: bool) {
        self.gravity_mode = enabled;
    }

    /// Drawing color (RGBA), if one was set. Opaque to the simulation.
    #[must_use]
    pub fn color(&self) -> Option<[f64; 4]> {
        self.color
    }

    /// Set the drawing color (RGBA).
    pub fn set_color(&mut self, rgba: [f64; 4]) {
        self.color = Some(rgba);
    }

    /// Replace the incoming joint's generalized forces.
    pub fn set_internal_forces(&mut self, forces: &[f64]) -> Result<()> {
        self.joint.set_forces(forces)
    }

    /// Accumulated external wrench `[torque; force]`, body frame, at the
    /// body origin.
    #[must_use]
    pub fn external_force_local(&self) -> Vector6<f64> {
        self.ext_force
    }

    /// Add a wrench already expressed in the body frame.
    pub fn add_external_wrench_local(&mut self, wrench: &Vector6<f64>) {
        self.ext_force += wrench;
    }

    /// Replace the accumulated wrench.
    pub fn set_external_wrench_local(&mut self, wrench: Vector6<f64>) {
        self.ext_force = wrench;
    }

    /// Replace only the torque half of the accumulated wrench.
    pub(crate) fn set_external_torque_local(&mut self, torque: &Vector3<f64>) {
        self.ext_force.fixed_rows_mut::<3>(0).copy_from(torque);
    }

    /// Zero the accumulated wrench.
    pub fn clear_external_forces(&mut self) {
        self.ext_force = Vector6::zeros();
    }
}

impl Frame for BodyNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent_frame(&self) -> FrameRef {
        self.parent.map_or(FrameRef::World, FrameRef::BodyNode)
    }

    fn relative_transform(&self) -> Isometry3<f64> {
        self.joint.local_transform()
    }
}

/// Wrench `[offset × force; force]` of a force applied at a body-frame point.
#[must_use]
pub fn wrench_at(force: &Vector3<f64>, offset: &Vector3<f64>) -> Vector6<f64> {
    let torque = offset.cross(force);
    Vector6::new(torque.x, torque.y, torque.z, force.x, force.y, force.z)
}
