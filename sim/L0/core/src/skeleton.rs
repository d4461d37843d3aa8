//! Skeletons: ordered trees of body nodes and their frames.
//!
//! A [`Skeleton`] owns every body node, joint, end-effector and fixed frame
//! reachable from it. Body nodes are stored in tree order (a parent always
//! precedes its children), so single forward and backward sweeps over the
//! arena implement the recursive algorithms. Everything else refers to
//! these objects by index.

use std::sync::atomic::{AtomicU64, Ordering};

use artic_types::{
    ArticError, BodyNodeId, EndEffectorId, FixedFrameId, FrameRef, MassProperties, Result,
    SkeletonId,
};
use nalgebra::{DMatrix, DVector, Isometry3, Point3, Vector3, Vector6};
use tracing::debug;

use crate::body::{BodyNode, CoordinateFrame, wrench_at};
use crate::dynamics::{BodyState, crba, forward_kinematics, rne, spatial::transform_force};
use crate::end_effector::EndEffector;
use crate::frame::{FixedFrame, Frame, FrameTree};
use crate::joint::Joint;

static NEXT_SKELETON_ID: AtomicU64 = AtomicU64::new(0);

/// An articulated tree (or forest) of rigid bodies.
#[derive(Debug)]
pub struct Skeleton {
    id: SkeletonId,
    name: String,
    bodies: Vec<BodyNode>,
    end_effectors: Vec<EndEffector>,
    fixed_frames: Vec<FixedFrame>,
    num_dofs: usize,
}

impl Skeleton {
    /// Create an empty skeleton with a process-unique id.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: SkeletonId(NEXT_SKELETON_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
            bodies: Vec::new(),
            end_effectors: Vec::new(),
            fixed_frames: Vec::new(),
            num_dofs: 0,
        }
    }

    /// Skeleton id.
    #[must_use]
    pub fn id(&self) -> SkeletonId {
        self.id
    }

    /// Skeleton name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total number of generalized coordinates.
    #[must_use]
    pub fn num_dofs(&self) -> usize {
        self.num_dofs
    }

    // ==================== Construction ====================

    /// Attach a new body node below `parent` (or to the world when `None`).
    pub fn add_body_node<J: Joint + 'static>(
        &mut self,
        parent: Option<BodyNodeId>,
        name: impl Into<String>,
        joint: J,
        mass: MassProperties,
    ) -> Result<BodyNodeId> {
        self.add_body_node_boxed(parent, name, Box::new(joint), mass)
    }

    /// [`Skeleton::add_body_node`] for joints built by a
    /// [`JointRegistry`](crate::JointRegistry).
    pub fn add_body_node_boxed(
        &mut self,
        parent: Option<BodyNodeId>,
        name: impl Into<String>,
        mut joint: Box<dyn Joint>,
        mass: MassProperties,
    ) -> Result<BodyNodeId> {
        if let Some(parent) = parent {
            if parent.index() >= self.bodies.len() {
                return Err(ArticError::structural(format!(
                    "parent {parent} does not exist in {}",
                    self.id
                )));
            }
        }
        mass.validate()?;

        let id = BodyNodeId(self.bodies.len());
        let name = name.into();
        joint.update();
        let dofs = joint.num_dofs();
        debug!(skeleton = %self.id, body = %id, name = %name, joint = joint.type_name(), dofs, "body node added");

        self.bodies.push(BodyNode::new(
            name,
            id,
            self.id,
            parent,
            joint,
            mass,
            self.num_dofs,
        ));
        if let Some(parent) = parent {
            self.bodies[parent.index()].push_child(id);
        }
        self.num_dofs += dofs;
        Ok(id)
    }

    /// Register an end-effector positioned `relative` to `reference`.
    ///
    /// The reference chain is walked up to the first body node, which
    /// becomes the parent body node. The new index equals the number of
    /// end-effectors registered before it. On failure nothing is
    /// registered.
    pub fn create_end_effector(
        &mut self,
        reference: FrameRef,
        name: impl Into<String>,
        relative: Isometry3<f64>,
    ) -> Result<EndEffectorId> {
        let body = self.first_body_node(reference)?;

        let index = EndEffectorId(self.end_effectors.len());
        let frame = FixedFrame::new(name, reference, relative);
        debug!(skeleton = %self.id, end_effector = %index, body = %body, "end-effector registered");
        self.end_effectors
            .push(EndEffector::new(frame, index, body));
        self.bodies[body.index()].push_end_effector(index);
        Ok(index)
    }

    /// Add a free-standing fixed frame positioned `relative` to `parent`.
    pub fn create_fixed_frame(
        &mut self,
        parent: FrameRef,
        name: impl Into<String>,
        relative: Isometry3<f64>,
    ) -> Result<FixedFrameId> {
        if !parent.is_world() && self.frame(parent).is_none() {
            return Err(ArticError::structural(format!("{parent} does not exist")));
        }
        let id = FixedFrameId(self.fixed_frames.len());
        self.fixed_frames.push(FixedFrame::new(name, parent, relative));
        Ok(id)
    }

    // ==================== Access ====================

    /// All body nodes in tree order.
    #[must_use]
    pub fn body_nodes(&self) -> &[BodyNode] {
        &self.bodies
    }

    /// Number of body nodes.
    #[must_use]
    pub fn num_body_nodes(&self) -> usize {
        self.bodies.len()
    }

    /// Body node by id.
    pub fn body_node(&self, id: BodyNodeId) -> Result<&BodyNode> {
        self.bodies
            .get(id.index())
            .ok_or(ArticError::InvalidBodyNode(id.index()))
    }

    /// Mutable body node by id.
    pub fn body_node_mut(&mut self, id: BodyNodeId) -> Result<&mut BodyNode> {
        self.bodies
            .get_mut(id.index())
            .ok_or(ArticError::InvalidBodyNode(id.index()))
    }

    /// First body node called `name`.
    #[must_use]
    pub fn body_node_by_name(&self, name: &str) -> Option<BodyNodeId> {
        self.bodies.iter().find(|b| b.name() == name).map(BodyNode::id)
    }

    /// Body nodes attached directly to the world.
    pub fn root_body_nodes(&self) -> impl Iterator<Item = BodyNodeId> + '_ {
        self.bodies
            .iter()
            .filter(|b| b.parent().is_none())
            .map(BodyNode::id)
    }

    /// End-effectors in registration order.
    #[must_use]
    pub fn end_effectors(&self) -> &[EndEffector] {
        &self.end_effectors
    }

    /// Number of registered end-effectors.
    #[must_use]
    pub fn num_end_effectors(&self) -> usize {
        self.end_effectors.len()
    }

    /// End-effector by id.
    pub fn end_effector(&self, id: EndEffectorId) -> Result<&EndEffector> {
        self.end_effectors
            .get(id.index())
            .ok_or(ArticError::InvalidEndEffector(id.index()))
    }

    /// Mutable end-effector by id.
    pub fn end_effector_mut(&mut self, id: EndEffectorId) -> Result<&mut EndEffector> {
        self.end_effectors
            .get_mut(id.index())
            .ok_or(ArticError::InvalidEndEffector(id.index()))
    }

    /// Fixed frame by id.
    pub fn fixed_frame(&self, id: FixedFrameId) -> Result<&FixedFrame> {
        self.fixed_frames
            .get(id.index())
            .ok_or_else(|| ArticError::structural(format!("{} does not exist", FrameRef::Fixed(id))))
    }

    /// Assign the relative transform of a fixed frame or end-effector.
    ///
    /// Body node frames follow their joint coordinates and reject direct
    /// assignment, as does the world frame.
    pub fn set_relative_transform(&mut self, frame: FrameRef, transform: Isometry3<f64>) -> Result<()> {
        match frame {
            FrameRef::World => Err(ArticError::structural("the world frame cannot be moved")),
            FrameRef::BodyNode(id) => Err(ArticError::structural(format!(
                "{id} is driven by its joint; set joint positions instead"
            ))),
            FrameRef::EndEffector(id) => {
                self.end_effector_mut(id)?.set_relative_transform(transform);
                Ok(())
            }
            FrameRef::Fixed(id) => {
                let fixed = self.fixed_frames.get_mut(id.index()).ok_or_else(|| {
                    ArticError::structural(format!("{frame} does not exist"))
                })?;
                fixed.set_relative_transform(transform);
                Ok(())
            }
        }
    }

    // ==================== Generalized state ====================

    fn gather(&self, read: impl Fn(&dyn Joint) -> &[f64]) -> DVector<f64> {
        let mut out = Vec::with_capacity(self.num_dofs);
        for body in &self.bodies {
            out.extend_from_slice(read(body.joint()));
        }
        DVector::from_vec(out)
    }

    /// Split `values` across the joints. The length is checked up front so
    /// a mismatch mutates nothing.
    fn scatter(
        &mut self,
        context: &str,
        values: &[f64],
        mut write: impl FnMut(&mut dyn Joint, &[f64]) -> Result<()>,
    ) -> Result<()> {
        if values.len() != self.num_dofs {
            return Err(ArticError::dimension_mismatch(context, self.num_dofs, values.len()));
        }
        for body in &mut self.bodies {
            let offset = body.dof_offset();
            let dofs = body.num_dofs();
            write(body.joint_mut(), &values[offset..offset + dofs])?;
        }
        Ok(())
    }

    /// Generalized positions in tree order.
    #[must_use]
    pub fn pose(&self) -> DVector<f64> {
        self.gather(|joint| joint.positions())
    }

    /// Generalized velocities in tree order.
    #[must_use]
    pub fn pose_velocity(&self) -> DVector<f64> {
        self.gather(|joint| joint.velocities())
    }

    /// Generalized accelerations from the last step.
    #[must_use]
    pub fn pose_acceleration(&self) -> DVector<f64> {
        self.gather(|joint| joint.accelerations())
    }

    /// Generalized (internal) forces.
    #[must_use]
    pub fn internal_forces(&self) -> DVector<f64> {
        self.gather(|joint| joint.forces())
    }

    /// Replace all generalized positions and refresh joint kinematics.
    pub fn set_pose(&mut self, positions: &[f64]) -> Result<()> {
        self.scatter("skeleton pose", positions, |joint, q| joint.set_positions(q))?;
        self.update_kinematics();
        Ok(())
    }

    /// Replace all generalized velocities.
    pub fn set_pose_velocity(&mut self, velocities: &[f64]) -> Result<()> {
        self.scatter("skeleton pose velocity", velocities, |joint, dq| {
            joint.set_velocities(dq)
        })?;
        self.update_kinematics();
        Ok(())
    }

    /// Replace all generalized forces. Consumed by the next step.
    pub fn set_internal_forces(&mut self, forces: &[f64]) -> Result<()> {
        self.scatter("skeleton internal forces", forces, |joint, f| joint.set_forces(f))
    }

    /// Zero all generalized forces.
    pub fn reset_internal_forces(&mut self) {
        for body in &mut self.bodies {
            body.joint_mut().reset_forces();
        }
    }

    /// Refresh every stale joint cache in tree order.
    pub fn update_kinematics(&mut self) {
        for body in &mut self.bodies {
            body.joint_mut().update();
        }
    }

    // ==================== External forces ====================

    /// Add `force` applied at `offset` to a body's external wrench.
    ///
    /// `force_frame` and `offset_frame` say how each argument is expressed.
    /// Accumulates until consumed by a step or cleared.
    pub fn add_ext_force(
        &mut self,
        body: BodyNodeId,
        force: &Vector3<f64>,
        offset: &Vector3<f64>,
        force_frame: CoordinateFrame,
        offset_frame: CoordinateFrame,
    ) -> Result<()> {
        let wrench = self.local_wrench(body, force, offset, force_frame, offset_frame)?;
        self.body_node_mut(body)?.add_external_wrench_local(&wrench);
        Ok(())
    }

    /// Replace a body's external wrench with `force` applied at `offset`.
    pub fn set_ext_force(
        &mut self,
        body: BodyNodeId,
        force: &Vector3<f64>,
        offset: &Vector3<f64>,
        force_frame: CoordinateFrame,
        offset_frame: CoordinateFrame,
    ) -> Result<()> {
        let wrench = self.local_wrench(body, force, offset, force_frame, offset_frame)?;
        self.body_node_mut(body)?.set_external_wrench_local(wrench);
        Ok(())
    }

    /// Add a pure torque to a body's external wrench.
    pub fn add_ext_torque(
        &mut self,
        body: BodyNodeId,
        torque: &Vector3<f64>,
        frame: CoordinateFrame,
    ) -> Result<()> {
        let local = self.local_vector(body, torque, frame)?;
        let wrench = Vector6::new(local.x, local.y, local.z, 0.0, 0.0, 0.0);
        self.body_node_mut(body)?.add_external_wrench_local(&wrench);
        Ok(())
    }

    /// Replace the torque half of a body's external wrench.
    pub fn set_ext_torque(
        &mut self,
        body: BodyNodeId,
        torque: &Vector3<f64>,
        frame: CoordinateFrame,
    ) -> Result<()> {
        let local = self.local_vector(body, torque, frame)?;
        self.body_node_mut(body)?.set_external_torque_local(&local);
        Ok(())
    }

    /// A body's accumulated external wrench, body frame at the body origin.
    pub fn ext_force_local(&self, body: BodyNodeId) -> Result<Vector6<f64>> {
        Ok(self.body_node(body)?.external_force_local())
    }

    /// A body's accumulated external wrench, world frame at the world origin.
    pub fn ext_force_global(&self, body: BodyNodeId) -> Result<Vector6<f64>> {
        let local = self.ext_force_local(body)?;
        let world = self.world_transform(FrameRef::BodyNode(body))?;
        Ok(transform_force(&world, &local))
    }

    /// Zero every body's external wrench.
    pub fn clear_external_forces(&mut self) {
        for body in &mut self.bodies {
            body.clear_external_forces();
        }
    }

    fn local_vector(
        &self,
        body: BodyNodeId,
        v: &Vector3<f64>,
        frame: CoordinateFrame,
    ) -> Result<Vector3<f64>> {
        match frame {
            CoordinateFrame::Local => {
                self.body_node(body)?;
                Ok(*v)
            }
            CoordinateFrame::World => {
                let world = self.world_transform(FrameRef::BodyNode(body))?;
                Ok(world.rotation.inverse() * v)
            }
        }
    }

    fn local_wrench(
        &self,
        body: BodyNodeId,
        force: &Vector3<f64>,
        offset: &Vector3<f64>,
        force_frame: CoordinateFrame,
        offset_frame: CoordinateFrame,
    ) -> Result<Vector6<f64>> {
        let world = self.world_transform(FrameRef::BodyNode(body))?;
        let f = match force_frame {
            CoordinateFrame::Local => *force,
            CoordinateFrame::World => world.rotation.inverse() * force,
        };
        let p = match offset_frame {
            CoordinateFrame::Local => *offset,
            CoordinateFrame::World => world.inverse_transform_point(&Point3::from(*offset)).coords,
        };
        Ok(wrench_at(&f, &p))
    }

    // ==================== Physical queries ====================

    /// World pose and body twist of every body node.
    #[must_use]
    pub fn body_states(&self) -> Vec<BodyState> {
        forward_kinematics(&self.bodies)
    }

    fn body_state(&self, body: BodyNodeId) -> Result<BodyState> {
        self.body_node(body)?;
        Ok(self.body_states()[body.index()])
    }

    /// Spatial velocity `[ω; v]` of a body, body frame.
    pub fn body_velocity(&self, body: BodyNodeId) -> Result<Vector6<f64>> {
        Ok(self.body_state(body)?.velocity)
    }

    /// Center of mass of a body, world frame.
    pub fn body_world_com(&self, body: BodyNodeId) -> Result<Vector3<f64>> {
        let state = self.body_state(body)?;
        Ok(state.world_com(&self.bodies[body.index()]))
    }

    /// Kinetic energy of a body.
    pub fn body_kinetic_energy(&self, body: BodyNodeId) -> Result<f64> {
        let state = self.body_state(body)?;
        Ok(state.kinetic_energy(&self.bodies[body.index()]))
    }

    /// Linear momentum of a body, world frame.
    pub fn body_linear_momentum(&self, body: BodyNodeId) -> Result<Vector3<f64>> {
        let state = self.body_state(body)?;
        Ok(state.linear_momentum(&self.bodies[body.index()]))
    }

    /// Potential energy of a body under `gravity`, zero at the world origin.
    /// Bodies with gravity disabled have none.
    pub fn body_potential_energy(&self, body: BodyNodeId, gravity: &Vector3<f64>) -> Result<f64> {
        let node = self.body_node(body)?;
        if !node.gravity_mode() {
            return Ok(0.0);
        }
        let com = self.body_world_com(body)?;
        Ok(-node.mass() * gravity.dot(&com))
    }

    /// Sum of body masses.
    #[must_use]
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(BodyNode::mass).sum()
    }

    /// Skeleton center of mass, world frame. Origin for an empty skeleton.
    #[must_use]
    pub fn com(&self) -> Vector3<f64> {
        let total = self.total_mass();
        if total <= 0.0 {
            return Vector3::zeros();
        }
        let weighted = self
            .bodies
            .iter()
            .zip(self.body_states())
            .fold(Vector3::zeros(), |acc, (body, state)| {
                acc + state.world_com(body) * body.mass()
            });
        weighted / total
    }

    /// Total kinetic energy.
    #[must_use]
    pub fn kinetic_energy(&self) -> f64 {
        self.bodies
            .iter()
            .zip(self.body_states())
            .map(|(body, state)| state.kinetic_energy(body))
            .sum()
    }

    /// Total potential energy under `gravity`.
    #[must_use]
    pub fn potential_energy(&self, gravity: &Vector3<f64>) -> f64 {
        self.bodies
            .iter()
            .zip(self.body_states())
            .filter(|(body, _)| body.gravity_mode())
            .map(|(body, state)| -body.mass() * gravity.dot(&state.world_com(body)))
            .sum()
    }

    /// Joint-space mass matrix `M(q)`.
    #[must_use]
    pub fn mass_matrix(&self) -> DMatrix<f64> {
        crba(&self.bodies)
    }

    /// Coriolis, centrifugal, gravity and external terms `c(q, dq)`, so
    /// that `M·ddq + c = τ`.
    #[must_use]
    pub fn bias_forces(&self, gravity: &Vector3<f64>) -> DVector<f64> {
        rne(&self.bodies, &DVector::zeros(self.num_dofs), gravity, true).forces
    }

    /// Generalized forces that realize `accelerations` in the current state.
    pub fn inverse_dynamics(
        &self,
        accelerations: &[f64],
        gravity: &Vector3<f64>,
    ) -> Result<DVector<f64>> {
        if accelerations.len() != self.num_dofs {
            return Err(ArticError::dimension_mismatch(
                "inverse dynamics accelerations",
                self.num_dofs,
                accelerations.len(),
            ));
        }
        let ddq = DVector::from_column_slice(accelerations);
        Ok(rne(&self.bodies, &ddq, gravity, true).forces)
    }

    /// Wrench transmitted by a body's joint in the last step, child frame.
    pub fn joint_wrench(&self, body: BodyNodeId) -> Result<Vector6<f64>> {
        Ok(self.body_node(body)?.joint().wrench())
    }

    /// Constraint part of a body's joint wrench (`wrench − J·τ`).
    pub fn body_constraint_wrench(&self, body: BodyNodeId) -> Result<Vector6<f64>> {
        Ok(self.body_node(body)?.joint().body_constraint_wrench())
    }

    pub(crate) fn bodies_mut(&mut self) -> &mut [BodyNode] {
        &mut self.bodies
    }

    /// Capture everything a step writes, so a failed step can be undone.
    pub(crate) fn snapshot(&self) -> StepSnapshot {
        let joints = self
            .bodies
            .iter()
            .map(|body| {
                let joint = body.joint();
                JointSnapshot {
                    positions: joint.positions().to_vec(),
                    velocities: joint.velocities().to_vec(),
                    accelerations: joint.accelerations().to_vec(),
                    forces: joint.forces().to_vec(),
                    wrench: joint.wrench(),
                    ext_force: body.external_force_local(),
                }
            })
            .collect();
        StepSnapshot {
            skeleton: self.id,
            joints,
        }
    }

    /// Put back a snapshot taken from this skeleton and refresh kinematics.
    pub(crate) fn restore(&mut self, snapshot: &StepSnapshot) -> Result<()> {
        if snapshot.skeleton != self.id || snapshot.joints.len() != self.bodies.len() {
            return Err(ArticError::structural(format!(
                "snapshot does not belong to skeleton '{}'",
                self.name
            )));
        }
        for (body, saved) in self.bodies.iter_mut().zip(&snapshot.joints) {
            body.set_external_wrench_local(saved.ext_force);
            let joint = body.joint_mut();
            joint.set_positions(&saved.positions)?;
            joint.set_velocities(&saved.velocities)?;
            joint.set_accelerations(&saved.accelerations)?;
            joint.set_forces(&saved.forces)?;
            joint.set_wrench(saved.wrench);
        }
        self.update_kinematics();
        Ok(())
    }
}

/// Per-joint state written by a step.
#[derive(Debug, Clone)]
struct JointSnapshot {
    positions: Vec<f64>,
    velocities: Vec<f64>,
    accelerations: Vec<f64>,
    forces: Vec<f64>,
    wrench: Vector6<f64>,
    ext_force: Vector6<f64>,
}

/// Saved step state of one skeleton.
#[derive(Debug, Clone)]
pub(crate) struct StepSnapshot {
    skeleton: SkeletonId,
    joints: Vec<JointSnapshot>,
}

impl FrameTree for Skeleton {
    fn frame(&self, frame: FrameRef) -> Option<&dyn Frame> {
        match frame {
            FrameRef::World => None,
            FrameRef::BodyNode(id) => self.bodies.get(id.index()).map(|b| b as &dyn Frame),
            FrameRef::EndEffector(id) => self.end_effectors.get(id.index()).map(|e| e as &dyn Frame),
            FrameRef::Fixed(id) => self.fixed_frames.get(id.index()).map(|f| f as &dyn Frame),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::joint::{PlanarJoint, PrismaticJoint, RevoluteJoint, WeldJoint};
    use approx::assert_relative_eq;

    fn two_link() -> (Skeleton, BodyNodeId, BodyNodeId) {
        let mut skel = Skeleton::new("two-link");
        let root = skel
            .add_body_node(None, "root", WeldJoint::new("weld"), MassProperties::point_mass(1.0))
            .unwrap();
        let child = skel
            .add_body_node(Some(root), "child", PlanarJoint::new("planar"), MassProperties::sphere(2.0, 0.1))
            .unwrap();
        (skel, root, child)
    }

    #[test]
    fn test_unique_ids_and_tree_order() {
        let (skel, root, child) = two_link();
        let other = Skeleton::new("other");
        assert_ne!(skel.id(), other.id());
        assert_eq!(skel.num_dofs(), 3);
        assert_eq!(skel.body_node(child).unwrap().parent(), Some(root));
        assert_eq!(skel.body_node(root).unwrap().children(), &[child]);
        assert_eq!(skel.body_node(child).unwrap().dof_offset(), 0);
        assert_eq!(skel.root_body_nodes().collect::<Vec<_>>(), vec![root]);
        assert_eq!(skel.body_node_by_name("child"), Some(child));
    }

    #[test]
    fn test_add_body_node_rejects_missing_parent() {
        let mut skel = Skeleton::new("broken");
        let err = skel
            .add_body_node(
                Some(BodyNodeId(4)),
                "orphan",
                WeldJoint::new("w"),
                MassProperties::default(),
            )
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(skel.num_body_nodes(), 0);

        let err = skel
            .add_body_node(None, "massless", WeldJoint::new("w"), MassProperties::point_mass(0.0))
            .unwrap_err();
        assert!(matches!(err, ArticError::InvalidMassProperties { .. }));
    }

    #[test]
    fn test_end_effector_indices_are_stable() {
        let (mut skel, root, child) = two_link();
        let a = skel
            .create_end_effector(child.into(), "a", Isometry3::identity())
            .unwrap();
        let b = skel
            .create_end_effector(root.into(), "b", Isometry3::identity())
            .unwrap();
        let c = skel
            .create_end_effector(a.into(), "c", Isometry3::translation(0.0, 0.1, 0.0))
            .unwrap();
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(skel.end_effector(c).unwrap().parent_body_node(), child);
        assert_eq!(skel.end_effector(c).unwrap().skeleton(&skel).unwrap(), skel.id());
        assert_eq!(skel.body_node(child).unwrap().end_effectors(), &[a, c]);
    }

    #[test]
    fn test_end_effector_skeleton_follows_parent_body() {
        let (mut skel, _, child) = two_link();
        let ee = skel
            .create_end_effector(child.into(), "tip", Isometry3::identity())
            .unwrap();
        let owner = skel.body_node(child).unwrap().skeleton();
        assert_eq!(skel.end_effector(ee).unwrap().skeleton(&skel).unwrap(), owner);

        // A skeleton without the parent body node cannot resolve it
        let other = Skeleton::new("other");
        let err = skel.end_effector(ee).unwrap().skeleton(&other).unwrap_err();
        assert!(matches!(err, ArticError::InvalidBodyNode(1)));
    }

    #[test]
    fn test_end_effector_needs_a_body_node() {
        let (mut skel, _, _) = two_link();
        let floating = skel
            .create_fixed_frame(FrameRef::World, "floating", Isometry3::identity())
            .unwrap();
        let err = skel
            .create_end_effector(floating.into(), "bad", Isometry3::identity())
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(skel.num_end_effectors(), 0);

        let err = skel
            .create_end_effector(FrameRef::EndEffector(EndEffectorId(5)), "bad", Isometry3::identity())
            .unwrap_err();
        assert!(err.is_structural());
        assert_eq!(skel.num_end_effectors(), 0);
    }

    #[test]
    fn test_body_frames_reject_assignment() {
        let (mut skel, _, child) = two_link();
        let err = skel
            .set_relative_transform(child.into(), Isometry3::identity())
            .unwrap_err();
        assert!(err.is_structural());
        assert!(skel.set_relative_transform(FrameRef::World, Isometry3::identity()).is_err());
    }

    #[test]
    fn test_end_effector_follows_joint() {
        let (mut skel, _, child) = two_link();
        let tip = skel
            .create_end_effector(child.into(), "tip", Isometry3::translation(1.0, 0.0, 0.0))
            .unwrap();
        skel.set_pose(&[0.5, 0.0, std::f64::consts::FRAC_PI_2]).unwrap();
        let world = skel.world_transform(tip.into()).unwrap();
        assert_relative_eq!(world.translation.vector, Vector3::new(0.5, 1.0, 0.0), epsilon = 1e-12);

        let in_child = skel.transform(tip.into(), child.into()).unwrap();
        assert_relative_eq!(in_child.translation.vector, Vector3::new(1.0, 0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_set_pose_wrong_length_mutates_nothing() {
        let (mut skel, _, _) = two_link();
        skel.set_pose(&[1.0, 2.0, 3.0]).unwrap();
        let err = skel.set_pose(&[0.0; 4]).unwrap_err();
        assert_eq!(err, ArticError::dimension_mismatch("skeleton pose", 3, 4));
        assert_eq!(skel.pose().as_slice(), &[1.0, 2.0, 3.0]);

        assert!(skel.set_internal_forces(&[1.0]).is_err());
        assert_eq!(skel.internal_forces(), DVector::zeros(3));
    }

    #[test]
    fn test_ext_force_frames() {
        let mut skel = Skeleton::new("puck");
        let puck = skel
            .add_body_node(None, "puck", RevoluteJoint::new("spin", Vector3::z_axis()), MassProperties::default())
            .unwrap();
        skel.set_pose(&[std::f64::consts::FRAC_PI_2]).unwrap();

        // World +x is body -y after a quarter turn about z.
        skel.add_ext_force(puck, &Vector3::x(), &Vector3::zeros(), CoordinateFrame::World, CoordinateFrame::Local)
            .unwrap();
        let local = skel.ext_force_local(puck).unwrap();
        assert_relative_eq!(local, Vector6::new(0.0, 0.0, 0.0, 0.0, -1.0, 0.0), epsilon = 1e-12);

        let global = skel.ext_force_global(puck).unwrap();
        assert_relative_eq!(global, Vector6::new(0.0, 0.0, 0.0, 1.0, 0.0, 0.0), epsilon = 1e-12);

        skel.set_ext_torque(puck, &Vector3::z(), CoordinateFrame::Local).unwrap();
        skel.add_ext_torque(puck, &Vector3::z(), CoordinateFrame::World).unwrap();
        assert_relative_eq!(skel.ext_force_local(puck).unwrap()[2], 2.0, epsilon = 1e-12);

        skel.clear_external_forces();
        assert_eq!(skel.ext_force_local(puck).unwrap(), Vector6::zeros());
    }

    #[test]
    fn test_energy_and_com() {
        let mut skel = Skeleton::new("slider");
        let cart = skel
            .add_body_node(None, "cart", PrismaticJoint::new("z", Vector3::z_axis()), MassProperties::point_mass(2.0))
            .unwrap();
        skel.set_pose(&[3.0]).unwrap();
        skel.set_pose_velocity(&[4.0]).unwrap();
        let g = Vector3::new(0.0, 0.0, -10.0);

        assert_relative_eq!(skel.total_mass(), 2.0);
        assert_relative_eq!(skel.com(), Vector3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(skel.kinetic_energy(), 16.0, epsilon = 1e-12);
        assert_relative_eq!(skel.potential_energy(&g), 60.0, epsilon = 1e-12);
        assert_relative_eq!(skel.body_linear_momentum(cart).unwrap(), Vector3::new(0.0, 0.0, 8.0));

        skel.body_node_mut(cart).unwrap().set_gravity_mode(false);
        assert_relative_eq!(skel.body_potential_energy(cart, &g).unwrap(), 0.0);
    }

    #[test]
    fn test_inverse_dynamics_length_checked() {
        let (skel, _, _) = two_link();
        assert!(skel.inverse_dynamics(&[0.0], &Vector3::zeros()).is_err());
        let tau = skel.inverse_dynamics(&[1.0, 0.0, 0.0], &Vector3::zeros()).unwrap();
        assert_relative_eq!(tau[0], 2.0, epsilon = 1e-12);
    }
}
