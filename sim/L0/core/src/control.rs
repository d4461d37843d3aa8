//! Control-loop helpers that sit between a controller policy and a world.
//!
//! The core never decays forces on its own. Transient pushes live here, in
//! [`ImpulseSchedule`], and are re-applied before every step for as long as
//! they last. [`ControlLoop::tick`] runs one iteration of the usual loop:
//!
//! ```text
//! apply impulse → compute torques → set internal forces → step → withdraw → decay
//! ```
//!
//! The push is withdrawn after every step, so it never piles up when the
//! world retains forces and never outlives a failed step.

use artic_types::{ArticError, BodyNodeId, Result, SkeletonId};
use nalgebra::{DVector, Vector3, Vector6};

use crate::body::CoordinateFrame;
use crate::skeleton::Skeleton;
use crate::world::World;

/// Maps the current generalized state to generalized forces.
pub trait Controller {
    /// Torques for `pose` and `pose_velocity`, skeleton DOF order.
    fn compute_torques(
        &mut self,
        pose: &DVector<f64>,
        pose_velocity: &DVector<f64>,
    ) -> Result<DVector<f64>>;
}

/// Joint-space PD controller: `τ = −kp·(q − q*) − kd·dq`.
#[derive(Debug, Clone, PartialEq)]
pub struct PdController {
    kp: DVector<f64>,
    kd: DVector<f64>,
    target: DVector<f64>,
}

impl PdController {
    /// Create a controller. All three vectors must have the same length.
    pub fn new(kp: DVector<f64>, kd: DVector<f64>, target: DVector<f64>) -> Result<Self> {
        let n = target.len();
        for (context, len) in [("PD proportional gains", kp.len()), ("PD derivative gains", kd.len())] {
            if len != n {
                return Err(ArticError::dimension_mismatch(context, n, len));
            }
        }
        Ok(Self { kp, kd, target })
    }

    /// Same gains on every DOF.
    #[must_use]
    pub fn uniform(kp: f64, kd: f64, target: DVector<f64>) -> Self {
        let n = target.len();
        Self {
            kp: DVector::from_element(n, kp),
            kd: DVector::from_element(n, kd),
            target,
        }
    }

    /// Target pose.
    #[must_use]
    pub fn target(&self) -> &DVector<f64> {
        &self.target
    }

    /// Replace the target pose; its length must not change.
    pub fn set_target(&mut self, target: DVector<f64>) -> Result<()> {
        if target.len() != self.target.len() {
            return Err(ArticError::dimension_mismatch(
                "PD target",
                self.target.len(),
                target.len(),
            ));
        }
        self.target = target;
        Ok(())
    }
}

impl Controller for PdController {
    fn compute_torques(
        &mut self,
        pose: &DVector<f64>,
        pose_velocity: &DVector<f64>,
    ) -> Result<DVector<f64>> {
        let n = self.target.len();
        if pose.len() != n {
            return Err(ArticError::dimension_mismatch("PD pose", n, pose.len()));
        }
        if pose_velocity.len() != n {
            return Err(ArticError::dimension_mismatch("PD pose velocity", n, pose_velocity.len()));
        }
        let error = pose - &self.target;
        Ok(-self.kp.component_mul(&error) - self.kd.component_mul(pose_velocity))
    }
}

/// A force pushed on one body for a fixed number of steps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impulse {
    /// Body the force acts on.
    pub body: BodyNodeId,
    /// Force, world frame.
    pub force: Vector3<f64>,
    /// Point of application, body frame.
    pub offset: Vector3<f64>,
    /// Steps left, including the next one.
    pub remaining: u32,
}

/// At most one active impulse, re-applied each step until it runs out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpulseSchedule {
    active: Option<Impulse>,
}

impl ImpulseSchedule {
    /// An empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start pushing `body` with `force` (world frame) at `offset` (body
    /// frame) for `steps` steps, replacing any active impulse.
    pub fn push(&mut self, body: BodyNodeId, force: Vector3<f64>, offset: Vector3<f64>, steps: u32) {
        self.active = (steps > 0).then_some(Impulse {
            body,
            force,
            offset,
            remaining: steps,
        });
    }

    /// The active impulse, if any.
    #[must_use]
    pub fn active(&self) -> Option<&Impulse> {
        self.active.as_ref()
    }

    /// Add the active force to its body's external wrench.
    ///
    /// Returns the body's wrench from before the push, to be put back with
    /// [`AppliedImpulse::withdraw`] once the step has run.
    pub fn apply(&self, skeleton: &mut Skeleton) -> Result<Option<AppliedImpulse>> {
        let Some(impulse) = &self.active else {
            return Ok(None);
        };
        let prior = skeleton.ext_force_local(impulse.body)?;
        skeleton.add_ext_force(
            impulse.body,
            &impulse.force,
            &impulse.offset,
            CoordinateFrame::World,
            CoordinateFrame::Local,
        )?;
        Ok(Some(AppliedImpulse {
            body: impulse.body,
            prior,
        }))
    }

    /// Count one step off the active impulse; drop it when exhausted.
    pub fn decay(&mut self) {
        if let Some(impulse) = &mut self.active {
            impulse.remaining -= 1;
            if impulse.remaining == 0 {
                self.active = None;
            }
        }
    }
}

/// An impulse that has been added to a body for one step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use = "an applied impulse stays on the body until withdrawn"]
pub struct AppliedImpulse {
    body: BodyNodeId,
    prior: Vector6<f64>,
}

impl AppliedImpulse {
    /// The pushed body.
    #[must_use]
    pub fn body(&self) -> BodyNodeId {
        self.body
    }

    /// Put the body's external wrench back to what it was before the push.
    pub fn withdraw(self, skeleton: &mut Skeleton) -> Result<()> {
        skeleton
            .body_node_mut(self.body)?
            .set_external_wrench_local(self.prior);
        Ok(())
    }
}

/// Drives one skeleton of a world with a controller and impulses.
#[derive(Debug)]
pub struct ControlLoop<C> {
    skeleton: SkeletonId,
    controller: C,
    impulses: ImpulseSchedule,
}

impl<C: Controller> ControlLoop<C> {
    /// Control `skeleton` with `controller`.
    pub fn new(skeleton: SkeletonId, controller: C) -> Self {
        Self {
            skeleton,
            controller,
            impulses: ImpulseSchedule::new(),
        }
    }

    /// The controller.
    pub fn controller(&self) -> &C {
        &self.controller
    }

    /// Mutable controller, e.g. to move its target.
    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// The impulse schedule.
    pub fn impulses(&self) -> &ImpulseSchedule {
        &self.impulses
    }

    /// Mutable impulse schedule, e.g. to start a push.
    pub fn impulses_mut(&mut self) -> &mut ImpulseSchedule {
        &mut self.impulses
    }

    /// Run one control iteration and step the world.
    ///
    /// The impulse only counts down when the step succeeds. Its force is
    /// taken off the body afterwards unless the step consumed it.
    pub fn tick(&mut self, world: &mut World) -> Result<()> {
        let consumed = world.config().consume_forces;
        let applied = self.impulses.apply(world.skeleton_mut(self.skeleton)?)?;
        let outcome = self.control_and_step(world);
        if let Some(applied) = applied {
            if outcome.is_err() || !consumed {
                applied.withdraw(world.skeleton_mut(self.skeleton)?)?;
            }
        }
        outcome?;
        self.impulses.decay();
        Ok(())
    }

    fn control_and_step(&mut self, world: &mut World) -> Result<()> {
        let skeleton = world.skeleton_mut(self.skeleton)?;
        let torques = self
            .controller
            .compute_torques(&skeleton.pose(), &skeleton.pose_velocity())?;
        skeleton.set_internal_forces(torques.as_slice())?;
        world.step()
    }
}
