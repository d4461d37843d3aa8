//! Forward dynamics and the per-skeleton step.
//!
//! One step of a skeleton:
//!
//! 1. Refresh stale joint kinematics, clamp commanded forces
//! 2. Build `M(q)` (CRBA) and `c(q, dq)` (RNE with zero acceleration)
//! 3. Solve `M·ddq = τ − c` by Cholesky
//! 4. Store accelerations and transmitted joint wrenches
//! 5. Integrate, refresh kinematics, check for divergence
//! 6. Consume internal and external forces (when configured)

use artic_types::{ArticError, Result, SimulationConfig};
use nalgebra::{DVector, Vector3};
use tracing::{trace, warn};

use crate::dynamics::rne;
use crate::skeleton::Skeleton;

impl Skeleton {
    /// Compute and store generalized accelerations for the current state
    /// and forces.
    ///
    /// Also stores the wrench each joint transmits. Fails with
    /// `SingularMassMatrix` if `M(q)` is not positive definite, and with
    /// `Diverged` if the solution is not finite; in both cases the
    /// skeleton's coordinates are untouched.
    pub fn forward_dynamics(&mut self, gravity: &Vector3<f64>) -> Result<DVector<f64>> {
        self.update_kinematics();
        for body in self.bodies_mut() {
            body.joint_mut().clamp_forces();
        }

        let accelerations = if self.num_dofs() == 0 {
            DVector::zeros(0)
        } else {
            let rhs = self.internal_forces() - self.bias_forces(gravity);
            let cholesky = self.mass_matrix().cholesky().ok_or_else(|| {
                ArticError::SingularMassMatrix {
                    skeleton: self.name().to_owned(),
                }
            })?;
            cholesky.solve(&rhs)
        };

        if accelerations.iter().any(|a| !a.is_finite()) {
            warn!(skeleton = %self.id(), "non-finite generalized acceleration");
            return Err(ArticError::diverged(format!(
                "non-finite acceleration in skeleton '{}'",
                self.name()
            )));
        }

        let wrenches = rne(self.body_nodes(), &accelerations, gravity, true).wrenches;
        for (body, wrench) in self.bodies_mut().iter_mut().zip(wrenches) {
            let offset = body.dof_offset();
            let dofs = body.num_dofs();
            let joint = body.joint_mut();
            joint.set_accelerations(&accelerations.as_slice()[offset..offset + dofs])?;
            joint.set_wrench(wrench);
        }

        Ok(accelerations)
    }

    /// Advance this skeleton by one timestep of `config`.
    ///
    /// After a successful step every joint cache, body frame and
    /// end-effector transform reflects the new coordinates.
    pub fn step(&mut self, config: &SimulationConfig) -> Result<()> {
        config.validate()?;
        let snapshot = self.snapshot();
        if let Err(err) = self.forward_dynamics(&config.gravity.acceleration) {
            self.restore(&snapshot)?;
            return Err(err);
        }
        self.integrate(config.integration, config.timestep);
        self.update_kinematics();

        let state_finite = self
            .body_nodes()
            .iter()
            .flat_map(|b| b.joint().positions().iter().chain(b.joint().velocities()))
            .all(|x| x.is_finite());
        if !state_finite {
            warn!(skeleton = %self.id(), "non-finite state after integration");
            self.restore(&snapshot)?;
            return Err(ArticError::diverged(format!(
                "non-finite state in skeleton '{}'",
                self.name()
            )));
        }

        if config.consume_forces {
            self.reset_internal_forces();
            self.clear_external_forces();
        }

        trace!(skeleton = %self.id(), dofs = self.num_dofs(), "skeleton stepped");
        Ok(())
    }
}
