//! Time integration of generalized coordinates.

use artic_types::IntegrationMethod;

use crate::skeleton::Skeleton;

impl Skeleton {
    /// Advance velocities and positions by `h` from the stored accelerations.
    ///
    /// # Integration Methods
    ///
    /// - **Semi-implicit Euler**: `dq += h·ddq`, then `q += h·dq` with the
    ///   new velocity.
    /// - **Explicit Euler**: `q += h·dq` with the old velocity, then
    ///   `dq += h·ddq`.
    ///
    /// Positions are clamped to joint limits and velocities to velocity
    /// limits. Joint caches are left stale.
    pub(crate) fn integrate(&mut self, method: IntegrationMethod, h: f64) {
        for body in self.bodies_mut() {
            let joint = body.joint_mut();
            match method {
                IntegrationMethod::SemiImplicitEuler => {
                    joint.integrate_velocities(h);
                    joint.integrate_positions(h);
                }
                IntegrationMethod::ExplicitEuler => {
                    joint.integrate_positions(h);
                    joint.integrate_velocities(h);
                }
            }
        }
    }
}
