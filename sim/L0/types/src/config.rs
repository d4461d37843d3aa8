//! Configuration types for simulation.
//!
//! This module provides configuration types that control how a world is
//! advanced: timestep, gravity, integration scheme and force bookkeeping.

use nalgebra::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Main configuration for a simulation world.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulationConfig {
    /// Fixed timestep for physics integration (seconds).
    pub timestep: f64,
    /// Gravity configuration.
    pub gravity: Gravity,
    /// Integration scheme used by `step()`.
    pub integration: IntegrationMethod,
    /// Clear internal joint forces and external body wrenches after each
    /// step, so a force is applied for exactly one step unless re-set.
    pub consume_forces: bool,
    /// Maximum simulation time (None for unlimited).
    pub max_time: Option<f64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 1000.0,
            gravity: Gravity::earth(),
            integration: IntegrationMethod::SemiImplicitEuler,
            consume_forces: true,
            max_time: None,
        }
    }
}

impl SimulationConfig {
    /// Create a new simulation config with the given timestep.
    #[must_use]
    pub fn with_timestep(timestep: f64) -> Self {
        Self {
            timestep,
            ..Default::default()
        }
    }

    /// Create a configuration for real-time simulation (60 Hz).
    #[must_use]
    pub fn realtime() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            ..Default::default()
        }
    }

    /// Create a configuration for high-fidelity simulation (10 kHz).
    #[must_use]
    pub fn high_fidelity() -> Self {
        Self {
            timestep: 1.0 / 10_000.0,
            ..Default::default()
        }
    }

    /// Set the gravity.
    #[must_use]
    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    /// Disable gravity (zero-G environment).
    #[must_use]
    pub fn zero_gravity(mut self) -> Self {
        self.gravity = Gravity::zero();
        self
    }

    /// Set the integration method.
    #[must_use]
    pub fn integration(mut self, method: IntegrationMethod) -> Self {
        self.integration = method;
        self
    }

    /// Keep forces set between steps instead of consuming them.
    #[must_use]
    pub fn retain_forces(mut self) -> Self {
        self.consume_forces = false;
        self
    }

    /// Set the maximum simulation time.
    #[must_use]
    pub fn max_time(mut self, max_time: f64) -> Self {
        self.max_time = Some(max_time);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.timestep.is_finite() || self.timestep <= 0.0 {
            return Err(crate::ArticError::InvalidTimestep(self.timestep));
        }

        if self.timestep > 1.0 {
            return Err(crate::ArticError::invalid_config(
                "timestep > 1 second is likely an error",
            ));
        }

        if !self.gravity.acceleration.iter().all(|g| g.is_finite()) {
            return Err(crate::ArticError::invalid_config("gravity must be finite"));
        }

        if let Some(max_time) = self.max_time {
            if !(max_time > 0.0) {
                return Err(crate::ArticError::invalid_config(
                    "max_time must be positive",
                ));
            }
        }

        Ok(())
    }

    /// Get the frequency in Hz.
    #[must_use]
    pub fn frequency(&self) -> f64 {
        1.0 / self.timestep
    }
}

/// Integration scheme for advancing generalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IntegrationMethod {
    /// Semi-implicit (symplectic) Euler: `dq += h·ddq`, then `q += h·dq`.
    #[default]
    SemiImplicitEuler,
    /// Explicit Euler: `q += h·dq` with the old velocity, then `dq += h·ddq`.
    ExplicitEuler,
}

/// Gravity configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Gravity {
    /// Acceleration due to gravity (m/s²).
    pub acceleration: Vector3<f64>,
}

impl Default for Gravity {
    fn default() -> Self {
        Self::earth()
    }
}

impl Gravity {
    /// Standard Earth gravity (9.81 m/s² in -Z direction).
    #[must_use]
    pub fn earth() -> Self {
        Self {
            acceleration: Vector3::new(0.0, 0.0, -9.81),
        }
    }

    /// Zero gravity (microgravity).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            acceleration: Vector3::zeros(),
        }
    }

    /// Custom gravity vector.
    #[must_use]
    pub fn custom(acceleration: Vector3<f64>) -> Self {
        Self { acceleration }
    }

    /// Compute the gravitational force on a body.
    #[must_use]
    pub fn force_on_mass(&self, mass: f64) -> Vector3<f64> {
        self.acceleration * mass
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.consume_forces);
        assert_eq!(config.integration, IntegrationMethod::SemiImplicitEuler);
    }

    #[test]
    fn test_invalid_timestep() {
        let config = SimulationConfig::with_timestep(0.0);
        assert_eq!(config.validate(), Err(crate::ArticError::InvalidTimestep(0.0)));

        let config = SimulationConfig::with_timestep(f64::NAN);
        assert!(config.validate().is_err());

        let config = SimulationConfig::with_timestep(2.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builders() {
        let config = SimulationConfig::realtime()
            .zero_gravity()
            .retain_forces()
            .integration(IntegrationMethod::ExplicitEuler)
            .max_time(10.0);
        assert_relative_eq!(config.frequency(), 60.0, epsilon = 1e-9);
        assert_eq!(config.gravity, Gravity::zero());
        assert!(!config.consume_forces);
        assert_eq!(config.max_time, Some(10.0));
        assert!(config.validate().is_ok());

        assert!(SimulationConfig::default().max_time(-1.0).validate().is_err());
    }

    #[test]
    fn test_gravity() {
        let g = Gravity::earth();
        assert_relative_eq!(g.acceleration.z, -9.81, epsilon = 1e-10);

        let force = g.force_on_mass(2.0);
        assert_relative_eq!(force.z, -19.62, epsilon = 1e-10);
    }
}
