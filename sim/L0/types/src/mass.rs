//! Mass properties of a rigid body.

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Mass properties of a rigid body.
///
/// Contains mass, center of mass offset, and inertia tensor. All quantities
/// are expressed in the body's own frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MassProperties {
    /// Total mass in kg.
    pub mass: f64,
    /// Center of mass offset from body origin in local coordinates.
    pub center_of_mass: Vector3<f64>,
    /// Inertia tensor about center of mass in local coordinates (kg·m²).
    pub inertia: Matrix3<f64>,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self::new(1.0, Vector3::zeros(), Matrix3::identity())
    }
}

impl MassProperties {
    /// Create mass properties with given values.
    ///
    /// # Arguments
    ///
    /// * `mass` - Total mass (must be positive)
    /// * `center_of_mass` - COM offset from body origin
    /// * `inertia` - Inertia tensor about COM
    #[must_use]
    pub const fn new(mass: f64, center_of_mass: Vector3<f64>, inertia: Matrix3<f64>) -> Self {
        Self {
            mass,
            center_of_mass,
            inertia,
        }
    }

    /// Create mass properties for a point mass at the origin.
    #[must_use]
    pub fn point_mass(mass: f64) -> Self {
        Self {
            mass,
            center_of_mass: Vector3::zeros(),
            inertia: Matrix3::zeros(),
        }
    }

    /// Create mass properties for a uniform sphere.
    ///
    /// Inertia of a solid sphere: I = (2/5) * m * r²
    #[must_use]
    pub fn sphere(mass: f64, radius: f64) -> Self {
        let i = 0.4 * mass * radius * radius;
        Self {
            mass,
            center_of_mass: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(i, i, i)),
        }
    }

    /// Create mass properties for a uniform box.
    ///
    /// Inertia of a solid box with dimensions (x, y, z):
    /// - Ixx = (1/12) * m * (y² + z²)
    /// - Iyy = (1/12) * m * (x² + z²)
    /// - Izz = (1/12) * m * (x² + y²)
    #[must_use]
    pub fn box_shape(mass: f64, half_extents: Vector3<f64>) -> Self {
        let x2 = 4.0 * half_extents.x * half_extents.x;
        let y2 = 4.0 * half_extents.y * half_extents.y;
        let z2 = 4.0 * half_extents.z * half_extents.z;

        let ixx = mass * (y2 + z2) / 12.0;
        let iyy = mass * (x2 + z2) / 12.0;
        let izz = mass * (x2 + y2) / 12.0;

        Self {
            mass,
            center_of_mass: Vector3::zeros(),
            inertia: Matrix3::from_diagonal(&Vector3::new(ixx, iyy, izz)),
        }
    }

    /// Set the center of mass offset.
    #[must_use]
    pub fn with_center_of_mass(mut self, com: Vector3<f64>) -> Self {
        self.center_of_mass = com;
        self
    }

    /// Set the principal moments `(Ixx, Iyy, Izz)` and products
    /// `(Ixy, Ixz, Iyz)` of the inertia tensor.
    #[must_use]
    pub fn with_moments(mut self, diagonal: Vector3<f64>, products: Vector3<f64>) -> Self {
        self.inertia = Matrix3::new(
            diagonal.x, products.x, products.y, //
            products.x, diagonal.y, products.z, //
            products.y, products.z, diagonal.z,
        );
        self
    }

    /// Validate that the mass properties are physically valid.
    ///
    /// Articulated bodies need strictly positive, finite mass; immovable
    /// bodies are modeled with a weld joint instead of infinite mass.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(crate::ArticError::invalid_mass(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }

        if !self.center_of_mass.iter().all(|x| x.is_finite()) {
            return Err(crate::ArticError::invalid_mass(
                "center of mass must be finite",
            ));
        }

        if !self.inertia.iter().all(|x| x.is_finite()) {
            return Err(crate::ArticError::invalid_mass("inertia must be finite"));
        }

        if (self.inertia - self.inertia.transpose()).abs().max() > 1e-9 {
            return Err(crate::ArticError::invalid_mass(
                "inertia tensor must be symmetric",
            ));
        }

        // Physical inertia tensors are positive semi-definite
        let eigenvalues = self.inertia.symmetric_eigenvalues();
        if eigenvalues.iter().any(|&e| e < -1e-10) {
            return Err(crate::ArticError::invalid_mass(
                "inertia tensor must be positive semi-definite",
            ));
        }

        Ok(())
    }
}
