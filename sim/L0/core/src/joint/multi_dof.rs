//! Fixed-arity joint storage shared by every concrete joint type.

use std::any::Any;
use std::fmt::Debug;

use artic_types::{ArticError, Result};
use nalgebra::{Isometry3, Matrix6xX, SMatrix, SVector, Vector6};

use super::Joint;
use crate::dynamics::spatial::transform_motion;

/// The geometric part of a joint: how `N` coordinates move the child.
///
/// All three rules are pure and expressed in the child *joint* frame;
/// [`MultiDofJoint`] composes them with the joint frame offsets.
pub trait JointGeometry<const N: usize>: Clone + Debug + Send + Sync + 'static {
    /// Registry name of the joint type.
    const TYPE_NAME: &'static str;

    /// Motion of the child joint frame relative to the parent joint frame.
    fn motion(&self, q: &SVector<f64, N>) -> Isometry3<f64>;

    /// Motion subspace: body twist of [`JointGeometry::motion`] per unit `dq`.
    fn motion_subspace(&self, q: &SVector<f64, N>) -> SMatrix<f64, 6, N>;

    /// Time derivative of the motion subspace.
    fn motion_subspace_deriv(&self, q: &SVector<f64, N>, dq: &SVector<f64, N>)
    -> SMatrix<f64, 6, N>;
}

#[derive(Debug, Clone)]
struct KinematicsCache<const N: usize> {
    transform: Isometry3<f64>,
    jacobian: SMatrix<f64, 6, N>,
    jacobian_deriv: SMatrix<f64, 6, N>,
}

/// Per-coordinate lower and upper bounds.
#[derive(Debug, Clone, PartialEq)]
struct Bounds<const N: usize> {
    lower: SVector<f64, N>,
    upper: SVector<f64, N>,
}

impl<const N: usize> Bounds<N> {
    fn unbounded() -> Self {
        Self {
            lower: SVector::repeat(f64::NEG_INFINITY),
            upper: SVector::repeat(f64::INFINITY),
        }
    }

    fn clamp(&self, values: &mut SVector<f64, N>) {
        for i in 0..N {
            if values[i] < self.lower[i] {
                values[i] = self.lower[i];
            } else if values[i] > self.upper[i] {
                values[i] = self.upper[i];
            }
        }
    }
}

/// A joint with exactly `N` generalized coordinates.
///
/// Holds positions, velocities, accelerations and forces as fixed-size
/// vectors, their bounds, the joint frame offsets, and the cached local
/// kinematics. The geometry `G` supplies the update rules.
#[derive(Debug, Clone)]
pub struct MultiDofJoint<G, const N: usize> {
    name: String,
    geometry: G,
    positions: SVector<f64, N>,
    velocities: SVector<f64, N>,
    accelerations: SVector<f64, N>,
    forces: SVector<f64, N>,
    position_bounds: Bounds<N>,
    velocity_bounds: Bounds<N>,
    force_bounds: Bounds<N>,
    transform_from_parent: Isometry3<f64>,
    transform_from_child: Isometry3<f64>,
    wrench: Vector6<f64>,
    cache: KinematicsCache<N>,
    dirty: bool,
}

impl<G: JointGeometry<N>, const N: usize> MultiDofJoint<G, N> {
    /// Create a joint at zero coordinates with identity frame offsets.
    #[must_use]
    pub fn with_geometry(name: impl Into<String>, geometry: G) -> Self {
        let mut joint = Self {
            name: name.into(),
            geometry,
            positions: SVector::zeros(),
            velocities: SVector::zeros(),
            accelerations: SVector::zeros(),
            forces: SVector::zeros(),
            position_bounds: Bounds::unbounded(),
            velocity_bounds: Bounds::unbounded(),
            force_bounds: Bounds::unbounded(),
            transform_from_parent: Isometry3::identity(),
            transform_from_child: Isometry3::identity(),
            wrench: Vector6::zeros(),
            cache: KinematicsCache {
                transform: Isometry3::identity(),
                jacobian: SMatrix::zeros(),
                jacobian_deriv: SMatrix::zeros(),
            },
            dirty: true,
        };
        joint.update();
        joint
    }

    /// The joint geometry.
    #[must_use]
    pub fn geometry(&self) -> &G {
        &self.geometry
    }

    /// Mutate the geometry; cached kinematics are refreshed afterwards.
    pub(crate) fn modify_geometry<R>(&mut self, f: impl FnOnce(&mut G) -> R) -> R {
        let out = f(&mut self.geometry);
        self.dirty = true;
        self.update();
        out
    }

    /// Positions as a fixed-size vector.
    #[must_use]
    pub fn position_vector(&self) -> &SVector<f64, N> {
        &self.positions
    }

    /// Velocities as a fixed-size vector.
    #[must_use]
    pub fn velocity_vector(&self) -> &SVector<f64, N> {
        &self.velocities
    }

    /// Set positions from a fixed-size vector. Infallible: arity is static.
    pub fn set_position_vector(&mut self, positions: SVector<f64, N>) {
        self.positions = positions;
        self.dirty = true;
        self.update();
    }

    /// Set velocities from a fixed-size vector.
    pub fn set_velocity_vector(&mut self, velocities: SVector<f64, N>) {
        self.velocities = velocities;
        self.dirty = true;
        self.update();
    }

    /// Set one position coordinate.
    pub fn set_position(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= N {
            return Err(ArticError::dimension_mismatch("joint position index", N, index + 1));
        }
        self.positions[index] = value;
        self.dirty = true;
        self.update();
        Ok(())
    }

    /// Set one generalized force.
    pub fn set_force(&mut self, index: usize, value: f64) -> Result<()> {
        if index >= N {
            return Err(ArticError::dimension_mismatch("joint force index", N, index + 1));
        }
        self.forces[index] = value;
        Ok(())
    }

    /// Set position lower and upper limits.
    pub fn set_position_limits(&mut self, lower: SVector<f64, N>, upper: SVector<f64, N>) {
        self.position_bounds = Bounds { lower, upper };
    }

    /// Set velocity lower and upper limits.
    pub fn set_velocity_limits(&mut self, lower: SVector<f64, N>, upper: SVector<f64, N>) {
        self.velocity_bounds = Bounds { lower, upper };
    }

    /// Set force lower and upper limits.
    pub fn set_force_limits(&mut self, lower: SVector<f64, N>, upper: SVector<f64, N>) {
        self.force_bounds = Bounds { lower, upper };
    }

    /// Position lower limits.
    #[must_use]
    pub fn position_lower_limits(&self) -> &SVector<f64, N> {
        &self.position_bounds.lower
    }

    /// Position upper limits.
    #[must_use]
    pub fn position_upper_limits(&self) -> &SVector<f64, N> {
        &self.position_bounds.upper
    }

    /// Force lower limits.
    #[must_use]
    pub fn force_lower_limits(&self) -> &SVector<f64, N> {
        &self.force_bounds.lower
    }

    /// Force upper limits.
    #[must_use]
    pub fn force_upper_limits(&self) -> &SVector<f64, N> {
        &self.force_bounds.upper
    }

    /// Fixed-size body-frame Jacobian.
    #[must_use]
    pub fn jacobian(&self) -> SMatrix<f64, 6, N> {
        if self.dirty {
            self.compute_jacobian()
        } else {
            self.cache.jacobian
        }
    }

    /// Fixed-size Jacobian time derivative.
    #[must_use]
    pub fn jacobian_deriv(&self) -> SMatrix<f64, 6, N> {
        if self.dirty {
            self.compute_jacobian_deriv()
        } else {
            self.cache.jacobian_deriv
        }
    }

    fn compute_transform(&self) -> Isometry3<f64> {
        self.transform_from_parent
            * self.geometry.motion(&self.positions)
            * self.transform_from_child.inverse()
    }

    fn compute_jacobian(&self) -> SMatrix<f64, 6, N> {
        self.to_body_frame(self.geometry.motion_subspace(&self.positions))
    }

    fn compute_jacobian_deriv(&self) -> SMatrix<f64, 6, N> {
        self.to_body_frame(
            self.geometry
                .motion_subspace_deriv(&self.positions, &self.velocities),
        )
    }

    fn to_body_frame(&self, subspace: SMatrix<f64, 6, N>) -> SMatrix<f64, 6, N> {
        let mut out = SMatrix::<f64, 6, N>::zeros();
        for i in 0..N {
            let column: Vector6<f64> = subspace.column(i).into_owned();
            out.set_column(i, &transform_motion(&self.transform_from_child, &column));
        }
        out
    }

    fn check_len(context: &str, values: &[f64]) -> Result<SVector<f64, N>> {
        if values.len() == N {
            Ok(SVector::from_column_slice(values))
        } else {
            Err(ArticError::dimension_mismatch(context, N, values.len()))
        }
    }
}

impl<G: JointGeometry<N>, const N: usize> Joint for MultiDofJoint<G, N> {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: &str) {
        name.clone_into(&mut self.name);
    }

    fn type_name(&self) -> &'static str {
        G::TYPE_NAME
    }

    fn num_dofs(&self) -> usize {
        N
    }

    fn positions(&self) -> &[f64] {
        self.positions.as_slice()
    }

    fn velocities(&self) -> &[f64] {
        self.velocities.as_slice()
    }

    fn accelerations(&self) -> &[f64] {
        self.accelerations.as_slice()
    }

    fn forces(&self) -> &[f64] {
        self.forces.as_slice()
    }

    fn set_positions(&mut self, positions: &[f64]) -> Result<()> {
        self.positions = Self::check_len("joint positions", positions)?;
        self.dirty = true;
        Ok(())
    }

    fn set_velocities(&mut self, velocities: &[f64]) -> Result<()> {
        self.velocities = Self::check_len("joint velocities", velocities)?;
        self.dirty = true;
        Ok(())
    }

    fn set_accelerations(&mut self, accelerations: &[f64]) -> Result<()> {
        self.accelerations = Self::check_len("joint accelerations", accelerations)?;
        Ok(())
    }

    fn set_forces(&mut self, forces: &[f64]) -> Result<()> {
        self.forces = Self::check_len("joint forces", forces)?;
        Ok(())
    }

    fn reset_forces(&mut self) {
        self.forces.fill(0.0);
    }

    fn transform_from_parent_body_node(&self) -> &Isometry3<f64> {
        &self.transform_from_parent
    }

    fn transform_from_child_body_node(&self) -> &Isometry3<f64> {
        &self.transform_from_child
    }

    fn set_transform_from_parent_body_node(&mut self, transform: Isometry3<f64>) {
        self.transform_from_parent = transform;
        self.dirty = true;
        self.update();
    }

    fn set_transform_from_child_body_node(&mut self, transform: Isometry3<f64>) {
        self.transform_from_child = transform;
        self.dirty = true;
        self.update();
    }

    fn local_transform(&self) -> Isometry3<f64> {
        if self.dirty {
            self.compute_transform()
        } else {
            self.cache.transform
        }
    }

    fn local_jacobian(&self) -> Matrix6xX<f64> {
        Matrix6xX::from_column_slice(self.jacobian().as_slice())
    }

    fn local_jacobian_time_deriv(&self) -> Matrix6xX<f64> {
        Matrix6xX::from_column_slice(self.jacobian_deriv().as_slice())
    }

    fn relative_twist(&self) -> Vector6<f64> {
        self.jacobian() * self.velocities
    }

    fn relative_twist_bias(&self) -> Vector6<f64> {
        self.jacobian_deriv() * self.velocities
    }

    fn jacobian_times(&self, values: &[f64]) -> Vector6<f64> {
        let jacobian = self.jacobian();
        values
            .iter()
            .take(N)
            .enumerate()
            .fold(Vector6::zeros(), |acc, (i, v)| acc + jacobian.column(i) * *v)
    }

    fn project_wrench(&self, wrench: &Vector6<f64>, out: &mut Vec<f64>) {
        let jacobian = self.jacobian();
        out.extend((0..N).map(|i| jacobian.column(i).dot(wrench)));
    }

    fn needs_update(&self) -> bool {
        self.dirty
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn update(&mut self) {
        if !self.dirty {
            return;
        }
        self.cache = KinematicsCache {
            transform: self.compute_transform(),
            jacobian: self.compute_jacobian(),
            jacobian_deriv: self.compute_jacobian_deriv(),
        };
        self.dirty = false;
    }

    fn clamp_forces(&mut self) {
        self.force_bounds.clamp(&mut self.forces);
    }

    fn integrate_velocities(&mut self, dt: f64) {
        self.velocities += self.accelerations * dt;
        self.velocity_bounds.clamp(&mut self.velocities);
        self.dirty = true;
    }

    fn integrate_positions(&mut self, dt: f64) {
        self.positions += self.velocities * dt;
        for i in 0..N {
            let (lower, upper) = (self.position_bounds.lower[i], self.position_bounds.upper[i]);
            if self.positions[i] <= lower {
                self.positions[i] = lower;
                self.velocities[i] = self.velocities[i].max(0.0);
            } else if self.positions[i] >= upper {
                self.positions[i] = upper;
                self.velocities[i] = self.velocities[i].min(0.0);
            }
        }
        self.dirty = true;
    }

    fn wrench(&self) -> Vector6<f64> {
        self.wrench
    }

    fn set_wrench(&mut self, wrench: Vector6<f64>) {
        self.wrench = wrench;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
