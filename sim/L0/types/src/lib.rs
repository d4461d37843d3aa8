//! Core types for articulated rigid-body simulation.
//!
//! This crate provides the foundational data shared by every layer of the
//! articulated-body stack:
//!
//! - [`BodyNodeId`], [`EndEffectorId`], [`FixedFrameId`], [`SkeletonId`],
//!   [`FrameRef`] - Arena handles into skeletons and worlds
//! - [`MassProperties`] - Mass, center of mass, inertia tensor
//! - [`SimulationConfig`] - Timestep, gravity, integration scheme
//! - [`ArticError`] - Errors reported by construction and stepping
//!
//! # Design Philosophy
//!
//! These types are **pure data**. They have no kinematics, no dynamics,
//! no integration. They're the common language between the simulation
//! core, controllers, renderers and logging tools.
//!
//! # Conventions
//!
//! - Right-handed, Z up
//! - Spatial vectors are ordered `[angular; linear]`
//! - Joint Jacobians are expressed in the child body frame
//!
//! # Example
//!
//! ```
//! use artic_types::{MassProperties, SimulationConfig};
//!
//! let config = SimulationConfig::realtime().zero_gravity();
//! assert!(config.validate().is_ok());
//!
//! let props = MassProperties::sphere(1.0, 0.1);
//! assert!(props.validate().is_ok());
//! ```

#![doc(html_root_url = "https://docs.rs/artic-types/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,     // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,          // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,        // Error docs added where non-obvious
    clippy::neg_cmp_op_on_partial_ord, // !(x > 0.0) is intentional for NaN rejection
)]

mod config;
mod error;
mod ids;
mod mass;

pub use config::{Gravity, IntegrationMethod, SimulationConfig};
pub use error::ArticError;
pub use ids::{BodyNodeId, EndEffectorId, FixedFrameId, FrameRef, SkeletonId};
pub use mass::MassProperties;

// Re-export math types for convenience
pub use nalgebra::{Isometry3, Matrix3, Point3, UnitQuaternion, Vector3, Vector6};

/// Result type for articulated-body operations.
pub type Result<T> = std::result::Result<T, ArticError>;
