//! Articulated rigid-body simulation core.
//!
//! This crate provides kinematic trees of rigid bodies connected by
//! parametrized joints, with forward/inverse dynamics and a fixed-step
//! integrator. Its layout:
//!
//! - [`Skeleton`] owns body nodes, joints, end-effectors and fixed frames
//!   in index arenas (tree order)
//! - [`Joint`] is the uniform contract every joint type implements;
//!   [`MultiDofJoint`] is the fixed-arity implementation over a
//!   [`JointGeometry`]
//! - [`World`] steps a set of skeletons with one [`SimulationConfig`]
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         World                               │
//! │  config, time, skeletons                                    │
//! └─────────────────────────┬───────────────────────────────────┘
//!                           │ step()
//!                           ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Skeleton                             │
//! │  q, dq, τ → CRBA + RNE → ddq → integrate → joint caches     │
//! │  BodyNode ─ Joint, EndEffector / FixedFrame via FrameRef    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or engine dependencies. It can
//! be used in headless training loops, hardware control code, analysis
//! tools, or behind a renderer that reads frame transforms.
//!
//! # Quick Start
//!
//! ```
//! use artic_core::{FrameTree, PlanarJoint, Skeleton, WeldJoint, World};
//! use artic_types::{MassProperties, SimulationConfig};
//!
//! let mut skel = Skeleton::new("puck");
//! let table = skel.add_body_node(None, "table", WeldJoint::new("weld"), MassProperties::default())?;
//! let puck = skel.add_body_node(Some(table), "puck", PlanarJoint::new("slide"), MassProperties::sphere(1.0, 0.1))?;
//! skel.set_internal_forces(&[1.0, 0.0, 0.0])?;
//!
//! let mut world = World::new(SimulationConfig::default().zero_gravity())?;
//! let id = world.add_skeleton(skel);
//! world.step()?;
//!
//! let x = world.skeleton(id)?.world_transform(puck.into())?.translation.x;
//! assert!(x > 0.0);
//! # Ok::<(), artic_types::ArticError>(())
//! ```

#![doc(html_root_url = "https://docs.rs/artic-core/0.3.0")]
#![deny(clippy::unwrap_used, clippy::expect_used)]
#![warn(missing_docs)]
#![allow(
    clippy::missing_const_for_fn,       // Many methods can't be const due to nalgebra
    clippy::suboptimal_flops,           // mul_add style changes aren't always clearer
    clippy::missing_errors_doc,         // Error docs added where non-obvious
    clippy::module_name_repetitions,    // JointRegistry in joint, etc.
    clippy::doc_markdown,               // Not all technical terms need backticks
)]

// Dynamics computations (spatial algebra, kinematics, CRBA, RNE)
pub mod dynamics;

// Joint contract, fixed-arity joints, registry
pub mod joint;

// Transform hierarchy
pub mod frame;

pub mod body;
pub mod end_effector;
pub mod skeleton;

// Forward dynamics and per-skeleton step (impl Skeleton)
mod forward;
mod integrate;

pub mod world;

// Batched simulation (independent worlds, optionally parallel)
pub mod batch;

// Controller collaborator and control-loop helpers
pub mod control;

pub use batch::WorldBatch;
pub use body::{BodyNode, CoordinateFrame};
pub use control::{AppliedImpulse, ControlLoop, Controller, Impulse, ImpulseSchedule, PdController};
pub use dynamics::{BodyState, SpatialVector};
pub use end_effector::EndEffector;
pub use frame::{FixedFrame, Frame, FrameTree};
pub use joint::{
    Joint, JointFactory, JointGeometry, JointRegistry, MultiDofJoint, PlanarGeometry, PlanarJoint,
    PlaneType, PrismaticJoint, RevoluteJoint, WeldJoint,
};
pub use skeleton::Skeleton;
pub use world::World;

// Re-export the data layer
pub use artic_types::{
    ArticError, BodyNodeId, EndEffectorId, FixedFrameId, FrameRef, Gravity, IntegrationMethod,
    MassProperties, Result, SimulationConfig, SkeletonId,
};
