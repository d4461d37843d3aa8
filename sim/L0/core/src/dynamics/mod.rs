//! Dynamics computations: spatial algebra, forward kinematics, CRBA, RNE.
//!
//! All passes walk a skeleton's body nodes in tree order (parents before
//! children) and work in body-fixed coordinates. Every function here is
//! read-only over the bodies; writing results back is the caller's job.

mod crba;
mod kinematics;
mod rne;
pub mod spatial;

pub use crba::crba;
pub use kinematics::{BodyState, forward_kinematics};
pub use rne::{RneOutput, rne};
pub use spatial::SpatialVector;
