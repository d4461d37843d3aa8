//! Integration tests for the artic-* crates.
//!
//! These tests verify end-to-end behavior across the public API:
//! - Frame hierarchy composition and end-effector bookkeeping
//! - Planar joint bases and Jacobians through a skeleton
//! - Force vectors, stepping and the control loop through a world

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]

mod common;

pub mod control_loop;
pub mod frames;
pub mod planar_joint;
pub mod stepping;
