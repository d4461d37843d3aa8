//! Rigid-transform hierarchy.
//!
//! Frames live in arenas owned by a [`Skeleton`](crate::Skeleton) and name
//! their parent with a [`FrameRef`]. World transforms are never stored; they
//! are composed up the chain on request, so
//! `world(frame) = world(parent) ∘ relative(frame)` holds by construction.

use artic_types::{ArticError, BodyNodeId, FrameRef, Result};
use nalgebra::Isometry3;

/// A node in the transform hierarchy.
pub trait Frame {
    /// Frame name.
    fn name(&self) -> &str;

    /// The frame this one is positioned relative to.
    fn parent_frame(&self) -> FrameRef;

    /// Pose of this frame in its parent frame.
    fn relative_transform(&self) -> Isometry3<f64>;
}

/// An arena that can resolve [`FrameRef`]s.
///
/// Implementors only provide lookup; chain walking is shared.
pub trait FrameTree {
    /// Resolve a non-world frame. `None` for dangling references.
    fn frame(&self, frame: FrameRef) -> Option<&dyn Frame>;

    /// Pose of `frame` in the world frame.
    ///
    /// Fails with a structural error if the chain hits a dangling reference
    /// before reaching the world.
    fn world_transform(&self, frame: FrameRef) -> Result<Isometry3<f64>> {
        let mut transform = Isometry3::identity();
        let mut current = frame;
        while !current.is_world() {
            let node = self.frame(current).ok_or_else(|| {
                ArticError::structural(format!("{current} does not resolve to a frame"))
            })?;
            transform = node.relative_transform() * transform;
            current = node.parent_frame();
        }
        Ok(transform)
    }

    /// Pose of `frame` expressed in `reference`.
    fn transform(&self, frame: FrameRef, reference: FrameRef) -> Result<Isometry3<f64>> {
        let world_frame = self.world_transform(frame)?;
        if reference.is_world() {
            return Ok(world_frame);
        }
        Ok(self.world_transform(reference)?.inverse() * world_frame)
    }

    /// Walk up from `frame` (inclusive) to the first body node frame.
    ///
    /// Fails with a structural error if the chain ends at the world first.
    fn first_body_node(&self, frame: FrameRef) -> Result<BodyNodeId> {
        let mut current = frame;
        loop {
            match current {
                FrameRef::World => {
                    return Err(ArticError::structural(format!(
                        "{frame} is not attached to any body node"
                    )));
                }
                FrameRef::BodyNode(id) => {
                    return if self.frame(current).is_some() {
                        Ok(id)
                    } else {
                        Err(ArticError::structural(format!("{current} does not exist")))
                    };
                }
                FrameRef::EndEffector(_) | FrameRef::Fixed(_) => {
                    let node = self.frame(current).ok_or_else(|| {
                        ArticError::structural(format!("{current} does not resolve to a frame"))
                    })?;
                    current = node.parent_frame();
                }
            }
        }
    }
}

/// A frame whose relative transform changes only by explicit assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedFrame {
    name: String,
    parent: FrameRef,
    relative: Isometry3<f64>,
}

impl FixedFrame {
    /// Create a fixed frame.
    #[must_use]
    pub fn new(name: impl Into<String>, parent: FrameRef, relative: Isometry3<f64>) -> Self {
        Self {
            name: name.into(),
            parent,
            relative,
        }
    }

    /// Replace the relative transform.
    pub fn set_relative_transform(&mut self, transform: Isometry3<f64>) {
        self.relative = transform;
    }
}

impl Frame for FixedFrame {
    fn name(&self) -> &str {
        &self.name
    }

    fn parent_frame(&self) -> FrameRef {
        self.parent
    }

    fn relative_transform(&self) -> Isometry3<f64> {
        self.relative
    }
}
