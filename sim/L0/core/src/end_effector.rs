//! End-effectors: fixed frames bound to a body node.

use artic_types::{BodyNodeId, EndEffectorId, FrameRef, Result, SkeletonId};
use nalgebra::Isometry3;

use crate::frame::{FixedFrame, Frame};
use crate::skeleton::Skeleton;

/// A fixed frame permanently associated with one body node.
///
/// The parent body node is resolved once, when the skeleton registers the
/// end-effector, and never changes. The end-effector also remembers a
/// default relative transform it can be reset to.
#[derive(Debug, Clone, PartialEq)]
pub struct EndEffector {
    frame: FixedFrame,
    index: EndEffectorId,
    body_node: BodyNodeId,
    default_transform: Isometry3<f64>,
}

impl EndEffector {
    /// Only the skeleton creates end-effectors, after resolving `body_node`.
    pub(crate) fn new(
        frame: FixedFrame,
        index: EndEffectorId,
        body_node: BodyNodeId,
    ) -> Self {
        let default_transform = frame.relative_transform();
        Self {
            frame,
            index,
            body_node,
            default_transform,
        }
    }

    /// Registration index within the skeleton.
    #[must_use]
    pub fn index(&self) -> EndEffectorId {
        self.index
    }

    /// The body node this end-effector is attached to.
    #[must_use]
    pub fn parent_body_node(&self) -> BodyNodeId {
        self.body_node
    }

    /// The skeleton owning the parent body node, resolved through that
    /// body node in `owner`.
    ///
    /// Fails with `InvalidBodyNode` if `owner` has no such body node.
    pub fn skeleton(&self, owner: &Skeleton) -> Result<SkeletonId> {
        Ok(owner.body_node(self.body_node)?.skeleton())
    }

    /// Replace the current relative transform.
    pub fn set_relative_transform(&mut self, transform: Isometry3<f64>) {
        self.frame.set_relative_transform(transform);
    }

    /// The transform [`EndEffector::reset_relative_transform`] restores.
    #[must_use]
    pub fn default_relative_transform(&self) -> &Isometry3<f64> {
        &self.default_transform
    }

    /// Record a new default; with `use_now`, apply it immediately too.
    pub fn set_default_relative_transform(&mut self, transform: Isometry3<f64>, use_now: bool) {
        self.default_transform = transform;
        if use_now {
            self.reset_relative_transform();
        }
    }

    /// Restore the default relative transform. Idempotent.
    pub fn reset_relative_transform(&mut self) {
        self.frame.set_relative_transform(self.default_transform);
    }
}

impl Frame for EndEffector {
    fn name(&self) -> &str {
        self.frame.name()
    }

    fn parent_frame(&self) -> FrameRef {
        self.frame.parent_frame()
    }

    fn relative_transform(&self) -> Isometry3<f64> {
        self.frame.relative_transform()
    }
}
