//! Index handles into skeleton and world arenas.
//!
//! Body nodes, end-effectors and fixed frames live in vectors owned by their
//! skeleton. Everything that needs to point at one of them stores one of
//! these handles instead of a reference.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a body node within its skeleton (tree order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BodyNodeId(pub usize);

impl BodyNodeId {
    /// Create a new body node id.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for BodyNodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BodyNode({})", self.0)
    }
}

/// Index of an end-effector within its skeleton.
///
/// Assigned once at registration, never reused or renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EndEffectorId(pub usize);

impl EndEffectorId {
    /// Create a new end-effector id.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EndEffectorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EndEffector({})", self.0)
    }
}

/// Index of a free-standing fixed frame within its skeleton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FixedFrameId(pub usize);

impl FixedFrameId {
    /// Get the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Process-unique skeleton identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonId(pub u64);

impl SkeletonId {
    /// Get the raw id value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SkeletonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Skeleton({})", self.0)
    }
}

/// A reference frame in a skeleton's transform hierarchy.
///
/// `World` is the implicit root of every chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FrameRef {
    /// The inertial world frame.
    #[default]
    World,
    /// The frame of a body node, driven by its parent joint.
    BodyNode(BodyNodeId),
    /// An end-effector frame.
    EndEffector(EndEffectorId),
    /// A fixed frame not bound to a body node.
    Fixed(FixedFrameId),
}

impl FrameRef {
    /// Check if this is the world frame.
    #[must_use]
    pub fn is_world(self) -> bool {
        matches!(self, Self::World)
    }
}

impl From<BodyNodeId> for FrameRef {
    fn from(id: BodyNodeId) -> Self {
        Self::BodyNode(id)
    }
}

impl From<EndEffectorId> for FrameRef {
    fn from(id: EndEffectorId) -> Self {
        Self::EndEffector(id)
    }
}

impl From<FixedFrameId> for FrameRef {
    fn from(id: FixedFrameId) -> Self {
        Self::Fixed(id)
    }
}

impl std::fmt::Display for FrameRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::World => write!(f, "World"),
            Self::BodyNode(id) => write!(f, "{id}"),
            Self::EndEffector(id) => write!(f, "{id}"),
            Self::Fixed(id) => write!(f, "FixedFrame({})", id.0),
        }
    }
}
