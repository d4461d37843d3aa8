//! Shared fixtures.

use artic_core::{BodyNodeId, PlanarJoint, Skeleton, WeldJoint};
use artic_types::MassProperties;

/// A welded root with one child on an XY planar joint.
pub fn planar_pair(child_mass: f64) -> (Skeleton, BodyNodeId, BodyNodeId) {
    let mut skel = Skeleton::new("planar_pair");
    let root = skel
        .add_body_node(None, "root", WeldJoint::new("anchor"), MassProperties::default())
        .unwrap();
    let child = skel
        .add_body_node(
            Some(root),
            "child",
            PlanarJoint::new("slide"),
            MassProperties::sphere(child_mass, 0.1),
        )
        .unwrap();
    (skel, root, child)
}
