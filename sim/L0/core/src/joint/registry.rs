//! Name-to-factory lookup for joint types.

use artic_types::{ArticError, Result};
use hashbrown::HashMap;
use nalgebra::Vector3;

use super::{Joint, JointGeometry, PlanarGeometry, PlanarJoint, PrismaticGeometry, PrismaticJoint};
use super::{RevoluteGeometry, RevoluteJoint, WeldGeometry, WeldJoint};

/// Builds a boxed joint with the given name.
pub type JointFactory = fn(&str) -> Box<dyn Joint>;

/// Registry of joint factories keyed by type name.
///
/// [`JointRegistry::default`] knows every joint type in this crate. Callers
/// may register their own geometries under new names.
#[derive(Debug, Clone)]
pub struct JointRegistry {
    factories: HashMap<&'static str, JointFactory>,
}

impl Default for JointRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(WeldGeometry::TYPE_NAME, |name| Box::new(WeldJoint::new(name)));
        registry.register(RevoluteGeometry::TYPE_NAME, |name| {
            Box::new(RevoluteJoint::new(name, Vector3::z_axis()))
        });
        registry.register(PrismaticGeometry::TYPE_NAME, |name| {
            Box::new(PrismaticJoint::new(name, Vector3::z_axis()))
        });
        registry.register(PlanarGeometry::TYPE_NAME, |name| Box::new(PlanarJoint::new(name)));
        registry
    }
}

impl JointRegistry {
    /// A registry with no joint types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register (or replace) the factory for `type_name`.
    pub fn register(&mut self, type_name: &'static str, factory: JointFactory) {
        self.factories.insert(type_name, factory);
    }

    /// Whether a factory exists for `type_name`.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build a joint of type `type_name` called `name`.
    pub fn create(&self, type_name: &str, name: &str) -> Result<Box<dyn Joint>> {
        self.factories
            .get(type_name)
            .map(|factory| factory(name))
            .ok_or_else(|| ArticError::UnknownJointType {
                name: type_name.to_owned(),
            })
    }
}
