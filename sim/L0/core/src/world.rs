//! Simulation world: a set of skeletons advanced together.
//!
//! The [`World`] owns its skeletons and the [`SimulationConfig`] they are
//! stepped with. Skeletons never interact; the world only sequences their
//! steps and keeps simulation time.

use artic_types::{ArticError, Result, SimulationConfig, SkeletonId};
use hashbrown::HashMap;
use nalgebra::Vector3;
use tracing::{debug, trace, warn};

use crate::skeleton::Skeleton;

/// A collection of skeletons sharing one clock and configuration.
#[derive(Debug)]
pub struct World {
    /// Simulation configuration.
    config: SimulationConfig,
    /// Skeletons in insertion order.
    skeletons: Vec<Skeleton>,
    /// Skeleton id to position in `skeletons`.
    index: HashMap<SkeletonId, usize>,
    /// Skeleton name to id.
    skeleton_names: HashMap<String, SkeletonId>,
    /// Current simulation time.
    time: f64,
    /// Number of completed steps.
    step_count: u64,
}

impl Default for World {
    fn default() -> Self {
        Self {
            config: SimulationConfig::default(),
            skeletons: Vec::new(),
            index: HashMap::new(),
            skeleton_names: HashMap::new(),
            time: 0.0,
            step_count: 0,
        }
    }
}

impl World {
    /// Create an empty world. Fails if `config` does not validate.
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: SimulationConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Simulation time in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Completed steps.
    #[must_use]
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    /// Timestep in seconds.
    #[must_use]
    pub fn timestep(&self) -> f64 {
        self.config.timestep
    }

    /// Gravitational acceleration.
    #[must_use]
    pub fn gravity(&self) -> &Vector3<f64> {
        &self.config.gravity.acceleration
    }

    /// Whether `max_time` (if any) has been reached.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.config.max_time.is_some_and(|max| self.time >= max)
    }

    // ==================== Skeletons ====================

    /// Take ownership of a skeleton.
    pub fn add_skeleton(&mut self, skeleton: Skeleton) -> SkeletonId {
        let id = skeleton.id();
        debug!(skeleton = %id, name = skeleton.name(), dofs = skeleton.num_dofs(), "skeleton added");
        self.skeleton_names.insert(skeleton.name().to_owned(), id);
        self.index.insert(id, self.skeletons.len());
        self.skeletons.push(skeleton);
        id
    }

    /// Remove and return a skeleton.
    pub fn remove_skeleton(&mut self, id: SkeletonId) -> Result<Skeleton> {
        let position = self
            .index
            .remove(&id)
            .ok_or(ArticError::InvalidSkeleton(id.raw()))?;
        let skeleton = self.skeletons.remove(position);
        self.skeleton_names.retain(|_, v| *v != id);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Ok(skeleton)
    }

    /// Skeleton by id.
    pub fn skeleton(&self, id: SkeletonId) -> Result<&Skeleton> {
        self.index
            .get(&id)
            .map(|&i| &self.skeletons[i])
            .ok_or(ArticError::InvalidSkeleton(id.raw()))
    }

    /// Mutable skeleton by id.
    pub fn skeleton_mut(&mut self, id: SkeletonId) -> Result<&mut Skeleton> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.skeletons[i]),
            None => Err(ArticError::InvalidSkeleton(id.raw())),
        }
    }

    /// Skeleton id by name.
    #[must_use]
    pub fn skeleton_by_name(&self, name: &str) -> Option<SkeletonId> {
        self.skeleton_names.get(name).copied()
    }

    /// All skeletons in insertion order.
    #[must_use]
    pub fn skeletons(&self) -> &[Skeleton] {
        &self.skeletons
    }

    /// All skeletons, mutable.
    pub fn skeletons_mut(&mut self) -> &mut [Skeleton] {
        &mut self.skeletons
    }

    /// Number of skeletons.
    #[must_use]
    pub fn num_skeletons(&self) -> usize {
        self.skeletons.len()
    }

    // ==================== Stepping ====================

    /// Advance every skeleton by one timestep.
    ///
    /// Skeletons are stepped in insertion order. The step is all or
    /// nothing: on the first failure every skeleton already stepped is
    /// rolled back, the error is returned and time does not advance.
    pub fn step(&mut self) -> Result<()> {
        self.config.validate()?;
        let snapshots: Vec<_> = self.skeletons.iter().map(Skeleton::snapshot).collect();
        for i in 0..self.skeletons.len() {
            if let Err(err) = self.skeletons[i].step(&self.config) {
                warn!(
                    skeleton = %self.skeletons[i].id(),
                    rolled_back = i,
                    "world step failed"
                );
                for (skeleton, snapshot) in self.skeletons[..i].iter_mut().zip(&snapshots) {
                    skeleton.restore(snapshot)?;
                }
                return Err(err);
            }
        }
        self.time += self.config.timestep;
        self.step_count += 1;
        trace!(time = self.time, step = self.step_count, "world stepped");
        Ok(())
    }

    /// Step `steps` times, stopping early at `max_time`.
    pub fn run(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            if self.is_finished() {
                break;
            }
            self.step()?;
        }
        Ok(())
    }

    /// Reset the clock without touching skeleton state.
    pub fn reset_time(&mut self) {
        self.time = 0.0;
        self.step_count = 0;
    }
}
