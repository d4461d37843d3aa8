//! Batched simulation: N independent worlds stepped together.
//!
//! Worlds share no state, so stepping is parallelized across CPU cores via
//! rayon when the `parallel` feature is enabled; sequential fallback when
//! disabled.
//!
//! # Examples
//!
//! ```
//! use artic_core::{World, WorldBatch};
//!
//! let mut batch = WorldBatch::new((0..8).map(|_| World::default()).collect());
//! let errors = batch.step_all();
//! assert!(errors.iter().all(Option::is_none));
//! assert_eq!(batch.world(0).unwrap().step_count(), 1);
//! ```

use artic_types::ArticError;

use crate::world::World;

/// Independent worlds advanced in lockstep.
#[derive(Debug, Default)]
pub struct WorldBatch {
    worlds: Vec<World>,
}

impl WorldBatch {
    /// Wrap a set of worlds.
    #[must_use]
    pub fn new(worlds: Vec<World>) -> Self {
        Self { worlds }
    }

    /// Number of worlds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.worlds.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.worlds.is_empty()
    }

    /// Append a world.
    pub fn push(&mut self, world: World) {
        self.worlds.push(world);
    }

    // ==================== World Access ====================

    /// Immutable access to world `i`.
    ///
    /// Returns `None` if `i >= len()`.
    #[must_use]
    pub fn world(&self, i: usize) -> Option<&World> {
        self.worlds.get(i)
    }

    /// Mutable access to world `i`, e.g. to set forces before
    /// [`step_all()`](Self::step_all).
    pub fn world_mut(&mut self, i: usize) -> Option<&mut World> {
        self.worlds.get_mut(i)
    }

    /// Iterator over all worlds (immutable).
    pub fn worlds(&self) -> impl ExactSizeIterator<Item = &World> {
        self.worlds.iter()
    }

    /// Iterator over all worlds (mutable).
    pub fn worlds_mut(&mut self) -> impl ExactSizeIterator<Item = &mut World> {
        self.worlds.iter_mut()
    }

    // ==================== Stepping ====================

    /// Step every world by one timestep.
    ///
    /// Returns per-world errors: `None` = success, `Some(e)` = that
    /// world's step failed. Results do not depend on thread count or
    /// scheduling order.
    pub fn step_all(&mut self) -> Vec<Option<ArticError>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IntoParallelRefMutIterator, ParallelIterator};
            self.worlds
                .par_iter_mut()
                .map(|world| world.step().err())
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            self.worlds
                .iter_mut()
                .map(|world| world.step().err())
                .collect()
        }
    }
}
