//! Thread-safe scene access
//!
//! Single writer, many readers. Every query holds a read guard for its whole
//! duration, so it sees one consistent snapshot of both the stage and the
//! caches. Scene edits and cache edits take the write guard and advance the
//! generation counter.

use super::enumerator::ComputeMode;
use super::light_list::LightListError;
use super::scene::LuxScene;
use super::LightList;
use crate::scene::ScenePath;
use parking_lot::{RwLock, RwLockReadGuard};
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

/// Read snapshot of a [`SharedLuxScene`]
pub struct SceneSnapshot<'a> {
    guard: RwLockReadGuard<'a, LuxScene>,
    generation: u64,
}

impl SceneSnapshot<'_> {
    /// Generation pinned by this snapshot
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Deref for SceneSnapshot<'_> {
    type Target = LuxScene;

    fn deref(&self) -> &Self::Target {
        &*self.guard
    }
}

/// [`LuxScene`] behind a reader/writer lock
#[derive(Debug, Default)]
pub struct SharedLuxScene {
    inner: RwLock<LuxScene>,
    generation: AtomicU64,
}

impl SharedLuxScene {
    /// Share a scene
    pub fn new(scene: LuxScene) -> Self {
        Self {
            inner: RwLock::new(scene),
            generation: AtomicU64::new(0),
        }
    }

    /// Current generation (number of successful edits)
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Pin a read snapshot
    pub fn read(&self) -> SceneSnapshot<'_> {
        let guard = self.inner.read();
        let generation = self.generation.load(Ordering::Acquire);
        SceneSnapshot { guard, generation }
    }

    /// Run an exclusive edit
    ///
    /// The generation advances only when the edit returns `Ok`.
    pub fn edit<R, E>(&self, f: impl FnOnce(&mut LuxScene) -> Result<R, E>) -> Result<R, E> {
        let mut guard = self.inner.write();
        let result = f(&mut *guard)?;
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        log::trace!("Scene edit committed (generation {generation})");
        Ok(result)
    }

    /// Compute a light list against one snapshot
    pub fn compute_light_list(
        &self,
        root: &ScenePath,
        mode: ComputeMode,
    ) -> Result<LightList, LightListError> {
        self.read().compute_light_list(root, mode)
    }

    /// Raw cached targets of `root`
    pub fn light_list_rel(&self, root: &ScenePath) -> Result<LightList, LightListError> {
        self.read().light_list_rel(root)
    }

    /// Store `list` as `root`'s cached light list
    pub fn store_light_list<I>(&self, root: &ScenePath, list: I) -> Result<(), LightListError>
    where
        I: IntoIterator<Item = ScenePath>,
    {
        self.edit(|scene| scene.store_light_list(root, list))
    }

    /// Invalidate `root`'s cached light list
    pub fn invalidate_light_list(&self, root: &ScenePath) -> Result<(), LightListError> {
        self.edit(|scene| scene.invalidate_light_list(root))
    }

    /// Take the scene back out
    pub fn into_inner(self) -> LuxScene {
        self.inner.into_inner()
    }
}
