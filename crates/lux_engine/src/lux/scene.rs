//! Stage plus light-list caches
//!
//! [`LuxScene`] owns a [`Stage`] and the [`LightCacheStore`] attached to it,
//! and keeps the two in step: a cache entry lives exactly as long as its
//! root prim carries LightListAPI.

use super::cache::{CacheEntry, LightCacheStore};
use super::enumerator::ComputeMode;
use super::light_list::{LightListApi, LightListError};
use super::LightList;
use crate::scene::{
    ApiSchemas, DescriptionError, LightListDesc, LoadPolicy, Payload, PrimKey, PrimType,
    SceneDescription, ScenePath, Stage, StageError,
};

/// A stage and its light-list caches
#[derive(Debug, Clone, Default)]
pub struct LuxScene {
    stage: Stage,
    cache: LightCacheStore,
}

impl LuxScene {
    /// Wrap a stage with an empty cache store
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            cache: LightCacheStore::new(),
        }
    }

    /// Build a scene from a description, then apply `policy` to its payloads
    ///
    /// Persisted light lists are restored as written; a list without a
    /// `valid` flag comes back stale. Lists on prims without LightListAPI
    /// are dropped.
    pub fn from_description(
        desc: &SceneDescription,
        policy: LoadPolicy,
    ) -> Result<Self, DescriptionError> {
        let mut stage = desc.build_stage()?;
        stage.apply_load_policy(policy);

        let mut cache = LightCacheStore::new();
        for (root, list) in desc.light_lists()? {
            let entry = CacheEntry {
                targets: list.targets.into_iter().collect(),
                valid: list.valid,
            };
            cache.restore(&root, entry);
        }

        let mut scene = Self { stage, cache };
        scene.prune_orphaned_caches();
        Ok(scene)
    }

    /// Describe the scene, including every persisted light list
    pub fn to_description(&self) -> SceneDescription {
        SceneDescription::from_stage(&self.stage, |path| {
            self.cache.entry(path).map(|entry| LightListDesc {
                targets: entry.targets.iter().cloned().collect(),
                valid: entry.valid,
            })
        })
    }

    /// The stage
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// The cache store
    pub fn cache(&self) -> &LightCacheStore {
        &self.cache
    }

    /// Light-list operations bound to `root`
    pub fn light_list_api(
        &self,
        root: &ScenePath,
    ) -> Result<LightListApi<'_, Stage>, LightListError> {
        LightListApi::new(&self.stage, root)
    }

    /// Compute the light list under `root`
    pub fn compute_light_list(
        &self,
        root: &ScenePath,
        mode: ComputeMode,
    ) -> Result<LightList, LightListError> {
        Ok(self.light_list_api(root)?.compute_light_list(&self.cache, mode))
    }

    /// Raw cached targets of `root`
    pub fn light_list_rel(&self, root: &ScenePath) -> Result<LightList, LightListError> {
        Ok(self.light_list_api(root)?.light_list_rel(&self.cache))
    }

    /// Store `list` as `root`'s cached light list
    pub fn store_light_list<I>(&mut self, root: &ScenePath, list: I) -> Result<(), LightListError>
    where
        I: IntoIterator<Item = ScenePath>,
    {
        LightListApi::new(&self.stage, root)?.store_light_list(&mut self.cache, list);
        Ok(())
    }

    /// Invalidate `root`'s cached light list
    pub fn invalidate_light_list(&mut self, root: &ScenePath) -> Result<(), LightListError> {
        LightListApi::new(&self.stage, root)?.invalidate_light_list(&mut self.cache);
        Ok(())
    }

    /// Define a prim (see [`Stage::define_prim`])
    pub fn define_prim(
        &mut self,
        path: &ScenePath,
        prim_type: PrimType,
    ) -> Result<PrimKey, StageError> {
        self.stage.define_prim(path, prim_type)
    }

    /// Set a prim's active flag
    pub fn set_active(&mut self, path: &ScenePath, active: bool) -> Result<(), StageError> {
        self.stage.set_active(path, active)
    }

    /// Mark a prim as a model-hierarchy boundary
    pub fn set_model(&mut self, path: &ScenePath, model: bool) -> Result<(), StageError> {
        self.stage.set_model(path, model)
    }

    /// Attach or replace a payload arc
    pub fn set_payload(
        &mut self,
        path: &ScenePath,
        payload: Option<Payload>,
    ) -> Result<(), StageError> {
        self.stage.set_payload(path, payload)
    }

    /// Apply API schemas
    pub fn apply_api(&mut self, path: &ScenePath, api: ApiSchemas) -> Result<(), StageError> {
        self.stage.apply_api(path, api)
    }

    /// Remove API schemas; removing LightListAPI destroys the prim's cache
    pub fn remove_api(&mut self, path: &ScenePath, api: ApiSchemas) -> Result<(), StageError> {
        self.stage.remove_api(path, api)?;
        if api.contains(ApiSchemas::LIGHT_LIST) && self.cache.remove(path).is_some() {
            log::debug!("Dropped light list cache of {path}");
        }
        Ok(())
    }

    /// Load payloads at or below `path`
    pub fn load(&mut self, path: &ScenePath) -> Result<usize, StageError> {
        self.stage.load(path)
    }

    /// Unload payloads at or below `path`
    pub fn unload(&mut self, path: &ScenePath) -> Result<usize, StageError> {
        self.stage.unload(path)
    }

    /// Apply a load policy to every payload
    pub fn apply_load_policy(&mut self, policy: LoadPolicy) -> usize {
        self.stage.apply_load_policy(policy)
    }

    /// Remove a prim subtree together with the caches rooted in it
    pub fn remove_prim(&mut self, path: &ScenePath) -> Result<Vec<ScenePath>, StageError> {
        let removed = self.stage.remove_prim(path)?;
        for gone in &removed {
            if self.cache.remove(gone).is_some() {
                log::debug!("Dropped light list cache of removed prim {gone}");
            }
        }
        Ok(removed)
    }

    fn prune_orphaned_caches(&mut self) {
        let stage = &self.stage;
        self.cache.retain_roots(|root| {
            let capable = stage
                .authored_prim(root)
                .is_some_and(|prim| prim.api_schemas.contains(ApiSchemas::LIGHT_LIST));
            if !capable {
                log::warn!("Ignoring light list cache on {root}: LightListAPI is not applied");
            }
            capable
        });
    }
}
