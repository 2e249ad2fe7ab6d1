//! Light-list query engine
//!
//! [`LightListApi`] binds a light-list root and exposes the four operations
//! callers use: compute, read the raw cache, store, and invalidate. The
//! scene graph and the cache store are passed in by reference so a query
//! never outlives the snapshot it reads.

use super::cache::{CacheState, LightCacheStore};
use super::enumerator::{enumerate, ComputeMode};
use super::LightList;
use crate::scene::{ApiSchemas, SceneGraph, ScenePath};
use thiserror::Error;

/// Light-list query errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LightListError {
    /// The root is missing or does not carry LightListAPI
    #[error("Invalid light list root {path}: {reason}")]
    InvalidRoot {
        /// Requested root
        path: ScenePath,
        /// Why the root was rejected
        reason: InvalidRootReason,
    },
}

/// Why a light-list root was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRootReason {
    /// No composed prim at the path
    NotFound,
    /// The prim exists but lacks LightListAPI
    MissingLightListApi,
}

impl std::fmt::Display for InvalidRootReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => f.write_str("no prim at path"),
            Self::MissingLightListApi => f.write_str("LightListAPI is not applied"),
        }
    }
}

/// Light-list operations for one root
#[derive(Debug)]
pub struct LightListApi<'a, S: SceneGraph + ?Sized> {
    scene: &'a S,
    root: ScenePath,
}

impl<'a, S: SceneGraph + ?Sized> LightListApi<'a, S> {
    /// Bind `root`, which must exist and carry LightListAPI
    pub fn new(scene: &'a S, root: &ScenePath) -> Result<Self, LightListError> {
        let reason = if !scene.exists(root) {
            Some(InvalidRootReason::NotFound)
        } else if !scene.has_api(root, ApiSchemas::LIGHT_LIST) {
            Some(InvalidRootReason::MissingLightListApi)
        } else {
            None
        };

        match reason {
            Some(reason) => Err(LightListError::InvalidRoot {
                path: root.clone(),
                reason,
            }),
            None => Ok(Self {
                scene,
                root: root.clone(),
            }),
        }
    }

    /// The bound root
    pub fn root(&self) -> &ScenePath {
        &self.root
    }

    /// Compute the light list of the root's subtree
    pub fn compute_light_list(&self, cache: &LightCacheStore, mode: ComputeMode) -> LightList {
        let lights = enumerate(self.scene, cache, &self.root, mode);
        log::debug!("Computed {} lights under {} ({mode})", lights.len(), self.root);
        lights
    }

    /// Raw cached targets of the root, valid or not
    pub fn light_list_rel(&self, cache: &LightCacheStore) -> LightList {
        cache.get(&self.root).targets
    }

    /// Diagnostic state of the root's cache
    pub fn cache_state(&self, cache: &LightCacheStore) -> CacheState {
        cache.state(&self.root)
    }

    /// Store `list` as the root's cached light list
    ///
    /// The list is taken as-is; it is not checked against the scene.
    pub fn store_light_list<I>(&self, cache: &mut LightCacheStore, list: I)
    where
        I: IntoIterator<Item = ScenePath>,
    {
        cache.store(&self.root, list);
    }

    /// Stop consult-mode queries from using the root's cached list
    pub fn invalidate_light_list(&self, cache: &mut LightCacheStore) {
        cache.invalidate(&self.root);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Payload, PrimType, Stage};

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    fn stage() -> Stage {
        let mut stage = Stage::new();
        stage.define_prim(&p("/World"), PrimType::Xform).unwrap();
        stage.apply_api(&p("/World"), ApiSchemas::LIGHT_LIST).unwrap();
        stage.define_prim(&p("/World/key"), PrimType::RectLight).unwrap();
        stage.define_prim(&p("/World/prop/bulb"), PrimType::SphereLight).unwrap();
        stage.set_model(&p("/World/prop"), true).unwrap();
        stage.set_payload(&p("/World/prop"), Some(Payload { loaded: false })).unwrap();
        stage
    }

    #[test]
    fn test_invalid_roots() {
        let stage = stage();
        assert_eq!(
            LightListApi::new(&stage, &p("/Missing")).unwrap_err(),
            LightListError::InvalidRoot {
                path: p("/Missing"),
                reason: InvalidRootReason::NotFound,
            }
        );
        assert!(matches!(
            LightListApi::new(&stage, &p("/World/key")),
            Err(LightListError::InvalidRoot {
                reason: InvalidRootReason::MissingLightListApi,
                ..
            })
        ));
        assert!(LightListApi::new(&stage, &p("/World/prop/bulb")).is_err());
        assert!(LightListApi::new(&stage, &p("/World")).is_ok());
    }

    #[test]
    fn test_store_then_rel_returns_exact_list() {
        let stage = stage();
        let mut cache = LightCacheStore::new();
        let api = LightListApi::new(&stage, &p("/World")).unwrap();

        assert!(api.light_list_rel(&cache).is_empty());

        let list = vec![p("/Not/In/Scene"), p("/World/key")];
        api.store_light_list(&mut cache, list.clone());
        assert_eq!(api.light_list_rel(&cache).into_iter().collect::<Vec<_>>(), list);

        api.store_light_list(&mut cache, vec![p("/World/key")]);
        assert_eq!(api.light_list_rel(&cache).len(), 1);
    }

    #[test]
    fn test_invalidate_keeps_rel_but_stops_consult() {
        let stage = stage();
        let mut cache = LightCacheStore::new();
        let api = LightListApi::new(&stage, &p("/World")).unwrap();
        let consult = ComputeMode::ConsultModelHierarchyCache;

        api.store_light_list(&mut cache, vec![p("/World/key"), p("/World/prop/bulb")]);
        assert_eq!(api.compute_light_list(&cache, consult).len(), 2);
        assert_eq!(api.cache_state(&cache), CacheState::Valid);

        api.invalidate_light_list(&mut cache);
        assert_eq!(api.cache_state(&cache), CacheState::Stale);
        assert_eq!(api.light_list_rel(&cache).len(), 2);
        assert_eq!(
            api.compute_light_list(&cache, consult),
            api.compute_light_list(&cache, ComputeMode::IgnoreCache)
        );
    }

    #[test]
    fn test_error_message_names_root() {
        let stage = stage();
        let err = LightListApi::new(&stage, &p("/World/key")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid light list root /World/key: LightListAPI is not applied"
        );
    }
}
