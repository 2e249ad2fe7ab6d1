//! Light enumeration
//!
//! Depth-first, pre-order walk of a subtree collecting lights and light
//! filters. The walk never descends into inactive prims, and an unloaded
//! payload exposes no children, so its contents stay invisible.
//!
//! When the cache is consulted, the walk additionally:
//! - splices the query root's own cached list in first (if valid), then keeps
//!   walking live;
//! - treats every model-hierarchy boundary below the root as opaque: its
//!   cached list is spliced in (if valid) and its subtree is not walked,
//!   loaded or not.

use super::cache::LightCacheStore;
use super::predicate::is_light_or_filter;
use super::LightList;
use crate::foundation::collections::extend_keep_first;
use crate::scene::{SceneGraph, ScenePath};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a light-list query treats cached lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComputeMode {
    /// Walk the live scene only; caches are neither read nor written
    #[default]
    IgnoreCache,
    /// Use valid caches at the root and at model-hierarchy boundaries
    ConsultModelHierarchyCache,
}

impl fmt::Display for ComputeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IgnoreCache => f.write_str("ignore"),
            Self::ConsultModelHierarchyCache => f.write_str("consult"),
        }
    }
}

impl FromStr for ComputeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" | "ignore_cache" => Ok(Self::IgnoreCache),
            "consult" | "consult_model_hierarchy_cache" => Ok(Self::ConsultModelHierarchyCache),
            other => Err(format!("Unknown compute mode: {other}")),
        }
    }
}

/// Enumerate the lights below (and including) `root`
///
/// `IgnoreCache` never touches `cache`. A root that does not exist or is
/// inactive yields an empty list.
pub fn enumerate<S: SceneGraph + ?Sized>(
    scene: &S,
    cache: &LightCacheStore,
    root: &ScenePath,
    mode: ComputeMode,
) -> LightList {
    let cache = match mode {
        ComputeMode::IgnoreCache => None,
        ComputeMode::ConsultModelHierarchyCache => Some(cache),
    };
    Traversal::new(scene, cache).run(root)
}

struct Traversal<'a, S: SceneGraph + ?Sized> {
    scene: &'a S,
    cache: Option<&'a LightCacheStore>,
    lights: LightList,
}

impl<'a, S: SceneGraph + ?Sized> Traversal<'a, S> {
    fn new(scene: &'a S, cache: Option<&'a LightCacheStore>) -> Self {
        Self {
            scene,
            cache,
            lights: LightList::new(),
        }
    }

    fn run(mut self, root: &ScenePath) -> LightList {
        if !self.scene.exists(root) || !self.scene.is_active(root) {
            return self.lights;
        }

        self.splice(root);
        if is_light_or_filter(self.scene, root) {
            self.lights.insert(root.clone());
        }

        let mut stack = self.children_reversed(root);
        while let Some(path) = stack.pop() {
            if !self.scene.is_active(&path) {
                continue;
            }
            if self.cache.is_some() && self.scene.is_model(&path) {
                self.splice(&path);
                continue;
            }
            if is_light_or_filter(self.scene, &path) {
                self.lights.insert(path.clone());
            }
            stack.extend(self.children_reversed(&path));
        }

        self.lights
    }

    fn children_reversed(&self, path: &ScenePath) -> Vec<ScenePath> {
        let mut children = self.scene.children(path);
        children.reverse();
        children
    }

    fn splice(&mut self, path: &ScenePath) {
        let Some(cache) = self.cache else {
            return;
        };
        match cache.entry(path).and_then(|entry| entry.valid_targets()) {
            Some(targets) => {
                let added = extend_keep_first(&mut self.lights, targets.iter().cloned());
                log::trace!("Spliced {added} cached lights from {path}");
            }
            None => log::trace!("No valid light list cache on {path} ({:?})", cache.state(path)),
        }
    }
}
