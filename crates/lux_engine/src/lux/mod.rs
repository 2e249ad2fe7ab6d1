//! Light-list enumeration and caching
//!
//! Answers "which lights live under this prim?" over a [`SceneGraph`] whose
//! payloads may be unloaded, optionally substituting cached answers for the
//! parts of the scene that cannot be walked live.
//!
//! ## Components
//!
//! - **predicate**: is a prim a light or a light filter
//! - **enumerator**: depth-first walk honouring payloads and caches
//! - **cache**: per-root cached lists with validity
//! - **light_list**: the query engine bound to one root
//! - **scene / shared**: stage + caches, and their locked shared form
//!
//! [`SceneGraph`]: crate::scene::SceneGraph

pub mod cache;
pub mod enumerator;
pub mod light_list;
pub mod predicate;
mod scene;
mod shared;

#[cfg(test)]
mod scenarios;

use crate::foundation::collections::OrderedSet;
use crate::scene::ScenePath;

/// Computed light list: paths in first-visited order, without duplicates
pub type LightList = OrderedSet<ScenePath>;

pub use cache::{CacheEntry, CacheState, LightCacheStore};
pub use enumerator::{enumerate, ComputeMode};
pub use light_list::{InvalidRootReason, LightListApi, LightListError};
pub use predicate::{is_light, is_light_filter, is_light_or_filter};
pub use scene::LuxScene;
pub use shared::{SceneSnapshot, SharedLuxScene};
