//! # Lux Engine
//!
//! Light-list enumeration and caching over a payload-gated scene graph.
//!
//! ## Features
//!
//! - **Scene Stage**: prims with activation, model boundaries and payloads
//! - **Light Lists**: live enumeration of lights and light filters
//! - **Caching**: per-root cached lists consulted at model boundaries
//! - **Descriptions**: scenes and caches persisted as RON or TOML
//! - **Mesh Checks**: face-vertex topology validation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lux_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let desc = SceneDescription::load_from_file("scenes/torches.ron")?;
//!     let mut scene = LuxScene::from_description(&desc, LoadPolicy::None)?;
//!
//!     let world = ScenePath::parse("/World")?;
//!     let live = scene.compute_light_list(&world, ComputeMode::IgnoreCache)?;
//!     let cached = scene.compute_light_list(&world, ComputeMode::ConsultModelHierarchyCache)?;
//!     println!("{} live, {} with caches", live.len(), cached.len());
//!
//!     scene.store_light_list(&world, cached)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::must_use_candidate)]

pub mod config;
pub mod core;
pub mod foundation;
pub mod geom;
pub mod lux;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::config::LuxConfig,
        geom::{validate_topology, MeshTopology, TopologyError},
        lux::{
            CacheState, ComputeMode, LightCacheStore, LightList, LightListApi, LightListError,
            LuxScene, SharedLuxScene,
        },
        scene::{ApiSchemas, LoadPolicy, PrimType, SceneDescription, SceneGraph, ScenePath, Stage},
    };
}
