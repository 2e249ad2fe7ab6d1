//! Scene graph
//!
//! The prim hierarchy the light engine reads. In a full pipeline this is
//! produced by a composition engine; here it is an in-memory [`Stage`] that
//! can be authored programmatically or from a [`SceneDescription`].
//!
//! ## Architecture
//!
//! ```text
//! SceneDescription (RON / TOML)
//!      ↓
//! Stage (arena + path index, payload load state)
//!      ↓  SceneGraph trait
//! Light engine (crate::lux)
//! ```

mod description;
mod path;
mod prim;
mod scene_graph;
mod stage;

pub use description::{DescriptionError, LightListDesc, PrimDesc, SceneDescription};
pub use path::{PathError, ScenePath};
pub use prim::{ApiSchemas, Payload, PrimData, PrimType};
pub use scene_graph::SceneGraph;
pub use stage::{LoadPolicy, PrimKey, Stage, StageError};
