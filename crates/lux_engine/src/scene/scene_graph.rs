//! Scene graph trait
//!
//! The read-only view of the composed scene that the light engine consumes.
//! Any composition backend can sit behind it; [`super::Stage`] is the
//! in-memory implementation shipped with the engine.

use super::path::ScenePath;
use super::prim::{ApiSchemas, PrimType};

/// Read access to a composed prim hierarchy
///
/// Every method answers for the *composed* scene: prims authored below an
/// unloaded payload or an inactive prim do not exist, and such prims report
/// no children. Missing prims are not errors; they simply
/// report `false` / `None` / no children.
pub trait SceneGraph: Send + Sync {
    /// Whether a prim exists at `path`
    fn exists(&self, path: &ScenePath) -> bool;

    /// Composed children of `path`, in authored order
    fn children(&self, path: &ScenePath) -> Vec<ScenePath>;

    /// Active flag of the prim itself (ancestors are not consulted)
    fn is_active(&self, path: &ScenePath) -> bool;

    /// Whether the prim is a model-hierarchy boundary
    fn is_model(&self, path: &ScenePath) -> bool;

    /// Whether the prim carries a payload arc
    fn has_payload(&self, path: &ScenePath) -> bool;

    /// Whether the prim's payload is loaded (`true` when it has no payload)
    fn is_payload_loaded(&self, path: &ScenePath) -> bool;

    /// Declared type of the prim
    fn prim_type(&self, path: &ScenePath) -> Option<&PrimType>;

    /// Whether every schema in `api` is applied to the prim
    fn has_api(&self, path: &ScenePath, api: ApiSchemas) -> bool;
}
