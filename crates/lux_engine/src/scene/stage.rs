//! In-memory stage
//!
//! Prims live in a slot-map arena; each node owns the ordered keys of its
//! children and a non-owning key of its parent. A path index gives O(1)
//! lookup by [`ScenePath`]. Nothing is reference counted, so the tree has no
//! ownership cycles.
//!
//! Each node also carries a `composed` bit: false when some ancestor is
//! inactive or has an unloaded payload. Edits that change activation or
//! load state refresh the bit for the affected subtree, so composed lookups
//! stay O(1).

use super::path::{PathError, ScenePath};
use super::prim::{ApiSchemas, Payload, PrimData, PrimType};
use super::scene_graph::SceneGraph;
use crate::foundation::collections::{new_key_type, SlotMap};
use crate::geom::{MeshTopology, TopologyError};
use std::collections::HashMap;
use thiserror::Error;

new_key_type! {
    /// Stable handle of a prim inside one [`Stage`]
    pub struct PrimKey;
}

/// Stage editing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// No prim is authored at the path
    #[error("No prim at path {0}")]
    PrimNotFound(ScenePath),

    /// The pseudo-root cannot be edited this way
    #[error("The pseudo-root cannot be modified")]
    PseudoRoot,

    /// Path text could not be parsed
    #[error("Invalid path: {0}")]
    Path(#[from] PathError),
}

#[derive(Debug, Clone)]
struct Node {
    data: PrimData,
    parent: Option<PrimKey>,
    children: Vec<PrimKey>,
    composed: bool,
}

impl Node {
    fn hides_children(&self) -> bool {
        !self.composed || !self.data.active || self.data.has_unloaded_payload()
    }
}

/// Payload load policy used when opening a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadPolicy {
    /// Load every payload
    #[default]
    All,
    /// Leave every payload unloaded
    None,
}

/// Hierarchical prim container
#[derive(Debug, Clone)]
pub struct Stage {
    nodes: SlotMap<PrimKey, Node>,
    index: HashMap<ScenePath, PrimKey>,
    root: PrimKey,
}

impl Stage {
    /// Create an empty stage holding only the pseudo-root
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root_path = ScenePath::root();
        let root = nodes.insert(Node {
            data: PrimData::new(root_path.clone(), PrimType::Untyped),
            parent: None,
            children: Vec::new(),
            composed: true,
        });
        let mut index = HashMap::new();
        index.insert(root_path, root);
        Self { nodes, index, root }
    }

    /// Number of authored prims, excluding the pseudo-root
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether only the pseudo-root exists
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Define a prim, creating untyped ancestors as needed
    ///
    /// Redefining an existing prim replaces its type and leaves everything
    /// else untouched.
    pub fn define_prim(
        &mut self,
        path: &ScenePath,
        prim_type: PrimType,
    ) -> Result<PrimKey, StageError> {
        if path.is_root() {
            return Err(StageError::PseudoRoot);
        }
        if let Some(&key) = self.index.get(path) {
            self.nodes[key].data.prim_type = prim_type;
            return Ok(key);
        }

        let parent_path = path.parent().ok_or(StageError::PseudoRoot)?;
        let parent = match self.index.get(&parent_path) {
            Some(&key) => key,
            None => self.define_prim(&parent_path, PrimType::Untyped)?,
        };

        let composed = !self.nodes[parent].hides_children();
        let key = self.nodes.insert(Node {
            data: PrimData::new(path.clone(), prim_type),
            parent: Some(parent),
            children: Vec::new(),
            composed,
        });
        self.nodes[parent].children.push(key);
        self.index.insert(path.clone(), key);
        log::trace!("Defined prim {path}");
        Ok(key)
    }

    /// Authored prim data, whether or not it is currently composed
    pub fn authored_prim(&self, path: &ScenePath) -> Option<&PrimData> {
        self.index.get(path).map(|&key| &self.nodes[key].data)
    }

    /// Composed prim data
    ///
    /// Hidden when an ancestor is inactive or has an unloaded payload. An
    /// inactive prim itself stays visible.
    pub fn prim(&self, path: &ScenePath) -> Option<&PrimData> {
        let key = self.composed_key(path)?;
        Some(&self.nodes[key].data)
    }

    /// Authored children of a prim, ignoring payload load state
    pub fn authored_children(&self, path: &ScenePath) -> Vec<&PrimData> {
        self.index.get(path).map_or_else(Vec::new, |&key| {
            self.nodes[key]
                .children
                .iter()
                .map(|&child| &self.nodes[child].data)
                .collect()
        })
    }

    /// Set the active flag
    pub fn set_active(&mut self, path: &ScenePath, active: bool) -> Result<(), StageError> {
        let key = self.edit_key(path)?;
        self.nodes[key].data.active = active;
        self.refresh_below(key);
        log::debug!("Set {path} active = {active}");
        Ok(())
    }

    /// Mark the prim as a model-hierarchy boundary (or clear the mark)
    pub fn set_model(&mut self, path: &ScenePath, model: bool) -> Result<(), StageError> {
        self.authored_mut(path)?.model = model;
        Ok(())
    }

    /// Apply API schemas to a prim
    pub fn apply_api(&mut self, path: &ScenePath, api: ApiSchemas) -> Result<(), StageError> {
        self.authored_mut(path)?.api_schemas.insert(api);
        Ok(())
    }

    /// Remove API schemas from a prim
    pub fn remove_api(&mut self, path: &ScenePath, api: ApiSchemas) -> Result<(), StageError> {
        self.authored_mut(path)?.api_schemas.remove(api);
        Ok(())
    }

    /// Attach (or replace) a payload arc
    pub fn set_payload(
        &mut self,
        path: &ScenePath,
        payload: Option<Payload>,
    ) -> Result<(), StageError> {
        let key = self.edit_key(path)?;
        self.nodes[key].data.payload = payload;
        self.refresh_below(key);
        Ok(())
    }

    /// Author mesh topology on a prim
    pub fn set_topology(
        &mut self,
        path: &ScenePath,
        topology: MeshTopology,
    ) -> Result<(), StageError> {
        self.authored_mut(path)?.topology = Some(topology);
        Ok(())
    }

    /// Load every payload at or below `path`; returns how many changed state
    pub fn load(&mut self, path: &ScenePath) -> Result<usize, StageError> {
        self.set_loaded_below(path, true)
    }

    /// Unload every payload at or below `path`; returns how many changed state
    pub fn unload(&mut self, path: &ScenePath) -> Result<usize, StageError> {
        self.set_loaded_below(path, false)
    }

    /// Apply a load policy to the whole stage
    pub fn apply_load_policy(&mut self, policy: LoadPolicy) -> usize {
        let loaded = policy == LoadPolicy::All;
        let mut changed = 0;
        for node in self.nodes.values_mut() {
            if let Some(payload) = node.data.payload.as_mut() {
                if payload.loaded != loaded {
                    payload.loaded = loaded;
                    changed += 1;
                }
            }
        }
        self.refresh_below(self.root);
        log::debug!("Applied load policy {policy:?} ({changed} payloads changed)");
        changed
    }

    /// Remove a prim and its whole authored subtree
    ///
    /// Returns the removed paths, root of the subtree first.
    pub fn remove_prim(&mut self, path: &ScenePath) -> Result<Vec<ScenePath>, StageError> {
        if path.is_root() {
            return Err(StageError::PseudoRoot);
        }
        let key = *self
            .index
            .get(path)
            .ok_or_else(|| StageError::PrimNotFound(path.clone()))?;

        if let Some(parent) = self.nodes[key].parent {
            self.nodes[parent].children.retain(|&child| child != key);
        }

        let mut removed = Vec::new();
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                self.index.remove(&node.data.path);
                stack.extend(node.children.iter().rev());
                removed.push(node.data.path);
            }
        }
        log::debug!("Removed {} prims below {path}", removed.len());
        Ok(removed)
    }

    /// Composed prims in depth-first pre-order, excluding the pseudo-root
    ///
    /// Inactive prims are included; their subtrees are not.
    pub fn traverse(&self) -> Vec<&PrimData> {
        let mut out = Vec::new();
        let mut stack: Vec<PrimKey> =
            self.nodes[self.root].children.iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            let node = &self.nodes[key];
            out.push(&node.data);
            if !node.hides_children() {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }

    /// Validate every composed mesh that authors topology
    pub fn validate_meshes(&self) -> Vec<(ScenePath, Result<(), TopologyError>)> {
        self.traverse()
            .into_iter()
            .filter_map(|prim| {
                prim.topology
                    .as_ref()
                    .map(|topology| (prim.path.clone(), topology.validate()))
            })
            .collect()
    }

    fn edit_key(&self, path: &ScenePath) -> Result<PrimKey, StageError> {
        if path.is_root() {
            return Err(StageError::PseudoRoot);
        }
        self.index
            .get(path)
            .copied()
            .ok_or_else(|| StageError::PrimNotFound(path.clone()))
    }

    fn authored_mut(&mut self, path: &ScenePath) -> Result<&mut PrimData, StageError> {
        let key = self.edit_key(path)?;
        Ok(&mut self.nodes[key].data)
    }

    fn composed_key(&self, path: &ScenePath) -> Option<PrimKey> {
        let key = *self.index.get(path)?;
        self.nodes[key].composed.then_some(key)
    }

    /// Recompute the `composed` bit of every descendant of `key`
    fn refresh_below(&mut self, key: PrimKey) {
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let hidden = self.nodes[current].hides_children();
            for i in 0..self.nodes[current].children.len() {
                let child = self.nodes[current].children[i];
                self.nodes[child].composed = !hidden;
                stack.push(child);
            }
        }
    }

    fn set_loaded_below(&mut self, path: &ScenePath, loaded: bool) -> Result<usize, StageError> {
        let key = *self
            .index
            .get(path)
            .ok_or_else(|| StageError::PrimNotFound(path.clone()))?;

        let mut changed = 0;
        let mut stack = vec![key];
        while let Some(current) = stack.pop() {
            let node = &mut self.nodes[current];
            if let Some(payload) = node.data.payload.as_mut() {
                if payload.loaded != loaded {
                    payload.loaded = loaded;
                    changed += 1;
                }
            }
            stack.extend(node.children.iter().copied());
        }
        self.refresh_below(key);
        let verb = if loaded { "Loaded" } else { "Unloaded" };
        log::debug!("{verb} {changed} payloads below {path}");
        Ok(changed)
    }
}

impl Default for Stage {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph for Stage {
    fn exists(&self, path: &ScenePath) -> bool {
        self.composed_key(path).is_some()
    }

    fn children(&self, path: &ScenePath) -> Vec<ScenePath> {
        let Some(key) = self.composed_key(path) else {
            return Vec::new();
        };
        let node = &self.nodes[key];
        if node.hides_children() {
            return Vec::new();
        }
        node.children
            .iter()
            .map(|&child| self.nodes[child].data.path.clone())
            .collect()
    }

    fn is_active(&self, path: &ScenePath) -> bool {
        self.prim(path).is_some_and(|prim| prim.active)
    }

    fn is_model(&self, path: &ScenePath) -> bool {
        self.prim(path).is_some_and(|prim| prim.model)
    }

    fn has_payload(&self, path: &ScenePath) -> bool {
        self.prim(path).is_some_and(|prim| prim.payload.is_some())
    }

    fn is_payload_loaded(&self, path: &ScenePath) -> bool {
        self.prim(path).is_some_and(|prim| !prim.has_unloaded_payload())
    }

    fn prim_type(&self, path: &ScenePath) -> Option<&PrimType> {
        self.prim(path).map(|prim| &prim.prim_type)
    }

    fn has_api(&self, path: &ScenePath, api: ApiSchemas) -> bool {
        self.prim(path).is_some_and(|prim| prim.api_schemas.contains(api))
    }
}
