//! Serializable scene descriptions
//!
//! A small nested format (RON or TOML) that stands in for a composed scene.
//! It authors prims, their flags and payloads, mesh topology, and the
//! persisted light-list caches of light-list roots.
//!
//! ```ron
//! (
//!     prims: [
//!         (
//!             name: "World",
//!             type: "Xform",
//!             api: ["LightListAPI"],
//!             children: [
//!                 (name: "Sky_light", type: "SphereLight"),
//!             ],
//!         ),
//!     ],
//! )
//! ```

use super::path::{PathError, ScenePath};
use super::prim::{ApiSchemas, PrimData, PrimType};
use super::stage::{Stage, StageError};
use crate::config::Config;
use crate::geom::MeshTopology;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning a description into a stage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptionError {
    /// A prim name does not form a valid path
    #[error("Invalid prim path: {0}")]
    Path(#[from] PathError),

    /// The stage rejected an edit
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),

    /// An API schema name is not known
    #[error("Unknown API schema '{name}' on {path}")]
    UnknownApiSchema {
        /// Prim carrying the schema
        path: ScenePath,
        /// Unknown schema name
        name: String,
    },

    /// The same prim path is described twice
    #[error("Prim {0} is described more than once")]
    Duplicate(ScenePath),
}

/// Persisted light-list cache of one root
///
/// `valid` is a side channel: when absent it reads back as `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightListDesc {
    /// Cached light paths, in stored order
    #[serde(default)]
    pub targets: Vec<ScenePath>,
    /// Whether the cache may be consulted
    #[serde(default)]
    pub valid: bool,
}

fn default_active() -> bool {
    true
}

/// Description of one prim and its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimDesc {
    /// Prim name (one path element)
    pub name: String,
    /// Declared type name; empty for untyped prims
    #[serde(rename = "type", default)]
    pub prim_type: PrimType,
    /// Active flag
    #[serde(default = "default_active")]
    pub active: bool,
    /// Model-hierarchy boundary flag
    #[serde(default)]
    pub model: bool,
    /// Whether the prim's children arrive through a payload
    #[serde(default)]
    pub payload: bool,
    /// Applied API schema names (`LightAPI`, `LightListAPI`)
    #[serde(default)]
    pub api: Vec<String>,
    /// Persisted light-list cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_list: Option<LightListDesc>,
    /// Mesh topology
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<MeshTopology>,
    /// Child prims in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrimDesc>,
}

impl PrimDesc {
    /// Create a description for an active prim with no extras
    pub fn new(name: impl Into<String>, prim_type: PrimType) -> Self {
        Self {
            name: name.into(),
            prim_type,
            active: true,
            model: false,
            payload: false,
            api: Vec::new(),
            light_list: None,
            topology: None,
            children: Vec::new(),
        }
    }

    fn from_prim(prim: &PrimData) -> Self {
        let mut desc = Self::new(prim.path.name().unwrap_or_default(), prim.prim_type.clone());
        desc.active = prim.active;
        desc.model = prim.model;
        desc.payload = prim.payload.is_some();
        desc.api = prim.api_schemas.schema_names().into_iter().map(String::from).collect();
        desc.topology.clone_from(&prim.topology);
        desc
    }
}

/// A whole scene: top-level prims below the pseudo-root
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Top-level prims
    #[serde(default)]
    pub prims: Vec<PrimDesc>,
}

impl Config for SceneDescription {}

impl SceneDescription {
    /// Author every described prim into a fresh stage
    ///
    /// Payloads start loaded; apply a [`super::LoadPolicy`] afterwards to
    /// open the stage with payloads unloaded.
    pub fn build_stage(&self) -> Result<Stage, DescriptionError> {
        let mut stage = Stage::new();
        let root = ScenePath::root();
        for prim in &self.prims {
            author(&mut stage, &root, prim)?;
        }
        log::info!("Built stage with {} prims", stage.len());
        Ok(stage)
    }

    /// Persisted light-list caches, in description order
    pub fn light_lists(&self) -> Result<Vec<(ScenePath, LightListDesc)>, DescriptionError> {
        let mut out = Vec::new();
        let root = ScenePath::root();
        for prim in &self.prims {
            collect_light_lists(&root, prim, &mut out)?;
        }
        Ok(out)
    }

    /// Describe the authored contents of a stage
    ///
    /// `light_list` supplies the persisted cache of each prim, if any.
    pub fn from_stage<F>(stage: &Stage, light_list: F) -> Self
    where
        F: Fn(&ScenePath) -> Option<LightListDesc>,
    {
        fn describe<F>(stage: &Stage, prim: &PrimData, light_list: &F) -> PrimDesc
        where
            F: Fn(&ScenePath) -> Option<LightListDesc>,
        {
            let mut desc = PrimDesc::from_prim(prim);
            desc.light_list = light_list(&prim.path);
            desc.children = stage
                .authored_children(&prim.path)
                .into_iter()
                .map(|child| describe(stage, child, light_list))
                .collect();
            desc
        }

        let prims = stage
            .authored_children(&ScenePath::root())
            .into_iter()
            .map(|prim| describe(stage, prim, &light_list))
            .collect();
        Self { prims }
    }
}

fn author(stage: &mut Stage, parent: &ScenePath, desc: &PrimDesc) -> Result<(), DescriptionError> {
    let path = parent.child(&desc.name)?;
    if stage.authored_prim(&path).is_some() {
        return Err(DescriptionError::Duplicate(path));
    }

    stage.define_prim(&path, desc.prim_type.clone())?;
    stage.set_active(&path, desc.active)?;
    stage.set_model(&path, desc.model)?;
    if desc.payload {
        stage.set_payload(&path, Some(super::prim::Payload { loaded: true }))?;
    }
    for name in &desc.api {
        let api = ApiSchemas::from_schema_name(name).ok_or_else(|| {
            DescriptionError::UnknownApiSchema {
                path: path.clone(),
                name: name.clone(),
            }
        })?;
        stage.apply_api(&path, api)?;
    }
    if let Some(topology) = &desc.topology {
        stage.set_topology(&path, topology.clone())?;
    }

    for child in &desc.children {
        author(stage, &path, child)?;
    }
    Ok(())
}

fn collect_light_lists(
    parent: &ScenePath,
    desc: &PrimDesc,
    out: &mut Vec<(ScenePath, LightListDesc)>,
) -> Result<(), DescriptionError> {
    let path = parent.child(&desc.name)?;
    if let Some(list) = &desc.light_list {
        out.push((path.clone(), list.clone()));
    }
    for child in &desc.children {
        collect_light_lists(&path, child, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneGraph;

    const SCENE: &str = r#"(
        prims: [
            (
                name: "World",
                type: "Xform",
                api: ["LightListAPI"],
                children: [
                    (name: "Key", type: "RectLight"),
                    (
                        name: "Prop",
                        model: true,
                        payload: true,
                        api: ["LightListAPI"],
                        light_list: Some((targets: ["/World/Prop/bulb"], valid: true)),
                        children: [(name: "bulb", type: "SphereLight")],
                    ),
                    (name: "Off", type: "DomeLight", active: false),
                ],
            ),
        ],
    )"#;

    fn p(text: &str) -> ScenePath {
        ScenePath::parse(text).unwrap()
    }

    #[test]
    fn test_build_stage_from_ron() {
        let desc: SceneDescription = ron::from_str(SCENE).unwrap();
        let stage = desc.build_stage().unwrap();

        assert_eq!(stage.len(), 5);
        assert!(stage.has_api(&p("/World"), ApiSchemas::LIGHT_LIST));
        assert!(stage.is_model(&p("/World/Prop")));
        assert!(stage.has_payload(&p("/World/Prop")));
        assert!(stage.is_payload_loaded(&p("/World/Prop")));
        assert!(!stage.is_active(&p("/World/Off")));
        assert_eq!(stage.prim_type(&p("/World/Key")), Some(&PrimType::RectLight));
    }

    #[test]
    fn test_light_lists_default_to_invalid() {
        let desc: SceneDescription = ron::from_str(
            r#"(prims: [(name: "World", light_list: Some((targets: ["/World/a"])))])"#,
        )
        .unwrap();
        let lists = desc.light_lists().unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].0, p("/World"));
        assert_eq!(lists[0].1.targets, vec![p("/World/a")]);
        assert!(!lists[0].1.valid);
    }

    #[test]
    fn test_toml_description() {
        let text = r#"
            [[prims]]
            name = "World"
            type = "Xform"

            [[prims.children]]
            name = "Filter"
            type = "LightFilter"
        "#;
        let desc: SceneDescription = toml::from_str(text).unwrap();
        let stage = desc.build_stage().unwrap();
        assert_eq!(stage.prim_type(&p("/World/Filter")), Some(&PrimType::LightFilter));
    }

    #[test]
    fn test_unknown_api_and_duplicates_fail() {
        let desc: SceneDescription =
            ron::from_str(r#"(prims: [(name: "World", api: ["ShadowAPI"])])"#).unwrap();
        assert!(matches!(
            desc.build_stage(),
            Err(DescriptionError::UnknownApiSchema { .. })
        ));

        let desc: SceneDescription =
            ron::from_str(r#"(prims: [(name: "World"), (name: "World")])"#).unwrap();
        assert_eq!(desc.build_stage().unwrap_err(), DescriptionError::Duplicate(p("/World")));
    }

    #[test]
    fn test_from_stage_keeps_structure() {
        let desc: SceneDescription = ron::from_str(SCENE).unwrap();
        let stage = desc.build_stage().unwrap();

        let described = SceneDescription::from_stage(&stage, |path| {
            desc.light_lists()
                .unwrap()
                .into_iter()
                .find(|(root, _)| root == path)
                .map(|(_, list)| list)
        });
        assert_eq!(described.build_stage().unwrap().len(), stage.len());
        assert_eq!(described.light_lists().unwrap(), desc.light_lists().unwrap());
        assert_eq!(described.prims[0].children[1].api, vec!["LightListAPI".to_string()]);
    }
}
