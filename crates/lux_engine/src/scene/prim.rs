//! Prim data
//!
//! Pure data describing one node of the scene graph. Classification logic
//! (is this a light?) lives in [`crate::lux::predicate`].

use super::path::ScenePath;
use crate::geom::MeshTopology;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared schema type of a prim
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrimType {
    /// No declared type (`def "Name"`)
    #[default]
    Untyped,
    /// Transformable group
    Xform,
    /// Non-transformable group
    Scope,
    /// Polygon mesh
    Mesh,
    /// Spherical area light
    SphereLight,
    /// Light at infinity (sun)
    DistantLight,
    /// Environment dome light
    DomeLight,
    /// Rectangular area light
    RectLight,
    /// Disk area light
    DiskLight,
    /// Cylindrical area light
    CylinderLight,
    /// Light emitted by arbitrary geometry
    GeometryLight,
    /// Portal for a dome light
    PortalLight,
    /// Light filter
    LightFilter,
    /// Any type name this engine does not know about
    Other(String),
}

impl PrimType {
    /// Whether the type belongs to the light family
    pub const fn is_light_family(&self) -> bool {
        matches!(
            self,
            Self::SphereLight
                | Self::DistantLight
                | Self::DomeLight
                | Self::RectLight
                | Self::DiskLight
                | Self::CylinderLight
                | Self::GeometryLight
                | Self::PortalLight
        )
    }

    /// Whether the type is untyped or a plain grouping base type
    pub const fn is_base(&self) -> bool {
        matches!(self, Self::Untyped | Self::Xform | Self::Scope)
    }

    /// Schema type name (empty for untyped prims)
    pub fn type_name(&self) -> &str {
        match self {
            Self::Untyped => "",
            Self::Xform => "Xform",
            Self::Scope => "Scope",
            Self::Mesh => "Mesh",
            Self::SphereLight => "SphereLight",
            Self::DistantLight => "DistantLight",
            Self::DomeLight => "DomeLight",
            Self::RectLight => "RectLight",
            Self::DiskLight => "DiskLight",
            Self::CylinderLight => "CylinderLight",
            Self::GeometryLight => "GeometryLight",
            Self::PortalLight => "PortalLight",
            Self::LightFilter => "LightFilter",
            Self::Other(name) => name,
        }
    }
}

impl From<&str> for PrimType {
    fn from(name: &str) -> Self {
        match name {
            "" => Self::Untyped,
            "Xform" => Self::Xform,
            "Scope" => Self::Scope,
            "Mesh" => Self::Mesh,
            "SphereLight" => Self::SphereLight,
            "DistantLight" => Self::DistantLight,
            "DomeLight" => Self::DomeLight,
            "RectLight" => Self::RectLight,
            "DiskLight" => Self::DiskLight,
            "CylinderLight" => Self::CylinderLight,
            "GeometryLight" => Self::GeometryLight,
            "PortalLight" => Self::PortalLight,
            "LightFilter" => Self::LightFilter,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for PrimType {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl From<PrimType> for String {
    fn from(prim_type: PrimType) -> Self {
        prim_type.type_name().to_string()
    }
}

impl fmt::Display for PrimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Untyped => f.write_str("<untyped>"),
            other => f.write_str(other.type_name()),
        }
    }
}

bitflags! {
    /// Applied API schemas (capabilities) of a prim
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ApiSchemas: u32 {
        /// LightAPI: the prim emits light
        const LIGHT = 1 << 0;
        /// LightListAPI: the prim owns a light-list cache
        const LIGHT_LIST = 1 << 1;
    }
}

impl ApiSchemas {
    /// Resolve one API schema by its schema name
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "LightAPI" => Some(Self::LIGHT),
            "LightListAPI" => Some(Self::LIGHT_LIST),
            _ => None,
        }
    }

    /// Schema names of every applied API, in a stable order
    pub fn schema_names(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::LIGHT) {
            names.push("LightAPI");
        }
        if self.contains(Self::LIGHT_LIST) {
            names.push("LightListAPI");
        }
        names
    }
}

/// Payload arc on a prim
///
/// Children authored below a prim with an unloaded payload are not part of
/// the composed scene until the payload is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Payload {
    /// Whether the payload contents are currently composed
    pub loaded: bool,
}

/// One prim in the stage arena
#[derive(Debug, Clone)]
pub struct PrimData {
    /// Absolute path
    pub path: ScenePath,
    /// Active flag; inactive prims prune their subtree
    pub active: bool,
    /// Declared type
    pub prim_type: PrimType,
    /// Applied API schemas
    pub api_schemas: ApiSchemas,
    /// Model-hierarchy boundary flag
    pub model: bool,
    /// Payload arc, if any
    pub payload: Option<Payload>,
    /// Authored mesh topology (meshes only)
    pub topology: Option<MeshTopology>,
}

impl PrimData {
    /// Create an active prim with no capabilities
    pub fn new(path: ScenePath, prim_type: PrimType) -> Self {
        Self {
            path,
            active: true,
            prim_type,
            api_schemas: ApiSchemas::empty(),
            model: false,
            payload: None,
            topology: None,
        }
    }

    /// Whether this prim hides its authored children
    pub fn has_unloaded_payload(&self) -> bool {
        matches!(self.payload, Some(Payload { loaded: false }))
    }
}
