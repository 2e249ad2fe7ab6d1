//! Geometry schemas
//!
//! Only mesh topology is modelled; it is validated, never rendered.

pub mod mesh;

pub use mesh::{validate_topology, MeshTopology, TopologyError};
