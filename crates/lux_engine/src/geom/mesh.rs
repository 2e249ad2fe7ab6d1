//! Mesh face/vertex topology
//!
//! A mesh describes its faces with two arrays: `face_vertex_counts` (number
//! of vertices per face) and `face_vertex_indices` (point indices, face after
//! face). Validation is a stateless bounds check over those arrays.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a mesh topology is malformed
///
/// The `Display` text is the human-readable reason; callers decide how
/// severe a malformed mesh is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopologyError {
    /// A face declares a negative vertex count
    #[error("Face vertex count {count} at face {face} is negative")]
    NegativeFaceCount {
        /// Face index
        face: usize,
        /// Offending count
        count: i32,
    },

    /// Counts and indices disagree in size
    #[error("Sum of faceVertexCounts [{sum}] != size of faceVertexIndices [{indices}]")]
    CountMismatch {
        /// Sum of all face vertex counts
        sum: i64,
        /// Number of face vertex indices
        indices: usize,
    },

    /// An index is negative
    #[error("Found negative vertex index {value} at faceVertexIndices[{position}]")]
    NegativeIndex {
        /// Position in the index array
        position: usize,
        /// Offending index
        value: i32,
    },

    /// An index refers past the end of the points array
    #[error("Vertex index {value} at faceVertexIndices[{position}] exceeds numPoints {num_points}")]
    IndexOutOfRange {
        /// Position in the index array
        position: usize,
        /// Offending index
        value: i32,
        /// Number of points in the mesh
        num_points: usize,
    },
}

/// Validate face/vertex topology against a point count
///
/// Checks, in order: no negative face counts, the counts sum to the number
/// of indices, and every index lies in `0..num_points`.
pub fn validate_topology(
    face_vertex_indices: &[i32],
    face_vertex_counts: &[i32],
    num_points: usize,
) -> Result<(), TopologyError> {
    let mut sum: i64 = 0;
    for (face, &count) in face_vertex_counts.iter().enumerate() {
        if count < 0 {
            return Err(TopologyError::NegativeFaceCount { face, count });
        }
        sum += i64::from(count);
    }

    if usize::try_from(sum).map_or(true, |total| total != face_vertex_indices.len()) {
        return Err(TopologyError::CountMismatch {
            sum,
            indices: face_vertex_indices.len(),
        });
    }

    for (position, &value) in face_vertex_indices.iter().enumerate() {
        let Ok(index) = usize::try_from(value) else {
            return Err(TopologyError::NegativeIndex { position, value });
        };
        if index >= num_points {
            return Err(TopologyError::IndexOutOfRange {
                position,
                value,
                num_points,
            });
        }
    }

    Ok(())
}

/// Authored topology of a mesh prim
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshTopology {
    /// Vertices per face; `None` when the attribute is not authored
    #[serde(default)]
    pub face_vertex_counts: Option<Vec<i32>>,
    /// Point indices, face after face
    #[serde(default)]
    pub face_vertex_indices: Vec<i32>,
    /// Number of points in the mesh
    #[serde(default)]
    pub num_points: usize,
}

impl MeshTopology {
    /// Create a topology from its arrays
    pub fn new(
        face_vertex_indices: Vec<i32>,
        face_vertex_counts: Vec<i32>,
        num_points: usize,
    ) -> Self {
        Self {
            face_vertex_counts: Some(face_vertex_counts),
            face_vertex_indices,
            num_points,
        }
    }

    /// Number of faces (0 when counts are unset or empty)
    pub fn face_count(&self) -> usize {
        self.face_vertex_counts.as_ref().map_or(0, Vec::len)
    }

    /// Validate the arrays against the authored point count
    pub fn validate(&self) -> Result<(), TopologyError> {
        let counts = self.face_vertex_counts.as_deref().unwrap_or_default();
        validate_topology(&self.face_vertex_indices, counts, self.num_points)
    }
}
