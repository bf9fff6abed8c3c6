//! Tooth mesh data model and root-variant selection
//!
//! A tooth arrives from the case service as up to three raw mesh
//! variants: the crown (always required to render the tooth) and two
//! mutually substitutable root variants. `short_root` is a truncated
//! root used by treatment views that do not want full root geometry
//! poking through the gingiva model.

use serde::{Deserialize, Serialize};

/// Raw mesh data as returned by the case service
///
/// Grouped (not flattened) vertex and face arrays. Validation happens at
/// assembly time, not here: an empty or index-broken payload is still a
/// representable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMeshPayload {
    /// Vertex positions as (x, y, z) triples
    #[serde(default)]
    pub vertices: Vec<[f32; 3]>,

    /// Triangle faces as (i, j, k) vertex-index triples
    #[serde(default)]
    pub faces: Vec<[u32; 3]>,
}

impl RawMeshPayload {
    /// Create a payload from vertex and face arrays
    pub fn new(vertices: Vec<[f32; 3]>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// True when the payload carries no data at all
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.faces.is_empty()
    }
}

/// All mesh variants for a single tooth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToothMeshSet {
    /// Crown geometry; required for the tooth to render at all
    #[serde(default)]
    pub crown: Option<RawMeshPayload>,

    /// Full root geometry
    #[serde(default)]
    pub root: Option<RawMeshPayload>,

    /// Truncated root geometry, preferred when available
    #[serde(default)]
    pub short_root: Option<RawMeshPayload>,
}

/// Select which payload backs the tooth's root
///
/// Policy: when `prefer_short` is set and a non-empty `short_root`
/// exists, use it; otherwise fall back to a non-empty `root`; otherwise
/// the tooth renders crown-only.
///
/// This is pure selection. The chosen payload may still fail assembly
/// (e.g. vertices without faces), in which case the root is simply not
/// drawn.
pub fn resolve_root(mesh_set: &ToothMeshSet, prefer_short: bool) -> Option<&RawMeshPayload> {
    if prefer_short {
        if let Some(short) = mesh_set.short_root.as_ref().filter(|p| !p.is_empty()) {
            return Some(short);
        }
    }
    mesh_set.root.as_ref().filter(|p| !p.is_empty())
}
