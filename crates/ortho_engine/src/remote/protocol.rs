//! Wire records for the case data service
//!
//! JSON shapes for the two service endpoints:
//!
//! - `get_stage_relative_transform`: `{ stage }` → map of tooth id to
//!   `{ rotation: {x,y,z,w}, translation: {x,y,z} }` or `null` when the
//!   service could not compute a relative transform for that tooth.
//! - `get_teeth_meshes`: `{ tooth_ids }` → map of tooth id to a
//!   [`crate::assets::ToothMeshSet`].

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Clinical tooth identifier, e.g. `"11"` (FDI notation)
pub type ToothId = String;

/// Quaternion components as transmitted by the service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuaternionRecord {
    /// Imaginary x component
    pub x: f32,
    /// Imaginary y component
    pub y: f32,
    /// Imaginary z component
    pub z: f32,
    /// Real component
    pub w: f32,
}

/// Vector components as transmitted by the service
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

/// One tooth's rigid transform for a stage, as transmitted
///
/// The rotation is only near-unit in practice; it gets re-normalized
/// when committed to the transform store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Rotation quaternion, not guaranteed normalized
    pub rotation: QuaternionRecord,
    /// Translation vector
    pub translation: VectorRecord,
}

/// Full transform response for one stage
///
/// `None` entries are teeth the service listed but could not compute a
/// transform for; they still belong to the stage's object set.
pub type StageTransforms = HashMap<ToothId, Option<TransformRecord>>;

/// Request body for `get_stage_relative_transform`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StageTransformRequest {
    /// Treatment stage index
    pub stage: u32,
}

/// Request body for `get_teeth_meshes`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeethMeshRequest {
    /// Teeth to fetch, derived from the stage's transform set
    pub tooth_ids: Vec<ToothId>,
}
