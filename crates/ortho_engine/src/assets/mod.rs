//! Tooth mesh data and geometry assembly
//!
//! The case service hands back raw vertex/face arrays per tooth. This
//! module owns the data model for those payloads and turns them into
//! validated, render-ready indexed geometry.

pub mod mesh_assembler;
pub mod tooth_model;

pub use mesh_assembler::{assemble, MeshError, RenderableGeometry};
pub use tooth_model::{resolve_root, RawMeshPayload, ToothMeshSet};
