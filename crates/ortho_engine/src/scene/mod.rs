//! Scene management system
//!
//! Bridges the case data boundary with the renderer:
//!
//! ```text
//! stage selection
//!      ↓
//! SceneSynchronizer (two-phase fetch, generation tokens)
//!      ↓                         ↓
//! TransformStore          mesh assembly
//!      ↓                         ↓
//!        SceneSnapshot → renderer
//! ```
//!
//! The synchronizer owns the transform store and the published snapshot;
//! the renderer only ever sees whole snapshots.

mod material;
mod snapshot;
mod synchronizer;
mod transform_store;

pub use material::MaterialParams;
pub use snapshot::{SceneSnapshot, ToothRenderObject};
pub use synchronizer::{
    MeshRequest, SceneSynchronizer, StageEvent, StageRequest, SyncPhase, TransformOutcome,
};
pub use transform_store::TransformStore;
