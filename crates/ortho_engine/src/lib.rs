//! # Ortho Engine
//!
//! Core pipeline for visualizing progressive orthodontic movement:
//! anatomical tooth models (crown + root geometry) positioned by
//! per-stage rigid transforms fetched from a remote case service.
//!
//! ## Pipeline
//!
//! 1. A stage is selected ([`scene::SceneSynchronizer::on_stage_change`])
//! 2. The stage's full transform set is fetched and committed
//!    ([`scene::TransformStore`])
//! 3. The transform set's tooth ids drive one batched mesh fetch
//! 4. Raw vertex/face payloads are assembled into renderable geometry
//!    with computed normals ([`assets::assemble`]), applying the
//!    root/short-root fallback policy ([`assets::resolve_root`])
//! 5. A consistent [`scene::SceneSnapshot`] is published atomically for
//!    the renderer
//!
//! Overlapping stage changes are sequenced by generation tokens: stale
//! chains run to completion but their results are discarded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ortho_engine::remote::HttpCaseSource;
//! use ortho_engine::scene::{SceneSynchronizer, StageEvent};
//!
//! let source = HttpCaseSource::new("http://localhost:8000");
//! let mut sync = SceneSynchronizer::new(true);
//!
//! match sync.run_stage(&source, 0) {
//!     StageEvent::Published => {
//!         let snapshot = sync.snapshot().expect("just published");
//!         println!("stage 0: {} teeth", snapshot.len());
//!     }
//!     StageEvent::Superseded => {}
//!     StageEvent::Failed(err) => eprintln!("stage load failed: {err}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod remote;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{assemble, resolve_root, MeshError, RawMeshPayload, RenderableGeometry, ToothMeshSet},
        config::{Config, ConfigError, ViewerConfig},
        foundation::math::{Quat, RigidTransform, Vec3},
        remote::{CaseDataSource, FetchError, HttpCaseSource, ToothId},
        scene::{SceneSnapshot, SceneSynchronizer, StageEvent, ToothRenderObject, TransformStore},
    };
}
