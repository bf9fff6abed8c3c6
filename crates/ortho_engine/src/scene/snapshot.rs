//! Published scene state handed to the renderer
//!
//! A snapshot is the only object the renderer ever sees. It is built in
//! one piece by the scene synchronizer and replaced atomically; the
//! renderer never observes a half-updated stage.

use crate::assets::RenderableGeometry;
use crate::foundation::math::RigidTransform;
use crate::remote::protocol::ToothId;
use std::collections::HashMap;

/// Renderable state for one tooth
#[derive(Debug, Clone)]
pub struct ToothRenderObject {
    /// Crown geometry; present for every tooth in a snapshot
    pub crown: RenderableGeometry,

    /// Root geometry, if a root variant existed and assembled cleanly
    pub root: Option<RenderableGeometry>,

    /// Stage transform; `None` means render at identity
    pub transform: Option<RigidTransform>,
}

impl ToothRenderObject {
    /// Transform to place this tooth's scene node, identity when absent
    pub fn effective_transform(&self) -> RigidTransform {
        self.transform.unwrap_or_else(RigidTransform::identity)
    }
}

/// Consistent per-stage scene state
///
/// Invariant: every entry has crown geometry (teeth whose crown failed
/// assembly are dropped before the snapshot is built).
#[derive(Debug, Clone, Default)]
pub struct SceneSnapshot {
    /// Treatment stage this snapshot was built for
    pub stage: u32,

    /// Renderable teeth keyed by clinical id
    pub teeth: HashMap<ToothId, ToothRenderObject>,
}

impl SceneSnapshot {
    /// Create an empty snapshot for a stage
    pub fn new(stage: u32) -> Self {
        Self {
            stage,
            teeth: HashMap::new(),
        }
    }

    /// Number of renderable teeth
    pub fn len(&self) -> usize {
        self.teeth.len()
    }

    /// True when the snapshot has no teeth
    pub fn is_empty(&self) -> bool {
        self.teeth.is_empty()
    }

    /// Look up one tooth
    pub fn get(&self, tooth_id: &str) -> Option<&ToothRenderObject> {
        self.teeth.get(tooth_id)
    }
}
