//! Per-stage rigid transform store
//!
//! Holds the committed transform set for the current treatment stage and
//! answers per-tooth lookups. The store never fetches anything itself;
//! the scene synchronizer commits a successful stage response here, so a
//! failed fetch leaves the previous stage's data untouched.

use crate::foundation::math::{Quat, Quaternion, RigidTransform, Vec3};
use crate::remote::protocol::{StageTransforms, ToothId, TransformRecord};
use std::collections::HashMap;

/// Quaternions with a squared norm below this are considered degenerate
/// and replaced by identity rather than normalized into NaNs.
const MIN_QUAT_NORM_SQUARED: f32 = 1e-12;

/// Committed per-stage transform set
///
/// A tooth mapped to `None` was listed for the stage but carried no
/// usable transform; it still belongs to the stage's object set and
/// renders at identity.
#[derive(Debug, Default)]
pub struct TransformStore {
    stage: Option<u32>,
    transforms: HashMap<ToothId, Option<RigidTransform>>,
}

impl TransformStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the store's contents with a stage's transform set
    ///
    /// The whole map is swapped at once; partial updates never happen.
    /// Every incoming quaternion is re-normalized here, since the data
    /// source only guarantees near-unit magnitude.
    pub fn commit_stage(&mut self, stage: u32, records: StageTransforms) {
        let transforms = records
            .into_iter()
            .map(|(tooth_id, record)| {
                let transform = record.map(|r| record_to_transform(&tooth_id, &r));
                (tooth_id, transform)
            })
            .collect();

        self.stage = Some(stage);
        self.transforms = transforms;
    }

    /// Stage the current contents belong to, if any stage was committed
    pub fn stage(&self) -> Option<u32> {
        self.stage
    }

    /// Look up one tooth's transform
    pub fn get(&self, tooth_id: &str) -> Option<RigidTransform> {
        self.transforms.get(tooth_id).copied().flatten()
    }

    /// All tooth ids in the committed stage, sorted
    ///
    /// This set drives the mesh fetch fan-out, so it includes teeth
    /// without a usable transform. Sorted for deterministic request
    /// bodies.
    pub fn tooth_ids(&self) -> Vec<ToothId> {
        let mut ids: Vec<ToothId> = self.transforms.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of teeth in the committed stage
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    /// True when no stage has been committed yet
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

fn record_to_transform(tooth_id: &str, record: &TransformRecord) -> RigidTransform {
    let raw = Quaternion::new(
        record.rotation.w,
        record.rotation.x,
        record.rotation.y,
        record.rotation.z,
    );

    let rotation = if raw.norm_squared() < MIN_QUAT_NORM_SQUARED {
        log::warn!("tooth {tooth_id}: degenerate rotation quaternion, using identity");
        Quat::identity()
    } else {
        Quat::new_normalize(raw)
    };

    let translation = Vec3::new(
        record.translation.x,
        record.translation.y,
        record.translation.z,
    );

    RigidTransform::new(rotation, translation)
}
