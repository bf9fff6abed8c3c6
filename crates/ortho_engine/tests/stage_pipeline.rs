//! End-to-end stage pipeline tests against a scripted data source

use ortho_engine::assets::{RawMeshPayload, ToothMeshSet};
use ortho_engine::foundation::math::Vec3;
use ortho_engine::remote::protocol::{
    QuaternionRecord, StageTransforms, ToothId, TransformRecord, VectorRecord,
};
use ortho_engine::remote::{CaseDataSource, FetchError};
use ortho_engine::scene::{SceneSynchronizer, StageEvent};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory case source with per-stage scripts and request recording
struct ScriptedSource {
    transforms_by_stage: HashMap<u32, StageTransforms>,
    meshes: HashMap<ToothId, ToothMeshSet>,
    fail_transforms: bool,
    mesh_requests: RefCell<Vec<Vec<ToothId>>>,
}

impl ScriptedSource {
    fn new() -> Self {
        Self {
            transforms_by_stage: HashMap::new(),
            meshes: HashMap::new(),
            fail_transforms: false,
            mesh_requests: RefCell::new(Vec::new()),
        }
    }
}

impl CaseDataSource for ScriptedSource {
    fn fetch_stage_transforms(&self, stage: u32) -> Result<StageTransforms, FetchError> {
        if self.fail_transforms {
            return Err(FetchError::Transport("scripted failure".to_string()));
        }
        self.transforms_by_stage
            .get(&stage)
            .cloned()
            .ok_or(FetchError::Status { status: 404 })
    }

    fn fetch_tooth_meshes(
        &self,
        tooth_ids: &[ToothId],
    ) -> Result<HashMap<ToothId, ToothMeshSet>, FetchError> {
        self.mesh_requests.borrow_mut().push(tooth_ids.to_vec());
        Ok(tooth_ids
            .iter()
            .filter_map(|id| self.meshes.get(id).map(|set| (id.clone(), set.clone())))
            .collect())
    }
}

fn record(rotation: [f32; 4], translation: [f32; 3]) -> TransformRecord {
    TransformRecord {
        rotation: QuaternionRecord {
            x: rotation[0],
            y: rotation[1],
            z: rotation[2],
            w: rotation[3],
        },
        translation: VectorRecord {
            x: translation[0],
            y: translation[1],
            z: translation[2],
        },
    }
}

fn tetrahedron() -> RawMeshPayload {
    RawMeshPayload::new(
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
        vec![[0, 2, 1], [0, 1, 3], [0, 3, 2], [1, 2, 3]],
    )
}

#[test]
fn stage_zero_end_to_end() {
    let mut source = ScriptedSource::new();
    source.transforms_by_stage.insert(
        0,
        HashMap::from([(
            "11".to_string(),
            Some(record([0.0, 0.0, 0.0, 1.0], [1.0, 2.0, 3.0])),
        )]),
    );
    source.meshes.insert(
        "11".to_string(),
        ToothMeshSet {
            crown: Some(tetrahedron()),
            root: None,
            short_root: None,
        },
    );

    let mut sync = SceneSynchronizer::new(true);
    let event = sync.run_stage(&source, 0);
    assert!(matches!(event, StageEvent::Published));

    // The mesh fetch asked for exactly the transform set's ids.
    assert_eq!(
        source.mesh_requests.borrow().as_slice(),
        &[vec!["11".to_string()]]
    );

    let snapshot = sync.snapshot().unwrap();
    assert_eq!(snapshot.stage, 0);
    assert_eq!(snapshot.len(), 1);

    let tooth = snapshot.get("11").unwrap();
    assert_eq!(tooth.crown.vertex_count(), 4);
    assert_eq!(tooth.crown.triangle_count(), 4);
    assert!(tooth.root.is_none());

    let transform = tooth.transform.unwrap();
    assert_eq!(transform.translation, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(transform.rotation.quaternion().w, 1.0);
    assert_eq!(transform.rotation.quaternion().i, 0.0);
}

#[test]
fn short_root_preference_flows_through_pipeline() {
    let short = RawMeshPayload::new(
        vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        vec![[0, 1, 2]],
    );

    let mut source = ScriptedSource::new();
    source.transforms_by_stage.insert(
        0,
        HashMap::from([(
            "21".to_string(),
            Some(record([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0])),
        )]),
    );
    source.meshes.insert(
        "21".to_string(),
        ToothMeshSet {
            crown: Some(tetrahedron()),
            root: Some(tetrahedron()),
            short_root: Some(short),
        },
    );

    let mut prefer_short = SceneSynchronizer::new(true);
    prefer_short.run_stage(&source, 0);
    let with_short = prefer_short.snapshot().unwrap().get("21").unwrap().clone();
    assert_eq!(with_short.root.as_ref().unwrap().vertex_count(), 3);

    let mut prefer_full = SceneSynchronizer::new(false);
    prefer_full.run_stage(&source, 0);
    let with_full = prefer_full.snapshot().unwrap().get("21").unwrap().clone();
    assert_eq!(with_full.root.as_ref().unwrap().vertex_count(), 4);
}

#[test]
fn null_transform_tooth_renders_at_identity() {
    let mut source = ScriptedSource::new();
    source.transforms_by_stage.insert(
        0,
        HashMap::from([
            ("11".to_string(), None),
            (
                "12".to_string(),
                Some(record([0.0, 0.0, 0.0, 1.0], [4.0, 0.0, 0.0])),
            ),
        ]),
    );
    for id in ["11", "12"] {
        source.meshes.insert(
            id.to_string(),
            ToothMeshSet {
                crown: Some(tetrahedron()),
                root: None,
                short_root: None,
            },
        );
    }

    let mut sync = SceneSynchronizer::new(true);
    let event = sync.run_stage(&source, 0);
    assert!(matches!(event, StageEvent::Published));

    // Both teeth were fetched, sorted.
    assert_eq!(
        source.mesh_requests.borrow().as_slice(),
        &[vec!["11".to_string(), "12".to_string()]]
    );

    let snapshot = sync.snapshot().unwrap();
    let null_tooth = snapshot.get("11").unwrap();
    assert!(null_tooth.transform.is_none());
    assert!(null_tooth.effective_transform().is_identity());

    let moved_tooth = snapshot.get("12").unwrap();
    assert_eq!(
        moved_tooth.transform.unwrap().translation,
        Vec3::new(4.0, 0.0, 0.0)
    );
}

#[test]
fn failed_stage_keeps_previous_snapshot_visible() {
    let mut source = ScriptedSource::new();
    source.transforms_by_stage.insert(
        0,
        HashMap::from([(
            "11".to_string(),
            Some(record([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0])),
        )]),
    );
    source.meshes.insert(
        "11".to_string(),
        ToothMeshSet {
            crown: Some(tetrahedron()),
            root: None,
            short_root: None,
        },
    );

    let mut sync = SceneSynchronizer::new(true);
    assert!(matches!(sync.run_stage(&source, 0), StageEvent::Published));

    // Stage 7 has no script: the source answers 404.
    let event = sync.run_stage(&source, 7);
    assert!(matches!(
        event,
        StageEvent::Failed(FetchError::Status { status: 404 })
    ));

    let snapshot = sync.snapshot().unwrap();
    assert_eq!(snapshot.stage, 0);
    assert_eq!(snapshot.len(), 1);
}

#[test]
fn missing_mesh_entry_drops_tooth_not_batch() {
    // The transform set names two teeth but the mesh response only
    // covers one of them.
    let mut source = ScriptedSource::new();
    source.transforms_by_stage.insert(
        0,
        HashMap::from([
            (
                "11".to_string(),
                Some(record([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0])),
            ),
            (
                "12".to_string(),
                Some(record([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.0])),
            ),
        ]),
    );
    source.meshes.insert(
        "11".to_string(),
        ToothMeshSet {
            crown: Some(tetrahedron()),
            root: None,
            short_root: None,
        },
    );

    let mut sync = SceneSynchronizer::new(true);
    assert!(matches!(sync.run_stage(&source, 0), StageEvent::Published));

    let snapshot = sync.snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.get("11").is_some());
}
