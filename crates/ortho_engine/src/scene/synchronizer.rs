//! Scene synchronizer - staged two-phase fetch pipeline
//!
//! A stage change drives two dependent fetches: the stage's transform
//! set first, then one batched mesh fetch for exactly the teeth that
//! set names. Rapid stage changes may leave older chains in flight;
//! those are never torn down at the network layer, their results are
//! just discarded when they come back carrying a stale generation
//! token. The published [`SceneSnapshot`] therefore always reflects the
//! most recent stage request, and is only ever replaced whole.
//!
//! The suspension points are explicit: [`SceneSynchronizer::on_stage_change`]
//! starts a chain and hands back a request token, and the two
//! `complete_*` methods feed fetch results (success or failure) back in.
//! [`SceneSynchronizer::run_stage`] chains both phases against a
//! [`CaseDataSource`] for callers that just want to block.

use crate::assets::{assemble, resolve_root, ToothMeshSet};
use crate::remote::protocol::{StageTransforms, ToothId};
use crate::remote::{CaseDataSource, FetchError};
use crate::scene::snapshot::{SceneSnapshot, ToothRenderObject};
use crate::scene::transform_store::TransformStore;
use std::collections::HashMap;

/// Pipeline phase for the current generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// No stage requested yet
    Idle,
    /// Waiting on the stage's transform set
    LoadingTransforms,
    /// Waiting on the batched mesh fetch
    LoadingMeshes,
    /// Latest stage change completed and its snapshot is published
    Published,
    /// Latest stage change failed
    Errored,
}

/// Token for an in-flight transform fetch
///
/// Carries the generation that identifies its chain; results delivered
/// under an outdated generation are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRequest {
    generation: u64,
    /// Stage the chain is loading
    pub stage: u32,
}

/// Token for an in-flight mesh fetch, derived from a transform result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshRequest {
    generation: u64,
    /// Stage the chain is loading
    pub stage: u32,
    /// Teeth to request, exactly the stage's object set
    pub tooth_ids: Vec<ToothId>,
}

/// Result of feeding a transform response into the pipeline
#[derive(Debug)]
pub enum TransformOutcome {
    /// Transforms committed; issue this mesh fetch next
    MeshesNeeded(MeshRequest),
    /// A newer stage change superseded this chain; result discarded
    Superseded,
    /// The fetch failed; the chain stops and prior state stays visible
    Failed(FetchError),
}

/// Terminal outcome of a stage-change chain
#[derive(Debug)]
pub enum StageEvent {
    /// A new snapshot was published
    Published,
    /// A newer stage change superseded this chain; result discarded
    Superseded,
    /// The fetch failed; the chain stops and prior state stays visible
    Failed(FetchError),
}

/// Orchestrates stage changes into atomically published snapshots
pub struct SceneSynchronizer {
    generation: u64,
    phase: SyncPhase,
    transform_store: TransformStore,
    published: Option<SceneSnapshot>,
    prefer_short_roots: bool,
}

impl SceneSynchronizer {
    /// Create a synchronizer
    ///
    /// `prefer_short_roots` selects the truncated root variant whenever
    /// a tooth provides one.
    pub fn new(prefer_short_roots: bool) -> Self {
        Self {
            generation: 0,
            phase: SyncPhase::Idle,
            transform_store: TransformStore::new(),
            published: None,
            prefer_short_roots,
        }
    }

    /// Begin loading a stage
    ///
    /// Bumps the generation counter, which implicitly abandons any
    /// in-flight chain: its results will fail the staleness check when
    /// they arrive. The caller must issue the transform fetch and feed
    /// the result to [`Self::complete_transforms`] with the returned
    /// token.
    pub fn on_stage_change(&mut self, stage: u32) -> StageRequest {
        self.generation += 1;
        self.phase = SyncPhase::LoadingTransforms;
        log::info!(
            "stage change to {stage} (generation {})",
            self.generation
        );
        StageRequest {
            generation: self.generation,
            stage,
        }
    }

    /// Feed the transform fetch result for a chain
    ///
    /// On success the transform set is committed to the store and the
    /// mesh fetch for the stage's object set is requested. A stale
    /// generation discards the result silently; an error surfaces once
    /// and leaves both the store and the published snapshot untouched.
    pub fn complete_transforms(
        &mut self,
        request: StageRequest,
        result: Result<StageTransforms, FetchError>,
    ) -> TransformOutcome {
        if request.generation != self.generation {
            log::debug!(
                "discarding stale transform result for stage {} (generation {} < {})",
                request.stage,
                request.generation,
                self.generation
            );
            return TransformOutcome::Superseded;
        }

        match result {
            Ok(records) => {
                self.transform_store.commit_stage(request.stage, records);
                self.phase = SyncPhase::LoadingMeshes;
                TransformOutcome::MeshesNeeded(MeshRequest {
                    generation: request.generation,
                    stage: request.stage,
                    tooth_ids: self.transform_store.tooth_ids(),
                })
            }
            Err(err) => {
                log::error!("transform fetch for stage {} failed: {err}", request.stage);
                self.phase = SyncPhase::Errored;
                TransformOutcome::Failed(err)
            }
        }
    }

    /// Feed the mesh fetch result for a chain
    ///
    /// On success every returned tooth is assembled and the snapshot is
    /// rebuilt and published in one piece. Assembly failures are
    /// per-tooth, per-variant: a broken crown skips that tooth, a broken
    /// root just drops the root geometry. Neither aborts the batch.
    pub fn complete_meshes(
        &mut self,
        request: MeshRequest,
        result: Result<HashMap<ToothId, ToothMeshSet>, FetchError>,
    ) -> StageEvent {
        if request.generation != self.generation {
            log::debug!(
                "discarding stale mesh result for stage {} (generation {} < {})",
                request.stage,
                request.generation,
                self.generation
            );
            return StageEvent::Superseded;
        }

        match result {
            Ok(mesh_sets) => {
                let snapshot = self.build_snapshot(request.stage, mesh_sets);
                log::info!(
                    "published stage {} with {} teeth",
                    snapshot.stage,
                    snapshot.len()
                );
                self.published = Some(snapshot);
                self.phase = SyncPhase::Published;
                StageEvent::Published
            }
            Err(err) => {
                log::error!("mesh fetch for stage {} failed: {err}", request.stage);
                self.phase = SyncPhase::Errored;
                StageEvent::Failed(err)
            }
        }
    }

    /// Run both phases of a stage change against a data source
    pub fn run_stage(&mut self, source: &impl CaseDataSource, stage: u32) -> StageEvent {
        let request = self.on_stage_change(stage);
        let transforms = source.fetch_stage_transforms(stage);

        match self.complete_transforms(request, transforms) {
            TransformOutcome::MeshesNeeded(mesh_request) => {
                let meshes = source.fetch_tooth_meshes(&mesh_request.tooth_ids);
                self.complete_meshes(mesh_request, meshes)
            }
            TransformOutcome::Superseded => StageEvent::Superseded,
            TransformOutcome::Failed(err) => StageEvent::Failed(err),
        }
    }

    fn build_snapshot(
        &self,
        stage: u32,
        mesh_sets: HashMap<ToothId, ToothMeshSet>,
    ) -> SceneSnapshot {
        let mut snapshot = SceneSnapshot::new(stage);

        for (tooth_id, mesh_set) in mesh_sets {
            let crown_payload = match mesh_set.crown.as_ref() {
                Some(payload) => payload,
                None => {
                    log::warn!("tooth {tooth_id}: no crown payload, skipping");
                    continue;
                }
            };

            // Crown is mandatory; a tooth whose crown fails assembly is
            // skipped rather than failing the whole batch.
            let crown = match assemble(crown_payload) {
                Ok(geometry) => geometry,
                Err(err) => {
                    log::warn!("tooth {tooth_id}: crown assembly failed ({err}), skipping");
                    continue;
                }
            };

            let root = resolve_root(&mesh_set, self.prefer_short_roots).and_then(|payload| {
                match assemble(payload) {
                    Ok(geometry) => Some(geometry),
                    Err(err) => {
                        log::warn!("tooth {tooth_id}: root assembly failed ({err}), crown only");
                        None
                    }
                }
            });

            let transform = self.transform_store.get(&tooth_id);

            snapshot.teeth.insert(
                tooth_id,
                ToothRenderObject {
                    crown,
                    root,
                    transform,
                },
            );
        }

        snapshot
    }

    /// Most recently published snapshot, if any chain has completed
    pub fn snapshot(&self) -> Option<&SceneSnapshot> {
        self.published.as_ref()
    }

    /// Current pipeline phase
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// True while a fetch chain for the current generation is in flight
    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            SyncPhase::LoadingTransforms | SyncPhase::LoadingMeshes
        )
    }

    /// Current generation counter value
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The committed transform store
    pub fn transform_store(&self) -> &TransformStore {
        &self.transform_store
    }
}
