//! Ortho viewer demo application
//!
//! Connects to a local case data service, loads one treatment stage
//! through the scene synchronizer, and logs a summary of the published
//! snapshot. The actual renderer consumes the same snapshot through the
//! library API; this binary exists to exercise the pipeline end to end
//! against a real service.

use ortho_engine::config::{Config, ViewerConfig};
use ortho_engine::remote::HttpCaseSource;
use ortho_engine::scene::{MaterialParams, SceneSnapshot, SceneSynchronizer, StageEvent};
use std::time::Duration;

fn main() {
    ortho_engine::foundation::logging::init();

    let config = load_config();
    log::info!(
        "case service {} (stage {}, short roots: {})",
        config.server_url,
        config.stage,
        config.prefer_short_roots
    );

    let source = HttpCaseSource::with_timeout(
        &config.server_url,
        Duration::from_secs(config.request_timeout_secs),
    );

    if let Err(err) = source.ping() {
        log::error!("case service unreachable: {err}");
        std::process::exit(1);
    }
    match source.case_file_path() {
        Ok(path) => log::info!("case file: {path}"),
        Err(err) => log::warn!("could not query case file path: {err}"),
    }

    let mut sync = SceneSynchronizer::new(config.prefer_short_roots);
    match sync.run_stage(&source, config.stage) {
        StageEvent::Published => {
            let snapshot = sync.snapshot().expect("snapshot exists after publish");
            log_snapshot(snapshot);
        }
        StageEvent::Superseded => {
            // Single stage request; cannot actually happen here.
            log::warn!("stage load superseded");
        }
        StageEvent::Failed(err) => {
            log::error!("stage {} load failed: {err}", config.stage);
            std::process::exit(1);
        }
    }
}

/// Load viewer config from the first CLI argument, or use defaults
fn load_config() -> ViewerConfig {
    let Some(path) = std::env::args().nth(1) else {
        return ViewerConfig::default();
    };

    match ViewerConfig::load_from_file(&path) {
        Ok(config) => config,
        Err(err) => {
            log::error!("failed to load config {path}: {err}");
            std::process::exit(1);
        }
    }
}

fn log_snapshot(snapshot: &SceneSnapshot) {
    log::info!(
        "published stage {}: {} teeth (crown material {:?}, root material {:?})",
        snapshot.stage,
        snapshot.len(),
        MaterialParams::crown(),
        MaterialParams::root()
    );

    let mut ids: Vec<&String> = snapshot.teeth.keys().collect();
    ids.sort();

    for id in ids {
        let tooth = &snapshot.teeth[id.as_str()];
        let transform = tooth.effective_transform();
        log::info!(
            "tooth {id}: crown {} verts / {} tris, root {}, at ({:.2}, {:.2}, {:.2})",
            tooth.crown.vertex_count(),
            tooth.crown.triangle_count(),
            tooth
                .root
                .as_ref()
                .map_or("absent".to_string(), |r| format!("{} verts", r.vertex_count())),
            transform.translation.x,
            transform.translation.y,
            transform.translation.z,
        );
    }
}
