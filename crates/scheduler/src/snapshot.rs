//! JSON dump of a single frame.

use morphfield_core::error::EngineError;
use morphfield_core::{Engine, ParticleTransform};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

#[derive(Serialize)]
struct SnapshotParticle<'a> {
    #[serde(flatten)]
    transform: &'a ParticleTransform,
    color: String,
}

#[derive(Serialize)]
struct FrameSnapshot<'a> {
    frame: u64,
    count: usize,
    params: Value,
    particles: Vec<SnapshotParticle<'a>>,
}

/// The engine's current frame, colors and parameters as a JSON value.
pub fn frame_json(engine: &dyn Engine, frame: u64) -> Result<Value, EngineError> {
    serde_json::to_value(build(engine, frame)).map_err(|e| EngineError::Io(e.to_string()))
}

/// Writes the engine's current frame to `path` as pretty-printed JSON.
///
/// Returns `EngineError::Io` on serialization or write failure.
pub fn write_frame_json(engine: &dyn Engine, frame: u64, path: &Path) -> Result<(), EngineError> {
    let text = serde_json::to_string_pretty(&build(engine, frame))
        .map_err(|e| EngineError::Io(e.to_string()))?;
    std::fs::write(path, text).map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))
}

fn build(engine: &dyn Engine, frame: u64) -> FrameSnapshot<'_> {
    let particles = engine
        .frame()
        .iter()
        .zip(engine.colors())
        .map(|(transform, color)| SnapshotParticle {
            transform,
            color: color.to_hex(),
        })
        .collect::<Vec<_>>();
    FrameSnapshot {
        frame,
        count: particles.len(),
        params: engine.params(),
        particles,
    }
}
