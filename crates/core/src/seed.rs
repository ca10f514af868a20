//! Reproducible specification for a headless simulation run.
//!
//! A [`Seed`] captures everything needed to replay a scene: particle count,
//! visual parameters, simulation config overrides, held pointer and audio
//! inputs, PRNG seed, and frame count.

use crate::error::EngineError;
use crate::inputs::{AudioEnergy, PointerPosition};
use crate::params::VisualParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Reproducible specification for a simulation run.
///
/// Two identical `Seed` values fed to the same binary produce bit-identical
/// particle state, because every random draw comes from the seeded PRNG, the
/// frame clock is fixed, and the pointer and audio inputs are held constant
/// for the whole run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub count: usize,
    pub params: VisualParams,
    /// Simulation config overrides (see `SimConfig::from_json`).
    #[serde(default = "empty_object")]
    pub config: serde_json::Value,
    pub seed: u64,
    #[serde(default)]
    pub frames: usize,
    /// Pointer held for the whole run, if any.
    #[serde(default)]
    pub pointer: Option<PointerPosition>,
    /// Audio energy held for the whole run, if any.
    #[serde(default)]
    pub audio: Option<AudioEnergy>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Seed {
    /// Creates a new Seed with default config overrides (`{}`), zero frames and
    /// no held inputs.
    pub fn new(count: usize, params: VisualParams, seed: u64) -> Self {
        Self {
            count,
            params,
            config: empty_object(),
            seed,
            frames: 0,
            pointer: None,
            audio: None,
        }
    }

    /// Validates that the seed describes at least one particle.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.count == 0 {
            return Err(EngineError::InvalidParticleCount);
        }
        Ok(())
    }

    /// Reads and validates a seed from a JSON file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        let seed: Seed = serde_json::from_str(&text)
            .map_err(|e| EngineError::Io(format!("{}: {e}", path.display())))?;
        seed.validate()?;
        Ok(seed)
    }
}
