#![deny(unsafe_code)]
//! Shape-morphing particle simulation.
//!
//! A fixed population of particles chases the target points of one of five
//! silhouettes. Each particle's home position blends toward its target, a
//! noise field jitters the home position into a live target, and a damped
//! spring pulls the particle toward it. A detected pointer adds a
//! shape-dependent force; audio energy drives phase speed and render scale.
//!
//! [`Simulation`] owns all of it and implements [`Engine`].

pub mod colors;
pub mod config;
pub mod integrator;
pub mod interaction;
pub mod shape;
pub mod store;

pub use config::{JitterMode, SimConfig, REFERENCE_DT};
pub use store::{Particle, ParticleStore};

use integrator::FrameContext;
use morphfield_core::error::EngineError;
use morphfield_core::{
    Engine, Palette, ParticleTransform, SceneInputs, Seed, Shape, Srgb, VisualParams, Xorshift64,
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// The particle simulation context.
///
/// Created once per scene with a fixed particle count, stepped once per
/// display frame, and consumed by [`Simulation::dispose`] at teardown.
#[derive(Debug, Clone)]
pub struct Simulation {
    store: ParticleStore,
    params: VisualParams,
    config: SimConfig,
    rng: Xorshift64,
    /// Shape the stable-mode samples were drawn for.
    applied_shape: Shape,
    /// Palette the current colors were drawn from.
    applied_palette: Palette,
    frames: u64,
}

impl Simulation {
    /// Spawns `count` particles and assigns their colors.
    ///
    /// Returns `EngineError::InvalidParticleCount` if `count` is zero.
    pub fn new(
        count: usize,
        seed: u64,
        params: VisualParams,
        config: SimConfig,
    ) -> Result<Self, EngineError> {
        let mut rng = Xorshift64::new(seed);
        let mut store = ParticleStore::new(count, &mut rng)?;
        let params = params.sanitized();
        colors::assign(store.colors_mut(), &params.color_palette, &mut rng);
        info!(
            count,
            seed,
            shape = %params.shape,
            jitter = config.jitter.name(),
            "simulation created"
        );
        Ok(Self {
            store,
            applied_shape: params.shape,
            applied_palette: params.color_palette.clone(),
            params,
            config: config.sanitized(),
            rng,
            frames: 0,
        })
    }

    /// Builds a simulation from a replay seed, applying its config overrides.
    pub fn from_seed(seed: &Seed) -> Result<Self, EngineError> {
        seed.validate()?;
        Self::new(
            seed.count,
            seed.seed,
            seed.params.clone(),
            SimConfig::from_json(&seed.config),
        )
    }

    /// Advances every particle by `dt` seconds.
    ///
    /// Never fails: inputs are sanitised, `dt` is clamped and integrated in
    /// sub-steps of at most one reference frame, and a particle whose update
    /// diverges is restored to its previous state.
    pub fn step(&mut self, dt: f32, inputs: &SceneInputs) {
        self.apply_param_changes();

        let (substeps, sub_dt) = integrator::substeps(dt, self.config.max_dt);
        let ctx = FrameContext::new(&self.params, inputs, sub_dt, self.store.len(), self.config);
        let (particles, transforms) = self.store.split_mut();
        let mut recovered = 0usize;
        for (i, (particle, transform)) in particles.iter_mut().zip(transforms.iter_mut()).enumerate()
        {
            for _ in 0..substeps {
                if !integrator::advance(particle, i, &ctx, &mut self.rng) {
                    recovered += 1;
                }
            }
            *transform = integrator::present(particle, &ctx);
        }
        if recovered > 0 {
            warn!(
                recovered,
                frame = self.frames,
                "restored diverged particle updates"
            );
        }
        self.frames += 1;
    }

    /// Tears the simulation down. Nothing is retained afterwards.
    pub fn dispose(self) {
        debug!(
            count = self.store.len(),
            frames = self.frames,
            "simulation disposed"
        );
    }

    /// Recolors on palette change; redraws stable samples on shape change.
    fn apply_param_changes(&mut self) {
        if self.params.color_palette != self.applied_palette {
            colors::assign(
                self.store.colors_mut(),
                &self.params.color_palette,
                &mut self.rng,
            );
            self.applied_palette = self.params.color_palette.clone();
            debug!(entries = self.applied_palette.len(), "palette reassigned");
        }
        if self.params.shape != self.applied_shape {
            if self.config.jitter == JitterMode::Stable {
                self.store.reseed_samples(&mut self.rng);
            }
            debug!(from = %self.applied_shape, to = %self.params.shape, "shape changed");
            self.applied_shape = self.params.shape;
        }
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn visual_params(&self) -> &VisualParams {
        &self.params
    }

    /// Number of completed steps.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Always false: a simulation holds at least one particle.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Schema of the visual parameters and the simulation config.
    pub fn schema() -> Value {
        json!({
            "visual": VisualParams::schema(),
            "config": SimConfig::schema(),
        })
    }
}

impl Engine for Simulation {
    fn step(&mut self, dt: f32, inputs: &SceneInputs) {
        Simulation::step(self, dt, inputs);
    }

    fn set_params(&mut self, params: VisualParams) {
        self.params = params.sanitized();
    }

    fn frame(&self) -> &[ParticleTransform] {
        self.store.transforms()
    }

    fn colors(&self) -> &[Srgb] {
        self.store.colors()
    }

    fn params(&self) -> Value {
        json!({
            "count": self.store.len(),
            "visual": self.params.to_json(),
            "config": self.config.to_json(),
        })
    }

    fn param_schema(&self) -> Value {
        Simulation::schema()
    }
}
