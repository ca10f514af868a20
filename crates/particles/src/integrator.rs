//! Per-particle, per-frame update.
//!
//! All rates are expressed per reference frame (1/60 s). A step of `dt`
//! seconds scales them by the frame factor `f = dt / REFERENCE_DT`:
//! multiplicative rates become `rate^f`, additive ones are multiplied by `f`.
//! At `f == 1` this is exactly the unit-timestep update. Callers split long
//! steps with [`substeps`] so a single update never sees `f > 1`.

use crate::config::{JitterMode, SimConfig, REFERENCE_DT};
use crate::interaction::{pointer_force, pointer_world};
use crate::shape::{target, ReplaySamples};
use crate::store::Particle;
use glam::Vec3;
use morphfield_core::{
    AudioEnergy, NoiseField, ParticleTransform, RandomSource, SceneInputs, Shape, VisualParams,
};

/// Phase advance per frame at unit speed and silence.
const PHASE_RATE: f32 = 0.005;
/// Extra phase advance per frame per unit of bass.
const PHASE_BASS_RATE: f32 = 0.05;
/// Render-scale boost per unit of bass.
const BASS_SCALE_GAIN: f32 = 3.0;
/// Angular frequency of the treble scale oscillation, per unit phase.
const TREBLE_OSCILLATION_FREQUENCY: f32 = 4.0;
/// Rotation per unit velocity.
const ROTATION_GAIN: f32 = 0.05;
/// Position or speed beyond this is treated as a diverged update.
pub const MAX_EXTENT: f32 = 1.0e4;

/// Clamps `dt` to `[0, max_dt]`; non-finite `dt` becomes 0.
pub fn clamp_dt(dt: f32, max_dt: f32) -> f32 {
    if dt.is_finite() {
        dt.clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    }
}

/// Splits a step of `dt` seconds into equal sub-steps of at most one
/// reference frame.
///
/// Returns the sub-step count (at least 1) and the length of each sub-step.
/// `dt` is clamped first, so the count never exceeds `max_dt / REFERENCE_DT`
/// rounded up.
pub fn substeps(dt: f32, max_dt: f32) -> (usize, f32) {
    let dt = clamp_dt(dt, max_dt);
    let count = (dt / REFERENCE_DT).ceil().max(1.0) as usize;
    (count, dt / count as f32)
}

/// Everything a particle update reads, fixed for the duration of one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext {
    pub shape: Shape,
    pub count: usize,
    pub chaos: f32,
    pub speed: f32,
    pub size: f32,
    pub audio: AudioEnergy,
    /// Pointer in world space, if detected.
    pub pointer: Option<Vec3>,
    /// `dt / REFERENCE_DT`, already clamped.
    pub frame_factor: f32,
    pub config: SimConfig,
}

impl FrameContext {
    /// Snapshot of params, inputs and config for a step of `dt` seconds.
    ///
    /// `dt` is clamped to `[0, config.max_dt]`; non-finite `dt` becomes 0.
    pub fn new(
        params: &VisualParams,
        inputs: &SceneInputs,
        dt: f32,
        count: usize,
        config: SimConfig,
    ) -> Self {
        let dt = clamp_dt(dt, config.max_dt);
        let inputs = inputs.sanitized();
        Self {
            shape: params.shape,
            count,
            chaos: params.chaos,
            speed: params.speed,
            size: params.size,
            audio: inputs.audio_energy,
            pointer: pointer_world(
                &inputs.pointer,
                config.pointer_scale_x,
                config.pointer_scale_y,
                config.pointer_depth,
            ),
            frame_factor: dt / REFERENCE_DT,
            config,
        }
    }

    /// Spring strength for this frame: looser while the pointer is active.
    pub fn spring(&self) -> f32 {
        if self.pointer.is_some() {
            self.config.spring_active
        } else {
            self.config.spring_idle
        }
    }
}

/// Advances one particle by one frame.
///
/// Returns `false` if the update produced non-finite state or a position or
/// speed beyond [`MAX_EXTENT`], in which case the particle is restored to its
/// pre-step values with velocity zeroed.
pub fn advance(
    particle: &mut Particle,
    index: usize,
    ctx: &FrameContext,
    rng: &mut dyn RandomSource,
) -> bool {
    let before = *particle;
    let f = ctx.frame_factor;
    let cfg = &ctx.config;

    let goal = match cfg.jitter {
        JitterMode::Living => target(index, ctx.count, ctx.shape, rng),
        JitterMode::Stable => target(
            index,
            ctx.count,
            ctx.shape,
            &mut ReplaySamples::new(&particle.samples),
        ),
    };
    let blend = 1.0 - (1.0 - cfg.morph_rate).powf(f);
    particle.base_position += (goal - particle.base_position) * blend;

    particle.phase += ctx.speed * (PHASE_RATE + ctx.audio.bass * PHASE_BASS_RATE) * f;

    let current_target = particle.base_position
        + NoiseField::jitter(particle.phase, particle.base_position, ctx.chaos, ctx.shape);

    if let Some(pointer) = ctx.pointer {
        let offset = particle.position - pointer;
        particle.velocity += pointer_force(ctx.shape, offset, cfg.interaction_radius, rng) * f;
    }

    particle.velocity *= cfg.friction.powf(f);
    particle.velocity += (current_target - particle.position) * ctx.spring() * f;
    particle.position += particle.velocity * f;

    if particle.is_finite()
        && particle.position.length() < MAX_EXTENT
        && particle.velocity.length() < MAX_EXTENT
    {
        return true;
    }
    *particle = Particle {
        velocity: Vec3::ZERO,
        ..before
    };
    false
}

/// Presentation-only transform for a particle after its update.
pub fn present(particle: &Particle, ctx: &FrameContext) -> ParticleTransform {
    let oscillation = 0.5 * (1.0 + (particle.phase * TREBLE_OSCILLATION_FREQUENCY).sin());
    let scale = ctx.size
        * (1.0 + ctx.audio.bass * BASS_SCALE_GAIN + ctx.audio.treble * oscillation);
    ParticleTransform {
        position: particle.position,
        scale,
        rotation_delta: particle.velocity * ROTATION_GAIN,
    }
}
