//! Fixed-size storage for particle state.

use crate::shape::SAMPLES_PER_TARGET;
use glam::Vec3;
use morphfield_core::{EngineError, ParticleTransform, RandomSource, Srgb};
use std::f32::consts::TAU;

/// Half-width of the cube particles are scattered in at creation.
const SPAWN_HALF_EXTENT: f32 = 20.0;

/// Kinematic state of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current rendered location.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Slowly morphing home location chasing the shape target.
    pub base_position: Vec3,
    /// Accumulator driving noise sampling and scale oscillation.
    pub phase: f32,
    /// Samples replayed into the target function in stable jitter mode.
    pub samples: [f32; SAMPLES_PER_TARGET],
}

impl Particle {
    /// A particle at rest somewhere in the spawn cube.
    fn spawn(rng: &mut dyn RandomSource) -> Self {
        let position = Vec3::new(
            (rng.next_unit() * 2.0 - 1.0) * SPAWN_HALF_EXTENT,
            (rng.next_unit() * 2.0 - 1.0) * SPAWN_HALF_EXTENT,
            (rng.next_unit() * 2.0 - 1.0) * SPAWN_HALF_EXTENT,
        );
        Self {
            position,
            velocity: Vec3::ZERO,
            base_position: position,
            phase: rng.next_unit() * TAU,
            samples: draw_samples(rng),
        }
    }

    /// True when every component of the physical state is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.base_position.is_finite()
            && self.phase.is_finite()
    }
}

/// Fresh samples for the stable-silhouette mode.
pub fn draw_samples(rng: &mut dyn RandomSource) -> [f32; SAMPLES_PER_TARGET] {
    std::array::from_fn(|_| rng.next_unit())
}

/// Owns every particle plus its color and last output transform.
///
/// The three arrays share one length fixed at construction; there is no API
/// to grow or shrink them.
#[derive(Debug, Clone)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    colors: Vec<Srgb>,
    transforms: Vec<ParticleTransform>,
}

impl ParticleStore {
    /// Scatters `count` particles at rest in the spawn cube.
    ///
    /// Returns `EngineError::InvalidParticleCount` if `count` is zero.
    pub fn new(count: usize, rng: &mut dyn RandomSource) -> Result<Self, EngineError> {
        if count == 0 {
            return Err(EngineError::InvalidParticleCount);
        }
        Self::from_particles((0..count).map(|_| Particle::spawn(rng)).collect())
    }

    /// Builds a store from explicit particle state. Colors start white.
    pub fn from_particles(particles: Vec<Particle>) -> Result<Self, EngineError> {
        if particles.is_empty() {
            return Err(EngineError::InvalidParticleCount);
        }
        let count = particles.len();
        let transforms = particles
            .iter()
            .map(|p| ParticleTransform {
                position: p.position,
                scale: 1.0,
                rotation_delta: Vec3::ZERO,
            })
            .collect();
        Ok(Self {
            particles,
            colors: vec![Srgb::WHITE; count],
            transforms,
        })
    }

    /// Number of particles; constant for the store's lifetime.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false: a store holds at least one particle.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    pub fn transforms(&self) -> &[ParticleTransform] {
        &self.transforms
    }

    /// Particles and output transforms borrowed together, for the integrator.
    pub fn split_mut(&mut self) -> (&mut [Particle], &mut [ParticleTransform]) {
        (&mut self.particles, &mut self.transforms)
    }

    /// Mutable color slots, for the color assigner.
    pub fn colors_mut(&mut self) -> &mut [Srgb] {
        &mut self.colors
    }

    /// Redraws every particle's stable-mode samples.
    pub fn reseed_samples(&mut self, rng: &mut dyn RandomSource) {
        for p in &mut self.particles {
            p.samples = draw_samples(rng);
        }
    }
}
