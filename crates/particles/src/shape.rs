//! Target points describing each silhouette.
//!
//! Every shape partitions the index range `[0, count)` its own way. Sphere and
//! the cat's head/body are pure functions of the index; the cat's ears,
//! flower, fish and star also draw from a [`RandomSource`], at most
//! [`SAMPLES_PER_TARGET`] times per call.

use glam::Vec3;
use morphfield_core::{RandomSource, Shape};
use std::f32::consts::{PI, TAU};

/// Upper bound on random draws made by one [`target`] call.
pub const SAMPLES_PER_TARGET: usize = 3;

const SPHERE_RADIUS: f32 = 10.0;

const CAT_HEAD_END: f32 = 0.35;
const CAT_BODY_END: f32 = 0.85;
const CAT_LEFT_EAR_END: f32 = 0.92;
const CAT_HEAD_RADIUS: f32 = 4.0;
const CAT_HEAD_CENTER: Vec3 = Vec3::new(0.0, 3.5, 0.0);
const CAT_BODY_RADIUS: f32 = 6.0;
const CAT_BODY_CENTER: Vec3 = Vec3::new(0.0, -2.5, 0.0);
const CAT_EAR_X: f32 = 2.0;
const CAT_EAR_Y: f32 = 7.5;
const CAT_EAR_HALF_EXTENT: f32 = 0.6;

const FLOWER_RADIUS: f32 = 8.0;
const FLOWER_PETAL_FREQUENCY: f32 = 3.0;
const FLOWER_RADIAL_JITTER: f32 = 1.5;
const FLOWER_THICKNESS: f32 = 0.4;

const FISH_HALF_LENGTH: f32 = 7.5;
const FISH_TAIL_START: f32 = 7.0;
const FISH_TAIL_LENGTH: f32 = 2.5;
const FISH_TAPER: f32 = 0.2;
const FISH_HALF_WIDTH: f32 = 3.0;
const FISH_HALF_HEIGHT: f32 = 2.0;

const STAR_RADIUS: f32 = 10.0;
const STAR_RADIAL_EXPONENT: f32 = 0.3;
const STAR_SPIKE_EVERY: usize = 20;
const STAR_SPIKE_SCALE: f32 = 1.5;

/// Target point for particle `i` of `count` in the given shape.
///
/// Always finite with magnitude below 20 for `i < count`.
pub fn target(i: usize, count: usize, shape: Shape, rng: &mut dyn RandomSource) -> Vec3 {
    let count = count.max(1);
    let ratio = i as f32 / count as f32;
    match shape {
        Shape::Sphere => fibonacci_point(ratio, count as f32, SPHERE_RADIUS),
        Shape::Cat => cat(ratio, count, rng),
        Shape::Flower => flower(ratio, rng),
        Shape::Fish => fish(ratio, rng),
        Shape::Star => star(i, rng),
    }
}

/// Point `t` ∈ [0, 1) along a Fibonacci spiral over a sphere sampled by `n` points.
fn fibonacci_point(t: f32, n: f32, radius: f32) -> Vec3 {
    let phi = (-1.0 + 2.0 * t).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;
    Vec3::new(
        theta.cos() * phi.sin(),
        theta.sin() * phi.sin(),
        phi.cos(),
    ) * radius
}

fn cat(ratio: f32, count: usize, rng: &mut dyn RandomSource) -> Vec3 {
    let n = count as f32;
    if ratio < CAT_HEAD_END {
        let t = ratio / CAT_HEAD_END;
        CAT_HEAD_CENTER + fibonacci_point(t, n * CAT_HEAD_END, CAT_HEAD_RADIUS)
    } else if ratio < CAT_BODY_END {
        let t = (ratio - CAT_HEAD_END) / (CAT_BODY_END - CAT_HEAD_END);
        CAT_BODY_CENTER
            + fibonacci_point(t, n * (CAT_BODY_END - CAT_HEAD_END), CAT_BODY_RADIUS)
    } else {
        let side = if ratio < CAT_LEFT_EAR_END { -1.0 } else { 1.0 };
        Vec3::new(side * CAT_EAR_X, CAT_EAR_Y, 0.0) + cube_offset(rng, CAT_EAR_HALF_EXTENT)
    }
}

fn flower(ratio: f32, rng: &mut dyn RandomSource) -> Vec3 {
    let theta = ratio * TAU;
    let rose = FLOWER_RADIUS * (FLOWER_PETAL_FREQUENCY * theta).cos().abs();
    let r = rose + rng.next_unit() * FLOWER_RADIAL_JITTER;
    // Thickest near the centre, thinning toward petal tips.
    let z = (rng.next_unit() - 0.5) * (SPHERE_RADIUS - r).max(0.0) * FLOWER_THICKNESS;
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

fn fish(ratio: f32, rng: &mut dyn RandomSource) -> Vec3 {
    let x = -FISH_HALF_LENGTH + ratio * 2.0 * FISH_HALF_LENGTH;
    if x.abs() > FISH_TAIL_START {
        // Tail lobe: fans out the further it extends past the body.
        let reach = rng.next_unit() * FISH_TAIL_LENGTH;
        let spread = (rng.next_unit() * 2.0 - 1.0) * (0.5 + reach);
        let flat = (rng.next_unit() - 0.5) * 0.5;
        return Vec3::new(x.signum() * (FISH_TAIL_START + reach), spread, flat);
    }
    let taper = (FISH_TAPER * x).cos();
    let angle = rng.next_unit() * TAU;
    Vec3::new(
        x,
        angle.sin() * FISH_HALF_HEIGHT * taper,
        angle.cos() * FISH_HALF_WIDTH * taper,
    )
}

fn star(i: usize, rng: &mut dyn RandomSource) -> Vec3 {
    let direction = unit_direction(rng.next_unit(), rng.next_unit());
    // u^(1/0.3) packs most radii near the centre, leaving sparse long rays.
    let mut r = STAR_RADIUS * rng.next_unit().powf(1.0 / STAR_RADIAL_EXPONENT);
    if i % STAR_SPIKE_EVERY == 0 {
        r *= STAR_SPIKE_SCALE;
    }
    direction * r
}

/// Uniform direction on the unit sphere from two unit samples.
fn unit_direction(u: f32, v: f32) -> Vec3 {
    let z = 1.0 - 2.0 * u;
    let ring = (1.0 - z * z).max(0.0).sqrt();
    let azimuth = v * TAU;
    Vec3::new(ring * azimuth.cos(), ring * azimuth.sin(), z)
}

/// Offset uniform in the cube `[-half, half]³`.
fn cube_offset(rng: &mut dyn RandomSource, half: f32) -> Vec3 {
    Vec3::new(
        rng.next_unit() * 2.0 - 1.0,
        rng.next_unit() * 2.0 - 1.0,
        rng.next_unit() * 2.0 - 1.0,
    ) * half
}

/// Replays a fixed set of samples, cycling when exhausted.
///
/// Backs the stable-silhouette mode: each particle keeps the samples drawn
/// when its shape was assigned and feeds them to [`target`] every frame.
pub struct ReplaySamples<'a> {
    samples: &'a [f32; SAMPLES_PER_TARGET],
    cursor: usize,
}

impl<'a> ReplaySamples<'a> {
    pub fn new(samples: &'a [f32; SAMPLES_PER_TARGET]) -> Self {
        Self { samples, cursor: 0 }
    }
}

impl RandomSource for ReplaySamples<'_> {
    fn next_unit(&mut self) -> f32 {
        let v = self.samples[self.cursor % SAMPLES_PER_TARGET];
        self.cursor += 1;
        v
    }
}
