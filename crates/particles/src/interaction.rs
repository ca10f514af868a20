//! Pointer-driven forces.
//!
//! The pointer only acts within `interaction_radius` of a particle, with a
//! quadratic falloff: `influence = 1 - dist/radius`, `power = influence²`.
//! What the force does depends on the shape the cloud is forming.

use glam::Vec3;
use morphfield_core::{PointerPosition, RandomSource, Shape};

/// Distances below this are treated as coincident with the pointer.
pub const MIN_INTERACTION_DISTANCE: f32 = 1e-6;

/// Cat: radius inside which the pointer is felt at all.
const CAT_PURR_RADIUS: f32 = 8.0;
/// Cat: attraction gain toward the pointer.
const CAT_ATTRACTION: f32 = 0.05;
/// Cat: amplitude of the per-axis purr jitter.
const CAT_PURR_JITTER: f32 = 0.5;
/// Flower: gain of the push away from the pointer.
const FLOWER_PUSH: f32 = 0.1;
/// Default shapes: gain of the tangential swirl.
const VORTEX_STRENGTH: f32 = 0.8;
/// Default shapes: gain of the radial pull toward the pointer.
const SUCTION_STRENGTH: f32 = 0.5;
/// Shared scale on the vortex and suction terms.
const VORTEX_GAIN: f32 = 0.1;

/// Pointer mapped into world space, or `None` when nothing is detected.
pub fn pointer_world(
    pointer: &PointerPosition,
    scale_x: f32,
    scale_y: f32,
    depth: f32,
) -> Option<Vec3> {
    pointer
        .is_detected
        .then(|| Vec3::new(pointer.x * scale_x, pointer.y * scale_y, depth))
}

/// Distance falloff: `(1 - dist/radius)²` inside the radius, zero outside.
pub fn falloff(dist: f32, radius: f32) -> f32 {
    if radius <= 0.0 || dist >= radius {
        return 0.0;
    }
    let influence = 1.0 - dist / radius;
    influence * influence
}

/// Velocity change one reference frame of pointer interaction applies to a particle.
///
/// `offset` is `position - pointer`. Returns zero outside `radius` and when
/// the particle sits on the pointer, where the direction is undefined.
pub fn pointer_force(shape: Shape, offset: Vec3, radius: f32, rng: &mut dyn RandomSource) -> Vec3 {
    let dist = offset.length();
    if !dist.is_finite() || dist < MIN_INTERACTION_DISTANCE {
        return Vec3::ZERO;
    }
    let power = falloff(dist, radius);
    if power == 0.0 {
        return Vec3::ZERO;
    }
    match shape {
        Shape::Cat => {
            if dist >= CAT_PURR_RADIUS {
                return Vec3::ZERO;
            }
            let purr = Vec3::new(
                rng.next_unit() - 0.5,
                rng.next_unit() - 0.5,
                rng.next_unit() - 0.5,
            ) * CAT_PURR_JITTER
                * power;
            -offset * CAT_ATTRACTION * power + purr
        }
        Shape::Flower => offset / dist * FLOWER_PUSH * power,
        Shape::Sphere | Shape::Fish | Shape::Star => {
            let vortex =
                Vec3::new(-offset.y, offset.x, 0.0) * VORTEX_STRENGTH * power * VORTEX_GAIN;
            let suction = -offset * SUCTION_STRENGTH * power * VORTEX_GAIN;
            vortex + suction
        }
    }
}
