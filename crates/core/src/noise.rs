//! Trigonometric noise field used for organic per-particle jitter.

use crate::shape::Shape;
use glam::Vec3;

/// Jitter amplitude per unit of `chaos`.
const JITTER_AMPLITUDE: f32 = 5.0;
/// Scale applied to base-position components before sampling.
const SPATIAL_FREQUENCY: f32 = 0.1;
/// Phase multiplier for the secondary argument of each axis.
const PHASE_DETUNE: f32 = 0.7;

/// Stateless scalar noise: `sin(x) * cos(y) * sin(z)`.
///
/// Range is [-1, 1] and `sample(0, 0, 0) == 0`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoiseField;

impl NoiseField {
    /// Samples the field at `(x, y, z)`.
    pub fn sample(x: f32, y: f32, z: f32) -> f32 {
        x.sin() * y.cos() * z.sin()
    }

    /// Per-axis displacement for a particle with the given `phase` and home position.
    ///
    /// Each axis samples the field at its own phase-shifted argument triple so
    /// the three components decorrelate. Amplitude is
    /// `chaos * 5 * shape.noise_factor()`; `chaos == 0` gives exactly zero.
    pub fn jitter(phase: f32, base: Vec3, chaos: f32, shape: Shape) -> Vec3 {
        let amplitude = chaos * JITTER_AMPLITUDE * shape.noise_factor();
        if amplitude == 0.0 {
            return Vec3::ZERO;
        }
        let b = base * SPATIAL_FREQUENCY;
        let detuned = phase * PHASE_DETUNE;
        Vec3::new(
            Self::sample(phase + b.x, detuned + b.y + 1.3, b.z + 2.1),
            Self::sample(b.x + 3.7, phase + b.y, detuned + b.z + 1.1),
            Self::sample(detuned + b.x + 0.5, b.y + 5.3, phase + b.z),
        ) * amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_at_origin_is_zero() {
        assert_eq!(NoiseField::sample(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn sample_matches_closed_form() {
        let (x, y, z) = (0.7_f32, -1.2_f32, 2.5_f32);
        let expected = x.sin() * y.cos() * z.sin();
        assert_eq!(NoiseField::sample(x, y, z), expected);
    }

    #[test]
    fn jitter_is_zero_without_chaos() {
        let j = NoiseField::jitter(1.3, Vec3::new(4.0, -2.0, 7.0), 0.0, Shape::Fish);
        assert_eq!(j, Vec3::ZERO);
    }

    #[test]
    fn jitter_scales_with_shape_factor() {
        let base = Vec3::new(1.0, 2.0, 3.0);
        let sphere = NoiseField::jitter(0.4, base, 0.6, Shape::Sphere);
        let cat = NoiseField::jitter(0.4, base, 0.6, Shape::Cat);
        let fish = NoiseField::jitter(0.4, base, 0.6, Shape::Fish);
        assert!((cat - sphere * 0.5).length() < 1e-5);
        assert!((fish - sphere * 1.5).length() < 1e-5);
    }

    #[test]
    fn jitter_is_deterministic() {
        let base = Vec3::new(-3.0, 0.5, 8.0);
        assert_eq!(
            NoiseField::jitter(2.0, base, 1.0, Shape::Star),
            NoiseField::jitter(2.0, base, 1.0, Shape::Star)
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sample_stays_in_unit_range(
                x in -1e4_f32..1e4,
                y in -1e4_f32..1e4,
                z in -1e4_f32..1e4,
            ) {
                let v = NoiseField::sample(x, y, z);
                prop_assert!((-1.0..=1.0).contains(&v), "noise({x}, {y}, {z}) = {v}");
            }

            #[test]
            fn jitter_bounded_by_amplitude(
                phase in 0.0_f32..1e3,
                bx in -50.0_f32..50.0,
                by in -50.0_f32..50.0,
                bz in -50.0_f32..50.0,
                chaos in 0.0_f32..=1.0,
            ) {
                for shape in Shape::ALL {
                    let j = NoiseField::jitter(phase, Vec3::new(bx, by, bz), chaos, shape);
                    let bound = chaos * 5.0 * shape.noise_factor() + 1e-4;
                    prop_assert!(j.x.abs() <= bound && j.y.abs() <= bound && j.z.abs() <= bound);
                }
            }
        }
    }
}
