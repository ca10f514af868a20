//! Receivers for finished frames.

use morphfield_core::{ParticleTransform, Srgb};

/// The rendering side of the loop. Called once per completed frame.
pub trait FrameSink {
    fn present(&mut self, frame: &[ParticleTransform], colors: &[Srgb]);
}

impl<F> FrameSink for F
where
    F: FnMut(&[ParticleTransform], &[Srgb]),
{
    fn present(&mut self, frame: &[ParticleTransform], colors: &[Srgb]) {
        self(frame, colors)
    }
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FrameSink for NullSink {
    fn present(&mut self, _frame: &[ParticleTransform], _colors: &[Srgb]) {}
}

/// Running summary of presented frames, for headless runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    pub frames: u64,
    /// Mean distance of particles from the origin in the last frame.
    pub mean_radius: f32,
    /// Largest particle speed proxy (`|rotation_delta|`) in the last frame.
    pub max_rotation: f32,
}

impl FrameSink for FrameStats {
    fn present(&mut self, frame: &[ParticleTransform], _colors: &[Srgb]) {
        self.frames += 1;
        if frame.is_empty() {
            return;
        }
        let total: f32 = frame.iter().map(|t| t.position.length()).sum();
        self.mean_radius = total / frame.len() as f32;
        self.max_rotation = frame
            .iter()
            .map(|t| t.rotation_delta.length())
            .fold(0.0, f32::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform_at(x: f32) -> ParticleTransform {
        let mut t = ParticleTransform::default();
        t.position.x = x;
        t.rotation_delta.y = x / 10.0;
        t
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = 0usize;
        {
            let mut sink = |frame: &[ParticleTransform], _: &[Srgb]| seen += frame.len();
            sink.present(&[ParticleTransform::default(); 3], &[Srgb::WHITE; 3]);
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn stats_track_last_frame() {
        let mut stats = FrameStats::default();
        stats.present(&[transform_at(2.0), transform_at(4.0)], &[Srgb::WHITE; 2]);
        assert_eq!(stats.frames, 1);
        assert!((stats.mean_radius - 3.0).abs() < 1e-6);
        assert!((stats.max_rotation - 0.4).abs() < 1e-6);
    }
}
