//! Per-frame snapshots handed to the simulation by its collaborators.
//!
//! Each snapshot is plain data passed by value. Constructors sanitise, so a
//! collaborator that is still warming up (or glitching) degrades to neutral
//! input instead of poisoning the particle state.

use serde::{Deserialize, Serialize};

/// Fraction of the spectrum (from the low end) averaged into `bass`.
const BASS_BIN_FRACTION: usize = 8;

/// Pointer (hand or cursor) position in normalised screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerPosition {
    /// Horizontal position in [-1, 1].
    pub x: f32,
    /// Vertical position in [-1, 1].
    pub y: f32,
    pub is_detected: bool,
}

impl PointerPosition {
    /// A detected pointer at `(x, y)`, clamped into [-1, 1].
    ///
    /// Non-finite coordinates yield an undetected pointer.
    pub fn detected(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            is_detected: true,
        }
        .sanitized()
    }

    /// No pointer in view.
    pub fn undetected() -> Self {
        Self::default()
    }

    /// Returns a copy with coordinates clamped and non-finite input treated as not detected.
    pub fn sanitized(self) -> Self {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Self::undetected();
        }
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
            is_detected: self.is_detected,
        }
    }
}

/// Low/high frequency energy derived from the audio collaborator's spectrum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AudioEnergy {
    /// Low-frequency energy in [0, 1].
    pub bass: f32,
    /// High-frequency energy in [0, 1].
    pub treble: f32,
}

impl AudioEnergy {
    /// Energy bands clamped into [0, 1]; NaN becomes 0.
    pub fn new(bass: f32, treble: f32) -> Self {
        Self { bass, treble }.sanitized()
    }

    /// Silence.
    pub fn silent() -> Self {
        Self::default()
    }

    /// Reduces a byte magnitude spectrum (0–255 per bin) to two bands.
    ///
    /// `bass` averages the lowest eighth of the bins (at least one bin),
    /// `treble` averages the upper half. An empty spectrum is silent.
    pub fn from_spectrum(bins: &[u8]) -> Self {
        if bins.is_empty() {
            return Self::silent();
        }
        let bass_end = (bins.len() / BASS_BIN_FRACTION).max(1);
        let treble_start = bins.len() / 2;
        Self::new(
            mean_magnitude(&bins[..bass_end]),
            mean_magnitude(&bins[treble_start..]),
        )
    }

    /// Returns a copy with both bands clamped into [0, 1].
    pub fn sanitized(self) -> Self {
        let clean = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            bass: clean(self.bass),
            treble: clean(self.treble),
        }
    }
}

/// Mean of byte magnitudes normalised to [0, 1].
fn mean_magnitude(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
    sum as f32 / (bins.len() as f32 * 255.0)
}

/// Everything the simulation reads from the outside world for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneInputs {
    pub pointer: PointerPosition,
    pub audio_energy: AudioEnergy,
    /// Monotonic clock reading in seconds.
    pub elapsed_time: f64,
}

impl SceneInputs {
    /// Snapshot from optional collaborator readings; missing ones are neutral.
    pub fn new(
        pointer: Option<PointerPosition>,
        audio_energy: Option<AudioEnergy>,
        elapsed_time: f64,
    ) -> Self {
        Self {
            pointer: pointer.unwrap_or_default(),
            audio_energy: audio_energy.unwrap_or_default(),
            elapsed_time,
        }
        .sanitized()
    }

    /// Returns a copy with pointer and audio sanitised.
    pub fn sanitized(self) -> Self {
        Self {
            pointer: self.pointer.sanitized(),
            audio_energy: self.audio_energy.sanitized(),
            elapsed_time: if self.elapsed_time.is_finite() {
                self.elapsed_time
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detected_pointer_is_clamped() {
        let p = PointerPosition::detected(3.0, -7.0);
        assert_eq!((p.x, p.y), (1.0, -1.0));
        assert!(p.is_detected);
    }

    #[test]
    fn non_finite_pointer_is_undetected() {
        assert!(!PointerPosition::detected(f32::NAN, 0.0).is_detected);
        assert!(!PointerPosition::detected(0.0, f32::INFINITY).is_detected);
    }

    #[test]
    fn audio_energy_clamps_and_drops_nan() {
        let e = AudioEnergy::new(1.5, f32::NAN);
        assert_eq!(e.bass, 1.0);
        assert_eq!(e.treble, 0.0);
        assert_eq!(AudioEnergy::new(-0.2, 0.4), AudioEnergy::new(0.0, 0.4));
    }

    #[test]
    fn from_spectrum_empty_is_silent() {
        assert_eq!(AudioEnergy::from_spectrum(&[]), AudioEnergy::silent());
    }

    #[test]
    fn from_spectrum_full_scale_is_one() {
        let e = AudioEnergy::from_spectrum(&[255; 64]);
        assert!((e.bass - 1.0).abs() < 1e-6);
        assert!((e.treble - 1.0).abs() < 1e-6);
    }

    #[test]
    fn from_spectrum_separates_low_and_high_bins() {
        let mut bins = [0u8; 64];
        bins[..8].fill(255);
        let e = AudioEnergy::from_spectrum(&bins);
        assert!((e.bass - 1.0).abs() < 1e-6);
        assert_eq!(e.treble, 0.0);

        let mut bins = [0u8; 64];
        bins[32..].fill(51);
        let e = AudioEnergy::from_spectrum(&bins);
        assert_eq!(e.bass, 0.0);
        assert!((e.treble - 0.2).abs() < 1e-6);
    }

    #[test]
    fn from_spectrum_single_bin_feeds_both_bands() {
        let e = AudioEnergy::from_spectrum(&[255]);
        assert!((e.bass - 1.0).abs() < 1e-6);
        assert!((e.treble - 1.0).abs() < 1e-6);
    }

    #[test]
    fn missing_collaborators_are_neutral() {
        let inputs = SceneInputs::new(None, None, 2.0);
        assert!(!inputs.pointer.is_detected);
        assert_eq!(inputs.audio_energy, AudioEnergy::silent());
        assert_eq!(inputs.elapsed_time, 2.0);
    }

    #[test]
    fn serde_uses_camel_case() {
        let inputs = SceneInputs::new(Some(PointerPosition::detected(0.5, 0.5)), None, 1.0);
        let value = serde_json::to_value(inputs).unwrap();
        assert_eq!(value["pointer"]["isDetected"], true);
        assert!(value.get("audioEnergy").is_some());
        assert!(value.get("elapsedTime").is_some());
    }
}
