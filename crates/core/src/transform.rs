//! Per-particle output handed to the rendering collaborator.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Presentation state for one particle for one frame.
///
/// Derived from the simulation state after integration; never fed back.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticleTransform {
    pub position: Vec3,
    /// Render scale, already multiplied by `VisualParams::size`.
    pub scale: f32,
    /// Rotation to add this frame, proportional to velocity.
    pub rotation_delta: Vec3,
}

impl ParticleTransform {
    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.scale.is_finite() && self.rotation_delta.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_finite() {
        assert!(ParticleTransform::default().is_finite());
    }

    #[test]
    fn detects_non_finite_components() {
        let t = ParticleTransform {
            position: Vec3::new(f32::NAN, 0.0, 0.0),
            ..Default::default()
        };
        assert!(!t.is_finite());
        let t = ParticleTransform {
            scale: f32::INFINITY,
            ..Default::default()
        };
        assert!(!t.is_finite());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let t = ParticleTransform {
            position: Vec3::new(1.0, 2.0, 3.0),
            scale: 0.5,
            rotation_delta: Vec3::ZERO,
        };
        let value = serde_json::to_value(t).unwrap();
        assert_eq!(value["position"], serde_json::json!([1.0, 2.0, 3.0]));
        assert!(value.get("rotationDelta").is_some());
    }
}
