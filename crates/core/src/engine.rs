//! The `Engine` trait a frame scheduler drives.
//!
//! The trait is object-safe so schedulers and sinks can work with
//! `dyn Engine`.

use crate::color::Srgb;
use crate::inputs::SceneInputs;
use crate::params::VisualParams;
use crate::transform::ParticleTransform;
use serde_json::Value;

/// A frame-stepped particle simulation.
///
/// `step` is infallible: a continuously running visual loop must survive any
/// single bad frame, so implementations sanitise their inputs and recover
/// from non-finite state instead of returning errors.
pub trait Engine {
    /// Advance the simulation by `dt` seconds using this frame's input snapshot.
    fn step(&mut self, dt: f32, inputs: &SceneInputs);

    /// Replace the visual parameters. Takes effect on the next `step`.
    fn set_params(&mut self, params: VisualParams);

    /// Per-particle transforms from the most recent step, in particle order.
    fn frame(&self) -> &[ParticleTransform];

    /// Per-particle colors, in particle order.
    fn colors(&self) -> &[Srgb];

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing all available parameters, their types, ranges, and defaults.
    fn param_schema(&self) -> Value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Minimal engine used to verify trait object safety.
    struct MockEngine {
        frame: Vec<ParticleTransform>,
        colors: Vec<Srgb>,
        params: VisualParams,
        steps: usize,
        last_dt: f32,
    }

    impl MockEngine {
        fn new() -> Self {
            Self {
                frame: vec![ParticleTransform::default(); 4],
                colors: vec![Srgb::WHITE; 4],
                params: VisualParams::default(),
                steps: 0,
                last_dt: 0.0,
            }
        }
    }

    impl Engine for MockEngine {
        fn step(&mut self, dt: f32, _inputs: &SceneInputs) {
            self.steps += 1;
            self.last_dt = dt;
        }

        fn set_params(&mut self, params: VisualParams) {
            self.params = params;
        }

        fn frame(&self) -> &[ParticleTransform] {
            &self.frame
        }

        fn colors(&self) -> &[Srgb] {
            &self.colors
        }

        fn params(&self) -> Value {
            json!({"steps": self.steps, "visual": self.params.to_json()})
        }

        fn param_schema(&self) -> Value {
            VisualParams::schema()
        }
    }

    #[test]
    fn engine_trait_is_object_safe() {
        let engine: Box<dyn Engine> = Box::new(MockEngine::new());
        assert_eq!(engine.frame().len(), 4);
        assert_eq!(engine.colors().len(), 4);
    }

    #[test]
    fn dyn_engine_mut_reference_steps() {
        let mut engine = MockEngine::new();
        let engine_ref: &mut dyn Engine = &mut engine;
        engine_ref.step(0.5, &SceneInputs::default());
        assert_eq!(engine_ref.params()["steps"], 1);
        assert_eq!(engine.last_dt, 0.5);
    }

    #[test]
    fn set_params_is_visible_through_params() {
        let mut engine = MockEngine::new();
        let mut params = VisualParams::default();
        params.shape = crate::shape::Shape::Fish;
        engine.set_params(params);
        assert_eq!(engine.params()["visual"]["shape"], "fish");
    }
}
