//! Tunable constants of the particle dynamics.

use morphfield_core::params::{param_f32, param_string};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default blend factor of the home position toward the shape target per reference frame.
const DEFAULT_MORPH_RATE: f32 = 0.03;
/// Default velocity retention per reference frame.
const DEFAULT_FRICTION: f32 = 0.92;
/// Velocity retention for the looser "fluid" preset.
const FLUID_FRICTION: f32 = 0.94;
/// Default spring toward the noisy target while no pointer is detected.
const DEFAULT_SPRING_IDLE: f32 = 0.05;
/// Default spring while the pointer is detected.
const DEFAULT_SPRING_ACTIVE: f32 = 0.02;
/// Default pointer interaction radius in world units.
const DEFAULT_INTERACTION_RADIUS: f32 = 25.0;
/// Default world units per normalised pointer unit, horizontally.
const DEFAULT_POINTER_SCALE_X: f32 = 30.0;
/// Default world units per normalised pointer unit, vertically.
const DEFAULT_POINTER_SCALE_Y: f32 = 20.0;
/// Default pointer depth in world units.
const DEFAULT_POINTER_DEPTH: f32 = 0.0;
/// Default upper bound on a single step's delta time, in seconds.
const DEFAULT_MAX_DT: f32 = 0.1;

/// Duration of the reference frame all per-frame constants are expressed in.
pub const REFERENCE_DT: f32 = 1.0 / 60.0;

/// How randomised shape targets behave from frame to frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JitterMode {
    /// Fresh random draws every frame: the silhouette shimmers.
    #[default]
    Living,
    /// Draws fixed per particle when its shape is assigned: a still silhouette.
    Stable,
}

impl JitterMode {
    /// Parses `"living"` / `"stable"`; anything else is `None`.
    pub fn parse(name: &str) -> Option<JitterMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "living" => Some(JitterMode::Living),
            "stable" => Some(JitterMode::Stable),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JitterMode::Living => "living",
            JitterMode::Stable => "stable",
        }
    }
}

/// Simulation constants.
///
/// Rates are per reference frame (1/60 s); the integrator rescales them for
/// the actual delta time. Use [`Default`] for the baseline feel or
/// [`SimConfig::fluid`] for looser damping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fraction of the distance to the shape target the home position covers per frame.
    pub morph_rate: f32,
    /// Velocity retained per frame.
    pub friction: f32,
    /// Spring toward the noisy target while idle.
    pub spring_idle: f32,
    /// Spring toward the noisy target while the pointer is detected.
    pub spring_active: f32,
    /// Pointer influence radius in world units.
    pub interaction_radius: f32,
    pub pointer_scale_x: f32,
    pub pointer_scale_y: f32,
    /// World z of the pointer.
    pub pointer_depth: f32,
    /// Largest delta time a single step will integrate.
    pub max_dt: f32,
    pub jitter: JitterMode,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            morph_rate: DEFAULT_MORPH_RATE,
            friction: DEFAULT_FRICTION,
            spring_idle: DEFAULT_SPRING_IDLE,
            spring_active: DEFAULT_SPRING_ACTIVE,
            interaction_radius: DEFAULT_INTERACTION_RADIUS,
            pointer_scale_x: DEFAULT_POINTER_SCALE_X,
            pointer_scale_y: DEFAULT_POINTER_SCALE_Y,
            pointer_depth: DEFAULT_POINTER_DEPTH,
            max_dt: DEFAULT_MAX_DT,
            jitter: JitterMode::Living,
        }
    }
}

impl SimConfig {
    /// Baseline config with looser damping for a more fluid feel.
    pub fn fluid() -> Self {
        Self {
            friction: FLUID_FRICTION,
            ..Self::default()
        }
    }

    /// Extracts a config from a JSON object, falling back to defaults per key.
    ///
    /// Values outside their usable range are clamped so the integrator stays stable.
    pub fn from_json(params: &Value) -> Self {
        let base = Self::default();
        let jitter = JitterMode::parse(&param_string(params, "jitter", base.jitter.name()))
            .unwrap_or(base.jitter);
        Self {
            morph_rate: param_f32(params, "morph_rate", base.morph_rate),
            friction: param_f32(params, "friction", base.friction),
            spring_idle: param_f32(params, "spring_idle", base.spring_idle),
            spring_active: param_f32(params, "spring_active", base.spring_active),
            interaction_radius: param_f32(params, "interaction_radius", base.interaction_radius),
            pointer_scale_x: param_f32(params, "pointer_scale_x", base.pointer_scale_x),
            pointer_scale_y: param_f32(params, "pointer_scale_y", base.pointer_scale_y),
            pointer_depth: param_f32(params, "pointer_depth", base.pointer_depth),
            max_dt: param_f32(params, "max_dt", base.max_dt),
            jitter,
        }
        .sanitized()
    }

    /// Returns a copy with every field clamped into its supported range.
    ///
    /// Every spring up to 0.2 is stable at any friction once a step is split
    /// into sub-steps of at most one reference frame.
    ///
    /// Non-finite values revert to the default for that field.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let fix = |v: f32, lo: f32, hi: f32, default: f32| {
            if v.is_finite() {
                v.clamp(lo, hi)
            } else {
                default
            }
        };
        Self {
            morph_rate: fix(self.morph_rate, 0.0, 1.0, d.morph_rate),
            friction: fix(self.friction, 0.0, 0.999, d.friction),
            spring_idle: fix(self.spring_idle, 0.0, 0.2, d.spring_idle),
            spring_active: fix(self.spring_active, 0.0, 0.2, d.spring_active),
            interaction_radius: fix(self.interaction_radius, 0.0, 1e4, d.interaction_radius),
            pointer_scale_x: fix(self.pointer_scale_x, -1e4, 1e4, d.pointer_scale_x),
            pointer_scale_y: fix(self.pointer_scale_y, -1e4, 1e4, d.pointer_scale_y),
            pointer_depth: fix(self.pointer_depth, -1e4, 1e4, d.pointer_depth),
            max_dt: fix(self.max_dt, 0.0, 0.1, d.max_dt),
            jitter: self.jitter,
        }
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "morph_rate": self.morph_rate,
            "friction": self.friction,
            "spring_idle": self.spring_idle,
            "spring_active": self.spring_active,
            "interaction_radius": self.interaction_radius,
            "pointer_scale_x": self.pointer_scale_x,
            "pointer_scale_y": self.pointer_scale_y,
            "pointer_depth": self.pointer_depth,
            "max_dt": self.max_dt,
            "jitter": self.jitter.name(),
        })
    }

    /// Schema describing every tunable, its range and default.
    pub fn schema() -> Value {
        json!({
            "morph_rate": {
                "type": "number", "default": DEFAULT_MORPH_RATE, "min": 0.0, "max": 1.0,
                "description": "Blend of the home position toward the shape target per frame"
            },
            "friction": {
                "type": "number", "default": DEFAULT_FRICTION, "min": 0.0, "max": 0.999,
                "description": "Velocity retained per frame (0.94 for a fluid feel)"
            },
            "spring_idle": {
                "type": "number", "default": DEFAULT_SPRING_IDLE, "min": 0.0, "max": 0.2,
                "description": "Spring toward the target while no pointer is detected"
            },
            "spring_active": {
                "type": "number", "default": DEFAULT_SPRING_ACTIVE, "min": 0.0, "max": 0.2,
                "description": "Spring toward the target while the pointer is detected"
            },
            "interaction_radius": {
                "type": "number", "default": DEFAULT_INTERACTION_RADIUS, "min": 0.0,
                "description": "Pointer influence radius in world units"
            },
            "pointer_scale_x": {
                "type": "number", "default": DEFAULT_POINTER_SCALE_X,
                "description": "World units per normalised pointer unit (x)"
            },
            "pointer_scale_y": {
                "type": "number", "default": DEFAULT_POINTER_SCALE_Y,
                "description": "World units per normalised pointer unit (y)"
            },
            "pointer_depth": {
                "type": "number", "default": DEFAULT_POINTER_DEPTH,
                "description": "World z of the pointer"
            },
            "max_dt": {
                "type": "number", "default": DEFAULT_MAX_DT, "min": 0.0, "max": 0.1,
                "description": "Largest delta time one step integrates, in seconds"
            },
            "jitter": {
                "type": "string", "enum": ["living", "stable"], "default": "living",
                "description": "Whether randomised shape targets are redrawn every frame"
            }
        })
    }
}
