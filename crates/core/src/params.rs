//! Mood-derived visual parameters and the lenient JSON helpers that read them.
//!
//! The `param_*` helpers take a JSON value, a key name, and a default. If the
//! key is missing or the value is not the expected type, the default is
//! returned. [`VisualParams::from_json`] builds on them so a malformed bundle
//! from the mood generator always yields a usable, in-range parameter set.

use crate::palette::Palette;
use crate::shape::Shape;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::warn;

/// Default noise amplitude.
pub const DEFAULT_CHAOS: f32 = 0.5;
/// Default phase advance rate.
pub const DEFAULT_SPEED: f32 = 1.0;
/// Default render-scale multiplier.
pub const DEFAULT_SIZE: f32 = 1.0;

/// Valid range for `chaos`.
pub const CHAOS_RANGE: (f32, f32) = (0.0, 1.0);
/// Valid range for `speed`.
pub const SPEED_RANGE: (f32, f32) = (0.1, 2.0);
/// Valid range for `size`.
pub const SIZE_RANGE: (f32, f32) = (0.1, 2.0);

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Extracts an `f32` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_f32(params: &Value, name: &str, default: f32) -> f32 {
    param_f64(params, name, f64::from(default)) as f32
}

/// Extracts a `String` from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

/// Extracts a list of strings from `params[name]`; non-string entries are dropped.
pub fn param_string_list(params: &Value, name: &str) -> Option<Vec<String>> {
    params.get(name).and_then(Value::as_array).map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect()
    })
}

/// Clamps `value` into `range`; NaN becomes `default`.
pub fn clamp_or(value: f32, range: (f32, f32), default: f32) -> f32 {
    if value.is_nan() {
        default
    } else {
        value.clamp(range.0, range.1)
    }
}

/// Visual parameter bundle for one mood generation.
///
/// Values are always in range: every constructor clamps, and deserialization
/// goes through [`VisualParams::from_json`], so it cannot fail.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParams {
    /// Overall noise amplitude in [0, 1].
    pub chaos: f32,
    /// Phase advance rate in [0.1, 2].
    pub speed: f32,
    /// Render-scale multiplier in [0.1, 2].
    pub size: f32,
    pub color_palette: Palette,
    pub shape: Shape,
}

impl Default for VisualParams {
    fn default() -> Self {
        Self {
            chaos: DEFAULT_CHAOS,
            speed: DEFAULT_SPEED,
            size: DEFAULT_SIZE,
            color_palette: Palette::default(),
            shape: Shape::Sphere,
        }
    }
}

impl VisualParams {
    /// Builds a parameter set, clamping numeric fields into range.
    pub fn new(chaos: f32, speed: f32, size: f32, color_palette: Palette, shape: Shape) -> Self {
        Self {
            chaos,
            speed,
            size,
            color_palette,
            shape,
        }
        .sanitized()
    }

    /// Reads a bundle from JSON, substituting defaults for anything missing or malformed.
    ///
    /// Keys: `chaos`, `speed`, `size`, `colorPalette` (array of hex strings), `shape`.
    pub fn from_json(params: &Value) -> Self {
        let color_palette = match param_string_list(params, "colorPalette") {
            Some(hexes) => Palette::from_hex_lenient(&hexes),
            None => Palette::default(),
        };
        let shape = params
            .get("shape")
            .and_then(Value::as_str)
            .map(Shape::from_name)
            .unwrap_or_default();
        Self {
            chaos: param_f32(params, "chaos", DEFAULT_CHAOS),
            speed: param_f32(params, "speed", DEFAULT_SPEED),
            size: param_f32(params, "size", DEFAULT_SIZE),
            color_palette,
            shape,
        }
        .sanitized()
    }

    /// Returns a copy with every numeric field clamped into its documented range.
    pub fn sanitized(self) -> Self {
        let chaos = clamp_or(self.chaos, CHAOS_RANGE, DEFAULT_CHAOS);
        let speed = clamp_or(self.speed, SPEED_RANGE, DEFAULT_SPEED);
        let size = clamp_or(self.size, SIZE_RANGE, DEFAULT_SIZE);
        if chaos != self.chaos || speed != self.speed || size != self.size {
            warn!(
                chaos = self.chaos,
                speed = self.speed,
                size = self.size,
                "visual params out of range, clamping"
            );
        }
        Self {
            chaos,
            speed,
            size,
            ..self
        }
    }

    /// Current values as a JSON object.
    pub fn to_json(&self) -> Value {
        json!({
            "chaos": self.chaos,
            "speed": self.speed,
            "size": self.size,
            "colorPalette": self.color_palette.to_hex(),
            "shape": self.shape.name(),
        })
    }

    /// Schema describing every field, its range and default.
    pub fn schema() -> Value {
        json!({
            "chaos": {
                "type": "number",
                "default": DEFAULT_CHAOS,
                "min": CHAOS_RANGE.0,
                "max": CHAOS_RANGE.1,
                "description": "Overall noise amplitude"
            },
            "speed": {
                "type": "number",
                "default": DEFAULT_SPEED,
                "min": SPEED_RANGE.0,
                "max": SPEED_RANGE.1,
                "description": "Phase advance rate"
            },
            "size": {
                "type": "number",
                "default": DEFAULT_SIZE,
                "min": SIZE_RANGE.0,
                "max": SIZE_RANGE.1,
                "description": "Render-scale multiplier"
            },
            "colorPalette": {
                "type": "array",
                "items": "hex color",
                "default": Palette::default().to_hex(),
                "description": "Colors particles draw from"
            },
            "shape": {
                "type": "string",
                "enum": Shape::ALL.map(Shape::name),
                "default": "sphere",
                "description": "Target silhouette"
            }
        })
    }
}

impl<'de> Deserialize<'de> for VisualParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
