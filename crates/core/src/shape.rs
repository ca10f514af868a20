//! The five target silhouettes a particle cloud can morph into.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

/// Target silhouette for the particle cloud.
///
/// Parsing is lenient: anything that is not one of the five literals becomes
/// [`Shape::Sphere`] so a malformed mood bundle never stops the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    #[default]
    Sphere,
    Cat,
    Flower,
    Fish,
    Star,
}

impl Shape {
    /// All shapes in declaration order.
    pub const ALL: [Shape; 5] = [
        Shape::Sphere,
        Shape::Cat,
        Shape::Flower,
        Shape::Fish,
        Shape::Star,
    ];

    /// Strict lookup of a shape literal (case-insensitive, surrounding whitespace ignored).
    pub fn parse(name: &str) -> Option<Shape> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Lenient lookup: unknown literals fall back to [`Shape::Sphere`].
    pub fn from_name(name: &str) -> Shape {
        Self::parse(name).unwrap_or_else(|| {
            warn!(shape = name, "unknown shape, falling back to sphere");
            Shape::Sphere
        })
    }

    /// The lowercase literal for this shape.
    pub fn name(self) -> &'static str {
        match self {
            Shape::Sphere => "sphere",
            Shape::Cat => "cat",
            Shape::Flower => "flower",
            Shape::Fish => "fish",
            Shape::Star => "star",
        }
    }

    /// Multiplier applied to the noise jitter amplitude for this shape.
    pub fn noise_factor(self) -> f32 {
        match self {
            Shape::Cat => 0.5,
            Shape::Fish => 1.5,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(value.as_str().map(Shape::from_name).unwrap_or_default())
    }
}
