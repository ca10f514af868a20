#![deny(unsafe_code)]
//! Core types and traits for the morphfield particle system.
//!
//! Provides the `Engine` trait, the `Shape` literals, mood-derived
//! `VisualParams`, per-frame `SceneInputs`, `ParticleTransform` output,
//! `Srgb`/`Palette` colors, the `Xorshift64` PRNG behind the `RandomSource`
//! seam, the `NoiseField`, replay `Seed`, and parameter helpers.

pub mod color;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod noise;
pub mod palette;
pub mod params;
pub mod prng;
pub mod seed;
pub mod shape;
pub mod transform;

pub use color::Srgb;
pub use engine::Engine;
pub use error::EngineError;
pub use inputs::{AudioEnergy, PointerPosition, SceneInputs};
pub use noise::NoiseField;
pub use palette::Palette;
pub use params::VisualParams;
pub use prng::{RandomSource, Xorshift64};
pub use seed::Seed;
pub use shape::Shape;
pub use transform::ParticleTransform;
