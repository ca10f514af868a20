//! Error types for the morphfield core.
//!
//! Only construction and I/O can fail. The per-frame step never returns an
//! error: bad inputs are sanitised and degenerate geometry is skipped.

use thiserror::Error;

/// Errors produced when building a simulation or its inputs.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A simulation was requested with zero particles.
    #[error("invalid particle count: a scene needs at least one particle")]
    InvalidParticleCount,

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Reading or writing a replay seed or frame snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_particle_count_displays_readable_message() {
        let msg = EngineError::InvalidParticleCount.to_string();
        assert!(
            msg.contains("particle"),
            "expected message mentioning particles, got: {msg}"
        );
    }

    #[test]
    fn invalid_color_includes_message() {
        let err = EngineError::InvalidColor("bad hex".into());
        let msg = format!("{err}");
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn invalid_palette_includes_message() {
        let err = EngineError::InvalidPalette("empty".into());
        let msg = format!("{err}");
        assert!(msg.contains("empty"), "missing message in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let err = EngineError::Io("disk full".into());
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn engine_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EngineError>();
    }

    #[test]
    fn engine_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<EngineError>();
    }
}
