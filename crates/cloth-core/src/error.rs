//! Error types for cloth construction and configuration.
//!
//! The solver itself never fails: degenerate geometry is skipped and
//! instability is a configuration concern. Only building a cloth and
//! decoding external selector codes return `ClothResult`.

use thiserror::Error;

/// Errors raised while configuring or building a cloth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClothError {
    /// The node grid is too small to triangulate.
    #[error("invalid grid: {width}x{height} nodes (need at least 2x2)")]
    InvalidGrid { width: usize, height: usize },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Integration method code does not name a known method.
    #[error("unknown integration method code {0}")]
    UnknownMethod(u8),

    /// Bending level code is outside 0..=3.
    #[error("unknown bending level {0} (expected 0..=3)")]
    UnknownBendingLevel(u8),

    /// Impulse direction code does not name a known direction.
    #[error("unknown impulse direction code {0}")]
    UnknownImpulse(u8),

    /// Draw mode code does not name a known mode.
    #[error("unknown draw mode code {0}")]
    UnknownDrawMode(u8),
}

/// Convenience alias for `Result<T, ClothError>`.
pub type ClothResult<T> = Result<T, ClothError>;
