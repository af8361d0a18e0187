//! # Generation Error Types
//!
//! Errors that can stop a generation run before it starts.
//!
//! Everything that can go wrong *during* generation (a room that does not
//! fit, a door search that runs dry) is an expected branch and is logged,
//! not returned.

use thiserror::Error;

/// Errors raised by the generators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// A configuration value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Grid is too small to hold a single lattice cell inside its wall ring.
    #[error("grid {width}x{height} is too small, need at least 3x3")]
    DimensionsTooSmall {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// A TOML configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
