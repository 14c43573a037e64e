//! Error types for radar volume access.

use thiserror::Error;

/// Result type alias using RadarError.
pub type RadarResult<T> = Result<T, RadarError>;

/// Errors raised while building or querying a radar volume.
#[derive(Error, Debug)]
pub enum RadarError {
    /// A required field is not present in the volume
    #[error("Field not found: {0}")]
    MissingField(String),

    #[error("Sweep {index} out of range (volume has {count} sweeps)")]
    SweepOutOfRange { index: usize, count: usize },

    /// Array shape differs from what the caller requires
    #[error("Unexpected array shape {actual:?}, expected {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Empty data: {0}")]
    EmptyData(String),

    /// File content does not follow the expected convention
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Missing required variable, dimension or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
