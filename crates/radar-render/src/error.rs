//! Error types for rendering.

use radar_common::RadarError;
use thiserror::Error;

pub type RenderResult<T> = Result<T, RenderError>;

#[derive(Error, Debug)]
pub enum RenderError {
    /// The drawing backend failed.
    #[error("Drawing failed: {0}")]
    Draw(String),

    /// The field to plot is not in the volume.
    #[error("Field not found: {0}")]
    MissingField(String),

    /// Nothing to plot.
    #[error("No data to plot: {0}")]
    EmptyData(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Wrap any backend error.
    pub fn draw(err: impl std::fmt::Display) -> Self {
        Self::Draw(err.to_string())
    }
}

impl From<RadarError> for RenderError {
    fn from(err: RadarError) -> Self {
        match err {
            RadarError::MissingField(name) => Self::MissingField(name),
            RadarError::EmptyData(msg) => Self::EmptyData(msg),
            RadarError::Io(e) => Self::Io(e),
            other => Self::Draw(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_error_conversion() {
        let err: RenderError = RadarError::MissingField("velocity".to_string()).into();
        assert!(matches!(err, RenderError::MissingField(name) if name == "velocity"));

        let err: RenderError = RadarError::SweepOutOfRange { index: 4, count: 3 }.into();
        assert!(matches!(err, RenderError::Draw(msg) if msg.contains('4')));
    }
}
