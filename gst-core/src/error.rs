//! Error taxonomy shared by every Geostradamus library crate.

use thiserror::Error;

/// Result type alias for Geostradamus operations.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors that can abort a synthesis or forecast.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Malformed input: missing field, wrong type, or out-of-range coordinate.
    #[error("validation error: {0}")]
    Validation(String),

    /// Nothing to aggregate, either because no observations were supplied or
    /// because every timestamp was dropped.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The weights handed to a smoother sum to zero.
    #[error("degenerate weights: sum of weights is zero")]
    DegenerateWeight,

    /// The forecasting model rejected the synthesized series.
    #[error("forecast fit error: {0}")]
    ForecastFit(String),

    /// Unrecognized or out-of-range configuration option.
    #[error("invalid configuration: {0}")]
    Config(String),
}
