//! Forecasting stage: turns a synthesized series into a prediction table.
//!
//! The forecasting model itself sits behind the [`Forecaster`] trait so any
//! univariate model with a fit/predict cycle can be plugged in through a
//! [`ModelSpec`]. [`TrendSeasonal`] is the model used when none is given.

pub mod adapter;
pub mod config;
pub mod forecaster;
mod linalg;
pub mod trend_seasonal;

pub use adapter::ForecastAdapter;
pub use config::{ForecastConfig, Frequency, Growth, SeasonalityMode};
pub use forecaster::{BoxedForecaster, Estimate, Forecaster, ModelSpec};
pub use trend_seasonal::TrendSeasonal;
