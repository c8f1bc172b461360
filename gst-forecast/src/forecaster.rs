//! Forecaster trait defining the contract every forecasting model meets.

use crate::{config::ForecastConfig, trend_seasonal::TrendSeasonal};
use chrono::NaiveDateTime;
use gst_core::{error::Result, series::SynthesizedSeries};
use std::fmt;

/// A point prediction with its interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub point: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Common interface for univariate forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Fit the model to the series. Rejections are reported as
    /// [`GeoError::ForecastFit`](gst_core::error::GeoError::ForecastFit).
    fn fit(&mut self, history: &SynthesizedSeries) -> Result<()>;

    /// Predict at each timestamp, in order. Timestamps may fall inside or
    /// after the fitted history.
    fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<Estimate>>;

    /// Get the model name.
    fn name(&self) -> &str;
}

/// Type alias for boxed forecaster trait objects.
pub type BoxedForecaster = Box<dyn Forecaster>;

type Factory = dyn Fn(&ForecastConfig) -> Result<BoxedForecaster> + Send + Sync;

/// Model specification: a name plus a factory producing a fresh, unfitted
/// model from the forecast settings.
///
/// # Example
///
/// ```
/// use gst_forecast::{ForecastConfig, ModelSpec};
///
/// let spec = ModelSpec::default();
/// let model = spec.create(&ForecastConfig::default()).unwrap();
/// assert_eq!(model.name(), spec.name);
/// ```
pub struct ModelSpec {
    /// Display name of the model
    pub name: &'static str,
    factory: Box<Factory>,
}

impl ModelSpec {
    /// Create a model spec from a factory.
    pub fn new<F>(name: &'static str, factory: F) -> Self
    where
        F: Fn(&ForecastConfig) -> Result<BoxedForecaster> + Send + Sync + 'static,
    {
        Self {
            name,
            factory: Box::new(factory),
        }
    }

    /// The built-in trend + seasonality model.
    pub fn trend_seasonal() -> Self {
        Self::new(TrendSeasonal::NAME, |config| {
            Ok(Box::new(TrendSeasonal::new(config.clone())?) as BoxedForecaster)
        })
    }

    /// Create a new model instance.
    pub fn create(&self, config: &ForecastConfig) -> Result<BoxedForecaster> {
        (self.factory)(config)
    }
}

impl Default for ModelSpec {
    fn default() -> Self {
        Self::trend_seasonal()
    }
}

impl fmt::Debug for ModelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSpec").field("name", &self.name).finish()
    }
}
