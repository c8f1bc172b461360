//! Geostradamus: forecasting a time series at an arbitrary location.
//!
//! A forecast is built from three pluggable parts:
//!
//! - a [`Kernel`], turning the distance between the query point and each
//!   observation location into a weight;
//! - a [`Smoother`], folding the weighted values that share a timestamp into
//!   one value, which yields a single synthesized series at the query point;
//! - a forecasting model ([`ModelSpec`]), fitted on that series.
//!
//! # Usage
//!
//! ```rust
//! use geostradamus::{ForecastConfig, GaussianKernel, Geostradamus, ObservationSet};
//!
//! let data = ObservationSet::from_csv_str(
//!     "date,y,lat,lng\n\
//!      2023-01-01,10.0,42.0,-72.0\n\
//!      2023-01-01,20.0,42.5,-72.5\n\
//!      2023-01-02,11.0,42.0,-72.0\n\
//!      2023-01-02,21.0,42.5,-72.5\n\
//!      2023-01-03,12.0,42.0,-72.0\n",
//! )
//! .unwrap();
//!
//! let geo = Geostradamus::new(data).with_kernel(GaussianKernel::new(50.0).unwrap());
//! let predictions = geo.fit(42.0, -72.0, 7, &ForecastConfig::default()).unwrap();
//! assert_eq!(predictions.len(), 3 + 7);
//! ```

pub use gst_core::{
    error::{GeoError, Result},
    location::{Location, QueryPoint},
    observation::{Observation, ObservationSet},
    series::{PredictionRow, SeriesPoint, SynthesizedSeries},
};
pub use gst_data::{
    ExponentialKernel, GaussianKernel, InverseDistanceKernel, Kernel, KernelKind, Smoother,
    SmootherKind, TopHatKernel, WeightedMean, WeightedMedian,
};
pub use gst_forecast::{
    BoxedForecaster, Estimate, ForecastConfig, Forecaster, Frequency, Growth, ModelSpec,
    SeasonalityMode, TrendSeasonal,
};

use gst_data::SeriesAggregator;
use gst_forecast::ForecastAdapter;

/// Entry point tying aggregation and forecasting together.
///
/// Holds the observations it was built with and nothing else; every call
/// recomputes weights for its own query point. All parts are `Send + Sync`,
/// so one instance can serve concurrent queries from several threads.
pub struct Geostradamus {
    data: ObservationSet,
    kernel: Box<dyn Kernel>,
    smoother: Box<dyn Smoother>,
    model: ModelSpec,
}

impl Geostradamus {
    /// Build with a Gaussian kernel of bandwidth 1 km, the weighted mean
    /// smoother and the [`TrendSeasonal`] model.
    pub fn new(data: ObservationSet) -> Self {
        Geostradamus {
            data,
            kernel: Box::new(GaussianKernel::default()),
            smoother: Box::new(WeightedMean),
            model: ModelSpec::default(),
        }
    }

    pub fn with_kernel<K: Kernel + 'static>(mut self, kernel: K) -> Self {
        self.kernel = Box::new(kernel);
        self
    }

    pub fn with_boxed_kernel(mut self, kernel: Box<dyn Kernel>) -> Self {
        self.kernel = kernel;
        self
    }

    pub fn with_smoother<S: Smoother + 'static>(mut self, smoother: S) -> Self {
        self.smoother = Box::new(smoother);
        self
    }

    pub fn with_boxed_smoother(mut self, smoother: Box<dyn Smoother>) -> Self {
        self.smoother = smoother;
        self
    }

    pub fn with_model(mut self, model: ModelSpec) -> Self {
        self.model = model;
        self
    }

    /// Synthesize the series at (`latitude`, `longitude`) without forecasting.
    pub fn synthesize(&self, latitude: f64, longitude: f64) -> Result<SynthesizedSeries> {
        let query = QueryPoint::new(latitude, longitude)?;
        SeriesAggregator::new(self.kernel.as_ref(), self.smoother.as_ref())
            .aggregate(&self.data, &query)
    }

    /// Forecast at (`latitude`, `longitude`).
    ///
    /// Returns one row per synthesized timestamp followed by `periods`
    /// future rows. Any failure aborts the call; no partial table is returned.
    pub fn fit(
        &self,
        latitude: f64,
        longitude: f64,
        periods: usize,
        model_settings: &ForecastConfig,
    ) -> Result<Vec<PredictionRow>> {
        model_settings.validate()?;
        let series = self.synthesize(latitude, longitude)?;
        log::info!(
            "forecasting {} periods at ({}, {}) with {}",
            periods,
            latitude,
            longitude,
            self.model.name
        );
        ForecastAdapter::new(&self.model).forecast(&series, periods, model_settings)
    }
}
