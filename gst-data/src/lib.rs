//! Spatial aggregation of geotagged observations.
//!
//! This crate turns a set of independently located time series into the
//! single series a forecaster consumes:
//!
//! - [`kernel`] maps a distance in kilometers to a non-negative weight.
//! - [`weighting`] applies a kernel to the haversine distance between the
//!   query point and every distinct observation location.
//! - [`smoother`] folds the weighted values sharing a timestamp into one value.
//! - [`aggregator`] drives the three and emits a [`SynthesizedSeries`].
//!
//! [`SynthesizedSeries`]: gst_core::series::SynthesizedSeries

pub mod aggregator;
pub mod kernel;
pub mod smoother;
pub mod weighting;

pub use aggregator::SeriesAggregator;
pub use kernel::{
    ExponentialKernel, GaussianKernel, InverseDistanceKernel, Kernel, KernelKind, TopHatKernel,
};
pub use smoother::{Smoother, SmootherKind, WeightedMean, WeightedMedian};
pub use weighting::{LocationWeights, WeightedObservation, WeightingEngine};
