//! Series produced by spatial aggregation and the prediction table
//! produced by forecasting.
//!
//! All structs derive `Serialize` so they can be written straight to CSV.

use crate::error::{GeoError, Result};
use chrono::NaiveDateTime;
use gst_utils::dates::format_timestamp;
use serde::{Serialize, Serializer};

/// Writes timestamps in the same layout the CSV reader accepts.
fn serialize_timestamp<S: Serializer>(
    timestamp: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(timestamp))
}

/// A single (timestamp, value) pair of a synthesized series.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct SeriesPoint {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A univariate series with strictly ascending, unique timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesizedSeries {
    points: Vec<SeriesPoint>,
}

impl SynthesizedSeries {
    /// Build a series, rejecting unordered or duplicated timestamps and
    /// non-finite values.
    pub fn new(points: Vec<SeriesPoint>) -> Result<Self> {
        if let Some(pair) = points.windows(2).find(|w| w[0].timestamp >= w[1].timestamp) {
            return Err(GeoError::Validation(format!(
                "series timestamps must be strictly ascending: {} then {}",
                pair[0].timestamp, pair[1].timestamp
            )));
        }
        if let Some(p) = points.iter().find(|p| !p.value.is_finite()) {
            return Err(GeoError::Validation(format!(
                "series value at {} is not finite",
                p.timestamp
            )));
        }
        Ok(SynthesizedSeries { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.points.last().map(|p| p.timestamp)
    }
}

/// One row of the forecast table.
///
/// Historical rows carry the synthesized value the model was fitted on in
/// `observed`; rows past the end of history leave it empty.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PredictionRow {
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub observed: Option<f64>,
    pub point_estimate: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}
