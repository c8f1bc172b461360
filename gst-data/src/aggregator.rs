//! Synthesizes one series at a query point from many located series.

use crate::{kernel::Kernel, smoother::Smoother, weighting::WeightingEngine};
use chrono::NaiveDateTime;
use gst_core::{
    error::{GeoError, Result},
    location::QueryPoint,
    observation::ObservationSet,
    series::{SeriesPoint, SynthesizedSeries},
};
use std::collections::BTreeMap;

/// Groups weighted observations by exact timestamp and smooths each group.
pub struct SeriesAggregator<'a> {
    kernel: &'a dyn Kernel,
    smoother: &'a dyn Smoother,
}

impl<'a> SeriesAggregator<'a> {
    pub fn new(kernel: &'a dyn Kernel, smoother: &'a dyn Smoother) -> Self {
        SeriesAggregator { kernel, smoother }
    }

    /// Build the synthesized series for `query`.
    ///
    /// The output has one point per distinct input timestamp, ascending.
    /// Timestamps whose weights all vanish are dropped and logged; if that
    /// leaves nothing, or `observations` is empty, this fails with
    /// [`GeoError::EmptyInput`].
    pub fn aggregate(
        &self,
        observations: &ObservationSet,
        query: &QueryPoint,
    ) -> Result<SynthesizedSeries> {
        if observations.is_empty() {
            return Err(GeoError::EmptyInput("no observations supplied".to_string()));
        }

        let weighted = WeightingEngine::new(self.kernel).weigh(query, observations)?;

        let mut groups: BTreeMap<NaiveDateTime, Vec<(f64, f64)>> = BTreeMap::new();
        for obs in weighted {
            groups
                .entry(obs.timestamp)
                .or_default()
                .push((obs.value, obs.weight));
        }

        let total = groups.len();
        let mut points = Vec::with_capacity(total);
        let mut dropped = 0usize;
        for (timestamp, values_with_weights) in groups {
            match self.smoother.aggregate(&values_with_weights) {
                Ok(value) => points.push(SeriesPoint { timestamp, value }),
                Err(GeoError::DegenerateWeight) => {
                    log::warn!(
                        "dropping {}: all {} weights are zero",
                        timestamp,
                        values_with_weights.len()
                    );
                    dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if points.is_empty() {
            return Err(GeoError::EmptyInput(format!(
                "all {} timestamps had zero total weight",
                total
            )));
        }
        log::info!(
            "synthesized {} points at ({}, {}), dropped {} of {} timestamps",
            points.len(),
            query.latitude,
            query.longitude,
            dropped,
            total
        );
        SynthesizedSeries::new(points)
    }
}
