//! Bridges a synthesized series to a forecasting model and back to a
//! prediction table.

use crate::{config::ForecastConfig, forecaster::ModelSpec};
use chrono::NaiveDateTime;
use gst_core::{
    date_range::DateRange,
    error::{GeoError, Result},
    series::{PredictionRow, SynthesizedSeries},
};

/// Runs one fit/predict cycle per call against a fresh model instance.
#[derive(Debug)]
pub struct ForecastAdapter<'m> {
    model: &'m ModelSpec,
}

impl<'m> ForecastAdapter<'m> {
    pub fn new(model: &'m ModelSpec) -> Self {
        ForecastAdapter { model }
    }

    /// Fit the model on `series` and predict over the history plus `periods`
    /// future timestamps spaced by `config.freq`.
    ///
    /// Rows come back in ascending timestamp order. A model that rejects the
    /// series fails the call with [`GeoError::ForecastFit`]; nothing is retried.
    pub fn forecast(
        &self,
        series: &SynthesizedSeries,
        periods: usize,
        config: &ForecastConfig,
    ) -> Result<Vec<PredictionRow>> {
        let last = series
            .last_timestamp()
            .ok_or_else(|| GeoError::EmptyInput("synthesized series is empty".to_string()))?;

        // settings are checked by the model factory
        let mut model = self.model.create(config)?;
        log::info!(
            "fitting {} on {} points, horizon {}",
            model.name(),
            series.len(),
            periods
        );
        model.fit(series).map_err(|e| match e {
            GeoError::ForecastFit(_) => e,
            other => GeoError::ForecastFit(format!("{}: {}", model.name(), other)),
        })?;

        let mut timestamps: Vec<NaiveDateTime> = series.timestamps();
        timestamps.extend(DateRange::following(last, config.freq.step(), periods));

        let estimates = model.predict(&timestamps)?;
        if estimates.len() != timestamps.len() {
            return Err(GeoError::ForecastFit(format!(
                "{} returned {} predictions for {} timestamps",
                model.name(),
                estimates.len(),
                timestamps.len()
            )));
        }

        let history = series.points();
        Ok(timestamps
            .into_iter()
            .zip(estimates)
            .enumerate()
            .map(|(i, (timestamp, estimate))| PredictionRow {
                timestamp,
                observed: history.get(i).map(|p| p.value),
                point_estimate: estimate.point,
                lower_bound: estimate.lower,
                upper_bound: estimate.upper,
            })
            .collect())
    }
}
