//! Forecast model settings.
//!
//! Settings are loaded from JSON (or built from [`Default`]) and checked
//! eagerly: an option the model does not know is an error, never ignored.

use chrono::TimeDelta;
use gst_core::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// How seasonal terms combine with the trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalityMode {
    #[default]
    Additive,
    Multiplicative,
}

/// Shape of the trend component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Growth {
    /// Piecewise-linear trend with changepoints.
    #[default]
    Linear,
    /// Constant level.
    Flat,
}

/// Spacing of future timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
}

impl Frequency {
    pub fn step(&self) -> TimeDelta {
        match self {
            Frequency::Hourly => TimeDelta::hours(1),
            Frequency::Daily => TimeDelta::days(1),
            Frequency::Weekly => TimeDelta::weeks(1),
        }
    }
}

/// Recognized forecast model options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Trend flexibility; larger values let the trend bend more at changepoints.
    pub changepoint_prior_scale: f64,
    /// Fraction of the history in which changepoints may be placed.
    pub changepoint_range: f64,
    /// Number of candidate changepoints.
    pub n_changepoints: usize,
    pub growth: Growth,
    pub seasonality_mode: SeasonalityMode,
    pub yearly_seasonality: bool,
    pub weekly_seasonality: bool,
    pub daily_seasonality: bool,
    /// Strength of the seasonal components; larger values allow larger swings.
    pub seasonality_prior_scale: f64,
    /// Coverage of the prediction interval, in (0, 1).
    pub interval_width: f64,
    pub freq: Frequency,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            changepoint_prior_scale: 0.05,
            changepoint_range: 0.8,
            n_changepoints: 25,
            growth: Growth::Linear,
            seasonality_mode: SeasonalityMode::Additive,
            yearly_seasonality: false,
            weekly_seasonality: false,
            daily_seasonality: false,
            seasonality_prior_scale: 10.0,
            interval_width: 0.95,
            freq: Frequency::Daily,
        }
    }
}

impl ForecastConfig {
    /// Parse and validate settings from a JSON object. Missing options take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ForecastConfig =
            serde_json::from_str(json).map_err(|e| GeoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate settings from an already decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: ForecastConfig =
            serde_json::from_value(value).map_err(|e| GeoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every option against its allowed range.
    pub fn validate(&self) -> Result<()> {
        if !(self.changepoint_prior_scale.is_finite() && self.changepoint_prior_scale > 0.0) {
            return Err(GeoError::Config(format!(
                "changepoint_prior_scale must be positive, got {}",
                self.changepoint_prior_scale
            )));
        }
        if !(self.changepoint_range > 0.0 && self.changepoint_range <= 1.0) {
            return Err(GeoError::Config(format!(
                "changepoint_range must be in (0, 1], got {}",
                self.changepoint_range
            )));
        }
        if !(self.seasonality_prior_scale.is_finite() && self.seasonality_prior_scale > 0.0) {
            return Err(GeoError::Config(format!(
                "seasonality_prior_scale must be positive, got {}",
                self.seasonality_prior_scale
            )));
        }
        if !(self.interval_width > 0.0 && self.interval_width < 1.0) {
            return Err(GeoError::Config(format!(
                "interval_width must be in (0, 1), got {}",
                self.interval_width
            )));
        }
        Ok(())
    }
}
