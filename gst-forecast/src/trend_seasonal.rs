//! Trend + seasonality regression forecaster.
//!
//! The series is modelled as
//!
//! ```text
//! additive:        y(t) = g(t) + s(t)
//! multiplicative:  y(t) = g(t) · (1 + s(t))
//! ```
//!
//! where `g` is a piecewise-linear trend whose slope may change at evenly
//! spaced candidate changepoints inside the first `changepoint_range` of the
//! history, and `s` is a sum of Fourier series for the enabled yearly, weekly
//! and daily cycles. Changepoint slopes and seasonal coefficients are
//! shrunk towards zero with ridge penalties derived from
//! `changepoint_prior_scale` and `seasonality_prior_scale`.
//!
//! Intervals use the in-sample residual spread, widened with the distance
//! past the end of the history.

use crate::{
    config::{ForecastConfig, Growth, SeasonalityMode},
    forecaster::{Estimate, Forecaster},
    linalg::ridge_fit,
};
use chrono::NaiveDateTime;
use gst_core::{
    error::{GeoError, Result},
    series::SynthesizedSeries,
};
use gst_utils::dates::days_since_epoch;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Minimum number of points the model accepts.
pub const MIN_HISTORY: usize = 2;

/// Assumed noise standard deviation on the max-abs scaled series; turns the
/// prior scales into ridge penalties.
const NOISE_SCALE: f64 = 0.1;

/// Penalty on intercept and base slope, only there to keep the system
/// positive definite.
const UNPENALIZED: f64 = 1e-8;

/// (period in days, Fourier order)
const YEARLY: (f64, usize) = (365.25, 10);
const WEEKLY: (f64, usize) = (7.0, 3);
const DAILY: (f64, usize) = (1.0, 4);

#[derive(Debug, Clone)]
struct FittedState {
    /// Epoch-day of the first observation.
    start: f64,
    /// History length in days.
    span: f64,
    y_scale: f64,
    /// Changepoint locations on the scaled [0, 1] time axis.
    changepoints: Vec<f64>,
    trend_coef: Vec<f64>,
    seasonal_coef: Vec<f64>,
    /// Residual standard deviation on the original scale.
    sigma: f64,
    /// Two-sided normal quantile for the interval width.
    z: f64,
}

/// Piecewise-linear trend plus Fourier seasonality.
#[derive(Debug, Clone)]
pub struct TrendSeasonal {
    config: ForecastConfig,
    seasonalities: Vec<(f64, usize)>,
    state: Option<FittedState>,
}

impl TrendSeasonal {
    pub const NAME: &'static str = "trend-seasonal";

    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        let seasonalities = [
            (config.yearly_seasonality, YEARLY),
            (config.weekly_seasonality, WEEKLY),
            (config.daily_seasonality, DAILY),
        ]
        .into_iter()
        .filter_map(|(enabled, s)| enabled.then_some(s))
        .collect();
        Ok(Self {
            config,
            seasonalities,
            state: None,
        })
    }

    fn trend_features(&self, t: f64, changepoints: &[f64]) -> Vec<f64> {
        match self.config.growth {
            Growth::Flat => vec![1.0],
            Growth::Linear => {
                let mut row = Vec::with_capacity(2 + changepoints.len());
                row.push(1.0);
                row.push(t);
                row.extend(changepoints.iter().map(|&c| (t - c).max(0.0)));
                row
            }
        }
    }

    fn seasonal_features(&self, days: f64) -> Vec<f64> {
        let mut row = Vec::new();
        for &(period, order) in &self.seasonalities {
            for k in 1..=order {
                let x = 2.0 * PI * k as f64 * days / period;
                row.push(x.sin());
                row.push(x.cos());
            }
        }
        row
    }

    fn trend_penalties(&self, changepoints: usize) -> Vec<f64> {
        let delta = NOISE_SCALE * NOISE_SCALE
            / (self.config.changepoint_prior_scale * self.config.changepoint_prior_scale);
        match self.config.growth {
            Growth::Flat => vec![UNPENALIZED],
            Growth::Linear => {
                let mut penalties = vec![UNPENALIZED, UNPENALIZED];
                penalties.extend(std::iter::repeat(delta).take(changepoints));
                penalties
            }
        }
    }

    fn seasonal_penalty(&self) -> f64 {
        NOISE_SCALE * NOISE_SCALE
            / (self.config.seasonality_prior_scale * self.config.seasonality_prior_scale)
    }

    /// Evenly spaced changepoints over the first `changepoint_range` of the
    /// history, snapped to observed times.
    fn place_changepoints(&self, t: &[f64]) -> Vec<f64> {
        if self.config.growth == Growth::Flat {
            return Vec::new();
        }
        let hist = (t.len() as f64 * self.config.changepoint_range).floor() as usize;
        let count = self.config.n_changepoints.min(hist.saturating_sub(1));
        if count == 0 {
            return Vec::new();
        }
        (1..=count)
            .map(|j| {
                let index = (j as f64 * (hist - 1) as f64 / count as f64).round() as usize;
                t[index]
            })
            .collect()
    }

    /// Scaled model output (before multiplying by `y_scale`).
    fn evaluate(&self, state: &FittedState, days: f64) -> f64 {
        let t = (days - state.start) / state.span;
        let trend = dot(&self.trend_features(t, &state.changepoints), &state.trend_coef);
        let seasonal = dot(&self.seasonal_features(days), &state.seasonal_coef);
        match self.config.seasonality_mode {
            SeasonalityMode::Additive => trend + seasonal,
            SeasonalityMode::Multiplicative => trend * (1.0 + seasonal),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn singular() -> GeoError {
    GeoError::ForecastFit("regression system is not positive definite".to_string())
}

impl Forecaster for TrendSeasonal {
    fn fit(&mut self, history: &SynthesizedSeries) -> Result<()> {
        let n = history.len();
        if n < MIN_HISTORY {
            return Err(GeoError::ForecastFit(format!(
                "need at least {} observations, got {}",
                MIN_HISTORY, n
            )));
        }

        let days: Vec<f64> = history
            .points()
            .iter()
            .map(|p| days_since_epoch(&p.timestamp))
            .collect();
        let start = days[0];
        let span = days[n - 1] - start;
        if span <= 0.0 {
            return Err(GeoError::ForecastFit("history spans no time".to_string()));
        }
        let t: Vec<f64> = days.iter().map(|d| (d - start) / span).collect();

        let values = history.values();
        let y_scale = values.iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let y_scale = if y_scale > 0.0 { y_scale } else { 1.0 };
        let y: Vec<f64> = values.iter().map(|v| v / y_scale).collect();

        let changepoints = self.place_changepoints(&t);
        let trend_rows: Vec<Vec<f64>> = t
            .iter()
            .map(|&ti| self.trend_features(ti, &changepoints))
            .collect();
        let seasonal_rows: Vec<Vec<f64>> =
            days.iter().map(|&d| self.seasonal_features(d)).collect();
        let trend_penalties = self.trend_penalties(changepoints.len());
        let n_seasonal = seasonal_rows.first().map_or(0, |r| r.len());
        let seasonal_penalties = vec![self.seasonal_penalty(); n_seasonal];

        let (trend_coef, seasonal_coef) = match self.config.seasonality_mode {
            SeasonalityMode::Additive => {
                let rows: Vec<Vec<f64>> = trend_rows
                    .iter()
                    .zip(&seasonal_rows)
                    .map(|(tr, sr)| tr.iter().chain(sr).copied().collect())
                    .collect();
                let penalties: Vec<f64> = trend_penalties
                    .iter()
                    .chain(&seasonal_penalties)
                    .copied()
                    .collect();
                let beta = ridge_fit(&rows, &y, &penalties).ok_or_else(singular)?;
                let (trend, seasonal) = beta.split_at(trend_penalties.len());
                (trend.to_vec(), seasonal.to_vec())
            }
            SeasonalityMode::Multiplicative => {
                let trend =
                    ridge_fit(&trend_rows, &y, &trend_penalties).ok_or_else(singular)?;
                let fitted_trend: Vec<f64> = trend_rows.iter().map(|r| dot(r, &trend)).collect();
                if fitted_trend.iter().any(|g| g.abs() < 1e-9) {
                    return Err(GeoError::ForecastFit(
                        "multiplicative seasonality needs a trend away from zero".to_string(),
                    ));
                }
                let seasonal = if n_seasonal == 0 {
                    Vec::new()
                } else {
                    let ratio: Vec<f64> = y
                        .iter()
                        .zip(&fitted_trend)
                        .map(|(yi, gi)| yi / gi - 1.0)
                        .collect();
                    ridge_fit(&seasonal_rows, &ratio, &seasonal_penalties).ok_or_else(singular)?
                };
                (trend, seasonal)
            }
        };

        let normal = Normal::new(0.0, 1.0).map_err(|e| GeoError::ForecastFit(e.to_string()))?;
        let mut state = FittedState {
            start,
            span,
            y_scale,
            changepoints,
            trend_coef,
            seasonal_coef,
            sigma: 0.0,
            z: normal.inverse_cdf((1.0 + self.config.interval_width) / 2.0),
        };

        let sum_sq: f64 = days
            .iter()
            .zip(&values)
            .map(|(&d, &v)| {
                let residual = v - y_scale * self.evaluate(&state, d);
                residual * residual
            })
            .sum();
        state.sigma = (sum_sq / n as f64).sqrt();
        if !state.sigma.is_finite() {
            return Err(GeoError::ForecastFit("fit produced non-finite residuals".to_string()));
        }

        log::debug!(
            "{} fitted on {} points: {} changepoints, {} seasonal terms, sigma {:.4}",
            Self::NAME,
            n,
            state.changepoints.len(),
            state.seasonal_coef.len(),
            state.sigma
        );
        self.state = Some(state);
        Ok(())
    }

    fn predict(&self, timestamps: &[NaiveDateTime]) -> Result<Vec<Estimate>> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| {
                GeoError::ForecastFit("model must be fitted before prediction".to_string())
            })?;

        Ok(timestamps
            .iter()
            .map(|ts| {
                let days = days_since_epoch(ts);
                let point = state.y_scale * self.evaluate(state, days);
                let t = (days - state.start) / state.span;
                let spread = state.z * state.sigma * (1.0 + (t - 1.0).max(0.0)).sqrt();
                Estimate {
                    point,
                    lower: point - spread,
                    upper: point + spread,
                }
            })
            .collect())
    }

    fn name(&self) -> &str {
        Self::NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};
    use gst_core::series::SeriesPoint;

    fn day(i: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + TimeDelta::days(i)
    }

    fn series_from(f: impl Fn(f64) -> f64, n: i64) -> SynthesizedSeries {
        let points = (0..n)
            .map(|i| SeriesPoint {
                timestamp: day(i),
                value: f(i as f64),
            })
            .collect();
        SynthesizedSeries::new(points).unwrap()
    }

    #[test]
    fn test_linear_trend_extrapolates() {
        let series = series_from(|i| 2.0 + 0.5 * i, 30);
        let mut model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        model.fit(&series).unwrap();

        let future: Vec<NaiveDateTime> = (30..33).map(day).collect();
        let predictions = model.predict(&future).unwrap();
        for (i, estimate) in (30..33).zip(&predictions) {
            let expected = 2.0 + 0.5 * i as f64;
            assert!(
                (estimate.point - expected).abs() < 1e-3,
                "day {}: {} vs {}",
                i,
                estimate.point,
                expected
            );
        }
    }

    #[test]
    fn test_weekly_seasonality_recovered() {
        let weekly = |i: f64| 10.0 + 3.0 * (2.0 * PI * i / 7.0).sin();
        let series = series_from(weekly, 56);
        let config = ForecastConfig {
            growth: Growth::Flat,
            weekly_seasonality: true,
            ..ForecastConfig::default()
        };
        let mut model = TrendSeasonal::new(config).unwrap();
        model.fit(&series).unwrap();

        let future: Vec<NaiveDateTime> = (56..63).map(day).collect();
        let predictions = model.predict(&future).unwrap();
        for (i, estimate) in (56..63).zip(&predictions) {
            assert!((estimate.point - weekly(i as f64)).abs() < 0.05);
        }
    }

    #[test]
    fn test_multiplicative_seasonality() {
        let series_fn = |i: f64| (10.0 + 0.1 * i) * (1.0 + 0.2 * (2.0 * PI * i / 7.0).sin());
        let series = series_from(series_fn, 70);
        let config = ForecastConfig {
            seasonality_mode: SeasonalityMode::Multiplicative,
            weekly_seasonality: true,
            n_changepoints: 0,
            ..ForecastConfig::default()
        };
        let mut model = TrendSeasonal::new(config).unwrap();
        model.fit(&series).unwrap();

        let future: Vec<NaiveDateTime> = (70..77).map(day).collect();
        let predictions = model.predict(&future).unwrap();
        for (i, estimate) in (70..77).zip(&predictions) {
            let expected = series_fn(i as f64);
            assert!((estimate.point - expected).abs() / expected < 0.05);
        }
    }

    #[test]
    fn test_intervals_contain_point_and_widen() {
        let noisy = |i: f64| 5.0 + 0.2 * i + if (i as i64) % 2 == 0 { 0.5 } else { -0.5 };
        let series = series_from(noisy, 40);
        let mut model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        model.fit(&series).unwrap();

        let timestamps = vec![day(10), day(45), day(80)];
        let predictions = model.predict(&timestamps).unwrap();
        for estimate in &predictions {
            assert!(estimate.lower < estimate.point && estimate.point < estimate.upper);
        }
        let width = |e: &Estimate| e.upper - e.lower;
        assert!(width(&predictions[1]) > width(&predictions[0]));
        assert!(width(&predictions[2]) > width(&predictions[1]));
    }

    #[test]
    fn test_narrower_interval_width() {
        let noisy = |i: f64| 5.0 + if (i as i64) % 3 == 0 { 1.0 } else { -0.5 };
        let series = series_from(noisy, 30);
        let fit_with = |width: f64| {
            let config = ForecastConfig {
                interval_width: width,
                ..ForecastConfig::default()
            };
            let mut model = TrendSeasonal::new(config).unwrap();
            model.fit(&series).unwrap();
            let e = model.predict(&[day(5)]).unwrap()[0];
            e.upper - e.lower
        };
        assert!(fit_with(0.5) < fit_with(0.95));
    }

    #[test]
    fn test_too_short_history() {
        let series = series_from(|_| 1.0, 1);
        let mut model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        assert!(matches!(model.fit(&series), Err(GeoError::ForecastFit(_))));
    }

    #[test]
    fn test_predict_before_fit() {
        let model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        assert!(matches!(model.predict(&[day(0)]), Err(GeoError::ForecastFit(_))));
    }

    #[test]
    fn test_all_zero_series() {
        let series = series_from(|_| 0.0, 10);
        let mut model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        model.fit(&series).unwrap();
        let estimate = model.predict(&[day(12)]).unwrap()[0];
        assert!(estimate.point.abs() < 1e-9);
    }

    #[test]
    fn test_changepoints_placed_inside_range() {
        let model = TrendSeasonal::new(ForecastConfig::default()).unwrap();
        let t: Vec<f64> = (0..100).map(|i| i as f64 / 99.0).collect();
        let changepoints = model.place_changepoints(&t);
        assert_eq!(changepoints.len(), 25);
        assert!(changepoints.iter().all(|&c| c > 0.0 && c <= 0.8));
        assert!(changepoints.windows(2).all(|w| w[0] < w[1]));

        let few = model.place_changepoints(&t[..3]);
        assert_eq!(few.len(), 1);
    }
}
