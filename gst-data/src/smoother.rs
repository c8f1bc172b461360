//! Smoothers fold the weighted values observed at one timestamp into a
//! single representative value.

use gst_core::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Aggregates `(value, weight)` pairs sharing a timestamp.
///
/// Implementations return [`GeoError::DegenerateWeight`] when the weights sum
/// to zero; the caller decides what to do with that timestamp.
pub trait Smoother: Send + Sync {
    fn aggregate(&self, values_with_weights: &[(f64, f64)]) -> Result<f64>;
}

impl<F> Smoother for F
where
    F: Fn(&[(f64, f64)]) -> Result<f64> + Send + Sync,
{
    fn aggregate(&self, values_with_weights: &[(f64, f64)]) -> Result<f64> {
        self(values_with_weights)
    }
}

/// `Σ(vᵢ·wᵢ) / Σwᵢ`
///
/// Weights are divided by the largest one before summing; subnormal weights
/// would otherwise flush the products to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedMean;

impl Smoother for WeightedMean {
    fn aggregate(&self, values_with_weights: &[(f64, f64)]) -> Result<f64> {
        if let Some(&(_, w)) = values_with_weights.iter().find(|&&(_, w)| !w.is_finite()) {
            return Err(GeoError::Validation(format!(
                "weighted mean needs finite weights, got {}",
                w
            )));
        }
        let max_weight = values_with_weights
            .iter()
            .map(|&(_, w)| w)
            .fold(0.0, f64::max);
        if max_weight == 0.0 {
            return Err(GeoError::DegenerateWeight);
        }
        let (weighted_sum, weight_sum) = values_with_weights
            .iter()
            .fold((0.0, 0.0), |(vs, ws), &(v, w)| {
                let scaled = w / max_weight;
                (vs + v * scaled, ws + scaled)
            });
        Ok(weighted_sum / weight_sum)
    }
}

/// Lower weighted median: the smallest value whose cumulative weight reaches
/// half of the total. Zero-weight entries never contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeightedMedian;

impl Smoother for WeightedMedian {
    fn aggregate(&self, values_with_weights: &[(f64, f64)]) -> Result<f64> {
        let mut entries: Vec<(f64, f64)> = values_with_weights
            .iter()
            .copied()
            .filter(|&(_, w)| w > 0.0)
            .collect();
        if entries.is_empty() {
            return Err(GeoError::DegenerateWeight);
        }
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));

        let half = entries.iter().map(|&(_, w)| w).sum::<f64>() / 2.0;
        let mut cumulative = 0.0;
        for &(value, weight) in &entries {
            cumulative += weight;
            if cumulative >= half {
                return Ok(value);
            }
        }
        // only reachable through rounding in the running sum
        Ok(entries[entries.len() - 1].0)
    }
}

/// Named smoothing strategy, for selecting a smoother from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SmootherKind {
    #[default]
    WeightedMean,
    WeightedMedian,
}

impl SmootherKind {
    pub fn build(self) -> Box<dyn Smoother> {
        match self {
            SmootherKind::WeightedMean => Box::new(WeightedMean),
            SmootherKind::WeightedMedian => Box::new(WeightedMedian),
        }
    }
}
