//! Per-location weights relative to a query point.

use crate::kernel::Kernel;
use chrono::NaiveDateTime;
use gst_core::{
    error::{GeoError, Result},
    location::{Location, QueryPoint},
    observation::ObservationSet,
};
use std::collections::HashMap;

/// Weight of every distinct observation location.
pub type LocationWeights = HashMap<Location, f64>;

/// An observation paired with the weight of its location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedObservation {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub weight: f64,
}

/// Applies a [`Kernel`] to haversine distances from a query point.
pub struct WeightingEngine<'k> {
    kernel: &'k dyn Kernel,
}

impl<'k> WeightingEngine<'k> {
    pub fn new(kernel: &'k dyn Kernel) -> Self {
        WeightingEngine { kernel }
    }

    /// Kernel weight of `location` seen from `query`.
    ///
    /// Rejects kernels that return a negative, infinite or NaN weight.
    pub fn weight_for(&self, query: &QueryPoint, location: &Location) -> Result<f64> {
        let distance = query.distance_km(location);
        let weight = self.kernel.weight(distance);
        if !weight.is_finite() || weight < 0.0 {
            return Err(GeoError::Validation(format!(
                "kernel returned invalid weight {} at distance {:.3} km",
                weight, distance
            )));
        }
        Ok(weight)
    }

    /// One weight per distinct location, matched by exact coordinate equality.
    pub fn location_weights(
        &self,
        query: &QueryPoint,
        observations: &ObservationSet,
    ) -> Result<LocationWeights> {
        let mut weights = LocationWeights::new();
        for location in observations.locations() {
            let weight = self.weight_for(query, &location)?;
            weights.insert(location, weight);
        }
        log::debug!(
            "computed {} location weights for ({}, {})",
            weights.len(),
            query.latitude,
            query.longitude
        );
        Ok(weights)
    }

    /// Attach its location weight to every observation.
    pub fn weigh(
        &self,
        query: &QueryPoint,
        observations: &ObservationSet,
    ) -> Result<Vec<WeightedObservation>> {
        let weights = self.location_weights(query, observations)?;
        Ok(observations
            .iter()
            .map(|obs| WeightedObservation {
                timestamp: obs.timestamp(),
                value: obs.value(),
                weight: weights[&obs.location()],
            })
            .collect())
    }
}
