//! Distance kernels.
//!
//! A kernel converts a great-circle distance (kilometers) into a weight.
//! Every kernel here satisfies the same contract:
//!
//! * `weight(0) == 1`
//! * the weight never increases with distance
//! * the weight is never negative
//!
//! A bandwidth of zero is allowed and degenerates to an indicator of the
//! exact query location: distance 0 maps to 1, anything farther maps to 0.

use gst_core::error::{GeoError, Result};
use serde::{Deserialize, Serialize};

/// Maps a distance in kilometers to a non-negative weight.
pub trait Kernel: Send + Sync {
    fn weight(&self, distance_km: f64) -> f64;
}

impl<F> Kernel for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn weight(&self, distance_km: f64) -> f64 {
        self(distance_km)
    }
}

fn check_bandwidth(bandwidth: f64) -> Result<f64> {
    if bandwidth.is_finite() && bandwidth >= 0.0 {
        Ok(bandwidth)
    } else {
        Err(GeoError::Config(format!(
            "kernel bandwidth must be finite and non-negative, got {}",
            bandwidth
        )))
    }
}

/// Weight for the zero-bandwidth case.
#[inline]
fn indicator(distance_km: f64) -> f64 {
    if distance_km == 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Gaussian kernel: `exp(-d² / (2·bandwidth²))`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianKernel {
    bandwidth: f64,
}

impl GaussianKernel {
    pub fn new(bandwidth: f64) -> Result<Self> {
        Ok(GaussianKernel {
            bandwidth: check_bandwidth(bandwidth)?,
        })
    }
}

impl Default for GaussianKernel {
    fn default() -> Self {
        GaussianKernel { bandwidth: 1.0 }
    }
}

impl Kernel for GaussianKernel {
    fn weight(&self, distance_km: f64) -> f64 {
        if self.bandwidth == 0.0 {
            return indicator(distance_km);
        }
        let z = distance_km * distance_km / (2.0 * self.bandwidth * self.bandwidth);
        (-z).exp()
    }
}

/// Exponential kernel: `exp(-d / bandwidth)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialKernel {
    bandwidth: f64,
}

impl ExponentialKernel {
    pub fn new(bandwidth: f64) -> Result<Self> {
        Ok(ExponentialKernel {
            bandwidth: check_bandwidth(bandwidth)?,
        })
    }
}

impl Default for ExponentialKernel {
    fn default() -> Self {
        ExponentialKernel { bandwidth: 1.0 }
    }
}

impl Kernel for ExponentialKernel {
    fn weight(&self, distance_km: f64) -> f64 {
        if self.bandwidth == 0.0 {
            return indicator(distance_km);
        }
        (-distance_km.abs() / self.bandwidth).exp()
    }
}

/// Inverse-distance kernel: `1 / (1 + (d / bandwidth)^power)`.
///
/// The `1 +` keeps the weight finite at the query location itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseDistanceKernel {
    bandwidth: f64,
    power: f64,
}

impl InverseDistanceKernel {
    pub fn new(bandwidth: f64, power: f64) -> Result<Self> {
        if !(power.is_finite() && power > 0.0) {
            return Err(GeoError::Config(format!(
                "inverse-distance power must be positive, got {}",
                power
            )));
        }
        Ok(InverseDistanceKernel {
            bandwidth: check_bandwidth(bandwidth)?,
            power,
        })
    }
}

impl Kernel for InverseDistanceKernel {
    fn weight(&self, distance_km: f64) -> f64 {
        if self.bandwidth == 0.0 {
            return indicator(distance_km);
        }
        1.0 / (1.0 + (distance_km.abs() / self.bandwidth).powf(self.power))
    }
}

/// Top-hat kernel: weight 1 within `radius` kilometers, 0 beyond.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopHatKernel {
    radius: f64,
}

impl TopHatKernel {
    pub fn new(radius: f64) -> Result<Self> {
        Ok(TopHatKernel {
            radius: check_bandwidth(radius)?,
        })
    }
}

impl Kernel for TopHatKernel {
    fn weight(&self, distance_km: f64) -> f64 {
        if distance_km.abs() <= self.radius {
            1.0
        } else {
            0.0
        }
    }
}

/// Named kernel family, for selecting a kernel from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelKind {
    #[default]
    Gaussian,
    Exponential,
    /// Inverse distance with power 2.
    InverseDistance,
    TopHat,
}

impl KernelKind {
    /// Build a kernel of this family; `bandwidth` is the top-hat radius for
    /// [`KernelKind::TopHat`].
    pub fn build(self, bandwidth: f64) -> Result<Box<dyn Kernel>> {
        Ok(match self {
            KernelKind::Gaussian => Box::new(GaussianKernel::new(bandwidth)?),
            KernelKind::Exponential => Box::new(ExponentialKernel::new(bandwidth)?),
            KernelKind::InverseDistance => Box::new(InverseDistanceKernel::new(bandwidth, 2.0)?),
            KernelKind::TopHat => Box::new(TopHatKernel::new(bandwidth)?),
        })
    }
}
