//! Quantity types and their temporal aggregation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a quantity averages or sums over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityType {
    /// State quantities (temperature, wind); aggregated by mean.
    #[default]
    Intensive,
    /// Accumulated quantities (precipitation); aggregated by sum.
    Extensive,
}

/// Temporal reduction applied within one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// NaN-skipping mean; an empty bucket is NaN.
    Mean,
    /// Sum of the valid samples scaled by `samples / valid`; a bucket
    /// without valid samples is NaN.
    Sum,
}

impl QuantityType {
    /// The aggregation for this quantity type.
    pub fn aggregation(self) -> Aggregation {
        match self {
            QuantityType::Intensive => Aggregation::Mean,
            QuantityType::Extensive => Aggregation::Sum,
        }
    }

    /// Tag stored in the `qtype` attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            QuantityType::Intensive => "intensive",
            QuantityType::Extensive => "extensive",
        }
    }
}

impl fmt::Display for QuantityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Aggregation {
    /// Applies the reduction to one bucket of samples.
    pub fn apply(self, samples: &[f64]) -> f64 {
        match self {
            Aggregation::Mean => fmprep_stats::nan_mean(samples),
            Aggregation::Sum => {
                let valid = samples.iter().filter(|v| !v.is_nan()).count();
                if valid == 0 {
                    return f64::NAN;
                }
                fmprep_stats::nan_sum(samples) * samples.len() as f64 / valid as f64
            }
        }
    }
}
