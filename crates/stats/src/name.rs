//! Statistic names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// A normalization statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatName {
    /// Mean over time and space.
    Mean,
    /// Population standard deviation over time and space.
    Std,
    /// Mean of the first time difference.
    MeanDiff,
    /// Standard deviation of the first time difference.
    StdDiff,
}

impl StatName {
    /// Every statistic, in accumulation order.
    pub const ALL: [StatName; 4] = [
        StatName::Mean,
        StatName::Std,
        StatName::MeanDiff,
        StatName::StdDiff,
    ];

    /// Statistics written to disk after a run.
    pub const PERSISTED: [StatName; 3] = [StatName::Mean, StatName::Std, StatName::StdDiff];

    /// File and key name.
    pub fn as_str(self) -> &'static str {
        match self {
            StatName::Mean => "mean",
            StatName::Std => "std",
            StatName::MeanDiff => "mean_diff",
            StatName::StdDiff => "std_diff",
        }
    }

    /// Returns `true` for standard-deviation statistics, which pool in the
    /// squared domain.
    pub fn is_squared(self) -> bool {
        self.as_str().starts_with("std")
    }
}

impl fmt::Display for StatName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatName {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StatName::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| StatsError::UnknownStatistic {
                name: s.to_string(),
            })
    }
}
