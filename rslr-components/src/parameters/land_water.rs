use rslr_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for the land water storage projector
///
/// The start rate is the one for 1993-2010 from the AR5 sea-level budget table. The final
/// amount is the mean for 2081-2100.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LandWaterParameters {
    /// unit: mm / yr
    pub start_rate_mean: FloatValue,
    /// unit: mm / yr
    pub start_rate_pm: FloatValue,
    /// unit: m
    pub final_range: [FloatValue; 2],
    /// Number of years at the end over which the final amount is a time-mean
    pub final_years: usize,
}

impl Default for LandWaterParameters {
    fn default() -> Self {
        Self {
            start_rate_mean: 0.38,
            start_rate_pm: 0.49 - 0.38,
            final_range: [-0.01, 0.09],
            final_years: 2100 - 2081 + 1,
        }
    }
}
