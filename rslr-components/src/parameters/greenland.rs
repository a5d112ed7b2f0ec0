//! Greenland ice sheet parameters

use super::scenario::ScenarioFamily;
use crate::constants::FGREENDYN;
use rslr_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};

/// Parameters for the Greenland surface mass balance projector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenlandSMBParameters {
    /// Temperature of the Greenland reference period relative to the AR5 reference period
    /// unit: K
    pub reference_temperature: FloatValue,
    /// Standard deviation of the logarithm of the random methodological error factor
    pub log_factor_sd: FloatValue,
    /// Bounds of the uniform distribution of the SMB elevation feedback factor
    pub elevation_feedback: [FloatValue; 2],
    /// Coefficients of the Fettweis et al. (2013) cubic in the temperature anomaly
    /// unit: Gt / yr / K^n
    pub fettweis: [FloatValue; 3],
}

impl Default for GreenlandSMBParameters {
    fn default() -> Self {
        Self {
            reference_temperature: -0.146,
            log_factor_sd: 0.4,
            elevation_feedback: [1.0, 1.15],
            fettweis: [71.5, 20.4, 2.8],
        }
    }
}

/// Parameters for the Greenland rapid dynamics projector
///
/// For SMB plus dynamics during 2005-2010, AR5 Table 4.6 gives 0.63 ± 0.17 mm/yr (5-95%
/// range), of which the fraction `FGREENDYN` is attributed to dynamics. For dynamics at 2100,
/// AR5 chapter 13 gives 20-85 mm for RCP8.5 and 14-63 mm otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreenlandDynamicsParameters {
    /// unit: mm / yr
    pub start_rate_mean: FloatValue,
    /// unit: mm / yr
    pub start_rate_pm: FloatValue,
    /// Final range for the high-end scenarios
    /// unit: m
    pub final_range_high: [FloatValue; 2],
    /// Final range for every other scenario
    /// unit: m
    pub final_range: [FloatValue; 2],
}

impl Default for GreenlandDynamicsParameters {
    fn default() -> Self {
        Self {
            start_rate_mean: 0.63 * FGREENDYN,
            start_rate_pm: 0.17 * FGREENDYN,
            final_range_high: [0.020, 0.085],
            final_range: [0.014, 0.063],
        }
    }
}

impl GreenlandDynamicsParameters {
    /// Likely range of the contribution in the final year for a scenario family
    pub fn final_range_for(&self, family: ScenarioFamily) -> [FloatValue; 2] {
        if family.is_high_end() {
            self.final_range_high
        } else {
            self.final_range
        }
    }
}
