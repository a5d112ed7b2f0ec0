//! Antarctic ice sheet parameters

use super::scenario::ScenarioFamily;
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::timeseries::FloatValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters for the Antarctic surface mass balance projector
///
/// The two sensitivities are `[mean, standard deviation]` of normal distributions from
/// Gregory and Huybrechts (2006).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntarcticSMBParameters {
    /// Percentage change in Antarctic SMB per K of Antarctic warming
    /// unit: % / K
    pub percent_per_kelvin: [FloatValue; 2],
    /// Ratio of Antarctic warming to global warming
    pub warming_ratio: [FloatValue; 2],
    /// Model-mean time-mean SMB for 1979-2010 (AR5 13.3.3.2)
    /// unit: Gt / yr
    pub mean_smb: FloatValue,
    /// Maximum fraction of the SMB increase offset by the dynamical response (AR5 13.SM.1.5)
    pub max_interaction: FloatValue,
}

impl Default for AntarcticSMBParameters {
    fn default() -> Self {
        Self {
            percent_per_kelvin: [5.1, 1.5],
            warming_ratio: [1.1, 0.2],
            mean_smb: 1923.0,
            max_interaction: 0.35,
        }
    }
}

/// Coefficients `[c0, c1, c2]` of the Palmer et al. (2020) fit
///
/// The final Antarctic dynamics contribution (m) is
/// $$ \exp(c_2 a^2 + c_1 a + c_0) $$
/// where $a$ is a standard normal deviate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevermannCoefficients(pub [FloatValue; 3]);

impl LevermannCoefficients {
    pub fn evaluate(&self, a: FloatValue) -> FloatValue {
        let [c0, c1, c2] = self.0;
        (c2 * a * a + c1 * a + c0).exp()
    }
}

/// Fits by Palmer et al. (2020) to the Antarctic dynamics ensemble of Levermann et al. (2014)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevermannFit {
    Rcp26,
    Rcp45,
    Rcp60,
    Rcp85,
}

impl LevermannFit {
    pub fn coefficients(&self) -> LevermannCoefficients {
        LevermannCoefficients(match self {
            LevermannFit::Rcp26 => [-2.881, 0.923, 0.000],
            LevermannFit::Rcp45 => [-2.676, 0.850, 0.000],
            LevermannFit::Rcp60 => [-2.660, 0.870, 0.000],
            LevermannFit::Rcp85 => [-2.399, 0.860, 0.000],
        })
    }

    /// The fit published for a scenario family
    pub fn for_family(family: ScenarioFamily) -> RSLRResult<Self> {
        match family {
            ScenarioFamily::Rcp26 => Ok(LevermannFit::Rcp26),
            ScenarioFamily::Rcp45 => Ok(LevermannFit::Rcp45),
            ScenarioFamily::Rcp60 => Ok(LevermannFit::Rcp60),
            ScenarioFamily::Rcp85 => Ok(LevermannFit::Rcp85),
            other => Err(RSLRError::UnsupportedFit(other.to_string())),
        }
    }
}

impl fmt::Display for LevermannFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LevermannFit::Rcp26 => "rcp26",
            LevermannFit::Rcp45 => "rcp45",
            LevermannFit::Rcp60 => "rcp60",
            LevermannFit::Rcp85 => "rcp85",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LevermannFit {
    type Err = RSLRError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ScenarioFamily::from_name(s) {
            ScenarioFamily::Unlisted => Err(RSLRError::UnsupportedFit(s.to_string())),
            family => Self::for_family(family),
        }
    }
}

/// Parameters for the Antarctic rapid dynamics projector
///
/// For SMB plus dynamics during 2005-2010, AR5 Table 4.6 gives 0.41 ± 0.24 mm/yr (5-95%
/// range). For dynamics at 2100, AR5 chapter 13 gives -20 to 185 mm for all scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AntarcticDynamicsParameters {
    /// unit: mm / yr
    pub start_rate_mean: FloatValue,
    /// unit: mm / yr
    pub start_rate_pm: FloatValue,
    /// unit: m
    pub final_range: [FloatValue; 2],
    /// Use this Levermann fit for the final amount instead of `final_range`
    pub levermann: Option<LevermannFit>,
}

impl Default for AntarcticDynamicsParameters {
    fn default() -> Self {
        Self {
            start_rate_mean: 0.41,
            start_rate_pm: 0.20,
            final_range: [-0.020, 0.185],
            levermann: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_exist_for_rcps_only() {
        assert_eq!(
            LevermannFit::for_family(ScenarioFamily::Rcp45).unwrap(),
            LevermannFit::Rcp45
        );
        assert!(matches!(
            LevermannFit::for_family(ScenarioFamily::Ssp245),
            Err(RSLRError::UnsupportedFit(_))
        ));
        assert!("ssp585".parse::<LevermannFit>().is_err());
        assert!(matches!(
            "RCP85".parse::<LevermannFit>(),
            Err(RSLRError::UnsupportedFit(_))
        ));
        assert!("a1b".parse::<LevermannFit>().is_err());
        assert_eq!("rcp85".parse::<LevermannFit>().unwrap(), LevermannFit::Rcp85);
    }

    #[test]
    fn median_of_fit() {
        // At the median deviate the fit is exp(c0)
        let coefficients = LevermannFit::Rcp85.coefficients();
        assert_relative_eq!(coefficients.evaluate(0.0), (-2.399f64).exp());
    }
}
