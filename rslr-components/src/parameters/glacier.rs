//! Glacier parameters
//!
//! Glacier mass loss is projected with the AR5 formula
//! $$ \Delta M = f \cdot \max(I, 0)^p $$
//! where $I$ is the time-integral of the global mean temperature anomaly (K yr) and
//! $(f, p)$ are fitted to the results of an individual glacier model.

use rslr_core::timeseries::{FloatValue, Year};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fit of the AR5 glacier formula to one glacier model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlacierMethod {
    pub name: &'static str,
    /// mm SLE per (K yr)^exponent
    pub factor: FloatValue,
    pub exponent: FloatValue,
    /// Coefficient of variation of the random methodological error
    pub cv: FloatValue,
}

const fn method(
    name: &'static str,
    factor: FloatValue,
    exponent: FloatValue,
    cv: FloatValue,
) -> GlacierMethod {
    GlacierMethod {
        name,
        factor,
        exponent,
        cv,
    }
}

const AR5_METHODS: [GlacierMethod; 4] = [
    method("Marzeion", 4.96, 0.685, 0.20),
    method("Radic", 5.45, 0.676, 0.20),
    method("Slangen", 3.44, 0.742, 0.20),
    method("Giesen", 3.02, 0.733, 0.20),
];

// Hock et al. (2019)
const GLACIERMIP_METHODS: [GlacierMethod; 5] = [
    method("SLA2012", 3.39, 0.722, 0.15),
    method("MAR2012", 4.35, 0.658, 0.13),
    method("GIE2013", 3.57, 0.665, 0.13),
    method("RAD2014", 6.21, 0.648, 0.17),
    method("GloGEM", 2.88, 0.753, 0.13),
];

// Marzeion et al. (2020)
const GLACIERMIP2_METHODS: [GlacierMethod; 7] = [
    method("GLIMB", 3.70, 0.662, 0.206),
    method("GloGEM", 4.08, 0.716, 0.161),
    method("JULES", 5.50, 0.564, 0.188),
    method("Mar-12", 4.89, 0.651, 0.141),
    method("OGGM", 4.26, 0.715, 0.164),
    method("RAD2014", 5.18, 0.709, 0.135),
    method("WAL2001", 2.66, 0.730, 0.206),
];

/// Which set of glacier models the projection is calibrated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GlacierModelFamily {
    /// The four glacier models assessed in AR5
    #[default]
    Ar5,
    /// Recalibrated to GlacierMIP (Hock et al. 2019)
    GlacierMip,
    /// Recalibrated to GlacierMIP2 (Marzeion et al. 2020)
    GlacierMip2,
}

impl GlacierModelFamily {
    pub fn methods(&self) -> &'static [GlacierMethod] {
        match self {
            GlacierModelFamily::Ar5 => &AR5_METHODS,
            GlacierModelFamily::GlacierMip => &GLACIERMIP_METHODS,
            GlacierModelFamily::GlacierMip2 => &GLACIERMIP2_METHODS,
        }
    }
}

impl fmt::Display for GlacierModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GlacierModelFamily::Ar5 => "ar5",
            GlacierModelFamily::GlacierMip => "glaciermip",
            GlacierModelFamily::GlacierMip2 => "glaciermip2",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for GlacierModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ar5" | "0" => Ok(GlacierModelFamily::Ar5),
            "glaciermip" | "1" => Ok(GlacierModelFamily::GlacierMip),
            "glaciermip2" | "2" => Ok(GlacierModelFamily::GlacierMip2),
            _ => Err(format!("unknown GlacierMIP version: {}", s)),
        }
    }
}

/// Parameters for the glacier projector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlacierParameters {
    pub family: GlacierModelFamily,
    /// Glacier contribution rate in the AR5 reference period, from the CMIP5 ensemble mean
    /// of Marzeion et al.
    /// unit: mm / yr
    pub reference_rate: FloatValue,
    /// Year of the AR5 reference period from which `reference_rate` is accumulated
    pub reference_year: Year,
    /// Initial glacier mass, used as an upper limit on the contribution (AR5 Table 4.2)
    /// unit: mm SLE
    pub initial_mass: FloatValue,
}

impl Default for GlacierParameters {
    fn default() -> Self {
        Self {
            family: GlacierModelFamily::Ar5,
            reference_rate: 0.95,
            reference_year: 1996,
            initial_mass: 412.0 - 96.3,
        }
    }
}

impl GlacierParameters {
    pub fn with_family(family: GlacierModelFamily) -> Self {
        Self {
            family,
            ..Self::default()
        }
    }

    /// Upper limit on the glacier contribution (m SLE)
    pub fn initial_mass_sle(&self) -> FloatValue {
        self.initial_mass * 1e-3
    }
}
