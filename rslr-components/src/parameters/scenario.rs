//! Scenario families
//!
//! Some parameters depend on the forcing scenario. Scenario names are resolved to a
//! [`ScenarioFamily`] once, when the scenario is set up, and the parameter tables are keyed
//! by family.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioFamily {
    Rcp26,
    Rcp45,
    Rcp60,
    Rcp85,
    Ssp119,
    Ssp126,
    Ssp245,
    Ssp370,
    Ssp585,
    /// Any scenario without scenario-specific parameters
    Unlisted,
}

impl ScenarioFamily {
    const NAMED: [ScenarioFamily; 9] = [
        ScenarioFamily::Rcp26,
        ScenarioFamily::Rcp45,
        ScenarioFamily::Rcp60,
        ScenarioFamily::Rcp85,
        ScenarioFamily::Ssp119,
        ScenarioFamily::Ssp126,
        ScenarioFamily::Ssp245,
        ScenarioFamily::Ssp370,
        ScenarioFamily::Ssp585,
    ];

    /// Resolve a scenario name, which must match exactly
    pub fn from_name(name: &str) -> Self {
        Self::NAMED
            .into_iter()
            .find(|family| family.to_string() == name)
            .unwrap_or(ScenarioFamily::Unlisted)
    }

    /// Whether the scenario is one of the high-end pathways which get the wider range of
    /// Greenland rapid dynamics
    pub fn is_high_end(&self) -> bool {
        matches!(self, ScenarioFamily::Rcp85 | ScenarioFamily::Ssp585)
    }
}

impl fmt::Display for ScenarioFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScenarioFamily::Rcp26 => "rcp26",
            ScenarioFamily::Rcp45 => "rcp45",
            ScenarioFamily::Rcp60 => "rcp60",
            ScenarioFamily::Rcp85 => "rcp85",
            ScenarioFamily::Ssp119 => "ssp119",
            ScenarioFamily::Ssp126 => "ssp126",
            ScenarioFamily::Ssp245 => "ssp245",
            ScenarioFamily::Ssp370 => "ssp370",
            ScenarioFamily::Ssp585 => "ssp585",
            ScenarioFamily::Unlisted => "unlisted",
        };
        write!(f, "{}", name)
    }
}
