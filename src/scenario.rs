//! Scenario names and their discovery in an input directory

use rslr_components::parameters::ScenarioFamily;
use rslr_core::errors::{RSLRError, RSLRResult};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// A named emissions scenario
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    name: String,
    family: ScenarioFamily,
}

impl Scenario {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let family = ScenarioFamily::from_name(&name);
        Self { name, family }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The recognised scenario family, which selects scenario-dependent parameters
    pub fn family(&self) -> ScenarioFamily {
        self.family
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Scenario names of the input files in a directory
///
/// Input files are named `<scenario>_<quantity>_<statistic>.json`; the scenario is the part
/// of the name before the first underscore. The names are returned sorted and without
/// duplicates.
pub fn discover_scenarios(input: &Path) -> RSLRResult<Vec<String>> {
    let io_error = |source: std::io::Error| RSLRError::Io {
        path: input.to_path_buf(),
        source,
    };
    let mut scenarios = BTreeSet::new();
    for entry in std::fs::read_dir(input).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let file_name = entry.file_name();
        let Some(stem) = file_name.to_str().and_then(|n| n.strip_suffix(".json")) else {
            continue;
        };
        if let Some((scenario, _)) = stem.split_once('_') {
            scenarios.insert(scenario.to_string());
        }
    }
    Ok(scenarios.into_iter().collect())
}
