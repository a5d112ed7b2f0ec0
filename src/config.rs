//! Configuration of a batch of projections
//!
//! A [`ProjectionConfig`] can be built in code, read from a TOML file or assembled from
//! command-line flags. Every field has a default, so a file only needs the entries that
//! differ:
//!
//! ```toml
//! input = "inputs"
//! output = "results"
//! scenarios = ["rcp26", "rcp85"]
//! nm = 1000
//! glacier = "glaciermip2"
//! antarctic_dynamics = true
//! ```

use rslr_components::parameters::{GlacierModelFamily, LevermannFit};
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::timeseries::{FloatValue, Year};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Which Antarctic dynamics projection to use for each scenario
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "AntarcticDynamicsRepr", into = "AntarcticDynamicsRepr")]
pub enum AntarcticDynamicsMode {
    /// The AR5 uniform final range for every scenario
    #[default]
    Off,
    /// The Levermann fit named like each scenario
    AllScenarios,
    /// The named Levermann fit for every scenario
    Fit(String),
    /// A Levermann fit for each scenario, which must list every scenario projected
    PerScenario(BTreeMap<String, String>),
}

/// How the mode is written in a configuration file: `false`, `true`, a fit name or a table
/// of fit names by scenario
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum AntarcticDynamicsRepr {
    Flag(bool),
    Fit(String),
    PerScenario(BTreeMap<String, String>),
}

impl From<AntarcticDynamicsRepr> for AntarcticDynamicsMode {
    fn from(repr: AntarcticDynamicsRepr) -> Self {
        match repr {
            AntarcticDynamicsRepr::Flag(false) => AntarcticDynamicsMode::Off,
            AntarcticDynamicsRepr::Flag(true) => AntarcticDynamicsMode::AllScenarios,
            AntarcticDynamicsRepr::Fit(name) => AntarcticDynamicsMode::Fit(name),
            AntarcticDynamicsRepr::PerScenario(map) => AntarcticDynamicsMode::PerScenario(map),
        }
    }
}

impl From<AntarcticDynamicsMode> for AntarcticDynamicsRepr {
    fn from(mode: AntarcticDynamicsMode) -> Self {
        match mode {
            AntarcticDynamicsMode::Off => AntarcticDynamicsRepr::Flag(false),
            AntarcticDynamicsMode::AllScenarios => AntarcticDynamicsRepr::Flag(true),
            AntarcticDynamicsMode::Fit(name) => AntarcticDynamicsRepr::Fit(name),
            AntarcticDynamicsMode::PerScenario(map) => AntarcticDynamicsRepr::PerScenario(map),
        }
    }
}

impl AntarcticDynamicsMode {
    /// Check that a per-scenario table covers every scenario
    pub fn check_scenarios(&self, scenarios: &[String]) -> RSLRResult<()> {
        if let AntarcticDynamicsMode::PerScenario(map) = self {
            if let Some(missing) = scenarios.iter().find(|s| !map.contains_key(*s)) {
                return Err(RSLRError::validation(format!(
                    "all scenarios must have elements in antarctic_dynamics, {} is missing",
                    missing
                )));
            }
        }
        Ok(())
    }

    /// The Levermann fit to use for a scenario, if any
    pub fn fit_for(&self, scenario: &str) -> RSLRResult<Option<LevermannFit>> {
        let name = match self {
            AntarcticDynamicsMode::Off => return Ok(None),
            AntarcticDynamicsMode::AllScenarios => scenario,
            AntarcticDynamicsMode::Fit(name) => name.as_str(),
            AntarcticDynamicsMode::PerScenario(map) => {
                map.get(scenario).map(String::as_str).ok_or_else(|| {
                    RSLRError::validation(format!(
                        "no Levermann fit is given for scenario {}",
                        scenario
                    ))
                })?
            }
        };
        name.parse::<LevermannFit>().map(Some)
    }
}

/// What to do when a scenario fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the batch at the first failure
    #[default]
    Abort,
    /// Log the failure and go on to the next scenario
    Continue,
}

/// Settings for a batch of scenario projections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Directory of input files named `<scenario>_<quantity>_<statistic>.json`
    pub input: Option<PathBuf>,
    /// Directory for the list file and the output files. Nothing is written if unset.
    pub output: Option<PathBuf>,
    /// Scenarios to project, by default every scenario in the input directory
    pub scenarios: Option<Vec<String>>,
    /// Seed of the random numbers, applied afresh for each scenario
    pub seed: u64,
    /// Number of climate realisations generated from the mean and sd inputs, or zero to use
    /// the individual models of the models inputs
    pub nt: usize,
    /// Number of component realisations for each climate realisation
    pub nm: usize,
    /// Multiplier for the standard deviation of the inputs
    pub tcv: FloatValue,
    pub glacier: GlacierModelFamily,
    pub antarctic_dynamics: AntarcticDynamicsMode,
    /// Write the individual realisations as well as the statistics
    pub realise: bool,
    /// First calendar year of the temperature input
    pub start_year: Year,
    pub on_failure: FailurePolicy,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            scenarios: None,
            seed: 0,
            nt: 450,
            nm: 1000,
            tcv: 1.0,
            glacier: GlacierModelFamily::Ar5,
            antarctic_dynamics: AntarcticDynamicsMode::Off,
            realise: false,
            start_year: 2006,
            on_failure: FailurePolicy::Abort,
        }
    }
}

impl ProjectionConfig {
    pub fn from_toml_str(contents: &str) -> RSLRResult<Self> {
        toml::from_str(contents)
            .map_err(|e| RSLRError::validation(format!("invalid configuration: {}", e)))
    }

    /// Read a configuration from a TOML file
    pub fn from_file(path: &Path) -> RSLRResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| RSLRError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents).map_err(|e| {
            RSLRError::validation(format!("{} in {}", e, path.display()))
        })
    }

    /// Whether the climate ensemble is made of the individual input models
    pub fn uses_models(&self) -> bool {
        self.nt == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ProjectionConfig::default();
        assert_eq!(config.nt, 450);
        assert_eq!(config.nm, 1000);
        assert_eq!(config.seed, 0);
        assert_eq!(config.start_year, 2006);
        assert_eq!(config.antarctic_dynamics, AntarcticDynamicsMode::Off);
        assert!(!config.uses_models());
        assert_eq!(ProjectionConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn parses_toml() {
        let config = ProjectionConfig::from_toml_str(
            r#"
            input = "in"
            output = "out"
            scenarios = ["rcp26", "rcp85"]
            nt = 0
            nm = 400
            glacier = "glaciermip"
            antarctic_dynamics = "rcp45"
            realise = true
            on_failure = "continue"
            "#,
        )
        .unwrap();
        assert_eq!(config.input, Some(PathBuf::from("in")));
        assert_eq!(config.scenarios.as_ref().map(Vec::len), Some(2));
        assert!(config.uses_models());
        assert_eq!(config.glacier, GlacierModelFamily::GlacierMip);
        assert_eq!(
            config.antarctic_dynamics,
            AntarcticDynamicsMode::Fit("rcp45".to_string())
        );
        assert!(config.realise);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
        assert_eq!(config.tcv, 1.0);
    }

    #[test]
    fn antarctic_dynamics_forms() {
        let on = ProjectionConfig::from_toml_str("antarctic_dynamics = true").unwrap();
        assert_eq!(on.antarctic_dynamics, AntarcticDynamicsMode::AllScenarios);
        let off = ProjectionConfig::from_toml_str("antarctic_dynamics = false").unwrap();
        assert_eq!(off.antarctic_dynamics, AntarcticDynamicsMode::Off);
        let table = ProjectionConfig::from_toml_str(
            "[antarctic_dynamics]\nssp126 = \"rcp26\"\nssp585 = \"rcp85\"\n",
        )
        .unwrap();
        assert_eq!(
            table.antarctic_dynamics.fit_for("ssp585").unwrap(),
            Some(LevermannFit::Rcp85)
        );
    }

    #[test]
    fn resolves_fits() {
        assert_eq!(AntarcticDynamicsMode::Off.fit_for("rcp85").unwrap(), None);
        assert_eq!(
            AntarcticDynamicsMode::AllScenarios.fit_for("rcp26").unwrap(),
            Some(LevermannFit::Rcp26)
        );
        assert!(matches!(
            AntarcticDynamicsMode::AllScenarios.fit_for("ssp245"),
            Err(RSLRError::UnsupportedFit(_))
        ));
        assert_eq!(
            AntarcticDynamicsMode::Fit("rcp60".to_string())
                .fit_for("anything")
                .unwrap(),
            Some(LevermannFit::Rcp60)
        );
    }

    #[test]
    fn per_scenario_table_must_be_complete() {
        let mode = AntarcticDynamicsMode::PerScenario(BTreeMap::from([(
            "ssp126".to_string(),
            "rcp26".to_string(),
        )]));
        let scenarios = vec!["ssp126".to_string(), "ssp245".to_string()];
        assert!(mode.check_scenarios(&scenarios).is_err());
        assert!(mode.check_scenarios(&scenarios[..1]).is_ok());
        assert!(mode.fit_for("ssp245").is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = ProjectionConfig {
            antarctic_dynamics: AntarcticDynamicsMode::AllScenarios,
            nm: 40,
            ..ProjectionConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(ProjectionConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rslr.toml");
        std::fs::write(&path, "seed = 7\nnm = 8\n").unwrap();
        let config = ProjectionConfig::from_file(&path).unwrap();
        assert_eq!((config.seed, config.nm), (7, 8));
        assert!(ProjectionConfig::from_file(&dir.path().join("absent.toml")).is_err());
        std::fs::write(&path, "nm = \"many\"\n").unwrap();
        assert!(ProjectionConfig::from_file(&path).is_err());
    }
}
