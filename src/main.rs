//! Command line interface for AR5 sea-level rise projections
//!
//! Settings are read from an optional TOML file and then overridden by any flags given.

use anyhow::{bail, Context};
use clap::Parser;
use rslr::config::{AntarcticDynamicsMode, FailurePolicy, ProjectionConfig};
use rslr::projection::project;
use rslr_components::parameters::GlacierModelFamily;
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "rslr")]
#[command(about = "Project global mean sea-level rise for emissions scenarios")]
struct Cli {
    /// TOML file of settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory of input files
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for output files
    #[arg(long)]
    output: Option<PathBuf>,

    /// Scenarios to project, by default all those found in the input directory
    #[arg(long, value_delimiter = ',')]
    scenarios: Option<Vec<String>>,

    #[arg(long)]
    seed: Option<u64>,

    /// Number of climate realisations, or 0 to use the individual models
    #[arg(long)]
    nt: Option<usize>,

    /// Number of component realisations per climate realisation
    #[arg(long)]
    nm: Option<usize>,

    /// Multiplier for the standard deviation of the inputs
    #[arg(long)]
    tcv: Option<f64>,

    /// Glacier model family: ar5, glaciermip or glaciermip2
    #[arg(long)]
    glacier: Option<GlacierModelFamily>,

    /// Use a Levermann fit for Antarctic dynamics, named like each scenario unless a fit is
    /// given
    #[arg(long, num_args = 0..=1, default_missing_value = "")]
    levermann: Option<String>,

    /// Write the individual realisations too
    #[arg(long)]
    realise: bool,

    /// First calendar year of the temperature input
    #[arg(long)]
    start_year: Option<i32>,

    /// Go on to the next scenario when one fails
    #[arg(long)]
    continue_on_failure: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<ProjectionConfig> {
        let mut config = match &self.config {
            Some(path) => ProjectionConfig::from_file(path)?,
            None => ProjectionConfig::default(),
        };
        if self.input.is_some() {
            config.input = self.input;
        }
        if self.output.is_some() {
            config.output = self.output;
        }
        if self.scenarios.is_some() {
            config.scenarios = self.scenarios;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(nt) = self.nt {
            config.nt = nt;
        }
        if let Some(nm) = self.nm {
            config.nm = nm;
        }
        if let Some(tcv) = self.tcv {
            config.tcv = tcv;
        }
        if let Some(glacier) = self.glacier {
            config.glacier = glacier;
        }
        match self.levermann.as_deref() {
            None => {}
            Some("") => config.antarctic_dynamics = AntarcticDynamicsMode::AllScenarios,
            Some(fit) => config.antarctic_dynamics = AntarcticDynamicsMode::Fit(fit.to_string()),
        }
        if self.realise {
            config.realise = true;
        }
        if let Some(start_year) = self.start_year {
            config.start_year = start_year;
        }
        if self.continue_on_failure {
            config.on_failure = FailurePolicy::Continue;
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let config = Cli::parse().into_config()?;
    if config.input.is_none() {
        bail!("an input directory must be given with --input or in the configuration file");
    }
    let result = project(&config).context("projection failed")?;

    for projection in &result.projections {
        for line in projection.lines() {
            println!("{}", line);
        }
    }
    for (scenario, e) in &result.failures {
        error!("{}: {}", scenario, e);
    }
    if !result.is_success() {
        bail!("{} scenario(s) failed", result.failures.len());
    }
    Ok(())
}
