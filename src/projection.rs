//! Projection of global mean sea-level rise for a batch of scenarios
//!
//! For each scenario the climate ensemble is built from the inputs and every contribution
//! is projected on the `[component, climate, time]` template. The contributions are summed
//! realisation by realisation, so the correlations between them are kept in the total.
//!
//! All random numbers of a scenario come from one [`RandomStream`] seeded afresh for that
//! scenario, and are drawn in a fixed order: the climate ensemble, glacier, Greenland SMB,
//! Greenland dynamics, the fraction shared by the Antarctic contributions, Antarctic SMB,
//! Antarctic dynamics and land water.

use crate::config::{FailurePolicy, ProjectionConfig};
use crate::ensemble::{build_ensemble, ScenarioInputs};
use crate::report::{QuantityReport, Reporter};
use crate::scenario::{discover_scenarios, Scenario};
use log::{error, info, warn};
use rslr_components::components::{
    AntarcticDynamics, AntarcticSMB, Glacier, GreenlandDynamics, GreenlandSMB, LandWater,
};
use rslr_components::parameters::{
    AntarcticDynamicsParameters, AntarcticSMBParameters, GlacierParameters,
    GreenlandDynamicsParameters, GreenlandSMBParameters, LandWaterParameters, LevermannFit,
};
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::stats::RangeKind;
use std::path::Path;

/// The quantities of a scenario projection, in the order they are reported
pub const REPORT_ORDER: [&str; 12] = [
    "temperature",
    "expansion",
    "glacier",
    "greensmb",
    "antsmb",
    "greendyn",
    "antdyn",
    "landwater",
    "GMSLR",
    "greennet",
    "antnet",
    "sheetdyn",
];

/// A projected quantity with its summary
#[derive(Debug, Clone)]
pub struct ProjectedQuantity {
    pub field: Field,
    pub range_kind: RangeKind,
    pub report: QuantityReport,
}

/// Everything projected for one scenario
#[derive(Debug, Clone)]
pub struct ScenarioProjection {
    pub scenario: String,
    /// Quantities in report order
    pub quantities: Vec<ProjectedQuantity>,
    /// Lines of text reported besides the quantities
    pub notes: Vec<String>,
}

impl ScenarioProjection {
    pub fn get(&self, quantity: &str) -> Option<&ProjectedQuantity> {
        self.quantities.iter().find(|q| q.field.name() == quantity)
    }

    /// The report lines, beginning with the scenario name
    pub fn lines(&self) -> Vec<String> {
        std::iter::once(self.scenario.clone())
            .chain(self.notes.iter().cloned())
            .chain(self.quantities.iter().map(|q| q.report.line.clone()))
            .collect()
    }
}

/// Result of a batch of scenarios
#[derive(Debug, Default)]
pub struct BatchResult {
    pub projections: Vec<ScenarioProjection>,
    /// Scenarios which failed, when failures do not abort the batch
    pub failures: Vec<(String, RSLRError)>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn check_input_directory(config: &ProjectionConfig) -> RSLRResult<&Path> {
    let input = config
        .input
        .as_deref()
        .ok_or_else(|| RSLRError::validation("input must be specified"))?;
    if !input.is_dir() {
        return Err(RSLRError::validation(format!(
            "input must be an existing directory: {}",
            input.display()
        )));
    }
    Ok(input)
}

/// Make projections for every configured scenario
pub fn project(config: &ProjectionConfig) -> RSLRResult<BatchResult> {
    let input = check_input_directory(config)?;
    let scenarios = match &config.scenarios {
        Some(scenarios) => scenarios.clone(),
        None => discover_scenarios(input)?,
    };
    if scenarios.is_empty() {
        warn!("no scenarios found in {}", input.display());
    }
    config.antarctic_dynamics.check_scenarios(&scenarios)?;

    let reporter = Reporter::new(config.output.clone(), config.realise);
    reporter.prepare()?;

    let mut result = BatchResult::default();
    for name in scenarios {
        match project_scenario(config, &Scenario::new(name.as_str()), &reporter) {
            Ok(projection) => result.projections.push(projection),
            Err(e) => match config.on_failure {
                FailurePolicy::Abort => return Err(e),
                FailurePolicy::Continue => {
                    error!("scenario {} failed: {}", name, e);
                    result.failures.push((name, e));
                }
            },
        }
    }
    Ok(result)
}

/// The projectors of a scenario, in draw order
struct Projectors {
    glacier: Glacier,
    greensmb: GreenlandSMB,
    greendyn: GreenlandDynamics,
    antsmb: AntarcticSMB,
    antdyn: AntarcticDynamics,
    landwater: LandWater,
}

impl Projectors {
    fn new(config: &ProjectionConfig, scenario: &Scenario, levermann: Option<LevermannFit>) -> Self {
        Self {
            glacier: Glacier::from_parameters(GlacierParameters::with_family(config.glacier)),
            greensmb: GreenlandSMB::from_parameters(GreenlandSMBParameters::default()),
            greendyn: GreenlandDynamics::from_parameters(
                GreenlandDynamicsParameters::default(),
                scenario.family(),
            ),
            antsmb: AntarcticSMB::from_parameters(AntarcticSMBParameters::default()),
            antdyn: AntarcticDynamics::from_parameters(AntarcticDynamicsParameters {
                levermann,
                ..AntarcticDynamicsParameters::default()
            }),
            landwater: LandWater::from_parameters(LandWaterParameters::default()),
        }
    }
}

fn sum(name: &str, fields: &[&Field]) -> RSLRResult<Field> {
    let (first, rest) = fields
        .split_first()
        .ok_or_else(|| RSLRError::Error(format!("nothing to sum for {}", name)))?;
    let mut total = (*first).clone();
    for field in rest {
        total = total.try_add(field)?;
    }
    Ok(total.with_name(name).with_units("m"))
}

/// Make the projection for one scenario
///
/// The Levermann fit for Antarctic dynamics, if any, is taken from the configuration.
pub fn project_scenario(
    config: &ProjectionConfig,
    scenario: &Scenario,
    reporter: &Reporter,
) -> RSLRResult<ScenarioProjection> {
    let input = check_input_directory(config)?;
    let name = scenario.name();
    reporter.note(name)?;
    info!("projecting scenario {}", name);

    let levermann = config.antarctic_dynamics.fit_for(name)?;
    let mut rng = RandomStream::from_seed(config.seed);

    let inputs = ScenarioInputs::read(input, name, config.uses_models())?;
    inputs.validate(name, config.start_year)?;
    let (drivers, template) = build_ensemble(&inputs, config.nm, config.nt, config.tcv, &mut rng)?;
    let (nm, nt, _) = template.shape();

    let projectors = Projectors::new(config, scenario, levermann);
    let base = ProjectionInputs::new(&drivers, &template);
    let glacier = projectors.glacier.project(&base, &mut rng)?;
    let greensmb = projectors.greensmb.project(&base, &mut rng)?;
    let greendyn = projectors.greendyn.project(&base, &mut rng)?;

    // Correlates Antarctic SMB with Antarctic dynamics
    let fraction = rng.open_uniform_2d(nm, nt);
    let shared = base.with_fraction(&fraction);
    let antsmb = projectors.antsmb.project(&shared, &mut rng)?;
    let mut notes = Vec::new();
    if let Some(fit) = levermann {
        let note = format!("using Levermann {} for antdyn", fit);
        reporter.note(&note)?;
        notes.push(note);
    }
    let antdyn = projectors.antdyn.project(&shared, &mut rng)?;
    let landwater = projectors.landwater.project(&base, &mut rng)?;

    let temperature = drivers.temperature_field()?;
    let expansion = drivers.expansion_field()?;
    let greennet = sum("greennet", &[&greensmb, &greendyn])?;
    let antnet = sum("antnet", &[&antdyn, &antsmb])?;
    let sheetdyn = sum("sheetdyn", &[&greendyn, &antdyn])?;
    // Expansion has no component axis and is broadcast over it
    let gmslr = sum(
        "GMSLR",
        &[&glacier, &greensmb, &greendyn, &antnet, &landwater, &expansion],
    )?;

    let projected = [
        (temperature, RangeKind::Likely, Some(nm)),
        (expansion, RangeKind::Likely, Some(nm)),
        (glacier, projectors.glacier.range_kind(), None),
        (greensmb, projectors.greensmb.range_kind(), None),
        (antsmb, projectors.antsmb.range_kind(), None),
        (greendyn, projectors.greendyn.range_kind(), None),
        (antdyn, projectors.antdyn.range_kind(), None),
        (landwater, projectors.landwater.range_kind(), None),
        (gmslr, RangeKind::Likely, None),
        (greennet, RangeKind::Likely, None),
        (antnet, RangeKind::Likely, None),
        (sheetdyn, RangeKind::Likely, None),
    ];

    let mut quantities = Vec::with_capacity(projected.len());
    for (field, range_kind, replicate) in projected {
        let report = reporter.report(name, &field, range_kind, replicate)?;
        quantities.push(ProjectedQuantity {
            field,
            range_kind,
            report,
        });
    }

    Ok(ScenarioProjection {
        scenario: name.to_string(),
        quantities,
        notes,
    })
}
