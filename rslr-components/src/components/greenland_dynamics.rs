//! Greenland rapid ice-sheet dynamics contribution

use super::time_projection::{FinalAmount, TimeProjection};
use crate::constants::{DGREEN, FGREENDYN};
use crate::parameters::{GreenlandDynamicsParameters, ScenarioFamily};
use rslr_core::errors::RSLRResult;
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::stats::RangeKind;

/// Greenland dynamics as a quadratic function of time
///
/// The uncertainty is independent of the climate realisations and is drawn afresh rather
/// than taken from the shared fraction. Its range is reported as the actual range.
#[derive(Debug, Clone)]
pub struct GreenlandDynamics {
    parameters: GreenlandDynamicsParameters,
    family: ScenarioFamily,
}

impl GreenlandDynamics {
    pub fn from_parameters(parameters: GreenlandDynamicsParameters, family: ScenarioFamily) -> Self {
        Self { parameters, family }
    }
}

impl Projector for GreenlandDynamics {
    fn name(&self) -> &'static str {
        "greendyn"
    }

    fn range_kind(&self) -> RangeKind {
        RangeKind::Actual
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        let final_range = self.parameters.final_range_for(self.family);
        let field = TimeProjection::new(self.parameters.start_rate_mean, self.parameters.start_rate_pm)
            .project(
                self.name(),
                &FinalAmount::Range(final_range),
                inputs.template,
                None,
                rng,
            )?;
        Ok(field.map(|v| v + FGREENDYN * DGREEN))
    }
}
