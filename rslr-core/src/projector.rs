//! The interface shared by component projectors

use crate::drivers::ClimateDrivers;
use crate::errors::RSLRResult;
use crate::field::Field;
use crate::random::RandomStream;
use crate::stats::RangeKind;
use crate::template::Template;
use crate::timeseries::FloatValue;
use ndarray::Array2;

/// Everything a projector may read
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInputs<'a> {
    pub drivers: &'a ClimateDrivers,
    pub template: &'a Template,
    /// `[component, climate]` uniform random numbers shared by the projectors whose
    /// uncertainties are correlated
    pub fraction: Option<&'a Array2<FloatValue>>,
}

impl<'a> ProjectionInputs<'a> {
    pub fn new(drivers: &'a ClimateDrivers, template: &'a Template) -> Self {
        Self {
            drivers,
            template,
            fraction: None,
        }
    }

    pub fn with_fraction(self, fraction: &'a Array2<FloatValue>) -> Self {
        Self {
            fraction: Some(fraction),
            ..self
        }
    }
}

/// A model of one contribution to sea-level rise
///
/// A projector turns the climate drivers into an ensemble of the contribution with the
/// `[component, climate, time]` shape of the template. Any random numbers it needs are
/// drawn from the stream it is given, in a fixed order.
pub trait Projector: std::fmt::Debug {
    /// Short name of the quantity, used for reporting and file names
    fn name(&self) -> &'static str;

    /// How the uncertainty range of the projected quantity is summarised
    fn range_kind(&self) -> RangeKind {
        RangeKind::Likely
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field>;
}
