//! Antarctic rapid ice-sheet dynamics contribution
//!
//! By default the contribution is a time projection with a uniformly distributed final
//! amount. Alternatively the final amount can follow one of the Palmer et al. (2020) fits to
//! the Levermann et al. (2014) ensemble, in which case it is a skewed distribution that is
//! reported with percentiles.
//!
//! Both use the shared fraction so that the dynamics are correlated with the dynamical
//! offset of Antarctic SMB.

use super::time_projection::{FinalAmount, TimeProjection};
use crate::constants::DANT;
use crate::parameters::AntarcticDynamicsParameters;
use log::info;
use ndarray::Array2;
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::stats::{norm_ppf, RangeKind};
use rslr_core::timeseries::FloatValue;

#[derive(Debug, Clone)]
pub struct AntarcticDynamics {
    parameters: AntarcticDynamicsParameters,
}

impl AntarcticDynamics {
    pub fn from_parameters(parameters: AntarcticDynamicsParameters) -> Self {
        Self { parameters }
    }

    pub fn parameters(&self) -> &AntarcticDynamicsParameters {
        &self.parameters
    }

    fn final_amount(&self, fraction: Option<&Array2<FloatValue>>) -> RSLRResult<FinalAmount> {
        match self.parameters.levermann {
            None => Ok(FinalAmount::Range(self.parameters.final_range)),
            Some(fit) => {
                let fraction = fraction.ok_or_else(|| {
                    RSLRError::validation(format!(
                        "Levermann {} for antdyn requires the shared fraction",
                        fit
                    ))
                })?;
                info!("using Levermann {} for antdyn", fit);
                let coefficients = fit.coefficients();
                let mut finals = Array2::zeros(fraction.raw_dim());
                for (final_amount, &f) in finals.iter_mut().zip(fraction.iter()) {
                    *final_amount = coefficients.evaluate(norm_ppf(1.0 - f)?);
                }
                Ok(FinalAmount::Sampled(finals))
            }
        }
    }
}

impl Projector for AntarcticDynamics {
    fn name(&self) -> &'static str {
        "antdyn"
    }

    fn range_kind(&self) -> RangeKind {
        match self.parameters.levermann {
            Some(_) => RangeKind::Likely,
            None => RangeKind::Actual,
        }
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        if let Some(fraction) = inputs.fraction {
            inputs.template.check_realisations("fraction", fraction)?;
        }
        let final_amount = self.final_amount(inputs.fraction)?;
        let field = TimeProjection::new(self.parameters.start_rate_mean, self.parameters.start_rate_pm)
            .project(
                self.name(),
                &final_amount,
                inputs.template,
                inputs.fraction,
                rng,
            )?;
        Ok(field.map(|v| v + DANT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{drivers, template};
    use crate::parameters::LevermannFit;
    use approx::assert_relative_eq;

    fn levermann(fit: LevermannFit) -> AntarcticDynamics {
        AntarcticDynamics::from_parameters(AntarcticDynamicsParameters {
            levermann: Some(fit),
            ..AntarcticDynamicsParameters::default()
        })
    }

    #[test]
    fn default_final_range() {
        let drivers = drivers(3);
        let template = template(4, &drivers);
        let fraction = Array2::from_shape_fn((4, 3), |(k, c)| (k * 3 + c) as f64 / 11.0);
        let inputs = ProjectionInputs::new(&drivers, &template).with_fraction(&fraction);
        let antdyn = AntarcticDynamics::from_parameters(AntarcticDynamicsParameters::default());
        let field = antdyn.project(&inputs, &mut RandomStream::from_seed(0)).unwrap();

        assert_eq!(antdyn.range_kind(), RangeKind::Actual);
        assert_relative_eq!(field.data()[[0, 0, 93]], -0.020 + DANT, epsilon = 1e-12);
        assert_relative_eq!(field.data()[[3, 2, 93]], 0.185 + DANT, epsilon = 1e-12);
    }

    #[test]
    fn levermann_final_amount() {
        let drivers = drivers(2);
        let template = template(2, &drivers);
        let fraction = ndarray::array![[0.5, 0.975], [0.025, 0.2]];
        let inputs = ProjectionInputs::new(&drivers, &template).with_fraction(&fraction);
        let antdyn = levermann(LevermannFit::Rcp45);
        let field = antdyn.project(&inputs, &mut RandomStream::from_seed(0)).unwrap();

        assert_eq!(antdyn.range_kind(), RangeKind::Likely);
        // The median fraction gives exp(c0)
        assert_relative_eq!(
            field.data()[[0, 0, 93]],
            (-2.676f64).exp() + DANT,
            epsilon = 1e-12
        );
        // A large fraction gives a small contribution
        let low = (-2.676 - 0.850 * 1.959_963_984_540_054f64).exp();
        assert_relative_eq!(field.data()[[0, 1, 93]], low + DANT, epsilon = 1e-9);
        assert!(field.data()[[1, 0, 93]] > field.data()[[0, 0, 93]]);
    }

    #[test]
    fn levermann_requires_fraction() {
        let drivers = drivers(2);
        let template = template(2, &drivers);
        let inputs = ProjectionInputs::new(&drivers, &template);
        assert!(levermann(LevermannFit::Rcp85)
            .project(&inputs, &mut RandomStream::from_seed(0))
            .is_err());
    }

    #[test]
    fn levermann_rejects_wrong_size_fraction() {
        let drivers = drivers(2);
        let template = template(2, &drivers);
        let fraction = Array2::from_elem((1, 4), 0.5);
        let inputs = ProjectionInputs::new(&drivers, &template).with_fraction(&fraction);
        assert!(levermann(LevermannFit::Rcp26)
            .project(&inputs, &mut RandomStream::from_seed(0))
            .is_err());
    }
}
