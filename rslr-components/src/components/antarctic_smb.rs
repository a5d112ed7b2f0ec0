//! Antarctic ice sheet surface mass balance contribution
//!
//! Snowfall over Antarctica increases with warming, so SMB change lowers sea level. The
//! contribution is proportional to the time-integral of the global temperature anomaly,
//! scaled by the product of two normally distributed sensitivities (Gregory and Huybrechts
//! 2006). Part of the increase is offset by a dynamical response, in proportion to the shared
//! fraction.

use crate::constants::M_SLE_PER_GT;
use crate::parameters::AntarcticSMBParameters;
use ndarray::{Array2, Array3, Zip};
use rslr_core::errors::RSLRResult;
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::timeseries::FloatValue;

#[derive(Debug, Clone)]
pub struct AntarcticSMB {
    parameters: AntarcticSMBParameters,
}

impl AntarcticSMB {
    pub fn from_parameters(parameters: AntarcticSMBParameters) -> Self {
        Self { parameters }
    }

    /// Rate of sea-level change (m / yr) per K of global warming for a percentage change
    /// in SMB per K of global warming
    pub fn calculate_sensitivity(&self, percent_per_global_kelvin: FloatValue) -> FloatValue {
        -percent_per_global_kelvin * 1e-2 * self.parameters.mean_smb * M_SLE_PER_GT
    }
}

impl Projector for AntarcticSMB {
    fn name(&self) -> &'static str {
        "antsmb"
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        let template = inputs.template;
        let (nm, nt, nyr) = template.shape();
        let [pc_mean, pc_sd] = self.parameters.percent_per_kelvin;
        let [ratio_mean, ratio_sd] = self.parameters.warming_ratio;

        let percent = rng.standard_normal_2d(nm, nt).mapv(|z| pc_mean + z * pc_sd);
        let ratio = rng
            .standard_normal_2d(nm, nt)
            .mapv(|z| ratio_mean + z * ratio_sd);

        let drawn;
        let fraction = match inputs.fraction {
            Some(fraction) => {
                template.check_realisations("fraction", fraction)?;
                fraction
            }
            None => {
                drawn = rng.uniform_2d(nm, nt);
                &drawn
            }
        };

        let max_interaction = self.parameters.max_interaction;
        let scale: Array2<FloatValue> = Zip::from(&percent)
            .and(&ratio)
            .and(fraction)
            .map_collect(|&p, &r, &f| {
                self.calculate_sensitivity(p * r) * (1.0 - f * max_interaction)
            });

        let integrated = &inputs.drivers.integrated_temperature;
        let data = Array3::from_shape_fn((nm, nt, nyr), |(k, c, j)| {
            scale[[k, c]] * integrated[[c, j]]
        });
        template.field(self.name(), "m", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{drivers, template};
    use approx::assert_relative_eq;

    #[test]
    fn sensitivity_is_negative_for_increasing_snowfall() {
        let smb = AntarcticSMB::from_parameters(AntarcticSMBParameters::default());
        assert_relative_eq!(
            smb.calculate_sensitivity(5.1 * 1.1),
            -5.61e-2 * 1923.0 * M_SLE_PER_GT,
            epsilon = 1e-15
        );
        assert!(smb.calculate_sensitivity(1.0) < 0.0);
    }

    #[test]
    fn projection_uses_shared_fraction() {
        let drivers = drivers(3);
        let template = template(4, &drivers);
        let smb = AntarcticSMB::from_parameters(AntarcticSMBParameters::default());
        let fraction = Array2::from_elem((4, 3), 1.0);
        let inputs = ProjectionInputs::new(&drivers, &template).with_fraction(&fraction);
        let field = smb.project(&inputs, &mut RandomStream::from_seed(4)).unwrap();
        assert_eq!(field.shape(), &[4, 3, 94]);

        let mut rng = RandomStream::from_seed(4);
        let percent = rng.standard_normal_2d(4, 3).mapv(|z| 5.1 + z * 1.5);
        let ratio = rng.standard_normal_2d(4, 3).mapv(|z| 1.1 + z * 0.2);
        let expected = smb.calculate_sensitivity(percent[[2, 1]] * ratio[[2, 1]])
            * 0.65
            * drivers.integrated_temperature[[1, 10]];
        assert_relative_eq!(field.data()[[2, 1, 10]], expected, epsilon = 1e-15);
    }

    #[test]
    fn draws_fraction_after_sensitivities() {
        let drivers = drivers(2);
        let template = template(3, &drivers);
        let smb = AntarcticSMB::from_parameters(AntarcticSMBParameters::default());

        let mut rng = RandomStream::from_seed(8);
        rng.standard_normal_2d(3, 2);
        rng.standard_normal_2d(3, 2);
        let fraction = rng.uniform_2d(3, 2);

        let with_drawn = smb
            .project(
                &ProjectionInputs::new(&drivers, &template),
                &mut RandomStream::from_seed(8),
            )
            .unwrap();
        let with_given = smb
            .project(
                &ProjectionInputs::new(&drivers, &template).with_fraction(&fraction),
                &mut RandomStream::from_seed(8),
            )
            .unwrap();
        assert_eq!(with_drawn, with_given);
    }

    #[test]
    fn wrong_size_fraction_is_rejected() {
        let drivers = drivers(2);
        let template = template(3, &drivers);
        let smb = AntarcticSMB::from_parameters(AntarcticSMBParameters::default());
        let fraction = Array2::zeros((2, 3));
        let inputs = ProjectionInputs::new(&drivers, &template).with_fraction(&fraction);
        assert!(smb.project(&inputs, &mut RandomStream::from_seed(0)).is_err());
    }
}
