//! Greenland ice sheet surface mass balance contribution
//!
//! The rate of SMB change is a cubic in the temperature anomaly relative to the Greenland
//! reference period (Fettweis et al. 2013), multiplied by two random factors per component
//! realisation: a log-normal methodological error and a uniform elevation feedback.

use crate::constants::{DGREEN, FGREENDYN, M_SLE_PER_GT};
use crate::parameters::GreenlandSMBParameters;
use ndarray::{Array3, Axis};
use rslr_core::errors::RSLRResult;
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::timeseries::FloatValue;

#[derive(Debug, Clone)]
pub struct GreenlandSMB {
    parameters: GreenlandSMBParameters,
}

impl GreenlandSMB {
    pub fn from_parameters(parameters: GreenlandSMBParameters) -> Self {
        Self { parameters }
    }

    /// Rate of sea-level rise from Greenland SMB change (m / yr) for a global mean
    /// temperature anomaly relative to the AR5 reference period (K)
    pub fn calculate_rate(&self, temperature: FloatValue) -> FloatValue {
        let t = temperature - self.parameters.reference_temperature;
        let [c1, c2, c3] = self.parameters.fettweis;
        (c1 * t + c2 * t.powi(2) + c3 * t.powi(3)) * M_SLE_PER_GT
    }
}

impl Projector for GreenlandSMB {
    fn name(&self) -> &'static str {
        "greensmb"
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        let template = inputs.template;
        let (nm, nt, nyr) = template.shape();
        let [fe_low, fe_high] = self.parameters.elevation_feedback;

        let error_factor = rng
            .standard_normal(nm)
            .mapv(|z| (z * self.parameters.log_factor_sd).exp());
        let feedback = rng
            .uniform(nm)
            .mapv(|u| u * (fe_high - fe_low) + fe_low);

        let rate = inputs.drivers.temperature.mapv(|t| self.calculate_rate(t));
        let mut data = Array3::from_shape_fn((nm, nt, nyr), |(k, c, j)| {
            error_factor[k] * feedback[k] * rate[[c, j]]
        });
        data.accumulate_axis_inplace(Axis(2), |&prev, curr| *curr += prev);

        let offset = (1.0 - FGREENDYN) * DGREEN;
        data.mapv_inplace(|v| v + offset);
        template.field(self.name(), "m", data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{drivers, template};
    use approx::assert_relative_eq;

    #[test]
    fn rate_at_reference_period_is_zero() {
        let smb = GreenlandSMB::from_parameters(GreenlandSMBParameters::default());
        assert_relative_eq!(smb.calculate_rate(-0.146), 0.0);
        // 1 K above the Greenland reference period
        assert_relative_eq!(
            smb.calculate_rate(1.0 - 0.146),
            (71.5 + 20.4 + 2.8) * M_SLE_PER_GT,
            epsilon = 1e-15
        );
    }

    #[test]
    fn projection_accumulates_rate() {
        let drivers = drivers(3);
        let template = template(5, &drivers);
        let smb = GreenlandSMB::from_parameters(GreenlandSMBParameters::default());
        let inputs = ProjectionInputs::new(&drivers, &template);
        let field = smb.project(&inputs, &mut RandomStream::from_seed(2)).unwrap();
        assert_eq!(field.shape(), &[5, 3, 94]);

        let mut rng = RandomStream::from_seed(2);
        let fn_ = rng.standard_normal(5).mapv(|z| (z * 0.4).exp());
        let fe = rng.uniform(5).mapv(|u| u * 0.15 + 1.0);
        let factor = fn_[3] * fe[3];
        let first = factor * smb.calculate_rate(drivers.temperature[[2, 0]]);
        let second = first + factor * smb.calculate_rate(drivers.temperature[[2, 1]]);
        let offset = 0.5 * (3.21 - 0.30) * 1e-3;
        assert_relative_eq!(field.data()[[3, 2, 0]], first + offset, epsilon = 1e-15);
        assert_relative_eq!(field.data()[[3, 2, 1]], second + offset, epsilon = 1e-15);
    }

    #[test]
    fn warming_climate_gives_growing_contribution() {
        let drivers = drivers(2);
        let template = template(4, &drivers);
        let smb = GreenlandSMB::from_parameters(GreenlandSMBParameters::default());
        let inputs = ProjectionInputs::new(&drivers, &template);
        let field = smb.project(&inputs, &mut RandomStream::from_seed(0)).unwrap();
        let data = field.data();
        for k in 0..4 {
            for c in 0..2 {
                assert!(data[[k, c, 93]] > data[[k, c, 0]]);
            }
        }
    }
}
