//! Land water storage contribution

use super::time_projection::{FinalAmount, TimeProjection};
use crate::parameters::LandWaterParameters;
use rslr_core::errors::RSLRResult;
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::stats::RangeKind;

/// Land water storage as a quadratic function of time
///
/// The final range applies to the mean over the last `final_years` years. The uncertainty is
/// drawn independently of every other contribution.
#[derive(Debug, Clone)]
pub struct LandWater {
    parameters: LandWaterParameters,
}

impl LandWater {
    pub fn from_parameters(parameters: LandWaterParameters) -> Self {
        Self { parameters }
    }
}

impl Projector for LandWater {
    fn name(&self) -> &'static str {
        "landwater"
    }

    fn range_kind(&self) -> RangeKind {
        RangeKind::Actual
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        TimeProjection::new(self.parameters.start_rate_mean, self.parameters.start_rate_pm)
            .with_final_years(self.parameters.final_years)
            .project(
                self.name(),
                &FinalAmount::Range(self.parameters.final_range),
                inputs.template,
                None,
                rng,
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::{drivers, template};
    use approx::assert_relative_eq;
    use ndarray::s;

    #[test]
    fn final_mean_is_within_range() {
        let drivers = drivers(3);
        let template = template(6, &drivers);
        let inputs = ProjectionInputs::new(&drivers, &template);
        let land_water = LandWater::from_parameters(LandWaterParameters::default());
        let field = land_water
            .project(&inputs, &mut RandomStream::from_seed(3))
            .unwrap();
        assert_eq!(field.shape(), &[6, 3, 94]);
        assert_eq!(land_water.range_kind(), RangeKind::Actual);

        // The final 20 years are 2081-2100
        let fraction = RandomStream::from_seed(3).uniform_2d(6, 3);
        for k in 0..6 {
            for c in 0..3 {
                let mean = field.data().slice(s![k, c, 74..]).mean().unwrap();
                let f = fraction[[k, c]];
                assert_relative_eq!(mean, (1.0 - f) * -0.01 + f * 0.09, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn ignores_shared_fraction() {
        let drivers = drivers(2);
        let template = template(2, &drivers);
        let shared = ndarray::Array2::zeros((2, 2));
        let land_water = LandWater::from_parameters(LandWaterParameters::default());
        let with_shared = land_water
            .project(
                &ProjectionInputs::new(&drivers, &template).with_fraction(&shared),
                &mut RandomStream::from_seed(1),
            )
            .unwrap();
        let without = land_water
            .project(
                &ProjectionInputs::new(&drivers, &template),
                &mut RandomStream::from_seed(1),
            )
            .unwrap();
        assert_eq!(with_shared, without);
    }
}
