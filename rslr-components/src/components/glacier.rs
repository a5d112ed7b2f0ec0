//! Glacier contribution
//!
//! The component realisations are divided into equal blocks, one for each glacier method.
//! Within a block, each realisation is the projection of the method for the climate
//! realisation plus a random methodological error, which is proportional to the projection
//! for the ensemble-mean temperature and is shared by all climate realisations.

use crate::constants::M_PER_MM;
use crate::parameters::{GlacierMethod, GlacierParameters};
use log::debug;
use ndarray::{Array1, Array2, Array3};
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::Field;
use rslr_core::projector::{ProjectionInputs, Projector};
use rslr_core::random::RandomStream;
use rslr_core::timeseries::{FloatValue, Year};

#[derive(Debug, Clone)]
pub struct Glacier {
    parameters: GlacierParameters,
}

impl Glacier {
    pub fn from_parameters(parameters: GlacierParameters) -> Self {
        Self { parameters }
    }

    /// Glacier contribution (m) of one method for a time-integral of temperature (K yr)
    ///
    /// Negative integrals give no contribution.
    pub fn calculate_contribution(
        method: &GlacierMethod,
        integrated_temperature: FloatValue,
    ) -> FloatValue {
        M_PER_MM * method.factor * integrated_temperature.max(0.0).powf(method.exponent)
    }

    /// Contribution already made at the start of the projection relative to the AR5
    /// reference period (m)
    fn contribution_at_start(&self, start_year: Year) -> FloatValue {
        self.parameters.reference_rate
            * (start_year - self.parameters.reference_year) as FloatValue
            * M_PER_MM
    }
}

impl Projector for Glacier {
    fn name(&self) -> &'static str {
        "glacier"
    }

    fn project(&self, inputs: &ProjectionInputs, rng: &mut RandomStream) -> RSLRResult<Field> {
        let template = inputs.template;
        let (nm, nt, nyr) = template.shape();
        let methods = self.parameters.family.methods();
        if nm % methods.len() != 0 {
            return Err(RSLRError::validation(format!(
                "number of realisations ({}) must be a multiple of the number of glacier methods ({})",
                nm,
                methods.len()
            )));
        }
        let per_method = nm / methods.len();
        debug!(
            "glacier: {} methods from {}, {} realisations each",
            methods.len(),
            self.parameters.family,
            per_method
        );

        let r = rng.standard_normal(nm);
        let drivers = inputs.drivers;

        let mut data = Array3::zeros((nm, nt, nyr));
        for (i, method) in methods.iter().enumerate() {
            let mean: Array1<FloatValue> = drivers
                .integrated_temperature_mean
                .mapv(|it| Self::calculate_contribution(method, it));
            let ensemble: Array2<FloatValue> = drivers
                .integrated_temperature
                .mapv(|it| Self::calculate_contribution(method, it));
            for k in (i * per_method)..((i + 1) * per_method) {
                let error = r[k] * method.cv;
                for c in 0..nt {
                    for j in 0..nyr {
                        data[[k, c, j]] = ensemble[[c, j]] + mean[j] * error;
                    }
                }
            }
        }

        let offset = self.contribution_at_start(template.start_year());
        data.mapv_inplace(|v| v + offset);
        Ok(template
            .field(self.name(), "m", data)?
            .clamp_max(self.parameters.initial_mass_sle()))
    }
}
