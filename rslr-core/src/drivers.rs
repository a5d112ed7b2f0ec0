//! The ensemble of driving climate variables

use crate::errors::{RSLRError, RSLRResult};
use crate::field::{AxisKind, Field};
use crate::timeseries::{FloatValue, TimeAxis};
use ndarray::{Array1, Array2};

/// Climate realisations of temperature, its time-integral and thermal expansion
///
/// All arrays are `[climate, time]` on the same year-end time axis. The ensemble is built
/// once per scenario and only read by the component projectors.
#[derive(Debug, Clone)]
pub struct ClimateDrivers {
    /// Global mean surface temperature anomaly (K)
    pub temperature: Array2<FloatValue>,
    /// Time-integral of the temperature anomaly (K yr)
    pub integrated_temperature: Array2<FloatValue>,
    /// Time-integral of the ensemble-mean temperature anomaly (K yr)
    pub integrated_temperature_mean: Array1<FloatValue>,
    /// Global mean thermosteric sea-level rise (m)
    pub expansion: Array2<FloatValue>,
    time: TimeAxis,
}

impl ClimateDrivers {
    pub fn new(
        temperature: Array2<FloatValue>,
        integrated_temperature: Array2<FloatValue>,
        integrated_temperature_mean: Array1<FloatValue>,
        expansion: Array2<FloatValue>,
        time: TimeAxis,
    ) -> RSLRResult<Self> {
        let expected = (temperature.nrows(), time.len());
        for (name, dim) in [
            ("temperature", temperature.dim()),
            ("integrated temperature", integrated_temperature.dim()),
            ("expansion", expansion.dim()),
        ] {
            if dim != expected {
                return Err(RSLRError::ShapeMismatch {
                    what: format!("{} ensemble", name),
                    expected: vec![expected.0, expected.1],
                    found: vec![dim.0, dim.1],
                });
            }
        }
        if integrated_temperature_mean.len() != time.len() {
            return Err(RSLRError::ShapeMismatch {
                what: "ensemble-mean integrated temperature".to_string(),
                expected: vec![time.len()],
                found: vec![integrated_temperature_mean.len()],
            });
        }
        Ok(Self {
            temperature,
            integrated_temperature,
            integrated_temperature_mean,
            expansion,
            time,
        })
    }

    /// Number of climate realisations
    pub fn n_climate(&self) -> usize {
        self.temperature.nrows()
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    fn field(&self, name: &str, units: &str, data: &Array2<FloatValue>) -> RSLRResult<Field> {
        Field::new(
            name,
            units,
            vec![AxisKind::Climate, AxisKind::Time],
            data.clone().into_dyn(),
            Some(self.time.clone()),
        )
    }

    pub fn temperature_field(&self) -> RSLRResult<Field> {
        self.field("temperature", "K", &self.temperature)
    }

    pub fn expansion_field(&self) -> RSLRResult<Field> {
        self.field("expansion", "m", &self.expansion)
    }
}
