//! Reading the climate inputs of a scenario and building the climate ensemble
//!
//! Each scenario has either a mean and a standard deviation timeseries of temperature and
//! of thermal expansion, or a set of individual model timeseries of both. From the mean
//! and standard deviation, an ensemble of perfectly correlated realisations is generated;
//! otherwise each model is one climate realisation.

use log::{debug, info};
use ndarray::{Array1, Array2, Ix1, Ix2};
use rslr_core::drivers::ClimateDrivers;
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::{AxisKind, Field};
use rslr_core::io::read_field;
use rslr_core::random::RandomStream;
use rslr_core::template::Template;
use rslr_core::timeseries::{FloatValue, TimeAxis, Year};
use std::path::{Path, PathBuf};

/// Last year for which temperature input is accepted
pub const LAST_INPUT_YEAR: Year = 2100;

/// Path of an input file
pub fn input_path(input: &Path, scenario: &str, quantity: &str, statistic: &str) -> PathBuf {
    input.join(format!("{}_{}_{}.json", scenario, quantity, statistic))
}

/// The climate inputs of one scenario
#[derive(Debug, Clone)]
pub enum ScenarioInputs {
    /// One-dimensional timeseries of the ensemble statistics
    MeanSd {
        temperature_mean: Field,
        temperature_sd: Field,
        expansion_mean: Field,
        expansion_sd: Field,
    },
    /// `[model, time]` timeseries of individual models
    Models { temperature: Field, expansion: Field },
}

fn read_input(
    input: &Path,
    scenario: &str,
    quantity: &str,
    statistic: &str,
    models: bool,
) -> RSLRResult<Field> {
    let path = input_path(input, scenario, quantity, statistic);
    let field = read_field(&path)?;
    let ndim = if models { 2 } else { 1 };
    if field.ndim() != ndim {
        return Err(RSLRError::validation(format!(
            "field is not {}-dimensional in file {}",
            ndim,
            path.display()
        )));
    }
    if field.axis_index(AxisKind::Time).is_none() || field.time().is_none() {
        return Err(RSLRError::validation(format!(
            "field does not have a time axis in file {}",
            path.display()
        )));
    }
    if models && field.axis_index(AxisKind::Model).is_none() {
        return Err(RSLRError::validation(format!(
            "field does not have a model axis in file {}",
            path.display()
        )));
    }
    if field.has_missing() {
        return Err(RSLRError::validation(format!(
            "missing data is not allowed in file {}",
            path.display()
        )));
    }
    debug!("read {} with shape {:?}", path.display(), field.shape());
    Ok(field)
}

impl ScenarioInputs {
    /// Read the input files of a scenario, either the `models` files or the `mean` and `sd`
    /// files
    pub fn read(input: &Path, scenario: &str, models: bool) -> RSLRResult<Self> {
        if models {
            Ok(ScenarioInputs::Models {
                temperature: read_input(input, scenario, "temperature", "models", true)?,
                expansion: read_input(input, scenario, "expansion", "models", true)?,
            })
        } else {
            Ok(ScenarioInputs::MeanSd {
                temperature_mean: read_input(input, scenario, "temperature", "mean", false)?,
                temperature_sd: read_input(input, scenario, "temperature", "sd", false)?,
                expansion_mean: read_input(input, scenario, "expansion", "mean", false)?,
                expansion_sd: read_input(input, scenario, "expansion", "sd", false)?,
            })
        }
    }

    fn temperature(&self) -> &Field {
        match self {
            ScenarioInputs::MeanSd {
                temperature_mean, ..
            } => temperature_mean,
            ScenarioInputs::Models { temperature, .. } => temperature,
        }
    }

    fn expansion(&self) -> &Field {
        match self {
            ScenarioInputs::MeanSd { expansion_mean, .. } => expansion_mean,
            ScenarioInputs::Models { expansion, .. } => expansion,
        }
    }

    /// Check that the inputs are consistent with each other and with the start year
    ///
    /// Temperature must apply to calendar years, beginning in `start_year`
    /// and ending no later than the start of 2100. Expansion must apply at the ends of those
    /// years.
    pub fn validate(&self, scenario: &str, start_year: Year) -> RSLRResult<()> {
        match self {
            ScenarioInputs::Models {
                temperature,
                expansion,
            } => {
                if temperature.models() != expansion.models() {
                    return Err(RSLRError::validation(format!(
                        "model axes do not agree for temperature and expansion in scenario {}",
                        scenario
                    )));
                }
            }
            ScenarioInputs::MeanSd {
                temperature_mean,
                temperature_sd,
                expansion_mean,
                expansion_sd,
            } => {
                for (quantity, mean, sd) in [
                    ("temperature", temperature_mean, temperature_sd),
                    ("expansion", expansion_mean, expansion_sd),
                ] {
                    if mean.time() != sd.time() {
                        return Err(RSLRError::validation(format!(
                            "time axes of mean and sd fields disagree for {} in scenario {}",
                            quantity, scenario
                        )));
                    }
                }
            }
        }

        let temperature_time = time_of(self.temperature())?;
        let (upper, upper_years) = match (
            temperature_time.upper_bounds(),
            temperature_time.upper_bound_years(),
        ) {
            (Some(upper), Some(years)) if temperature_time.is_calendar_years() => (upper, years),
            _ => {
                return Err(RSLRError::validation(
                    "temperature values must be for calendar years",
                ))
            }
        };
        if upper_years.first().map(|y| y - 1) != Some(start_year) {
            return Err(RSLRError::validation(format!(
                "temperature must begin at {}",
                start_year
            )));
        }
        if upper_years.last().is_some_and(|&y| y > LAST_INPUT_YEAR) {
            return Err(RSLRError::validation(format!(
                "temperature input must not go beyond {}",
                LAST_INPUT_YEAR
            )));
        }
        if time_of(self.expansion())?.values() != upper.as_slice() {
            return Err(RSLRError::validation(
                "expansion must be for the ends of calendar years",
            ));
        }
        Ok(())
    }
}

fn time_of(field: &Field) -> RSLRResult<&TimeAxis> {
    field.time().ok_or_else(|| {
        RSLRError::validation(format!("field {} does not have a time axis", field.name()))
    })
}

fn series(field: &Field) -> RSLRResult<Array1<FloatValue>> {
    field
        .data()
        .clone()
        .into_dimensionality::<Ix1>()
        .map_err(|e| RSLRError::Error(format!("field {} is not a timeseries: {}", field.name(), e)))
}

fn realisations(field: &Field) -> RSLRResult<Array2<FloatValue>> {
    field
        .transpose(&[AxisKind::Climate, AxisKind::Time])?
        .into_data()
        .into_dimensionality::<Ix2>()
        .map_err(|e| RSLRError::Error(format!("field {} is not an ensemble: {}", field.name(), e)))
}

/// Build the climate ensemble and the shape of the component projections
///
/// The temperature inputs are integrated in time and moved onto the year-end time axis of
/// expansion. With the mean and sd inputs, `n_climate` realisations are generated as
/// `mean + z * sd` for a single standard normal deviate `z` per realisation, multiplied by
/// `tcv`, so that temperature, its integral and expansion are perfectly correlated.
pub fn build_ensemble(
    inputs: &ScenarioInputs,
    n_component: usize,
    n_climate: usize,
    tcv: FloatValue,
    rng: &mut RandomStream,
) -> RSLRResult<(ClimateDrivers, Template)> {
    let expansion_time = inputs
        .expansion()
        .time()
        .cloned()
        .ok_or_else(|| RSLRError::validation("expansion does not have a time axis"))?;
    let integrate =
        |field: &Field| -> RSLRResult<Field> { field.cumsum(AxisKind::Time)?.with_time(expansion_time.clone()) };

    let drivers = match inputs {
        ScenarioInputs::MeanSd {
            temperature_mean,
            temperature_sd,
            expansion_mean,
            expansion_sd,
        } => {
            let z = rng.standard_normal(n_climate).mapv(|z| z * tcv);
            let sample = |mean: Array1<FloatValue>, sd: Array1<FloatValue>| {
                Array2::from_shape_fn((n_climate, mean.len()), |(c, j)| z[c] * sd[j] + mean[j])
            };
            let it_mean = series(&integrate(temperature_mean)?)?;
            let it_sd = series(&integrate(temperature_sd)?)?;
            ClimateDrivers::new(
                sample(series(temperature_mean)?, series(temperature_sd)?),
                sample(it_mean.clone(), it_sd),
                it_mean,
                sample(series(expansion_mean)?, series(expansion_sd)?),
                expansion_time.clone(),
            )?
        }
        ScenarioInputs::Models {
            temperature,
            expansion,
        } => {
            let integrated = integrate(temperature)?;
            let it_mean = series(&integrated.mean_over(AxisKind::Model)?)?;
            let as_climate = |field: Field| field.rename_axis(AxisKind::Model, AxisKind::Climate);
            ClimateDrivers::new(
                realisations(&as_climate(temperature.clone())?)?,
                realisations(&as_climate(integrated)?)?,
                it_mean,
                realisations(&as_climate(expansion.clone())?)?,
                expansion_time.clone(),
            )?
        }
    };

    let template = Template::new(n_component, drivers.n_climate(), expansion_time)?;
    info!(
        "climate ensemble of {} realisations for {} years",
        drivers.n_climate(),
        template.n_years()
    );
    Ok((drivers, template))
}
