//! Quadratic-in-time projection of a contribution
//!
//! Several contributions are projected without a physical dependence on the climate drivers:
//! their rate of change is assumed to increase linearly in time from a given start rate, so
//! the contribution is
//! $$ S(t) = a t^2 + b t $$
//! where $t$ is the number of years elapsed since the start, $b$ is the start rate and $a$ is
//! half the acceleration. Given $b$ and the required amount $S_f$ as a mean over the final
//! $n$ years $t_k$,
//! $$ a = \frac{S_f - b \, \overline{t_k}}{\overline{t_k^2}} $$

use crate::constants::M_PER_MM;
use ndarray::{Array1, Array2, Array3};
use rslr_core::errors::{RSLRError, RSLRResult};
use rslr_core::field::Field;
use rslr_core::random::RandomStream;
use rslr_core::template::Template;
use rslr_core::timeseries::FloatValue;

/// The amount a time projection must reach at the end
#[derive(Debug, Clone, PartialEq)]
pub enum FinalAmount {
    /// Likely range (m); realisations are spread uniformly between the trajectories that
    /// reach the two ends of the range
    Range([FloatValue; 2]),
    /// Final amount (m) for each `[component, climate]` realisation
    Sampled(Array2<FloatValue>),
}

/// A contribution which is a quadratic function of time
#[derive(Debug, Clone, PartialEq)]
pub struct TimeProjection {
    /// unit: mm / yr
    pub start_rate_mean: FloatValue,
    /// Half-width of the likely range of the start rate
    /// unit: mm / yr
    pub start_rate_pm: FloatValue,
    /// Number of years at the end over which the final amount is a time-mean
    pub final_years: usize,
}

impl TimeProjection {
    pub fn new(start_rate_mean: FloatValue, start_rate_pm: FloatValue) -> Self {
        Self {
            start_rate_mean,
            start_rate_pm,
            final_years: 1,
        }
    }

    pub fn with_final_years(self, final_years: usize) -> Self {
        Self {
            final_years,
            ..self
        }
    }

    /// Bounds of the likely range of the start rate (m / yr)
    fn start_rates(&self) -> [FloatValue; 2] {
        [
            (self.start_rate_mean - self.start_rate_pm) * M_PER_MM,
            (self.start_rate_mean + self.start_rate_pm) * M_PER_MM,
        ]
    }

    /// Project the contribution with the shape of `template`
    ///
    /// `fraction` holds `[component, climate]` random numbers in [0, 1] which place each
    /// realisation within the start-rate range and, for [`FinalAmount::Range`], within the
    /// final range. If it is not given, it is drawn from `rng`.
    pub fn project(
        &self,
        name: &str,
        final_amount: &FinalAmount,
        template: &Template,
        fraction: Option<&Array2<FloatValue>>,
        rng: &mut RandomStream,
    ) -> RSLRResult<Field> {
        let (nm, nt, nyr) = template.shape();
        if self.final_years == 0 || self.final_years > nyr {
            return Err(RSLRError::validation(format!(
                "final period of {} years is not within the {} years of the projection",
                self.final_years, nyr
            )));
        }

        let drawn;
        let fraction = match fraction {
            Some(fraction) => {
                template.check_realisations("fraction", fraction)?;
                fraction
            }
            None => {
                drawn = rng.uniform_2d(nm, nt);
                &drawn
            }
        };

        let time = template.elapsed_years();
        let final_years: Array1<FloatValue> = ((nyr - self.final_years + 1)..=nyr)
            .map(|year| year as FloatValue)
            .collect();
        let mean_year = final_years.sum() / self.final_years as FloatValue;
        let mean_year_sq = final_years.mapv(|y| y * y).sum() / self.final_years as FloatValue;
        let acceleration = |final_amount: FloatValue, start_rate: FloatValue| {
            (final_amount - start_rate * mean_year) / mean_year_sq
        };

        let start_rate = self.start_rates();
        let data = match final_amount {
            FinalAmount::Range(final_range) => {
                // Envelope of the lowest and highest trajectories
                let trajectories: Vec<Array1<FloatValue>> = (0..2)
                    .map(|i| {
                        let a = acceleration(final_range[i], start_rate[i]);
                        time.mapv(|t| a * t * t + start_rate[i] * t)
                    })
                    .collect();
                Array3::from_shape_fn((nm, nt, nyr), |(r, c, j)| {
                    let f = fraction[[r, c]];
                    (1.0 - f) * trajectories[0][j] + f * trajectories[1][j]
                })
            }
            FinalAmount::Sampled(final_values) => {
                if final_values.dim() != (nm, nt) {
                    return Err(RSLRError::ShapeMismatch {
                        what: "final array".to_string(),
                        expected: vec![nm, nt],
                        found: final_values.shape().to_vec(),
                    });
                }
                let rate = fraction.mapv(|f| (1.0 - f) * start_rate[0] + f * start_rate[1]);
                let a = ndarray::Zip::from(final_values)
                    .and(&rate)
                    .map_collect(|&s, &b| acceleration(s, b));
                Array3::from_shape_fn((nm, nt, nyr), |(r, c, j)| {
                    let t = time[j];
                    a[[r, c]] * t * t + rate[[r, c]] * t
                })
            }
        };

        template.field(name, "m", data)
    }
}
