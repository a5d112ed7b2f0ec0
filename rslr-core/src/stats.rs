//! Summary statistics of ensembles
//!
//! Projected quantities are summarised per year over their realisations in one of two ways:
//!
//! - [`vlikely_range`]: median and the 5-95% range. Following the AR5 interpretation, the
//!   5-95% range of *model* projections is taken as the assessed *likely* range.
//! - [`actual_range`]: mean, minimum and maximum, used for quantities whose uncertainty is
//!   a uniform distribution between bounds.

use crate::errors::{RSLRError, RSLRResult};
use crate::timeseries::FloatValue;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// Percentiles reported by [`vlikely_range`], in row order
pub const LIKELY_PERCENTILES: [FloatValue; 3] = [50.0, 5.0, 95.0];

/// Percentile of a set of values using linear interpolation between order statistics
///
/// This is the default definition used by numpy (`method="linear"`). `sorted` must already
/// be sorted in increasing order.
pub fn percentile_of_sorted(sorted: &[FloatValue], q: FloatValue) -> FloatValue {
    let n = sorted.len();
    if n == 0 {
        return FloatValue::NAN;
    }
    let position = q / 100.0 * (n - 1) as FloatValue;
    let lower = position.floor() as usize;
    let upper = position.ceil().min((n - 1) as FloatValue) as usize;
    let weight = position - lower as FloatValue;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

fn sorted(column: ArrayView1<FloatValue>) -> Vec<FloatValue> {
    let mut values = column.to_vec();
    values.sort_by(|a, b| a.total_cmp(b));
    values
}

/// Median and 5-95% range along the first axis
///
/// Returns an array of shape `[3, n]` whose rows are the 50th, 5th and 95th percentiles.
pub fn vlikely_range(data: ArrayView2<FloatValue>) -> Array2<FloatValue> {
    let mut result = Array2::zeros((LIKELY_PERCENTILES.len(), data.ncols()));
    for (j, column) in data.axis_iter(Axis(1)).enumerate() {
        let values = sorted(column);
        for (i, q) in LIKELY_PERCENTILES.iter().enumerate() {
            result[[i, j]] = percentile_of_sorted(&values, *q);
        }
    }
    result
}

/// Mean and actual range along the first axis
///
/// Returns an array of shape `[3, n]` whose rows are the mean, minimum and maximum.
pub fn actual_range(data: ArrayView2<FloatValue>) -> Array2<FloatValue> {
    let mut result = Array2::zeros((3, data.ncols()));
    for (j, column) in data.axis_iter(Axis(1)).enumerate() {
        let n = column.len() as FloatValue;
        result[[0, j]] = column.sum() / n;
        result[[1, j]] = column.fold(FloatValue::INFINITY, |acc, &v| acc.min(v));
        result[[2, j]] = column.fold(FloatValue::NEG_INFINITY, |acc, &v| acc.max(v));
    }
    result
}

/// How the range of a quantity is summarised
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeKind {
    /// Median and 5-95% percentiles
    Likely,
    /// Mean, minimum and maximum
    Actual,
}

/// Central value and range of a quantity for each year
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStatistics {
    pub kind: RangeKind,
    /// Median or mean
    pub mid: Array1<FloatValue>,
    /// 5th percentile or minimum
    pub lower: Array1<FloatValue>,
    /// 95th percentile or maximum
    pub upper: Array1<FloatValue>,
}

impl SummaryStatistics {
    /// Summarise `[realisation, time]` data
    pub fn from_realisations(data: ArrayView2<FloatValue>, kind: RangeKind) -> RSLRResult<Self> {
        if data.nrows() == 0 || data.ncols() == 0 {
            return Err(RSLRError::validation(
                "cannot summarise an empty ensemble".to_string(),
            ));
        }
        let rows = match kind {
            RangeKind::Likely => vlikely_range(data),
            RangeKind::Actual => actual_range(data),
        };
        Ok(Self {
            kind,
            mid: rows.row(0).to_owned(),
            lower: rows.row(1).to_owned(),
            upper: rows.row(2).to_owned(),
        })
    }

    /// `(mid, lower, upper)` in the final year
    pub fn final_year(&self) -> (FloatValue, FloatValue, FloatValue) {
        let last = self.mid.len() - 1;
        (self.mid[last], self.lower[last], self.upper[last])
    }
}

/// Inverse of the standard normal cumulative distribution function
///
/// Returns `-inf` for `p <= 0`, `+inf` for `p >= 1` and NaN for NaN.
pub fn norm_ppf(p: FloatValue) -> RSLRResult<FloatValue> {
    if p.is_nan() {
        return Ok(FloatValue::NAN);
    }
    if p <= 0.0 {
        return Ok(FloatValue::NEG_INFINITY);
    }
    if p >= 1.0 {
        return Ok(FloatValue::INFINITY);
    }
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| RSLRError::Error(format!("standard normal distribution: {}", e)))?;
    Ok(normal.inverse_cdf(p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use is_close::is_close;
    use ndarray::{array, Array2};

    #[test]
    fn percentiles_match_linear_interpolation() {
        // numpy.percentile(numpy.arange(1, 11), [50, 5, 95]) == [5.5, 1.45, 9.55]
        let data = Array2::from_shape_fn((10, 1), |(i, _)| (i + 1) as f64);
        let range = vlikely_range(data.view());
        assert_relative_eq!(range[[0, 0]], 5.5, epsilon = 1e-12);
        assert_relative_eq!(range[[1, 0]], 1.45, epsilon = 1e-12);
        assert_relative_eq!(range[[2, 0]], 9.55, epsilon = 1e-12);
    }

    #[test]
    fn percentiles_ignore_input_order() {
        let data = array![[3.0, 10.0], [1.0, 30.0], [2.0, 20.0]];
        let range = vlikely_range(data.view());
        for (value, expected) in range.iter().zip([2.0, 20.0, 1.1, 11.0, 2.9, 29.0]) {
            assert!(is_close!(*value, expected), "Expected {}, got {}", expected, value);
        }
    }

    #[test]
    fn percentile_of_single_value() {
        assert_eq!(percentile_of_sorted(&[4.0], 95.0), 4.0);
        assert!(percentile_of_sorted(&[], 50.0).is_nan());
    }

    #[test]
    fn actual_range_is_mean_min_max() {
        let data = array![[1.0, -1.0], [2.0, 0.0], [6.0, 4.0]];
        let range = actual_range(data.view());
        assert_eq!(range, array![[3.0, 1.0], [1.0, -1.0], [6.0, 4.0]]);
    }

    #[test]
    fn summary_final_year() {
        let data = array![[1.0, 10.0], [2.0, 20.0], [3.0, 30.0]];
        let stats = SummaryStatistics::from_realisations(data.view(), RangeKind::Actual).unwrap();
        assert_eq!(stats.final_year(), (20.0, 10.0, 30.0));

        let empty = Array2::<f64>::zeros((0, 3));
        assert!(SummaryStatistics::from_realisations(empty.view(), RangeKind::Likely).is_err());
    }

    #[test]
    fn norm_ppf_reference_values() {
        // scipy.stats.norm.ppf
        assert_relative_eq!(norm_ppf(0.5).unwrap(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(norm_ppf(0.975).unwrap(), 1.959_963_984_540_054, epsilon = 1e-12);
        assert_relative_eq!(norm_ppf(0.05).unwrap(), -1.644_853_626_951_472_7, epsilon = 1e-12);
        assert_relative_eq!(norm_ppf(0.8413447460685429).unwrap(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(norm_ppf(1e-10).unwrap(), -6.361_340_902_404_056, epsilon = 1e-9);
    }

    #[test]
    fn norm_ppf_is_antisymmetric() {
        for p in [0.001, 0.01, 0.1, 0.3, 0.45] {
            assert_relative_eq!(
                norm_ppf(p).unwrap(),
                -norm_ppf(1.0 - p).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn norm_ppf_limits() {
        assert_eq!(norm_ppf(0.0).unwrap(), f64::NEG_INFINITY);
        assert_eq!(norm_ppf(-0.5).unwrap(), f64::NEG_INFINITY);
        assert_eq!(norm_ppf(1.0).unwrap(), f64::INFINITY);
        assert!(norm_ppf(f64::NAN).unwrap().is_nan());
    }
}
