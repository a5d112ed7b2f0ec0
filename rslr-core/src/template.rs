//! The shape shared by every component projection

use crate::errors::{RSLRError, RSLRResult};
use crate::field::{AxisKind, Field};
use crate::timeseries::{FloatValue, TimeAxis, Year};
use ndarray::{Array1, Array2, Array3};

/// Axes of a component projection
pub const PROJECTION_AXES: [AxisKind; 3] = [AxisKind::Component, AxisKind::Climate, AxisKind::Time];

/// The `[component, climate, time]` shape of a projection
///
/// Every component projector returns a field with exactly this shape, so that the
/// components can be summed realisation by realisation.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    n_component: usize,
    n_climate: usize,
    time: TimeAxis,
}

impl Template {
    pub fn new(n_component: usize, n_climate: usize, time: TimeAxis) -> RSLRResult<Self> {
        if n_component == 0 || n_climate == 0 || time.is_empty() {
            return Err(RSLRError::validation(format!(
                "projection template must not be empty, got ({}, {}, {})",
                n_component,
                n_climate,
                time.len()
            )));
        }
        Ok(Self {
            n_component,
            n_climate,
            time,
        })
    }

    /// Number of component realisations (`nm`)
    pub fn n_component(&self) -> usize {
        self.n_component
    }

    /// Number of climate realisations (`nt`)
    pub fn n_climate(&self) -> usize {
        self.n_climate
    }

    /// Number of output years
    pub fn n_years(&self) -> usize {
        self.time.len()
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.n_component, self.n_climate, self.time.len())
    }

    pub fn time(&self) -> &TimeAxis {
        &self.time
    }

    pub fn years(&self) -> Vec<Year> {
        self.time.years()
    }

    /// The year in which the projection starts, i.e. the year before the first output year
    pub fn start_year(&self) -> Year {
        self.years()[0] - 1
    }

    /// Years elapsed since the start at each output time, beginning at one
    pub fn elapsed_years(&self) -> Array1<FloatValue> {
        let years = self.years();
        let first = years[0];
        years
            .iter()
            .map(|year| (year - first + 1) as FloatValue)
            .collect()
    }

    /// Wrap a `[component, climate, time]` array as a field, checking its shape
    pub fn field(
        &self,
        name: &str,
        units: &str,
        data: Array3<FloatValue>,
    ) -> RSLRResult<Field> {
        if data.dim() != self.shape() {
            let (a, b, c) = data.dim();
            let (x, y, z) = self.shape();
            return Err(RSLRError::ShapeMismatch {
                what: name.to_string(),
                expected: vec![x, y, z],
                found: vec![a, b, c],
            });
        }
        Field::new(
            name,
            units,
            PROJECTION_AXES.to_vec(),
            data.into_dyn(),
            Some(self.time.clone()),
        )
    }

    /// Check that a `[component, climate]` array of random numbers matches the template
    pub fn check_realisations(&self, what: &str, values: &Array2<FloatValue>) -> RSLRResult<()> {
        if values.dim() != (self.n_component, self.n_climate) {
            return Err(RSLRError::validation(format!(
                "{} is the wrong size: expected {} values, got {}",
                what,
                self.n_component * self.n_climate,
                values.len()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_years_start_at_one() {
        let template = Template::new(2, 3, TimeAxis::year_ends(2006, 2010)).unwrap();
        assert_eq!(template.shape(), (2, 3, 5));
        assert_eq!(template.start_year(), 2006);
        assert_eq!(
            template.elapsed_years().to_vec(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
    }

    #[test]
    fn field_checks_shape() {
        let template = Template::new(2, 3, TimeAxis::year_ends(2006, 2010)).unwrap();
        assert!(template.field("x", "m", Array3::zeros((2, 3, 5))).is_ok());
        assert!(template.field("x", "m", Array3::zeros((3, 2, 5))).is_err());
    }

    #[test]
    fn rejects_empty_template() {
        assert!(Template::new(0, 3, TimeAxis::year_ends(2006, 2010)).is_err());
    }

    #[test]
    fn wrong_size_fraction_is_rejected() {
        let template = Template::new(2, 3, TimeAxis::year_ends(2006, 2010)).unwrap();
        assert!(template
            .check_realisations("fraction", &Array2::zeros((2, 3)))
            .is_ok());
        assert!(template
            .check_realisations("fraction", &Array2::zeros((3, 2)))
            .is_err());
    }
}
