//! Labelled n-dimensional fields
//!
//! A [`Field`] is an array of values together with the names of its axes and the metadata
//! attached to them. Arithmetic between fields broadcasts by axis *name* rather than by
//! position, so a `[climate, time]` expansion ensemble can be added to a
//! `[component, climate, time]` glacier ensemble without any manual reshaping.
//!
//! # Examples
//!
//! ```rust
//! use ndarray::{array, Array2};
//! use rslr_core::field::{AxisKind, Field};
//! use rslr_core::timeseries::TimeAxis;
//!
//! let time = TimeAxis::year_ends(2006, 2008);
//! let expansion = Field::new(
//!     "expansion",
//!     "m",
//!     vec![AxisKind::Climate, AxisKind::Time],
//!     array![[0.01, 0.02, 0.03], [0.02, 0.03, 0.04]].into_dyn(),
//!     Some(time.clone()),
//! )
//! .unwrap();
//! let offset = Field::new(
//!     "offset",
//!     "m",
//!     vec![AxisKind::Component, AxisKind::Climate],
//!     Array2::from_elem((4, 2), 1.0).into_dyn(),
//!     None,
//! )
//! .unwrap();
//!
//! let total = offset.try_add(&expansion).unwrap();
//! assert_eq!(total.shape(), &[4, 2, 3]);
//! ```

use crate::errors::{RSLRError, RSLRResult};
use crate::timeseries::{FloatValue, TimeAxis};
use ndarray::{Array2, ArrayD, ArrayViewD, Axis, IxDyn, Zip};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named axes a field can carry
///
/// The declaration order is the canonical axis order used for the results of arithmetic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisKind {
    /// Realisations of component (parametric and methodological) uncertainty
    #[serde(rename = "component_realization")]
    Component,
    /// Realisations of the driving climate variables
    #[serde(rename = "climate_realization")]
    Climate,
    /// Individual climate models of an input ensemble
    Model,
    Time,
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisKind::Component => "component_realization",
            AxisKind::Climate => "climate_realization",
            AxisKind::Model => "model",
            AxisKind::Time => "time",
        };
        write!(f, "{}", name)
    }
}

/// An n-dimensional array with named axes
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    units: String,
    axes: Vec<AxisKind>,
    data: ArrayD<FloatValue>,
    time: Option<TimeAxis>,
    models: Option<Vec<String>>,
}

impl Field {
    /// Create a new field
    ///
    /// The number of axes must equal the rank of `data` and no axis may appear twice.
    /// If time metadata is given, the field must have a time axis of the same length.
    pub fn new(
        name: impl Into<String>,
        units: impl Into<String>,
        axes: Vec<AxisKind>,
        data: ArrayD<FloatValue>,
        time: Option<TimeAxis>,
    ) -> RSLRResult<Self> {
        let name = name.into();
        if axes.len() != data.ndim() {
            return Err(RSLRError::validation(format!(
                "field {} has {} axis names for {}-dimensional data",
                name,
                axes.len(),
                data.ndim()
            )));
        }
        for (i, axis) in axes.iter().enumerate() {
            if axes[..i].contains(axis) {
                return Err(RSLRError::validation(format!(
                    "field {} has a duplicated {} axis",
                    name, axis
                )));
            }
        }
        let field = Self {
            name,
            units: units.into(),
            axes,
            data,
            time: None,
            models: None,
        };
        match time {
            Some(time) => field.with_time(time),
            None => Ok(field),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn axes(&self) -> &[AxisKind] {
        &self.axes
    }

    pub fn data(&self) -> &ArrayD<FloatValue> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<FloatValue> {
        self.data
    }

    pub fn time(&self) -> Option<&TimeAxis> {
        self.time.as_ref()
    }

    pub fn models(&self) -> Option<&[String]> {
        self.models.as_deref()
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn axis_index(&self, axis: AxisKind) -> Option<usize> {
        self.axes.iter().position(|a| *a == axis)
    }

    pub fn axis_len(&self, axis: AxisKind) -> Option<usize> {
        self.axis_index(axis).map(|i| self.data.len_of(Axis(i)))
    }

    fn require_axis(&self, axis: AxisKind) -> RSLRResult<usize> {
        self.axis_index(axis).ok_or_else(|| {
            RSLRError::validation(format!("field {} does not have a {} axis", self.name, axis))
        })
    }

    /// Whether any value is missing (stored as NaN)
    pub fn has_missing(&self) -> bool {
        self.data.iter().any(|v| v.is_nan())
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    pub fn with_units(self, units: impl Into<String>) -> Self {
        Self {
            units: units.into(),
            ..self
        }
    }

    /// Attach the names of the models along the model axis
    pub fn with_models(self, models: Vec<String>) -> RSLRResult<Self> {
        let n = self.require_axis(AxisKind::Model)?;
        let expected = self.data.len_of(Axis(n));
        if models.len() != expected {
            return Err(RSLRError::ShapeMismatch {
                what: format!("model names of field {}", self.name),
                expected: vec![expected],
                found: vec![models.len()],
            });
        }
        Ok(Self {
            models: Some(models),
            ..self
        })
    }

    /// Replace the time metadata, keeping the values
    ///
    /// This re-anchors a field onto a different time coordinate with the same length,
    /// e.g. moving an integral from mid-year to year-end time points.
    pub fn with_time(self, time: TimeAxis) -> RSLRResult<Self> {
        let n = self.require_axis(AxisKind::Time)?;
        let expected = self.data.len_of(Axis(n));
        if time.len() != expected {
            return Err(RSLRError::ShapeMismatch {
                what: format!("time axis of field {}", self.name),
                expected: vec![expected],
                found: vec![time.len()],
            });
        }
        Ok(Self {
            time: Some(time),
            ..self
        })
    }

    /// Reorder the axes
    ///
    /// `order` must name every axis of the field exactly once.
    pub fn transpose(&self, order: &[AxisKind]) -> RSLRResult<Self> {
        if order.len() != self.axes.len() {
            return Err(RSLRError::validation(format!(
                "cannot transpose field {} with axes {:?} to {:?}",
                self.name, self.axes, order
            )));
        }
        let permutation = order
            .iter()
            .map(|axis| self.require_axis(*axis))
            .collect::<RSLRResult<Vec<_>>>()?;
        let data = self
            .data
            .view()
            .permuted_axes(IxDyn(&permutation))
            .as_standard_layout()
            .into_owned();
        Ok(Self {
            axes: order.to_vec(),
            data,
            ..self.clone()
        })
    }

    /// Relabel an axis without touching the data
    pub fn rename_axis(self, from: AxisKind, to: AxisKind) -> RSLRResult<Self> {
        let i = self.require_axis(from)?;
        if from != to && self.axes.contains(&to) {
            return Err(RSLRError::validation(format!(
                "field {} already has a {} axis",
                self.name, to
            )));
        }
        let mut axes = self.axes;
        axes[i] = to;
        let models = if from == AxisKind::Model && to != AxisKind::Model {
            None
        } else {
            self.models
        };
        Ok(Self {
            axes,
            models,
            ..self
        })
    }

    /// Cumulative sum along an axis
    pub fn cumsum(&self, axis: AxisKind) -> RSLRResult<Self> {
        let i = self.require_axis(axis)?;
        let mut data = self.data.clone();
        data.accumulate_axis_inplace(Axis(i), |&prev, curr| *curr += prev);
        Ok(Self {
            data,
            ..self.clone()
        })
    }

    /// Collapse an axis by taking the mean along it
    pub fn mean_over(&self, axis: AxisKind) -> RSLRResult<Self> {
        let i = self.require_axis(axis)?;
        let data = self.data.mean_axis(Axis(i)).ok_or_else(|| {
            RSLRError::validation(format!(
                "cannot average field {} over an empty {} axis",
                self.name, axis
            ))
        })?;
        let mut axes = self.axes.clone();
        axes.remove(i);
        Ok(Self {
            name: self.name.clone(),
            units: self.units.clone(),
            axes,
            data,
            time: if axis == AxisKind::Time {
                None
            } else {
                self.time.clone()
            },
            models: if axis == AxisKind::Model {
                None
            } else {
                self.models.clone()
            },
        })
    }

    /// Apply a function to every value
    pub fn map<F>(&self, f: F) -> Self
    where
        F: Fn(FloatValue) -> FloatValue,
    {
        Self {
            data: self.data.mapv(f),
            ..self.clone()
        }
    }

    /// Replace every value above `limit` with `limit`
    pub fn clamp_max(self, limit: FloatValue) -> Self {
        let mut data = self.data;
        data.mapv_inplace(|v| if v > limit { limit } else { v });
        Self { data, ..self }
    }

    /// View of the data with axes reordered and expanded to match `axes`
    ///
    /// Axes in `axes` which the field does not have are inserted with length one.
    fn aligned_view(&self, axes: &[AxisKind]) -> RSLRResult<ArrayViewD<'_, FloatValue>> {
        let positions = self
            .axes
            .iter()
            .map(|axis| {
                axes.iter().position(|a| a == axis).ok_or_else(|| {
                    RSLRError::validation(format!(
                        "field {} has a {} axis which is not in {:?}",
                        self.name, axis, axes
                    ))
                })
            })
            .collect::<RSLRResult<Vec<_>>>()?;
        let mut permutation: Vec<usize> = (0..self.axes.len()).collect();
        permutation.sort_by_key(|&i| positions[i]);

        let mut view = self.data.view().permuted_axes(IxDyn(&permutation));
        for (i, axis) in axes.iter().enumerate() {
            if !self.axes.contains(axis) {
                view = view.insert_axis(Axis(i));
            }
        }
        Ok(view)
    }

    /// Broadcast the data to the given axes and shape
    pub fn broadcast_to(&self, axes: &[AxisKind], shape: &[usize]) -> RSLRResult<ArrayD<FloatValue>> {
        let view = self.aligned_view(axes)?;
        let broadcast = view.broadcast(IxDyn(shape)).ok_or_else(|| RSLRError::ShapeMismatch {
            what: format!("field {}", self.name),
            expected: shape.to_vec(),
            found: self.shape().to_vec(),
        })?;
        Ok(broadcast.to_owned())
    }

    fn combine<F>(&self, other: &Field, op: F) -> RSLRResult<Field>
    where
        F: Fn(FloatValue, FloatValue) -> FloatValue,
    {
        let mut axes: Vec<AxisKind> = self.axes.clone();
        for axis in &other.axes {
            if !axes.contains(axis) {
                axes.push(*axis);
            }
        }
        axes.sort();

        let mut shape = Vec::with_capacity(axes.len());
        for axis in &axes {
            let size = match (self.axis_len(*axis), other.axis_len(*axis)) {
                (Some(a), Some(b)) if a != b => {
                    return Err(RSLRError::ShapeMismatch {
                        what: format!("{} axis of {} and {}", axis, self.name, other.name),
                        expected: vec![a],
                        found: vec![b],
                    })
                }
                (Some(a), _) => a,
                (None, Some(b)) => b,
                (None, None) => unreachable!("axis is taken from one of the operands"),
            };
            shape.push(size);
        }

        let time = match (&self.time, &other.time) {
            (Some(a), Some(b)) if a.values() != b.values() => {
                return Err(RSLRError::validation(format!(
                    "time axes of {} and {} disagree",
                    self.name, other.name
                )))
            }
            (Some(a), _) => Some(a.clone()),
            (None, b) => b.clone(),
        };
        let models = self.models.clone().or_else(|| other.models.clone());

        let lhs = self.aligned_view(&axes)?;
        let rhs = other.aligned_view(&axes)?;
        let lhs = lhs
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| RSLRError::ShapeMismatch {
                what: format!("field {}", self.name),
                expected: shape.clone(),
                found: self.shape().to_vec(),
            })?;
        let rhs = rhs
            .broadcast(IxDyn(&shape))
            .ok_or_else(|| RSLRError::ShapeMismatch {
                what: format!("field {}", other.name),
                expected: shape.clone(),
                found: other.shape().to_vec(),
            })?;
        let data = Zip::from(&lhs).and(&rhs).map_collect(|&a, &b| op(a, b));

        Ok(Field {
            name: self.name.clone(),
            units: self.units.clone(),
            axes,
            data,
            time,
            models,
        })
    }

    /// Elementwise sum, broadcasting by axis name
    pub fn try_add(&self, other: &Field) -> RSLRResult<Field> {
        self.combine(other, |a, b| a + b)
    }

    /// Elementwise difference, broadcasting by axis name
    pub fn try_sub(&self, other: &Field) -> RSLRResult<Field> {
        self.combine(other, |a, b| a - b)
    }

    /// Elementwise product, broadcasting by axis name
    pub fn try_mul(&self, other: &Field) -> RSLRResult<Field> {
        self.combine(other, |a, b| a * b)
    }

    /// Reshape as `[realisation, time]`
    ///
    /// Time is moved to the last position and every other axis is flattened, in the
    /// field's own axis order, into a single realisation axis.
    pub fn realisations_by_time(&self) -> RSLRResult<Array2<FloatValue>> {
        let time = self.require_axis(AxisKind::Time)?;
        let mut order: Vec<AxisKind> = self
            .axes
            .iter()
            .copied()
            .filter(|a| *a != AxisKind::Time)
            .collect();
        order.push(AxisKind::Time);
        let nyr = self.data.len_of(Axis(time));
        let transposed = self.transpose(&order)?;
        let nreal = if nyr == 0 { 0 } else { transposed.len() / nyr };
        transposed
            .data
            .into_shape((nreal, nyr))
            .map_err(|e| RSLRError::Error(format!("cannot reshape field {}: {}", self.name, e)))
    }
}
