//! Time coordinates for annual sea-level timeseries.
//!
//! Temperature inputs apply to whole calendar years: each time point carries bounds from
//! 1 January of the year to 1 January of the next. Expansion and every projected quantity
//! apply at the ends of those years, so their time points equal the temperature upper bounds.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

pub type FloatValue = f64;

/// Calendar year
pub type Year = i32;

/// A time coordinate with optional cell bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeAxis {
    values: Vec<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds: Option<Vec<[NaiveDateTime; 2]>>,
}

fn new_year(year: Year) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or(NaiveDateTime::MIN)
}

impl TimeAxis {
    pub fn new(values: Vec<NaiveDateTime>, bounds: Option<Vec<[NaiveDateTime; 2]>>) -> Self {
        Self { values, bounds }
    }

    /// Mid-year time points for the calendar years `first..=last`, bounded by 1 January
    pub fn calendar_years(first: Year, last: Year) -> Self {
        let bounds: Vec<[NaiveDateTime; 2]> = (first..=last)
            .map(|year| [new_year(year), new_year(year + 1)])
            .collect();
        let values = bounds
            .iter()
            .map(|[lower, upper]| *lower + (*upper - *lower) / 2)
            .collect();
        Self {
            values,
            bounds: Some(bounds),
        }
    }

    /// Time points at the ends of the calendar years `first..=last`
    ///
    /// The end of year `Y` is represented as 1 January of `Y + 1`.
    pub fn year_ends(first: Year, last: Year) -> Self {
        Self {
            values: (first..=last).map(|year| new_year(year + 1)).collect(),
            bounds: None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[NaiveDateTime] {
        &self.values
    }

    pub fn bounds(&self) -> Option<&[[NaiveDateTime; 2]]> {
        self.bounds.as_deref()
    }

    pub fn lower_bounds(&self) -> Option<Vec<NaiveDateTime>> {
        self.bounds().map(|b| b.iter().map(|[lower, _]| *lower).collect())
    }

    pub fn upper_bounds(&self) -> Option<Vec<NaiveDateTime>> {
        self.bounds().map(|b| b.iter().map(|[_, upper]| *upper).collect())
    }

    /// Calendar year of each upper bound
    pub fn upper_bound_years(&self) -> Option<Vec<Year>> {
        self.bounds()
            .map(|b| b.iter().map(|[_, upper]| upper.year()).collect())
    }

    /// Calendar year of each time point
    pub fn years(&self) -> Vec<Year> {
        self.values.iter().map(|t| t.year()).collect()
    }

    /// Whether every cell spans exactly one calendar year, starting at midnight on 1 January
    ///
    /// An axis without bounds is never a calendar-year axis.
    pub fn is_calendar_years(&self) -> bool {
        let is_new_year = |t: &NaiveDateTime| {
            t.month() == 1 && t.day() == 1 && t.hour() == 0 && t.minute() == 0 && t.second() == 0
        };
        match self.bounds() {
            Some(bounds) => bounds.iter().all(|[lower, upper]| {
                is_new_year(lower) && is_new_year(upper) && upper.year() == lower.year() + 1
            }),
            None => false,
        }
    }

    /// The same time points with the bounds dropped
    pub fn without_bounds(&self) -> Self {
        Self {
            values: self.values.clone(),
            bounds: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calendar_years_have_new_year_bounds() {
        let axis = TimeAxis::calendar_years(2006, 2010);
        assert_eq!(axis.len(), 5);
        assert!(axis.is_calendar_years());
        assert_eq!(axis.years(), vec![2006, 2007, 2008, 2009, 2010]);

        let upper: Vec<Year> = axis
            .upper_bounds()
            .unwrap()
            .iter()
            .map(|t| t.year())
            .collect();
        assert_eq!(upper, vec![2007, 2008, 2009, 2010, 2011]);
    }

    #[test]
    fn year_ends_match_calendar_upper_bounds() {
        let temperature = TimeAxis::calendar_years(2006, 2100);
        let expansion = TimeAxis::year_ends(2006, 2100);
        assert_eq!(expansion.values(), temperature.upper_bounds().unwrap());
        assert_eq!(expansion.years()[0], 2007);
        assert!(!expansion.is_calendar_years());
    }

    #[test]
    fn mid_year_bounds_are_not_calendar_years() {
        let values = vec![new_year(2006)];
        let mid = new_year(2006) + chrono::Duration::days(182);
        let axis = TimeAxis::new(values, Some(vec![[mid, new_year(2007)]]));
        assert!(!axis.is_calendar_years());
    }

    #[test]
    fn serialises_dates_as_iso_strings() {
        let axis = TimeAxis::year_ends(2006, 2007);
        let json = serde_json::to_string(&axis).unwrap();
        assert_eq!(
            json,
            r#"{"values":["2007-01-01T00:00:00","2008-01-01T00:00:00"]}"#
        );
        let back: TimeAxis = serde_json::from_str(&json).unwrap();
        assert_eq!(back, axis);
    }
}
