use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One observation record: a station, a date, precipitation, and a
/// temperature reading.
///
/// Dates are not unique per station; several stations may report the same
/// date. Records are read-only, sourced entirely from the underlying dataset.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Id of the reporting station.
    pub station: String,
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Precipitation in inches; missing for days the gauge was not read.
    pub precipitation: Option<f64>,
    /// Temperature observation (TOBS).
    pub temperature: f64,
}

/// An inclusive date filter with an optional upper bound.
///
/// When `end` is absent the range is open-ended (`start..∞`). Ranges are
/// produced by [`crate::validate_range`], which guarantees `start <= end`
/// whenever `end` is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// First date included in the filter.
    pub start: NaiveDate,
    /// Last date included in the filter, if bounded.
    pub end: Option<NaiveDate>,
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}..{}", self.start, end),
            None => write!(f, "{}..", self.start),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_display() {
        let start = NaiveDate::from_ymd_opt(2017, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2017, 1, 5).unwrap();

        let closed = DateRange {
            start,
            end: Some(end),
        };
        assert_eq!(closed.to_string(), "2017-01-01..2017-01-05");

        let open = DateRange { start, end: None };
        assert_eq!(open.to_string(), "2017-01-01..");
    }
}
