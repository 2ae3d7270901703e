//! Strict validation of caller-supplied date strings.
//!
//! Queries accept dates only as `YYYY-MM-DD`. Validation happens before any
//! dataset call is issued, so a malformed input never reaches the storage
//! backend.

use chrono::NaiveDate;

use crate::query::error::QueryError;
use crate::types::measurement::DateRange;

/// The only accepted input format. Lexicographic order over this fixed
/// representation matches chronological order, which the original data
/// relied on; `NaiveDate` ordering preserves the same property.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATE_LEN: usize = 10;

/// Parses a query date, rejecting anything that is not a well-formed
/// `YYYY-MM-DD` string of exactly 10 characters.
///
/// The length check is redundant with the strict parse for every date the
/// parse accepts, but it is enforced independently; both checks were part of
/// the original contract.
pub fn parse_query_date(raw: &str) -> Result<NaiveDate, QueryError> {
    let parsed = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| QueryError::InvalidDateFormat(raw.to_string()))?;
    if raw.len() != DATE_LEN {
        return Err(QueryError::InvalidDateFormat(raw.to_string()));
    }
    Ok(parsed)
}

/// Validates a start date and an optional end date into a [`DateRange`].
///
/// Fails with [`QueryError::InvalidDateFormat`] on a malformed input and
/// with [`QueryError::InvalidRange`] when the start is after the end.
pub fn validate_range(start: &str, end: Option<&str>) -> Result<DateRange, QueryError> {
    let start = parse_query_date(start)?;
    let end = end.map(parse_query_date).transpose()?;
    if let Some(end) = end {
        if start > end {
            return Err(QueryError::InvalidRange { start, end });
        }
    }
    Ok(DateRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_dates() {
        let date = parse_query_date("2017-08-23").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2017, 8, 23).unwrap());
        // Leap day.
        assert!(parse_query_date("2016-02-29").is_ok());
    }

    #[test]
    fn rejects_malformed_dates() {
        for raw in [
            "2017/08/23",
            "08-23-2017",
            "2017-8-23",   // right date, wrong width
            "2017-13-01",  // no thirteenth month
            "2017-02-30",  // no February 30th
            "2017-02-29",  // not a leap year
            "2017-08-2",
            "2017-08-233",
            "not-a-date",
            "",
        ] {
            let err = parse_query_date(raw).unwrap_err();
            assert!(
                matches!(&err, QueryError::InvalidDateFormat(v) if v == raw),
                "expected InvalidDateFormat for {raw:?}, got {err:?}"
            );
        }
    }

    #[test]
    fn range_orders_start_before_end() {
        let err = validate_range("2017-01-10", Some("2017-01-05")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));
    }

    #[test]
    fn range_allows_equal_bounds_and_open_end() {
        let range = validate_range("2017-01-05", Some("2017-01-05")).unwrap();
        assert_eq!(range.start, range.end.unwrap());

        let open = validate_range("2017-01-05", None).unwrap();
        assert!(open.end.is_none());
    }
}
