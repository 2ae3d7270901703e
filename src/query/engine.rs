//! The four derived views over a climate dataset.
//!
//! Every operation is stateless: it validates its inputs, issues one or more
//! reads against the [`DatasetAccessor`], and returns a plain structured
//! result. Accessor failures propagate unchanged; nothing is retried.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::dataset::accessor::{DatasetAccessor, Observation};
use crate::query::dates::validate_range;
use crate::query::error::QueryError;
use crate::types::stats::TemperatureStats;

/// Number of raw days in the rolling window ending at a station's latest
/// observation. Deliberately not a calendar year: the window crosses
/// leap-year boundaries without adjustment.
const ROLLING_WINDOW_DAYS: i64 = 365;

/// Computes the derived query views over a [`DatasetAccessor`].
///
/// The engine holds no state besides the accessor handle; repeated identical
/// calls against an unchanged dataset return identical results.
pub struct QueryEngine<A> {
    accessor: A,
}

impl<A: DatasetAccessor> QueryEngine<A> {
    pub fn new(accessor: A) -> Self {
        Self { accessor }
    }

    /// The accessor this engine reads from.
    pub fn accessor(&self) -> &A {
        &self.accessor
    }

    /// Projects every measurement row onto a map from date to precipitation.
    ///
    /// When a date occurs on several rows (different stations reporting the
    /// same day), the last-seen value for that date wins. This collapsing
    /// mirrors the upstream behavior of keying an unordered bag of rows by
    /// date and is kept for compatibility; it is not deduplication by
    /// intent.
    pub fn precipitation_series(
        &self,
    ) -> Result<BTreeMap<NaiveDate, Option<f64>>, QueryError> {
        let mut series = BTreeMap::new();
        for (date, precipitation) in self.accessor.all_measurements()? {
            series.insert(date, precipitation);
        }
        Ok(series)
    }

    /// All distinct station ids, in the accessor's own order.
    pub fn station_list(&self) -> Result<Vec<String>, QueryError> {
        Ok(self.accessor.all_stations()?)
    }

    /// One rolling year of temperature observations from the most-observed
    /// station, newest first.
    ///
    /// The most active station is the one with the highest measurement row
    /// count. Ties resolve to whichever tied station the accessor lists
    /// first (station id ascending for the bundled frame accessor). The
    /// window covers the 365 raw days up to and including the station's own
    /// latest date. Duplicate dates within the window are preserved, so the
    /// result is a sequence rather than a map.
    pub fn most_active_station_year(&self) -> Result<Vec<Observation>, QueryError> {
        let mut counts = self.accessor.count_by_station()?;
        // Stable sort: tied counts keep the accessor's order.
        counts.sort_by(|a, b| b.observations.cmp(&a.observations));
        let top = counts.first().ok_or(QueryError::EmptyDataset)?;

        let latest = self
            .accessor
            .measurements_for_station(&top.station, None, None)?
            .iter()
            .map(|row| row.date)
            .max()
            .ok_or(QueryError::EmptyDataset)?;
        let window_start = latest - Duration::days(ROLLING_WINDOW_DAYS);

        let mut window =
            self.accessor
                .measurements_for_station(&top.station, Some(window_start), None)?;
        window.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(window)
    }

    /// Min/average/max temperature over an inclusive date range.
    ///
    /// With only `start` given the range is open-ended: every observation on
    /// or after `start` contributes. With both bounds the range is
    /// `start..=end`. Both inputs are validated before any dataset call, and
    /// an empty result reports the dataset's true first and last dates so
    /// the caller can correct the request.
    pub fn range_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, QueryError> {
        let range = validate_range(start, end)?;

        let rows = self.accessor.measurements_in_range(range.start, range.end)?;
        if rows.is_empty() {
            let (available_first, available_last) = self
                .accessor
                .first_and_last_date()?
                .ok_or(QueryError::EmptyDataset)?;
            return Err(QueryError::OutOfRange {
                requested: range,
                available_first,
                available_last,
            });
        }

        match self.accessor.extremes_in_range(range.start, range.end)? {
            Some(summary) => Ok(TemperatureStats::from(summary)),
            // The emptiness check above makes this unreachable for a
            // consistent accessor, but a racing backend still gets a
            // structured answer.
            None => {
                let (available_first, available_last) = self
                    .accessor
                    .first_and_last_date()?
                    .ok_or(QueryError::EmptyDataset)?;
                Err(QueryError::OutOfRange {
                    requested: range,
                    available_first,
                    available_last,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::frame_dataset::FrameDataset;
    use crate::types::station::Station;
    use polars::df;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn engine_over(frame: polars::prelude::DataFrame) -> QueryEngine<FrameDataset> {
        let stations = vec![Station::bare("USC1"), Station::bare("USC2")];
        QueryEngine::new(FrameDataset::from_frame(frame, stations).unwrap())
    }

    fn fixture() -> QueryEngine<FrameDataset> {
        engine_over(
            df!(
                "station" => ["USC1", "USC1", "USC2", "USC1"],
                "date" => ["2017-08-20", "2017-08-23", "2017-08-23", "2016-01-01"],
                "prcp" => [Some(0.05), Some(0.45), Some(0.02), None],
                "tobs" => [75.0, 80.0, 71.0, 62.0],
            )
            .unwrap(),
        )
    }

    #[test]
    fn precipitation_series_collapses_duplicate_dates() {
        let engine = fixture();
        let series = engine.precipitation_series().unwrap();
        // Three distinct dates out of four rows; 2017-08-23 appears for both
        // stations and collapses to the last-seen value.
        assert_eq!(series.len(), 3);
        assert_eq!(series[&ymd(2017, 8, 20)], Some(0.05));
        assert_eq!(series[&ymd(2016, 1, 1)], None);
        assert_eq!(series[&ymd(2017, 8, 23)], Some(0.02));
    }

    #[test]
    fn station_list_passes_through() {
        let engine = fixture();
        assert_eq!(engine.station_list().unwrap(), vec!["USC1", "USC2"]);
    }

    #[test]
    fn most_active_station_year_selects_top_station() {
        let engine = fixture();
        let rows = engine.most_active_station_year().unwrap();
        // USC1 has 3 rows, USC2 has 1. The window ends at USC1's latest date
        // (2017-08-23) and reaches back 365 days, so the 2016-01-01 row
        // falls outside it.
        assert_eq!(
            rows,
            vec![
                Observation {
                    date: ymd(2017, 8, 23),
                    temperature: 80.0,
                },
                Observation {
                    date: ymd(2017, 8, 20),
                    temperature: 75.0,
                },
            ]
        );
    }

    #[test]
    fn rolling_window_rows_stay_within_bounds() {
        let engine = fixture();
        let rows = engine.most_active_station_year().unwrap();
        let latest = ymd(2017, 8, 23);
        let window_start = latest - Duration::days(365);
        assert!(rows
            .iter()
            .all(|row| row.date >= window_start && row.date <= latest));
        // Newest first.
        assert!(rows.windows(2).all(|pair| pair[0].date >= pair[1].date));
    }

    #[test]
    fn duplicate_dates_for_one_station_are_preserved() {
        let engine = engine_over(
            df!(
                "station" => ["USC1", "USC1", "USC2"],
                "date" => ["2017-08-23", "2017-08-23", "2017-08-20"],
                "prcp" => [Some(0.1), Some(0.2), Some(0.3)],
                "tobs" => [79.0, 81.0, 70.0],
            )
            .unwrap(),
        );
        let rows = engine.most_active_station_year().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, rows[1].date);
    }

    #[test]
    fn tied_counts_resolve_to_first_listed_station() {
        let engine = engine_over(
            df!(
                "station" => ["USC2", "USC1"],
                "date" => ["2017-08-23", "2017-08-20"],
                "prcp" => [Some(0.1), Some(0.2)],
                "tobs" => [79.0, 70.0],
            )
            .unwrap(),
        );
        // Both stations have one row; the accessor lists ids ascending, so
        // USC1 wins the tie.
        let rows = engine.most_active_station_year().unwrap();
        assert_eq!(rows, vec![Observation {
            date: ymd(2017, 8, 20),
            temperature: 70.0,
        }]);
    }

    #[test]
    fn empty_dataset_fails_most_active_lookup() {
        let frame = df!(
            "station" => Vec::<String>::new(),
            "date" => Vec::<String>::new(),
            "prcp" => Vec::<f64>::new(),
            "tobs" => Vec::<f64>::new(),
        )
        .unwrap();
        let engine = QueryEngine::new(FrameDataset::from_frame(frame, vec![]).unwrap());
        let err = engine.most_active_station_year().unwrap_err();
        assert!(matches!(err, QueryError::EmptyDataset));
    }

    #[test]
    fn range_stats_over_closed_range() {
        let engine = engine_over(
            df!(
                "station" => ["USC1", "USC1", "USC2"],
                "date" => ["2017-01-01", "2017-01-03", "2017-01-05"],
                "prcp" => [None::<f64>, None, None],
                "tobs" => [60.0, 65.0, 70.0],
            )
            .unwrap(),
        );
        let stats = engine.range_stats("2017-01-01", Some("2017-01-05")).unwrap();
        assert_eq!(
            stats,
            TemperatureStats {
                minimum: 60.0,
                average: 65.0,
                maximum: 70.0,
            }
        );
    }

    #[test]
    fn open_range_matches_closed_range_to_last_date() {
        let engine = fixture();
        let open = engine.range_stats("2016-01-01", None).unwrap();
        let closed = engine.range_stats("2016-01-01", Some("2017-08-23")).unwrap();
        assert_eq!(open, closed);
    }

    #[test]
    fn invalid_range_never_reaches_the_dataset() {
        let engine = fixture();
        let err = engine
            .range_stats("2017-01-10", Some("2017-01-05"))
            .unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidRange { start, end }
                if start == ymd(2017, 1, 10) && end == ymd(2017, 1, 5)
        ));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let engine = fixture();
        assert!(matches!(
            engine.range_stats("2017-1-10", None).unwrap_err(),
            QueryError::InvalidDateFormat(v) if v == "2017-1-10"
        ));
        assert!(matches!(
            engine.range_stats("2017-01-01", Some("bogus")).unwrap_err(),
            QueryError::InvalidDateFormat(v) if v == "bogus"
        ));
    }

    #[test]
    fn out_of_range_reports_dataset_bounds() {
        let engine = fixture();
        let err = engine.range_stats("2099-01-01", None).unwrap_err();
        match err {
            QueryError::OutOfRange {
                requested,
                available_first,
                available_last,
            } => {
                assert_eq!(requested.start, ymd(2099, 1, 1));
                assert_eq!(available_first, ymd(2016, 1, 1));
                assert_eq!(available_last, ymd(2017, 8, 23));
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
    }

    #[test]
    fn repeated_calls_are_idempotent() {
        let engine = fixture();
        assert_eq!(
            engine.precipitation_series().unwrap(),
            engine.precipitation_series().unwrap()
        );
        assert_eq!(
            engine.range_stats("2016-01-01", None).unwrap(),
            engine.range_stats("2016-01-01", None).unwrap()
        );
    }
}
