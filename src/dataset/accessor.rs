//! The read-only interface the query engine consumes.
//!
//! A [`DatasetAccessor`] owns no query logic of its own; it only retrieves
//! measurement and station rows by filter. The engine composes these calls
//! with its own date arithmetic, grouping, and aggregation.

use chrono::NaiveDate;

use crate::dataset::error::DatasetError;

/// A single temperature observation row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Calendar date of the observation.
    pub date: NaiveDate,
    /// Temperature observation (TOBS).
    pub temperature: f64,
}

/// How many observation rows a station has in the dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationCount {
    /// Station id.
    pub station: String,
    /// Number of measurement rows attributed to the station.
    pub observations: u32,
}

/// Unrounded min/max/mean of the temperature column over a filtered set of
/// rows, as computed by the storage backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSummary {
    pub minimum: f64,
    pub maximum: f64,
    pub average: f64,
}

/// Read-only access to the measurement and station tables.
///
/// All date bounds are inclusive and each bound is optional where the
/// signature says so. Implementations return rows in ascending date order
/// where an order is meaningful; the engine imposes its own ordering on top.
/// No operation mutates the dataset, and failures are returned to the caller
/// rather than retried or swallowed.
pub trait DatasetAccessor {
    /// Every `(date, precipitation)` pair in the dataset, unfiltered.
    fn all_measurements(&self) -> Result<Vec<(NaiveDate, Option<f64>)>, DatasetError>;

    /// The distinct station ids known to the dataset.
    fn all_stations(&self) -> Result<Vec<String>, DatasetError>;

    /// Observation row counts grouped by station.
    ///
    /// The returned order is the accessor's own; callers that need a
    /// particular order must sort the result themselves.
    fn count_by_station(&self) -> Result<Vec<StationCount>, DatasetError>;

    /// Temperature observations for one station, optionally bounded on
    /// either side, ascending by date.
    fn measurements_for_station(
        &self,
        station: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, DatasetError>;

    /// Temperature observations across all stations from `date_from`,
    /// bounded above only when `date_to` is given, ascending by date.
    fn measurements_in_range(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, DatasetError>;

    /// Min/max/mean temperature over the rows matching the date filter, or
    /// `None` when the filter matches nothing.
    fn extremes_in_range(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> Result<Option<TemperatureSummary>, DatasetError>;

    /// The earliest and latest measurement dates across the whole dataset,
    /// or `None` when the dataset holds no rows.
    fn first_and_last_date(&self) -> Result<Option<(NaiveDate, NaiveDate)>, DatasetError>;
}
