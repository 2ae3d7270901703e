//! Polars-backed implementation of the [`DatasetAccessor`] trait.
//!
//! Measurements live in a `LazyFrame` with the columns `station`, `date`,
//! `prcp`, and `tobs`; filters are pushed down as lazy expressions and typed
//! rows are extracted from the collected frame. Station metadata is held
//! alongside as plain structs.

use chrono::NaiveDate;
use polars::prelude::*;

use crate::dataset::accessor::{DatasetAccessor, Observation, StationCount, TemperatureSummary};
use crate::dataset::error::DatasetError;
use crate::types::measurement::Measurement;
use crate::types::station::Station;

pub(crate) const COL_STATION: &str = "station";
pub(crate) const COL_DATE: &str = "date";
pub(crate) const COL_PRCP: &str = "prcp";
pub(crate) const COL_TOBS: &str = "tobs";
const COL_COUNT: &str = "observations";

// Offset between days-since-1970 (the physical Date representation) and
// days-since-0001-01-01 expected by chrono.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A read-only climate dataset backed by a Polars `LazyFrame`.
///
/// Instances are built through the constructors in the loader module
/// ([`FrameDataset::from_csv`], [`FrameDataset::scan_parquet`],
/// [`FrameDataset::from_frame`]). The measurement frame is never mutated;
/// every accessor call runs its own filter against it.
#[derive(Clone)]
pub struct FrameDataset {
    measurements: LazyFrame,
    stations: Vec<Station>,
}

impl std::fmt::Debug for FrameDataset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDataset")
            .field("measurements", &"<LazyFrame>")
            .field("stations", &self.stations)
            .finish()
    }
}

impl FrameDataset {
    pub(crate) fn new(measurements: LazyFrame, stations: Vec<Station>) -> Self {
        Self {
            measurements,
            stations,
        }
    }

    /// The station metadata records this dataset was loaded with.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// Every measurement row as a typed record, ascending by date.
    ///
    /// Rows without a temperature observation are omitted, matching the
    /// temperature views; precipitation stays nullable.
    pub fn measurements(&self) -> Result<Vec<Measurement>, DatasetError> {
        let frame = self
            .measurements
            .clone()
            .filter(col(COL_TOBS).is_not_null())
            .sort([COL_DATE], Default::default())
            .collect()?;

        let stations = string_column(&frame, COL_STATION)?;
        let dates = date_column(&frame, COL_DATE)?;
        let precipitation = float_column(&frame, COL_PRCP)?;
        let temperatures = float_column(&frame, COL_TOBS)?;

        let mut rows = Vec::with_capacity(frame.height());
        for idx in 0..frame.height() {
            rows.push(Measurement {
                station: stations.get(idx).ok_or_else(invalid_station)?.to_string(),
                date: date_from_days(dates.get(idx).ok_or_else(invalid_date)?)?,
                precipitation: precipitation.get(idx),
                temperature: temperatures.get(idx).ok_or_else(invalid_temperature)?,
            });
        }
        Ok(rows)
    }

    /// Combines optional inclusive date bounds into a single filter
    /// expression, or `None` when both bounds are absent.
    fn date_filter(date_from: Option<NaiveDate>, date_to: Option<NaiveDate>) -> Option<Expr> {
        let lower = date_from.map(|from| col(COL_DATE).gt_eq(lit(from)));
        let upper = date_to.map(|to| col(COL_DATE).lt_eq(lit(to)));
        match (lower, upper) {
            (Some(lo), Some(hi)) => Some(lo.and(hi)),
            (Some(lo), None) => Some(lo),
            (None, Some(hi)) => Some(hi),
            (None, None) => None,
        }
    }

    /// Collects a frame into observation rows, ascending by date. Rows with
    /// a null temperature are filtered out before collection.
    fn collect_observations(&self, frame: LazyFrame) -> Result<Vec<Observation>, DatasetError> {
        let frame = frame
            .filter(col(COL_TOBS).is_not_null())
            .select([col(COL_DATE), col(COL_TOBS)])
            .sort([COL_DATE], Default::default())
            .collect()?;

        let dates = date_column(&frame, COL_DATE)?;
        let temps = float_column(&frame, COL_TOBS)?;

        let mut rows = Vec::with_capacity(frame.height());
        for (date, temperature) in dates.into_iter().zip(temps) {
            let date = date_from_days(date.ok_or_else(invalid_date)?)?;
            let temperature = temperature.ok_or_else(invalid_temperature)?;
            rows.push(Observation { date, temperature });
        }
        Ok(rows)
    }
}

impl DatasetAccessor for FrameDataset {
    fn all_measurements(&self) -> Result<Vec<(NaiveDate, Option<f64>)>, DatasetError> {
        let frame = self
            .measurements
            .clone()
            .select([col(COL_DATE), col(COL_PRCP)])
            .collect()?;

        let dates = date_column(&frame, COL_DATE)?;
        let precipitation = float_column(&frame, COL_PRCP)?;

        let mut rows = Vec::with_capacity(frame.height());
        for (date, prcp) in dates.into_iter().zip(precipitation) {
            let date = date_from_days(date.ok_or_else(invalid_date)?)?;
            rows.push((date, prcp));
        }
        Ok(rows)
    }

    fn all_stations(&self) -> Result<Vec<String>, DatasetError> {
        Ok(self.stations.iter().map(|s| s.id.clone()).collect())
    }

    fn count_by_station(&self) -> Result<Vec<StationCount>, DatasetError> {
        // Sorting by station id makes the group order deterministic; the raw
        // group_by order is whatever the hash grouping produced.
        let frame = self
            .measurements
            .clone()
            .group_by([col(COL_STATION)])
            .agg([len().cast(DataType::UInt32).alias(COL_COUNT)])
            .sort([COL_STATION], Default::default())
            .collect()?;

        let stations = string_column(&frame, COL_STATION)?;
        let counts = frame
            .column(COL_COUNT)
            .map_err(|e| DatasetError::ColumnNotFound(COL_COUNT.to_string(), e))?
            .u32()
            .map_err(|e| DatasetError::ColumnType {
                column: COL_COUNT.to_string(),
                source: e,
            })?;

        let mut rows = Vec::with_capacity(frame.height());
        for (station, observations) in stations.into_iter().zip(counts) {
            let station = station.ok_or_else(invalid_station)?.to_string();
            let observations = observations.ok_or_else(invalid_station)?;
            rows.push(StationCount {
                station,
                observations,
            });
        }
        Ok(rows)
    }

    fn measurements_for_station(
        &self,
        station: &str,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, DatasetError> {
        let mut frame = self
            .measurements
            .clone()
            .filter(col(COL_STATION).eq(lit(station.to_owned())));
        if let Some(filter) = Self::date_filter(date_from, date_to) {
            frame = frame.filter(filter);
        }
        self.collect_observations(frame)
    }

    fn measurements_in_range(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> Result<Vec<Observation>, DatasetError> {
        let mut filter = col(COL_DATE).gt_eq(lit(date_from));
        if let Some(to) = date_to {
            filter = filter.and(col(COL_DATE).lt_eq(lit(to)));
        }
        self.collect_observations(self.measurements.clone().filter(filter))
    }

    fn extremes_in_range(
        &self,
        date_from: NaiveDate,
        date_to: Option<NaiveDate>,
    ) -> Result<Option<TemperatureSummary>, DatasetError> {
        let mut filter = col(COL_DATE).gt_eq(lit(date_from));
        if let Some(to) = date_to {
            filter = filter.and(col(COL_DATE).lt_eq(lit(to)));
        }
        let frame = self
            .measurements
            .clone()
            .filter(filter)
            .filter(col(COL_TOBS).is_not_null())
            .select([col(COL_TOBS)])
            .collect()?;

        let temps = float_column(&frame, COL_TOBS)?;
        let (Some(minimum), Some(maximum), Some(average)) =
            (temps.min(), temps.max(), temps.mean())
        else {
            return Ok(None);
        };
        Ok(Some(TemperatureSummary {
            minimum,
            maximum,
            average,
        }))
    }

    fn first_and_last_date(&self) -> Result<Option<(NaiveDate, NaiveDate)>, DatasetError> {
        let frame = self
            .measurements
            .clone()
            .select([
                col(COL_DATE).min().alias("first"),
                col(COL_DATE).max().alias("last"),
            ])
            .collect()?;

        let first = date_column(&frame, "first")?.get(0);
        let last = date_column(&frame, "last")?.get(0);
        match (first, last) {
            (Some(first), Some(last)) => {
                Ok(Some((date_from_days(first)?, date_from_days(last)?)))
            }
            _ => Ok(None),
        }
    }
}

fn date_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a DateChunked, DatasetError> {
    frame
        .column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?
        .date()
        .map_err(|e| DatasetError::ColumnType {
            column: name.to_string(),
            source: e,
        })
}

fn float_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a Float64Chunked, DatasetError> {
    frame
        .column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?
        .f64()
        .map_err(|e| DatasetError::ColumnType {
            column: name.to_string(),
            source: e,
        })
}

fn string_column<'a>(frame: &'a DataFrame, name: &str) -> Result<&'a StringChunked, DatasetError> {
    frame
        .column(name)
        .map_err(|e| DatasetError::ColumnNotFound(name.to_string(), e))?
        .str()
        .map_err(|e| DatasetError::ColumnType {
            column: name.to_string(),
            source: e,
        })
}

/// Converts the physical Date representation (days since 1970-01-01) into a
/// `NaiveDate`.
fn date_from_days(days: i32) -> Result<NaiveDate, DatasetError> {
    NaiveDate::from_num_days_from_ce_opt(days + EPOCH_DAYS_FROM_CE).ok_or_else(invalid_date)
}

fn invalid_date() -> DatasetError {
    DatasetError::InvalidDate(COL_DATE.to_string())
}

fn invalid_temperature() -> DatasetError {
    DatasetError::NullValue(COL_TOBS.to_string())
}

fn invalid_station() -> DatasetError {
    DatasetError::NullValue(COL_STATION.to_string())
}
