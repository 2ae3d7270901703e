//! The main entry point for querying a climate dataset.
//!
//! [`Climate`] bundles a loaded dataset with a query engine and exposes the
//! four read-only operations a transport layer binds to its routes. It adds
//! no query logic of its own.

use std::collections::BTreeMap;
use std::path::PathBuf;

use bon::bon;
use chrono::NaiveDate;

use crate::dataset::accessor::Observation;
use crate::dataset::frame_dataset::FrameDataset;
use crate::error::ClimateError;
use crate::query::engine::QueryEngine;
use crate::types::station::Station;
use crate::types::stats::TemperatureStats;

/// A read-only view over one climate dataset.
///
/// Each instance owns its own dataset handle; hosts serving concurrent
/// requests should give every request its own `Climate` (or share one behind
/// `&`, since no operation mutates anything).
///
/// # Examples
///
/// ```no_run
/// # use climate_query::{Climate, ClimateError};
/// # fn run() -> Result<(), ClimateError> {
/// let climate = Climate::from_csv("measurements.csv".into()).call()?;
///
/// let stations = climate.station_list()?;
/// let stats = climate.range_stats("2017-01-01", Some("2017-01-05"))?;
/// println!("{stations:?} {stats:?}");
/// # Ok(())
/// # }
/// ```
pub struct Climate {
    engine: QueryEngine<FrameDataset>,
}

#[bon]
impl Climate {
    /// Opens a dataset from a header CSV measurement file, with optional
    /// station metadata JSON via `.stations(path)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClimateError::Dataset`] when the files cannot be read or do
    /// not carry the expected measurement columns.
    #[builder]
    pub fn from_csv(
        #[builder(start_fn)] measurements: PathBuf,
        stations: Option<PathBuf>,
    ) -> Result<Self, ClimateError> {
        let dataset = FrameDataset::from_csv(measurements)
            .maybe_stations(stations)
            .call()?;
        Ok(Self::from_dataset(dataset))
    }

    /// Opens a dataset over a Parquet measurement file, scanned lazily.
    #[builder]
    pub fn scan_parquet(
        #[builder(start_fn)] measurements: PathBuf,
        stations: Option<PathBuf>,
    ) -> Result<Self, ClimateError> {
        let dataset = FrameDataset::scan_parquet(measurements)
            .maybe_stations(stations)
            .call()?;
        Ok(Self::from_dataset(dataset))
    }
}

impl Climate {
    /// Wraps an already-loaded dataset.
    pub fn from_dataset(dataset: FrameDataset) -> Self {
        Self {
            engine: QueryEngine::new(dataset),
        }
    }

    /// Precipitation by date over the whole dataset. Duplicate dates
    /// collapse last-write-wins; see
    /// [`QueryEngine::precipitation_series`].
    pub fn precipitation_series(
        &self,
    ) -> Result<BTreeMap<NaiveDate, Option<f64>>, ClimateError> {
        Ok(self.engine.precipitation_series()?)
    }

    /// All distinct station ids.
    pub fn station_list(&self) -> Result<Vec<String>, ClimateError> {
        Ok(self.engine.station_list()?)
    }

    /// One rolling year of observations from the most-observed station,
    /// newest first.
    pub fn most_active_station_year(&self) -> Result<Vec<Observation>, ClimateError> {
        Ok(self.engine.most_active_station_year()?)
    }

    /// Min/average/max temperature over an inclusive date range; open-ended
    /// when `end` is `None`.
    pub fn range_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<TemperatureStats, ClimateError> {
        Ok(self.engine.range_stats(start, end)?)
    }

    /// The station metadata records the dataset was loaded with.
    pub fn stations(&self) -> &[Station] {
        self.engine.accessor().stations()
    }

    /// The underlying query engine, for callers that want to reuse it with
    /// their own plumbing.
    pub fn engine(&self) -> &QueryEngine<FrameDataset> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn climate() -> Climate {
        let frame = df!(
            "station" => ["USC1", "USC1", "USC2"],
            "date" => ["2017-08-20", "2017-08-23", "2017-08-23"],
            "prcp" => [Some(0.05), Some(0.45), Some(0.02)],
            "tobs" => [75.0, 80.0, 71.0],
        )
        .unwrap();
        Climate::from_dataset(
            FrameDataset::from_frame(frame, vec![Station::bare("USC1"), Station::bare("USC2")])
                .unwrap(),
        )
    }

    #[test]
    fn facade_delegates_to_the_engine() {
        let climate = climate();
        assert_eq!(climate.station_list().unwrap().len(), 2);
        assert_eq!(climate.precipitation_series().unwrap().len(), 2);
        assert_eq!(climate.most_active_station_year().unwrap().len(), 2);

        let stats = climate.range_stats("2017-08-20", None).unwrap();
        assert_eq!(stats.minimum, 71.0);
        assert_eq!(stats.maximum, 80.0);
        assert_eq!(stats.average, 75.33);
    }

    #[test]
    fn query_errors_surface_through_the_facade() {
        let climate = climate();
        let err = climate.range_stats("20170820", None).unwrap_err();
        assert!(matches!(
            err,
            ClimateError::Query(crate::query::error::QueryError::InvalidDateFormat(_))
        ));
    }
}
