//! Constructors that turn measurement files into a [`FrameDataset`].
//!
//! Measurement tables are header CSV or Parquet with the columns `station`,
//! `date`, `prcp`, and `tobs`. Station metadata is an optional JSON array of
//! [`Station`] records; when absent, the station list is derived from the
//! distinct station ids in the measurement table.

use std::fs::File;
use std::path::PathBuf;

use bon::bon;
use log::{info, warn};
use polars::prelude::*;

use crate::dataset::error::DatasetError;
use crate::dataset::frame_dataset::{FrameDataset, COL_DATE, COL_PRCP, COL_STATION, COL_TOBS};
use crate::types::station::Station;

const REQUIRED_COLUMNS: [&str; 4] = [COL_STATION, COL_DATE, COL_PRCP, COL_TOBS];

#[bon]
impl FrameDataset {
    /// Loads a dataset from a header CSV measurement file.
    ///
    /// Optionally pass `.stations(path)` with a JSON array of station
    /// metadata records before `.call()`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use climate_query::{FrameDataset, DatasetError};
    /// # fn run() -> Result<(), DatasetError> {
    /// let dataset = FrameDataset::from_csv("measurements.csv".into())
    ///     .stations("stations.json".into())
    ///     .call()?;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn from_csv(
        #[builder(start_fn)] measurements: PathBuf,
        stations: Option<PathBuf>,
    ) -> Result<Self, DatasetError> {
        let frame = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(measurements.clone()))
            .map_err(|e| DatasetError::MeasurementRead(measurements.clone(), e))?
            .finish()
            .map_err(|e| DatasetError::MeasurementRead(measurements.clone(), e))?;
        info!(
            "Loaded {} measurement rows from {:?}",
            frame.height(),
            measurements
        );

        check_columns(&frame)?;
        let measurements = normalize(frame.lazy());
        let stations = resolve_stations(stations, &measurements)?;
        Ok(FrameDataset::new(measurements, stations))
    }

    /// Opens a dataset over a Parquet measurement file without collecting it.
    ///
    /// The file is scanned lazily; schema problems surface on the first
    /// query rather than here.
    #[builder]
    pub fn scan_parquet(
        #[builder(start_fn)] measurements: PathBuf,
        stations: Option<PathBuf>,
    ) -> Result<Self, DatasetError> {
        let frame = LazyFrame::scan_parquet(&measurements, Default::default())
            .map_err(|e| DatasetError::ParquetScan(measurements.clone(), e))?;
        info!("Scanning measurement parquet {:?}", measurements);

        let measurements = normalize(frame);
        let stations = resolve_stations(stations, &measurements)?;
        Ok(FrameDataset::new(measurements, stations))
    }
}

impl FrameDataset {
    /// Builds a dataset from an in-memory measurement frame.
    ///
    /// The frame must carry the `station`, `date`, `prcp`, and `tobs`
    /// columns; `date` may be ISO-8601 strings or an actual date column.
    pub fn from_frame(
        frame: DataFrame,
        stations: Vec<Station>,
    ) -> Result<Self, DatasetError> {
        check_columns(&frame)?;
        Ok(FrameDataset::new(normalize(frame.lazy()), stations))
    }
}

fn check_columns(frame: &DataFrame) -> Result<(), DatasetError> {
    let names = frame.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(DatasetError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

/// Casts the measurement columns to the dtypes the accessor relies on. The
/// string-to-date cast is strict, so a malformed date fails the query that
/// first touches it.
fn normalize(frame: LazyFrame) -> LazyFrame {
    frame.with_columns([
        col(COL_DATE).cast(DataType::Date),
        col(COL_PRCP).cast(DataType::Float64),
        col(COL_TOBS).cast(DataType::Float64),
    ])
}

fn resolve_stations(
    path: Option<PathBuf>,
    measurements: &LazyFrame,
) -> Result<Vec<Station>, DatasetError> {
    match path {
        Some(path) => {
            let file =
                File::open(&path).map_err(|e| DatasetError::StationRead(path.clone(), e))?;
            let stations: Vec<Station> = serde_json::from_reader(file)
                .map_err(|e| DatasetError::StationParse(path.clone(), e))?;
            info!("Loaded {} station records from {:?}", stations.len(), path);
            Ok(stations)
        }
        None => {
            warn!("No station metadata supplied; deriving station list from measurements");
            stations_from_measurements(measurements)
        }
    }
}

/// Derives bare station records from the distinct ids in the measurement
/// table, sorted ascending for a deterministic order.
fn stations_from_measurements(
    measurements: &LazyFrame,
) -> Result<Vec<Station>, DatasetError> {
    let frame = measurements
        .clone()
        .select([col(COL_STATION)])
        .unique(None, UniqueKeepStrategy::First)
        .sort([COL_STATION], Default::default())
        .collect()?;

    let ids = frame
        .column(COL_STATION)
        .map_err(|e| DatasetError::ColumnNotFound(COL_STATION.to_string(), e))?
        .str()
        .map_err(|e| DatasetError::ColumnType {
            column: COL_STATION.to_string(),
            source: e,
        })?;

    Ok(ids
        .into_iter()
        .flatten()
        .map(Station::bare)
        .collect())
}
