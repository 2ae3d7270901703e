use std::path::PathBuf;

use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read measurement file '{0}'")]
    MeasurementRead(PathBuf, #[source] PolarsError),

    #[error("Failed to scan parquet file '{0}'")]
    ParquetScan(PathBuf, #[source] PolarsError),

    #[error("Failed to read station metadata file '{0}'")]
    StationRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse station metadata from '{0}'")]
    StationParse(PathBuf, #[source] serde_json::Error),

    #[error("Required column '{0}' missing from measurement data")]
    MissingColumn(String),

    #[error("Required column '{0}' not found in measurement data")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{column}' does not have the expected type")]
    ColumnType {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{0}' holds a value that is not a valid calendar date")]
    InvalidDate(String),

    #[error("Column '{0}' unexpectedly holds a null value")]
    NullValue(String),

    #[error("Measurement query failed")]
    Query(#[from] PolarsError),
}
