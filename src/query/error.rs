use chrono::NaiveDate;
use thiserror::Error;

use crate::dataset::error::DatasetError;
use crate::types::measurement::DateRange;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error(
        "No observations in {requested}; data is available from {available_first} to {available_last}"
    )]
    OutOfRange {
        requested: DateRange,
        available_first: NaiveDate,
        available_last: NaiveDate,
    },

    #[error("The dataset contains no measurements")]
    EmptyDataset,

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
