use thiserror::Error;

use crate::dataset::error::DatasetError;
use crate::query::error::QueryError;

#[derive(Debug, Error)]
pub enum ClimateError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
