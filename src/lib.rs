mod climate;
mod dataset;
mod error;
mod query;
mod types;

pub use error::ClimateError;

pub use climate::*;

pub use dataset::accessor::*;
pub use dataset::error::DatasetError;
pub use dataset::frame_dataset::FrameDataset;

pub use query::dates::*;
pub use query::engine::*;
pub use query::error::QueryError;

pub use types::measurement::*;
pub use types::station::*;
pub use types::stats::*;
