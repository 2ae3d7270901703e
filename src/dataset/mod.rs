pub mod accessor;
pub mod error;
pub mod frame_dataset;
pub mod loader;
