pub mod measurement;
pub mod station;
pub mod stats;
