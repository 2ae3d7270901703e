use serde::Serialize;

use crate::dataset::accessor::TemperatureSummary;

/// Minimum, average, and maximum temperature over a date range.
///
/// Derived per query, never stored. The average is rounded to two decimal
/// places using round-half-to-even so that repeated identical queries are
/// bit-for-bit reproducible across platforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemperatureStats {
    /// Lowest temperature observation in the range.
    pub minimum: f64,
    /// Mean temperature observation, rounded to 2 decimal places.
    pub average: f64,
    /// Highest temperature observation in the range.
    pub maximum: f64,
}

impl From<TemperatureSummary> for TemperatureStats {
    fn from(summary: TemperatureSummary) -> Self {
        Self {
            minimum: summary.minimum,
            average: round_to_cents(summary.average),
            maximum: summary.maximum,
        }
    }
}

/// Rounds to 2 decimal places, ties to even.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
