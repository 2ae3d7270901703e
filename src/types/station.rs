//! Defines the data structure representing a weather observation station.
//!
//! Station metadata is opaque to the query engine: it is carried through for
//! the caller's benefit but never interpreted beyond the station id.

use serde::{Deserialize, Serialize};

/// A fixed weather-observation site identified by a unique id.
///
/// Measurements reference stations by [`Station::id`]. A measurement whose
/// station id has no matching `Station` record is tolerated, not an error.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Station {
    /// The unique station identifier (e.g., "USC00519281").
    pub id: String,
    /// Human-readable station name, if known.
    pub name: Option<String>,
    /// Latitude in decimal degrees, if known.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees, if known.
    pub longitude: Option<f64>,
    /// Elevation above sea level in meters, if known.
    pub elevation: Option<f64>,
}

impl Station {
    /// Creates a station record carrying only an id, with no metadata.
    ///
    /// Used when the station list is derived from the measurement table
    /// rather than loaded from a metadata file.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            latitude: None,
            longitude: None,
            elevation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_json_round_trip() {
        let json = r#"{
            "id": "USC00519281",
            "name": "WAIHEE 837.5, HI US",
            "latitude": 21.45167,
            "longitude": -157.84889,
            "elevation": 32.9
        }"#;

        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.id, "USC00519281");
        assert_eq!(station.name.as_deref(), Some("WAIHEE 837.5, HI US"));
        assert_eq!(station.elevation, Some(32.9));
    }

    #[test]
    fn bare_station_has_no_metadata() {
        let station = Station::bare("USC00511918");
        assert_eq!(station.id, "USC00511918");
        assert!(station.name.is_none());
        assert!(station.latitude.is_none());
    }
}
