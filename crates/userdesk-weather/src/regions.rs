//! State-code coordinate table.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{WeatherError, WeatherResult};

/// Geographic centre used for a state's forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// A two-letter code known to the coordinate table.
///
/// Only `RegionTable::resolve` hands these out, so holding one means the
/// code is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionCode(&'static str);

impl RegionCode {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RegionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

const STATE_COORDINATES: [(&str, f64, f64); 50] = [
    ("WI", 44.500000, -89.500000),
    ("WV", 39.000000, -80.500000),
    ("VT", 44.000000, -72.699997),
    ("TX", 31.000000, -100.000000),
    ("SD", 44.500000, -100.000000),
    ("RI", 41.742325, -71.742332),
    ("OR", 44.000000, -120.500000),
    ("NY", 43.000000, -75.000000),
    ("NH", 44.000000, -71.500000),
    ("NE", 41.500000, -100.000000),
    ("KS", 38.500000, -98.000000),
    ("MS", 33.000000, -90.000000),
    ("IL", 40.000000, -89.000000),
    ("DE", 39.000000, -75.500000),
    ("CT", 41.599998, -72.699997),
    ("AR", 34.799999, -92.199997),
    ("IN", 40.273502, -86.126976),
    ("MO", 38.573936, -92.603760),
    ("FL", 27.994402, -81.760254),
    ("NV", 39.876019, -117.224121),
    ("ME", 45.367584, -68.972168),
    ("MI", 44.182205, -84.506836),
    ("GA", 33.247875, -83.441162),
    ("HI", 19.741755, -155.844437),
    ("AK", 66.160507, -153.369141),
    ("TN", 35.860119, -86.660156),
    ("VA", 37.926868, -78.024902),
    ("NJ", 39.833851, -74.871826),
    ("KY", 37.839333, -84.270020),
    ("ND", 47.650589, -100.437012),
    ("MN", 46.392410, -94.636230),
    ("OK", 36.084621, -96.921387),
    ("MT", 46.965260, -109.533691),
    ("WA", 47.751076, -120.740135),
    ("UT", 39.419220, -111.950684),
    ("CO", 39.113014, -105.358887),
    ("OH", 40.367474, -82.996216),
    ("AL", 32.318230, -86.902298),
    ("IA", 42.032974, -93.581543),
    ("NM", 34.307144, -106.018066),
    ("SC", 33.836082, -81.163727),
    ("PA", 41.203323, -77.194527),
    ("AZ", 34.048927, -111.093735),
    ("MD", 39.045753, -76.641273),
    ("MA", 42.407211, -71.382439),
    ("CA", 36.778259, -119.417931),
    ("ID", 44.068203, -114.742043),
    ("WY", 43.075970, -107.290283),
    ("NC", 35.782169, -80.793457),
    ("LA", 30.391830, -92.329102),
];

/// Immutable lookup from state code to coordinates. Build once at startup.
#[derive(Debug, Clone)]
pub struct RegionTable {
    entries: HashMap<&'static str, Coordinates>,
}

impl RegionTable {
    /// The 50 US states.
    pub fn us_states() -> Self {
        let entries = STATE_COORDINATES
            .iter()
            .map(|&(code, latitude, longitude)| (code, Coordinates { latitude, longitude }))
            .collect();
        Self { entries }
    }

    /// Uppercase `raw` and look it up.
    ///
    /// # Errors
    /// `WeatherError::InvalidRegion` when the code is not in the table.
    pub fn resolve(&self, raw: &str) -> WeatherResult<(RegionCode, Coordinates)> {
        let upper = raw.to_ascii_uppercase();
        self.entries
            .get_key_value(upper.as_str())
            .map(|(&code, &coords)| (RegionCode(code), coords))
            .ok_or(WeatherError::InvalidRegion(upper))
    }

    /// All known codes, sorted.
    pub fn codes(&self) -> Vec<RegionCode> {
        let mut codes: Vec<RegionCode> = self.entries.keys().map(|&c| RegionCode(c)).collect();
        codes.sort();
        codes
    }
}
