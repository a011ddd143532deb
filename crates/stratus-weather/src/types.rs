use serde::{Deserialize, Serialize};

/// Geographic fix produced by the location acquirer.
/// Consumed once by the fetcher and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// One reported weather condition: category, free-text description and
/// the provider's icon code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Primary readings, in the unit system the request asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: Option<f64>,
}

/// Cloud cover in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

/// Country and sun-event metadata reported alongside the observation.
/// Sunrise and sunset are epoch seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteInfo {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Decoded current-weather observation for one location and time.
///
/// Immutable once constructed; a newer successful fetch supersedes it
/// wholesale, there is no merging. Field names follow the crate's domain
/// vocabulary; `serde` renames map them onto the provider's wire format,
/// which is also the cached representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// Condition list; expected non-empty on a successful parse, but the
    /// presenter degrades to blank fields when it is not.
    #[serde(rename = "weather")]
    pub conditions: Vec<Condition>,

    /// Provider-internal source identifier.
    #[serde(rename = "base", default)]
    pub source: String,

    #[serde(rename = "main")]
    pub measurements: Measurements,

    /// Visibility in meters.
    #[serde(default)]
    pub visibility: u32,

    pub wind: Wind,

    pub clouds: Clouds,

    /// Observation timestamp, epoch seconds.
    #[serde(rename = "dt")]
    pub observed_at: i64,

    #[serde(rename = "sys")]
    pub site: SiteInfo,

    /// Location name reported by the provider.
    pub name: String,

    /// Response status code echoed in the payload.
    #[serde(rename = "cod", default)]
    pub status: u16,
}

impl WeatherRecord {
    /// The condition entry that drives the single-condition display fields.
    pub fn primary_condition(&self) -> Option<&Condition> {
        self.conditions.first()
    }
}
