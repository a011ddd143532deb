//! Mapping from a weather record to human-readable display fields.
//!
//! Pure: the only inputs besides the record are the region and UTC offset
//! captured when the presenter is built. Rendering the resulting
//! [`DisplayModel`] is a separate, swappable layer.

use chrono::{DateTime, FixedOffset, Local, Offset};

use crate::types::WeatherRecord;

/// Regions whose locale conventionally reads Fahrenheit.
///
/// Deliberately a blunt allow-list rather than a full locale-to-unit table;
/// everywhere else gets Celsius.
const FAHRENHEIT_REGIONS: [&str; 3] = ["US", "LR", "MM"];

/// Local icon asset selected for a condition code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherIcon {
    Sunny,
    Cloud,
    Rain,
    Storm,
    Snowflake,
}

impl WeatherIcon {
    /// Map a provider icon code to a local asset.
    ///
    /// The table is total: codes outside it fall back to `Cloud` rather
    /// than leaving the icon unset.
    pub fn from_code(code: &str) -> Self {
        match code {
            "01d" => Self::Sunny,
            "02d" | "03d" | "04d" | "01n" | "02n" | "03n" | "04n" | "10n" => Self::Cloud,
            "10d" | "11n" => Self::Rain,
            "11d" => Self::Storm,
            "13d" | "13n" => Self::Snowflake,
            _ => Self::Cloud,
        }
    }

    /// Asset name for the rendering layer.
    pub fn asset_name(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloud => "cloud",
            Self::Rain => "rain",
            Self::Storm => "storm",
            Self::Snowflake => "snowflake",
        }
    }
}

/// Human-readable fields derived from one record.
///
/// Defaults to all-blank so "nothing to show yet" renders as empty widgets,
/// never as an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayModel {
    pub condition: String,
    pub description: String,
    pub temperature: String,
    pub temperature_min: String,
    pub temperature_max: String,
    pub location_name: String,
    pub country: String,
    pub sunrise: String,
    pub sunset: String,
    pub icon: Option<WeatherIcon>,
}

pub struct WeatherPresenter {
    region: String,
    offset: FixedOffset,
}

impl WeatherPresenter {
    /// Presenter using the device's current UTC offset.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            offset: Local::now().offset().fix(),
        }
    }

    /// Presenter pinned to a specific UTC offset.
    pub fn with_offset(region: impl Into<String>, offset: FixedOffset) -> Self {
        Self {
            region: region.into(),
            offset,
        }
    }

    /// Temperature unit symbol for the configured region.
    pub fn unit_symbol(&self) -> &'static str {
        if FAHRENHEIT_REGIONS.contains(&self.region.as_str()) {
            "°F"
        } else {
            "°C"
        }
    }

    /// Map a record into display fields.
    ///
    /// Only the first condition entry feeds the single-condition fields;
    /// an empty condition list leaves those fields blank and the icon unset.
    pub fn present(&self, record: &WeatherRecord) -> DisplayModel {
        let mut model = DisplayModel {
            temperature: format!("{}{}", record.measurements.temp, self.unit_symbol()),
            temperature_min: format!("{}min", record.measurements.temp_min),
            temperature_max: format!("{}max", record.measurements.temp_max),
            location_name: record.name.clone(),
            country: record.site.country.clone(),
            sunrise: self.time_of_day(record.site.sunrise),
            sunset: self.time_of_day(record.site.sunset),
            ..DisplayModel::default()
        };

        if let Some(condition) = record.primary_condition() {
            model.condition = condition.main.clone();
            model.description = condition.description.clone();
            model.icon = Some(WeatherIcon::from_code(&condition.icon));
        }

        model
    }

    /// Epoch seconds to a wall-clock time-of-day string in the presenter's
    /// offset. Out-of-range timestamps render blank.
    fn time_of_day(&self, epoch_seconds: i64) -> String {
        DateTime::from_timestamp(epoch_seconds, 0)
            .map(|utc| utc.with_timezone(&self.offset).format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}
