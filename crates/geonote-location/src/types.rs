use geonote_core::{NetworkError, TemperatureUnit};

/// Accuracy reported for IP-based fixes
pub const APPROXIMATE_ACCURACY_METERS: f64 = 5000.0;

/// A single coordinate fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_meters: f64,
    /// True when the fix came from coarse (IP) positioning
    pub approximate: bool,
}

impl Coordinate {
    pub fn precise(latitude: f64, longitude: f64, accuracy_meters: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters,
            approximate: false,
        }
    }

    pub fn approximate(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_meters: APPROXIMATE_ACCURACY_METERS,
            approximate: true,
        }
    }

    /// Latitude with six decimals
    pub fn format_lat(&self) -> String {
        format!("{:.6}", self.latitude)
    }

    /// Longitude with six decimals
    pub fn format_lon(&self) -> String {
        format!("{:.6}", self.longitude)
    }

    /// "lat, lon", with an " (approximate)" suffix for coarse fixes
    pub fn format_coords(&self) -> String {
        let pair = format!("{}, {}", self.format_lat(), self.format_lon());
        if self.approximate {
            format!("{} (approximate)", pair)
        } else {
            pair
        }
    }
}

/// Reverse geocoding result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressResult {
    pub display: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

/// Current weather at a coordinate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherResult {
    /// Rounded to the nearest degree
    pub temperature: i32,
    pub unit: TemperatureUnit,
    pub description: String,
}

impl WeatherResult {
    pub fn from_reading(temperature: f64, unit: TemperatureUnit, code: i32) -> Self {
        Self {
            temperature: temperature.round() as i32,
            unit,
            description: describe_weather_code(code).to_string(),
        }
    }

    /// e.g. "21°C"
    pub fn format_temperature(&self) -> String {
        format!("{}{}", self.temperature, self.unit.symbol())
    }

    /// e.g. "21°C, Partly cloudy"
    pub fn format(&self) -> String {
        format!("{}, {}", self.format_temperature(), self.description)
    }
}

/// Convert a WMO weather code to a description.
/// See: https://open-meteo.com/en/docs#weathervariables
pub fn describe_weather_code(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Violent rain showers",
        85 => "Slight snow showers",
        86 => "Heavy snow showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown",
    }
}

/// Device positioning errors
#[derive(Debug, thiserror::Error)]
pub enum PositionError {
    #[error("Positioning is not supported on this device")]
    Unsupported,
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location request timed out")]
    Timeout,
    #[error("Only a stale position was available")]
    Stale,
    #[error("Position unavailable: {0}")]
    Unavailable(String),
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
}

/// Remote lookup errors (IP positioning, geocoding, weather)
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Every positioning strategy failed
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("All position sources failed")]
    Unavailable,
}
