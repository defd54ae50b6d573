//! Everything one resolution cycle learned, flattened into template values.

use geonote_core::{MapProvider, SavedPlace};
use geonote_location::{AddressResult, Coordinate, WeatherResult};

use crate::map::{map_link, map_url};
use crate::template::TemplateValues;
use crate::timestamp::Timestamp;

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub coordinate: &'a Coordinate,
    pub place: Option<&'a SavedPlace>,
    pub address: Option<&'a AddressResult>,
    pub weather: Option<&'a WeatherResult>,
    pub timestamp: &'a Timestamp,
    pub map_provider: MapProvider,
}

impl RenderContext<'_> {
    /// Name to show for the location: the saved place wins over the geocoded address.
    pub fn display_address(&self) -> Option<String> {
        match (self.place, self.address) {
            (Some(place), _) => Some(place.name.clone()),
            (None, Some(address)) => Some(address.display.clone()),
            (None, None) => None,
        }
    }

    pub fn values(&self) -> TemplateValues {
        let mut values = TemplateValues::new();
        let mut set = |key: &str, value: String| {
            values.insert(key.to_string(), value);
        };

        set("lat", self.coordinate.format_lat());
        set("lon", self.coordinate.format_lon());
        set("coords", self.coordinate.format_coords());
        set("address", self.display_address().unwrap_or_default());
        set(
            "place",
            self.place.map(|p| p.name.clone()).unwrap_or_default(),
        );
        set(
            "city",
            self.address
                .and_then(|a| a.city.clone())
                .unwrap_or_default(),
        );
        set(
            "country",
            self.address
                .and_then(|a| a.country.clone())
                .unwrap_or_default(),
        );
        set("mapUrl", map_url(self.map_provider, self.coordinate));
        set("mapLink", map_link(self.map_provider, self.coordinate));
        set("date", self.timestamp.date.clone());
        set("time", self.timestamp.time.clone());
        set("datetime", self.timestamp.datetime.clone());
        set(
            "weather",
            self.weather.map(WeatherResult::format).unwrap_or_default(),
        );
        set(
            "temp",
            self.weather
                .map(WeatherResult::format_temperature)
                .unwrap_or_default(),
        );

        values
    }
}
