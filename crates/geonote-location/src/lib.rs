//! Location services for GeoNote
//!
//! Coordinate acquisition (device fix with IP fallback), reverse geocoding via
//! Nominatim, current weather via Open-Meteo, and saved-place matching.

pub mod acquire;
pub mod distance;
pub mod geocode;
pub mod http;
pub mod places;
pub mod types;
pub mod weather;

pub use acquire::{
    DeviceFix, DevicePositioner, IpLookupSource, LocationAcquirer, PositionRequest,
    PositionSource, PreciseSource, StaticPositioner, UnsupportedPositioner,
};
pub use distance::haversine_distance;
pub use geocode::{AddressLookup, NominatimGeocoder};
pub use places::{match_places, PlaceMatch};
pub use types::*;
pub use weather::{OpenMeteoProvider, WeatherLookup};
