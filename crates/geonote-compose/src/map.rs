use geonote_core::MapProvider;
use geonote_location::Coordinate;

/// Link to the coordinate on the configured map provider
pub fn map_url(provider: MapProvider, coordinate: &Coordinate) -> String {
    let lat = coordinate.format_lat();
    let lon = coordinate.format_lon();
    match provider {
        MapProvider::OpenStreetMap => format!(
            "https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map=16/{lat}/{lon}"
        ),
        MapProvider::Google => format!("https://www.google.com/maps?q={lat},{lon}"),
    }
}

/// Markdown link wrapping `map_url`
pub fn map_link(provider: MapProvider, coordinate: &Coordinate) -> String {
    let label = match provider {
        MapProvider::OpenStreetMap => "View on OpenStreetMap",
        MapProvider::Google => "View on Google Maps",
    };
    format!("[{}]({})", label, map_url(provider, coordinate))
}
