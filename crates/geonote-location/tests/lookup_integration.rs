//! Integration tests for the HTTP lookup providers using wiremock.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use geonote_core::TemperatureUnit;
use geonote_location::http::build_client;
use geonote_location::{
    AddressLookup, Coordinate, IpLookupSource, LocationAcquirer, LookupError, NominatimGeocoder,
    OpenMeteoProvider, PositionSource, PreciseSource, UnsupportedPositioner, WeatherLookup,
};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_AGENT: &str = "GeoNote-test/1.0";

fn client() -> reqwest::Client {
    build_client(USER_AGENT, Duration::from_secs(5)).unwrap()
}

fn warsaw() -> Coordinate {
    Coordinate::precise(52.2297, 21.0122, 10.0)
}

#[tokio::test]
async fn test_reverse_geocode_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "52.2297"))
        .and(query_param("lon", "21.0122"))
        .and(query_param("format", "json"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Pałac Kultury i Nauki, Warszawa, Polska",
            "address": { "city": "Warszawa", "country": "Polska" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), mock_server.uri());
    let address = geocoder.reverse(&warsaw(), None).await.unwrap();

    assert_eq!(address.display, "Pałac Kultury i Nauki, Warszawa, Polska");
    assert_eq!(address.city.as_deref(), Some("Warszawa"));
    assert_eq!(address.country.as_deref(), Some("Polska"));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("accept-language").is_none());
}

#[tokio::test]
async fn test_reverse_geocode_sends_language_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(header("accept-language", "de"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "display_name": "Kulturpalast, Warschau, Polen",
            "address": { "town": "Warschau", "country": "Polen" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), mock_server.uri());
    let address = geocoder.reverse(&warsaw(), Some("de")).await.unwrap();

    assert_eq!(address.city.as_deref(), Some("Warschau"));
}

#[tokio::test]
async fn test_reverse_geocode_provider_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": "Unable to geocode"
        })))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), mock_server.uri());
    let result = geocoder.reverse(&warsaw(), None).await;

    assert!(matches!(result, Err(LookupError::Provider(_))));
}

#[tokio::test]
async fn test_reverse_geocode_http_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let geocoder = NominatimGeocoder::new(client(), mock_server.uri());
    let err = geocoder.reverse(&warsaw(), None).await.unwrap_err();

    assert!(err.to_string().contains("429"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_weather_success_rounds_and_maps_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "52.2297"))
        .and(query_param("longitude", "21.0122"))
        .and(query_param("current_weather", "true"))
        .and(query_param("temperature_unit", "fahrenheit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 52.23,
            "longitude": 21.01,
            "current_weather": { "temperature": 71.6, "weathercode": 95, "windspeed": 10.2 }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OpenMeteoProvider::new(client(), mock_server.uri());
    let weather = provider
        .current(&warsaw(), TemperatureUnit::Fahrenheit)
        .await
        .unwrap();

    assert_eq!(weather.temperature, 72);
    assert_eq!(weather.description, "Thunderstorm");
    assert_eq!(weather.format(), "72°F, Thunderstorm");
}

#[tokio::test]
async fn test_weather_unknown_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_weather": { "temperature": 18.2, "weathercode": 9999 }
        })))
        .mount(&mock_server)
        .await;

    let provider = OpenMeteoProvider::new(client(), mock_server.uri());
    let weather = provider.current(&warsaw(), TemperatureUnit::Celsius).await.unwrap();

    assert_eq!(weather.format(), "18°C, Unknown");
}

#[tokio::test]
async fn test_weather_missing_current_block() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&mock_server)
        .await;

    let provider = OpenMeteoProvider::new(client(), mock_server.uri());
    let result = provider.current(&warsaw(), TemperatureUnit::Celsius).await;

    assert!(matches!(result, Err(LookupError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_ip_lookup_success_is_approximate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 50.0647,
            "lon": 19.945,
            "city": "Krakow"
        })))
        .mount(&mock_server)
        .await;

    let source = IpLookupSource::new(client(), format!("{}/json", mock_server.uri()));
    let fix = source.locate().await.unwrap();

    assert!(fix.approximate);
    assert_eq!(fix.accuracy_meters, 5000.0);
    assert_eq!(fix.latitude, 50.0647);
}

#[tokio::test]
async fn test_ip_lookup_fail_status_carries_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "reserved range"
        })))
        .mount(&mock_server)
        .await;

    let source = IpLookupSource::new(client(), format!("{}/json", mock_server.uri()));
    let err = source.locate().await.unwrap_err();

    assert!(err.to_string().contains("reserved range"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_acquirer_falls_back_to_ip() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "success",
            "lat": 52.23,
            "lon": 21.01
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let acquirer = LocationAcquirer::with_fallback(
        PreciseSource::new(Arc::new(UnsupportedPositioner), Duration::from_secs(1)),
        IpLookupSource::new(client(), format!("{}/json", mock_server.uri())),
    );

    let fix = acquirer.acquire().await.unwrap();
    assert!(fix.approximate);
    assert_eq!(fix.format_coords(), "52.230000, 21.010000 (approximate)");
}

#[tokio::test]
async fn test_acquirer_both_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let acquirer = LocationAcquirer::with_fallback(
        PreciseSource::new(Arc::new(UnsupportedPositioner), Duration::from_secs(1)),
        IpLookupSource::new(client(), format!("{}/json", mock_server.uri())),
    );

    let err = acquirer.acquire().await.unwrap_err();
    assert_eq!(err.to_string(), "All position sources failed");
}
