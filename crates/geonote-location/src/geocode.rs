//! Reverse geocoding: convert coordinates to a human-readable address.
//! Uses Nominatim (OpenStreetMap) - free, no API key required, but a
//! User-Agent is mandatory and usage is limited to one request per second.

use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::http::get_json;
use crate::types::{AddressResult, Coordinate, LookupError};

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org";

/// Resolves a coordinate into an address.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn reverse(
        &self,
        coordinate: &Coordinate,
        language: Option<&str>,
    ) -> Result<AddressResult, LookupError>;
}

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    display_name: Option<String>,
    address: Option<NominatimAddress>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

impl NominatimResponse {
    fn into_address(self) -> Result<AddressResult, LookupError> {
        if let Some(error) = self.error {
            return Err(LookupError::Provider(error));
        }

        let display = self
            .display_name
            .filter(|d| !d.trim().is_empty())
            .ok_or_else(|| LookupError::InvalidResponse("missing display_name".to_string()))?;

        let (city, country) = match self.address {
            Some(addr) => (addr.city.or(addr.town).or(addr.village), addr.country),
            None => (None, None),
        };

        Ok(AddressResult {
            display,
            city,
            country,
        })
    }
}

/// Nominatim reverse geocoder
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// `client` must already carry the identifying User-Agent.
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AddressLookup for NominatimGeocoder {
    #[instrument(skip(self), level = "debug")]
    async fn reverse(
        &self,
        coordinate: &Coordinate,
        language: Option<&str>,
    ) -> Result<AddressResult, LookupError> {
        let url = format!("{}/reverse", self.base_url);

        let mut request = self.client.get(&url).query(&[
            ("format", "json".to_string()),
            ("lat", coordinate.latitude.to_string()),
            ("lon", coordinate.longitude.to_string()),
            ("addressdetails", "1".to_string()),
        ]);

        if let Some(lang) = language.filter(|l| !l.trim().is_empty()) {
            request = request.header(ACCEPT_LANGUAGE, lang);
        }

        let body: NominatimResponse = get_json(request).await?;
        let address = body.into_address()?;

        tracing::info!("Reverse geocoded to: {}", address.display);
        Ok(address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> NominatimResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_city_preferred_over_town() {
        let body = parse(
            r#"{"display_name":"Plac Defilad 1, Warszawa, Polska",
                "address":{"city":"Warszawa","town":"Other","country":"Polska"}}"#,
        );
        let address = body.into_address().unwrap();
        assert_eq!(address.display, "Plac Defilad 1, Warszawa, Polska");
        assert_eq!(address.city.as_deref(), Some("Warszawa"));
        assert_eq!(address.country.as_deref(), Some("Polska"));
    }

    #[test]
    fn test_village_fallback() {
        let body = parse(r#"{"display_name":"Somewhere","address":{"village":"Zalesie"}}"#);
        let address = body.into_address().unwrap();
        assert_eq!(address.city.as_deref(), Some("Zalesie"));
        assert!(address.country.is_none());
    }

    #[test]
    fn test_provider_error() {
        let body = parse(r#"{"error":"Unable to geocode"}"#);
        assert!(matches!(body.into_address(), Err(LookupError::Provider(m)) if m == "Unable to geocode"));
    }

    #[test]
    fn test_missing_display_name() {
        let body = parse(r#"{"address":{"city":"X"}}"#);
        assert!(matches!(body.into_address(), Err(LookupError::InvalidResponse(_))));
    }
}
