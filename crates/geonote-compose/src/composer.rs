//! One resolution cycle per call: acquire a fix, pick a saved place, look up
//! address and weather when something will use them, then render.
//!
//! A `Composer` keeps no state between calls. Each call receives the
//! configuration snapshot it should use.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use geonote_core::{Config, SavedPlace};
use geonote_location::http::client_for;
use geonote_location::{
    match_places, AddressLookup, AddressResult, Coordinate, DevicePositioner, IpLookupSource,
    LocationAcquirer, NominatimGeocoder, OpenMeteoProvider, PreciseSource, WeatherLookup,
    WeatherResult,
};
use tracing::instrument;

use crate::context::RenderContext;
use crate::error::ComposeError;
use crate::formats::RenderPath;
use crate::frontmatter::{
    apply_fields, FrontmatterFields, FrontmatterOutcome, InsertMode, MetadataStore, LOCATION_KEY,
};
use crate::picker::{PlaceChoice, PlacePicker};
use crate::timestamp::Timestamp;

/// Source of "now" for timestamps
pub type Clock = fn() -> DateTime<Utc>;

pub struct Composer {
    acquirer: LocationAcquirer,
    geocoder: Arc<dyn AddressLookup>,
    weather: Arc<dyn WeatherLookup>,
    picker: Arc<dyn PlacePicker>,
    clock: Clock,
}

impl Composer {
    pub fn new(
        acquirer: LocationAcquirer,
        geocoder: Arc<dyn AddressLookup>,
        weather: Arc<dyn WeatherLookup>,
        picker: Arc<dyn PlacePicker>,
    ) -> Self {
        Self {
            acquirer,
            geocoder,
            weather,
            picker,
            clock: Utc::now,
        }
    }

    /// Wire up the HTTP providers from `config.services`. Device positioning
    /// comes from `positioner`, with the IP lookup as fallback.
    pub fn from_config(
        config: &Config,
        positioner: Arc<dyn DevicePositioner>,
        picker: Arc<dyn PlacePicker>,
    ) -> Result<Self, ComposeError> {
        let services = &config.services;
        let client = client_for(services)?;

        let acquirer = LocationAcquirer::with_fallback(
            PreciseSource::new(
                positioner,
                Duration::from_secs(services.position_timeout_secs),
            ),
            IpLookupSource::new(client.clone(), &services.ip_lookup_url),
        );
        let geocoder = Arc::new(NominatimGeocoder::new(client.clone(), &services.geocode_url));
        let weather = Arc::new(OpenMeteoProvider::new(client, &services.weather_url));

        Ok(Self::new(acquirer, geocoder, weather, picker))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Text for inline insertion.
    #[instrument(skip_all)]
    pub async fn compose_text(&self, config: &Config) -> Result<String, ComposeError> {
        let (coordinate, place) = self.locate(config).await?;
        let output = &config.output;

        let path = RenderPath::resolve(config, place.as_ref());
        let need_address =
            path.needs_address() || (place.is_none() && output.always_lookup_address);
        let need_weather = path.needs_weather() || output.include_weather;

        let (address, weather) = self
            .enrich(config, &coordinate, need_address, need_weather)
            .await;

        let timestamp = Timestamp::new((self.clock)(), output);
        let context = RenderContext {
            coordinate: &coordinate,
            place: place.as_ref(),
            address: address.as_ref(),
            weather: weather.as_ref(),
            timestamp: &timestamp,
            map_provider: output.map_provider,
        };

        Ok(path.render(&context.values(), output.include_timestamp))
    }

    /// Fields for the metadata block, limited to the enabled `frontmatter` keys.
    #[instrument(skip_all)]
    pub async fn compose_fields(&self, config: &Config) -> Result<FrontmatterFields, ComposeError> {
        let (coordinate, place) = self.locate(config).await?;
        let enabled = &config.frontmatter;

        let need_address = enabled.address && place.is_none();
        let (address, weather) = self
            .enrich(config, &coordinate, need_address, enabled.weather)
            .await;

        let address = match place {
            Some(place) => Some(place.name),
            None => address.map(|a| a.display),
        };

        Ok(FrontmatterFields {
            location: enabled
                .coordinates
                .then_some([coordinate.latitude, coordinate.longitude]),
            address: address.filter(|_| enabled.address),
            timestamp: enabled
                .timestamp
                .then(|| Timestamp::new((self.clock)(), &config.output).iso),
            weather: weather.map(|w| w.format()),
        })
    }

    /// Resolve fields and merge them into `store`.
    ///
    /// In insert mode a store that already has a location is left alone
    /// before any fix or lookup is attempted.
    #[instrument(skip_all, fields(mode = ?mode))]
    pub async fn write_fields<S: MetadataStore + ?Sized>(
        &self,
        config: &Config,
        store: &mut S,
        mode: InsertMode,
    ) -> Result<FrontmatterOutcome, ComposeError> {
        if mode == InsertMode::Insert && store.has_field(LOCATION_KEY) {
            tracing::info!("Document already has a location, skipping resolution");
            return Ok(FrontmatterOutcome::AlreadyPresent);
        }

        let fields = self.compose_fields(config).await?;
        if fields.is_empty() {
            tracing::info!("No frontmatter fields enabled");
            return Ok(FrontmatterOutcome::NothingEnabled);
        }

        Ok(apply_fields(store, &fields, mode))
    }

    /// A new place at the current fix with the default radius and template.
    /// The caller decides whether to store it.
    pub async fn capture_place(&self, name: &str) -> Result<SavedPlace, ComposeError> {
        let coordinate = self.acquirer.acquire().await?;
        tracing::info!(
            place = name,
            approximate = coordinate.approximate,
            "Captured place"
        );
        Ok(SavedPlace::at(name, coordinate.latitude, coordinate.longitude))
    }

    async fn locate(
        &self,
        config: &Config,
    ) -> Result<(Coordinate, Option<SavedPlace>), ComposeError> {
        let coordinate = self.acquirer.acquire().await?;

        let matches = match_places(&coordinate, &config.places);
        if matches.is_empty() {
            return Ok((coordinate, None));
        }

        tracing::debug!(count = matches.len(), "Saved places in range");
        let place = match self.picker.choose(&matches).await {
            PlaceChoice::Place(place) => Some(place),
            PlaceChoice::DetectedLocation => None,
        };
        Ok((coordinate, place))
    }

    /// Address and weather lookups, run concurrently. A failed lookup is
    /// logged and leaves its value empty.
    async fn enrich(
        &self,
        config: &Config,
        coordinate: &Coordinate,
        need_address: bool,
        need_weather: bool,
    ) -> (Option<AddressResult>, Option<WeatherResult>) {
        let address = async {
            if !need_address {
                return None;
            }
            let language = config.output.language.as_deref();
            match self.geocoder.reverse(coordinate, language).await {
                Ok(address) => Some(address),
                Err(e) => {
                    tracing::warn!("Address lookup failed: {}", e);
                    None
                }
            }
        };

        let weather = async {
            if !need_weather {
                return None;
            }
            let unit = config.weather.temperature_unit;
            match self.weather.current(coordinate, unit).await {
                Ok(weather) => Some(weather),
                Err(e) => {
                    tracing::warn!("Weather lookup failed: {}", e);
                    None
                }
            }
        };

        tokio::join!(address, weather)
    }
}
