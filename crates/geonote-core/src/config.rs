use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use url::Url;

use crate::library::{NamedTemplate, SavedPlace};

/// Format id used when nothing else matches.
pub const DEFAULT_FORMAT: &str = "full";

const BUILTIN_FORMATS: [&str; 3] = ["full", "compact", "coords"];

/// One problem found in a config file, keyed by its TOML path
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors make the config unusable; warnings describe values that will be
/// replaced by a fallback at runtime.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigIssue>,
    pub warnings: Vec<ConfigIssue>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors on one line, `; ` separated
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Read-only snapshot of everything a location insert needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Output formatting
    #[serde(default)]
    pub output: OutputConfig,

    /// Weather settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Which frontmatter fields are written
    #[serde(default)]
    pub frontmatter: FrontmatterConfig,

    /// Remote service endpoints
    #[serde(default)]
    pub services: ServiceConfig,

    /// User-defined templates
    #[serde(default)]
    pub templates: Vec<NamedTemplate>,

    /// Saved places
    #[serde(default)]
    pub places: Vec<SavedPlace>,
}

/// Map provider used for `{mapUrl}` and `{mapLink}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    #[default]
    OpenStreetMap,
    Google,
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "°C",
            Self::Fahrenheit => "°F",
        }
    }

    /// Value of the `temperature_unit` query parameter
    pub fn as_param(&self) -> &'static str {
        match self {
            Self::Celsius => "celsius",
            Self::Fahrenheit => "fahrenheit",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Built-in format id (`full`, `compact`, `coords`) or a template id
    #[serde(default = "default_format")]
    pub format: String,

    /// Append the time to built-in formats
    #[serde(default = "default_true")]
    pub include_timestamp: bool,

    /// Fetch weather even when the template does not mention it
    #[serde(default)]
    pub include_weather: bool,

    /// Reverse geocode even when the template does not mention an address
    #[serde(default)]
    pub always_lookup_address: bool,

    #[serde(default)]
    pub map_provider: MapProvider,

    /// IANA timezone name; local time when unset
    #[serde(default)]
    pub timezone: Option<String>,

    /// Preferred language for addresses (Accept-Language)
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_time_format")]
    pub time_format: String,
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_time_format() -> String {
    "%H:%M".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            include_timestamp: true,
            include_weather: false,
            always_lookup_address: false,
            map_provider: MapProvider::default(),
            timezone: None,
            language: None,
            date_format: default_date_format(),
            time_format: default_time_format(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Temperature unit preference
    #[serde(default)]
    pub temperature_unit: TemperatureUnit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontmatterConfig {
    #[serde(default = "default_true")]
    pub coordinates: bool,
    #[serde(default = "default_true")]
    pub address: bool,
    #[serde(default = "default_true")]
    pub timestamp: bool,
    #[serde(default)]
    pub weather: bool,
}

impl Default for FrontmatterConfig {
    fn default() -> Self {
        Self {
            coordinates: true,
            address: true,
            timestamp: true,
            weather: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// IP geolocation endpoint (ip-api.com compatible)
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// Nominatim base URL
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Open-Meteo base URL
    #[serde(default = "default_weather_url")]
    pub weather_url: String,

    /// User-Agent sent to every service; Nominatim requires one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// How long to wait for a precise device fix, in seconds
    #[serde(default = "default_timeout_secs")]
    pub position_timeout_secs: u64,
}

fn default_ip_lookup_url() -> String {
    "http://ip-api.com/json".to_string()
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_weather_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_user_agent() -> String {
    format!("GeoNote/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            ip_lookup_url: default_ip_lookup_url(),
            geocode_url: default_geocode_url(),
            weather_url: default_weather_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_timeout_secs(),
            position_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load, then refuse configs with errors. Warnings are logged and returned.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.services.ip_lookup_url, "services.ip_lookup_url", &mut result);
        self.validate_url(&self.services.geocode_url, "services.geocode_url", &mut result);
        self.validate_url(&self.services.weather_url, "services.weather_url", &mut result);

        if self.services.user_agent.trim().is_empty() {
            result.add_error(
                "services.user_agent",
                "A User-Agent is required by the geocoding service",
            );
        }

        if self.services.request_timeout_secs == 0 {
            result.add_error("services.request_timeout_secs", "Timeout must be greater than 0");
        }
        if self.services.position_timeout_secs == 0 {
            result.add_error("services.position_timeout_secs", "Timeout must be greater than 0");
        }

        if let Some(tz) = &self.output.timezone {
            if tz.parse::<chrono_tz::Tz>().is_err() {
                result.add_warning(
                    "output.timezone",
                    format!("Unknown timezone '{}', local time will be used", tz),
                );
            }
        }

        if !self.is_known_format(&self.output.format) {
            result.add_warning(
                "output.format",
                format!(
                    "Format '{}' does not exist, falling back to '{}'",
                    self.output.format, DEFAULT_FORMAT
                ),
            );
        }

        let mut template_ids = HashSet::new();
        for template in &self.templates {
            if !template_ids.insert(template.id.as_str()) {
                result.add_error("templates", format!("Duplicate template id: {}", template.id));
            }
            if BUILTIN_FORMATS.contains(&template.id.as_str()) {
                result.add_error(
                    "templates",
                    format!("Template id '{}' shadows a built-in format", template.id),
                );
            }
        }

        let mut place_ids = HashSet::new();
        for place in &self.places {
            if !place_ids.insert(place.id.as_str()) {
                result.add_error("places", format!("Duplicate place id: {}", place.id));
            }
            if !place.has_valid_radius() {
                result.add_warning(
                    "places",
                    format!("Place '{}' has no usable radius and will never match", place.name),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Whether `id` names a built-in format or an existing template
    pub fn is_known_format(&self, id: &str) -> bool {
        BUILTIN_FORMATS.contains(&id) || self.template(id).is_some()
    }

    /// Look up a template by id
    pub fn template(&self, id: &str) -> Option<&NamedTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Look up a place by id
    pub fn place(&self, id: &str) -> Option<&SavedPlace> {
        self.places.iter().find(|p| p.id == id)
    }

    /// Add a template and return its id
    pub fn add_template(&mut self, name: impl Into<String>, body: impl Into<String>) -> String {
        let template = NamedTemplate::new(name, body);
        let id = template.id.clone();
        self.templates.push(template);
        id
    }

    /// Replace a template's name and body. Returns false if the id is unknown.
    pub fn update_template(&mut self, id: &str, name: impl Into<String>, body: impl Into<String>) -> bool {
        match self.templates.iter_mut().find(|t| t.id == id) {
            Some(template) => {
                template.name = name.into();
                template.body = body.into();
                true
            }
            None => false,
        }
    }

    /// Remove a template. A format selection pointing at it goes back to the default.
    pub fn remove_template(&mut self, id: &str) -> Option<NamedTemplate> {
        let index = self.templates.iter().position(|t| t.id == id)?;
        let removed = self.templates.remove(index);

        if self.output.format == id {
            tracing::info!(
                "Selected template '{}' was deleted, using '{}' format",
                removed.name,
                DEFAULT_FORMAT
            );
            self.output.format = default_format();
        }

        Some(removed)
    }

    /// Append a saved place and return its id
    pub fn add_place(&mut self, place: SavedPlace) -> String {
        let id = place.id.clone();
        self.places.push(place);
        id
    }

    /// Remove a saved place
    pub fn remove_place(&mut self, id: &str) -> Option<SavedPlace> {
        let index = self.places.iter().position(|p| p.id == id)?;
        Some(self.places.remove(index))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// `<config dir>/geonote/config.toml`
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("geonote");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.services.geocode_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "services.geocode_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.services.weather_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_empty_user_agent_is_error() {
        let mut config = Config::default();
        config.services.user_agent = " ".to_string();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_unknown_format_is_warning() {
        let mut config = Config::default();
        config.output.format = "gone".to_string();
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "output.format"));
    }

    #[test]
    fn test_unknown_timezone_is_warning() {
        let mut config = Config::default();
        config.output.timezone = Some("Mars/Olympus".to_string());
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "output.timezone"));
    }

    #[test]
    fn test_duplicate_template_ids() {
        let mut config = Config::default();
        config.templates.push(NamedTemplate {
            id: "t1".into(),
            name: "A".into(),
            body: "{coords}".into(),
        });
        config.templates.push(NamedTemplate {
            id: "t1".into(),
            name: "B".into(),
            body: "{address}".into(),
        });
        let result = config.validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_bad_radius_is_warning() {
        let mut config = Config::default();
        config.add_place(SavedPlace::manual("Nowhere").with_radius(-1.0));
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "places"));
    }

    #[test]
    fn test_remove_selected_template_resets_format() {
        let mut config = Config::default();
        let id = config.add_template("Short", "{place}{address}");
        config.output.format = id.clone();

        let removed = config.remove_template(&id);
        assert!(removed.is_some());
        assert_eq!(config.output.format, DEFAULT_FORMAT);
    }

    #[test]
    fn test_remove_other_template_keeps_format() {
        let mut config = Config::default();
        let keep = config.add_template("Keep", "{coords}");
        let drop = config.add_template("Drop", "{address}");
        config.output.format = keep.clone();

        config.remove_template(&drop);
        assert_eq!(config.output.format, keep);
        assert!(config.remove_template("missing").is_none());
    }

    #[test]
    fn test_update_template() {
        let mut config = Config::default();
        let id = config.add_template("One", "{lat}");
        assert!(config.update_template(&id, "Two", "{lon}"));
        assert_eq!(config.template(&id).map(|t| t.body.as_str()), Some("{lon}"));
        assert!(!config.update_template("nope", "x", "y"));
    }

    #[test]
    fn test_add_and_remove_place() {
        let mut config = Config::default();
        let id = config.add_place(SavedPlace::at("Home", 52.2297, 21.0122));
        assert!(config.place(&id).is_some());
        assert_eq!(config.remove_place(&id).map(|p| p.name), Some("Home".to_string()));
        assert!(config.places.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.output.format = "compact".to_string();
        config.weather.temperature_unit = TemperatureUnit::Fahrenheit;
        config.add_place(SavedPlace::at("Home", 52.2297, 21.0122));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.output.format, "compact");
        assert_eq!(loaded.weather.temperature_unit, TemperatureUnit::Fahrenheit);
        assert_eq!(loaded.places.len(), 1);
        assert_eq!(loaded.places[0].name, "Home");
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.output.format, DEFAULT_FORMAT);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [output]
            format = "coords"
            map_provider = "google"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, "coords");
        assert_eq!(config.output.map_provider, MapProvider::Google);
        assert!(config.output.include_timestamp);
        assert_eq!(config.services.request_timeout_secs, 10);
        assert!(config.frontmatter.coordinates);
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_temperature_unit_strings() {
        assert_eq!(TemperatureUnit::Celsius.symbol(), "°C");
        assert_eq!(TemperatureUnit::Fahrenheit.as_param(), "fahrenheit");
    }
}
