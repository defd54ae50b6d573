//! Render path selection and the built-in layouts.

use geonote_core::{Config, NamedTemplate, SavedPlace};

use crate::template::{self, TemplateValues, ADDRESS_KEYS, WEATHER_KEYS};

/// Separator between the parts of the single-line layouts
const SEPARATOR: &str = " — ";

/// Hardcoded layouts selectable by id from `output.format`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuiltinFormat {
    #[default]
    Full,
    Compact,
    Coords,
}

impl BuiltinFormat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "full" => Some(Self::Full),
            "compact" => Some(Self::Compact),
            "coords" => Some(Self::Coords),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Compact => "compact",
            Self::Coords => "coords",
        }
    }

    fn render(&self, values: &TemplateValues, include_timestamp: bool) -> String {
        let get = |key: &str| values.get(key).map(String::as_str).unwrap_or_default();
        let address = get("address");
        let weather = get("weather");

        match self {
            Self::Coords | Self::Compact => {
                let mut parts = Vec::with_capacity(3);
                if *self == Self::Compact && !address.is_empty() {
                    parts.push(format!("{} ({})", address, get("coords")));
                } else {
                    parts.push(get("coords").to_string());
                }
                if include_timestamp {
                    parts.push(get("datetime").to_string());
                }
                if !weather.is_empty() {
                    parts.push(weather.to_string());
                }
                parts.join(SEPARATOR)
            }
            Self::Full => {
                let mut lines = Vec::with_capacity(5);
                if !address.is_empty() {
                    lines.push(address);
                }
                lines.push(get("coords"));
                if include_timestamp {
                    lines.push(get("datetime"));
                }
                if !weather.is_empty() {
                    lines.push(weather);
                }
                lines.push(get("mapLink"));
                lines.join("\n")
            }
        }
    }
}

/// Where the output text comes from for one cycle.
#[derive(Debug, Clone, Copy)]
pub enum RenderPath<'a> {
    SavedPlace(&'a SavedPlace),
    NamedTemplate(&'a NamedTemplate),
    Builtin(BuiltinFormat),
}

impl<'a> RenderPath<'a> {
    /// A chosen place wins, then a template whose id is the configured
    /// format, then the built-in with that id. Anything else is `full`.
    pub fn resolve(config: &'a Config, place: Option<&'a SavedPlace>) -> Self {
        if let Some(place) = place {
            return Self::SavedPlace(place);
        }

        let format = config.output.format.as_str();
        if let Some(named) = config.template(format) {
            return Self::NamedTemplate(named);
        }

        match BuiltinFormat::from_id(format) {
            Some(builtin) => Self::Builtin(builtin),
            None => {
                tracing::warn!("Unknown output format '{}', using full", format);
                Self::Builtin(BuiltinFormat::Full)
            }
        }
    }

    /// Template text for custom paths; built-ins have none.
    pub fn body(&self) -> Option<&'a str> {
        match self {
            Self::SavedPlace(place) => Some(place.template_body()),
            Self::NamedTemplate(named) => Some(named.body.as_str()),
            Self::Builtin(_) => None,
        }
    }

    /// Whether rendering would use a reverse-geocoded address.
    /// A saved place supplies its own name, so it never needs one.
    pub fn needs_address(&self) -> bool {
        match self {
            Self::SavedPlace(_) => false,
            Self::NamedTemplate(named) => template::references_any(&named.body, &ADDRESS_KEYS),
            Self::Builtin(BuiltinFormat::Coords) => false,
            Self::Builtin(_) => true,
        }
    }

    pub fn needs_weather(&self) -> bool {
        self.body()
            .is_some_and(|body| template::references_any(body, &WEATHER_KEYS))
    }

    pub fn render(&self, values: &TemplateValues, include_timestamp: bool) -> String {
        match self {
            Self::Builtin(builtin) => builtin.render(values, include_timestamp),
            _ => template::render(self.body().unwrap_or_default(), values),
        }
    }
}
