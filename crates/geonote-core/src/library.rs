//! User-owned templates and saved places.
//!
//! Both collections live in the configuration file and are referenced
//! elsewhere by id only.

use serde::{Deserialize, Serialize};

/// Radius given to places that are created without one.
pub const DEFAULT_PLACE_RADIUS_METERS: f64 = 200.0;

/// Template body given to places that are created without one.
pub const DEFAULT_PLACE_TEMPLATE: &str = "{place} ({coords})";

/// Generate a fresh identifier for a template or place.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A user-defined output template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTemplate {
    pub id: String,
    pub name: String,
    pub body: String,
}

impl NamedTemplate {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            body: body.into(),
        }
    }
}

/// A named location with a detection radius and its own template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPlace {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Detection radius in meters
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default = "default_place_template")]
    pub template: String,
}

fn default_radius() -> f64 {
    DEFAULT_PLACE_RADIUS_METERS
}

fn default_place_template() -> String {
    DEFAULT_PLACE_TEMPLATE.to_string()
}

impl SavedPlace {
    /// Create a place at the given coordinate with the default radius and template.
    pub fn at(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            latitude,
            longitude,
            radius: DEFAULT_PLACE_RADIUS_METERS,
            template: DEFAULT_PLACE_TEMPLATE.to_string(),
        }
    }

    /// Create a place from manual entry; coordinates start at 0,0 until edited.
    pub fn manual(name: impl Into<String>) -> Self {
        Self::at(name, 0.0, 0.0)
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Whether the radius describes a usable detection region.
    pub fn has_valid_radius(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }

    /// Template body to render with, falling back when the stored one is blank.
    pub fn template_body(&self) -> &str {
        if self.template.trim().is_empty() {
            DEFAULT_PLACE_TEMPLATE
        } else {
            &self.template
        }
    }
}
