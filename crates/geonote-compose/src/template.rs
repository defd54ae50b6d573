//! `{placeholder}` substitution.
//!
//! Unknown placeholders render as empty strings, so a template can mention
//! `{place}` or `{weather}` without caring whether that value exists.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Values available to a template, keyed by placeholder name.
pub type TemplateValues = HashMap<String, String>;

/// Placeholders filled from reverse geocoding.
pub const ADDRESS_KEYS: [&str; 3] = ["address", "city", "country"];

/// Placeholders filled from the weather lookup.
pub const WEATHER_KEYS: [&str; 2] = ["weather", "temp"];

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").expect("placeholder pattern is valid"));

/// Replace every `{key}` with its value, or with nothing when the key is unknown.
pub fn render(template: &str, values: &TemplateValues) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Placeholder names used by a template, in order of appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Whether the template mentions any of `keys`.
pub fn references_any(template: &str, keys: &[&str]) -> bool {
    placeholders(template).iter().any(|name| keys.contains(name))
}
