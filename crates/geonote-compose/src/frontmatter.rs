//! Structured location metadata and the documents that hold it.
//!
//! `FrontmatterFields` is what a resolution cycle produces for the metadata
//! path. A `MetadataStore` is anything that can take those fields;
//! `MarkdownNote` is the on-disk implementation using a YAML block at the top
//! of a Markdown file.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::NoteError;

pub const LOCATION_KEY: &str = "location";
pub const ADDRESS_KEY: &str = "address";
pub const TIMESTAMP_KEY: &str = "timestamp";
pub const WEATHER_KEY: &str = "weather";

const DELIMITER: &str = "---";

/// Fields to merge into a note's metadata. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontmatterFields {
    /// `[latitude, longitude]`
    pub location: Option<[f64; 2]>,
    pub address: Option<String>,
    /// RFC 3339 in the configured timezone
    pub timestamp: Option<String>,
    pub weather: Option<String>,
}

impl FrontmatterFields {
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.address.is_none()
            && self.timestamp.is_none()
            && self.weather.is_none()
    }

    pub fn entries(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::new();
        if let Some([lat, lon]) = self.location {
            entries.push((
                LOCATION_KEY.to_string(),
                Value::Sequence(vec![Value::from(lat), Value::from(lon)]),
            ));
        }
        let strings = [
            (ADDRESS_KEY, &self.address),
            (TIMESTAMP_KEY, &self.timestamp),
            (WEATHER_KEY, &self.weather),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                entries.push((key.to_string(), Value::String(value.clone())));
            }
        }
        entries
    }
}

/// Document metadata that location fields can be merged into.
pub trait MetadataStore: Send {
    fn has_field(&self, key: &str) -> bool;

    /// Set each entry, replacing existing values with the same key.
    fn merge(&mut self, entries: Vec<(String, Value)>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InsertMode {
    /// Refuse to touch a document that already has a location.
    #[default]
    Insert,
    /// Overwrite existing location fields.
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterOutcome {
    Inserted,
    Updated,
    /// The document already had a location and nothing was changed.
    AlreadyPresent,
    /// Every field is disabled, so there was nothing to write.
    NothingEnabled,
}

/// Merge `fields` into `store`, guarding against overwriting a location.
pub fn apply_fields<S: MetadataStore + ?Sized>(
    store: &mut S,
    fields: &FrontmatterFields,
    mode: InsertMode,
) -> FrontmatterOutcome {
    let existing = store.has_field(LOCATION_KEY);
    if existing && mode == InsertMode::Insert {
        tracing::info!("Document already has a location, leaving it unchanged");
        return FrontmatterOutcome::AlreadyPresent;
    }

    store.merge(fields.entries());

    if existing {
        FrontmatterOutcome::Updated
    } else {
        FrontmatterOutcome::Inserted
    }
}

/// A Markdown document with optional YAML frontmatter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkdownNote {
    pub frontmatter: Mapping,
    pub body: String,
}

impl MarkdownNote {
    /// Split `---` delimited YAML from the body. Text without an opening
    /// delimiter is all body.
    pub fn parse(text: &str) -> Result<Self, NoteError> {
        let Some((yaml, body)) = split_frontmatter(text)? else {
            return Ok(Self {
                frontmatter: Mapping::new(),
                body: text.to_string(),
            });
        };

        let frontmatter = if yaml.trim().is_empty() {
            Mapping::new()
        } else {
            match serde_yaml::from_str::<Value>(yaml)? {
                Value::Mapping(mapping) => mapping,
                Value::Null => Mapping::new(),
                _ => {
                    return Err(NoteError::Frontmatter(
                        "frontmatter is not a key/value mapping".to_string(),
                    ))
                }
            }
        };

        Ok(Self {
            frontmatter,
            body: body.to_string(),
        })
    }

    pub fn render(&self) -> Result<String, NoteError> {
        if self.frontmatter.is_empty() {
            return Ok(self.body.clone());
        }
        let yaml = serde_yaml::to_string(&self.frontmatter)?;
        Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{}", self.body))
    }

    /// Append `text` to the body on its own line.
    pub fn append_text(&mut self, text: &str) {
        if !self.body.is_empty() && !self.body.ends_with('\n') {
            self.body.push('\n');
        }
        self.body.push_str(text);
        self.body.push('\n');
    }

    /// Read a note; a missing file is an empty note.
    pub fn load(path: &Path) -> Result<Self, NoteError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn save(&self, path: &Path) -> Result<(), NoteError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.render()?)?;
        tracing::debug!("Saved note to {:?}", path);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.frontmatter.get(key)
    }
}

impl MetadataStore for MarkdownNote {
    fn has_field(&self, key: &str) -> bool {
        self.frontmatter.contains_key(key)
    }

    fn merge(&mut self, entries: Vec<(String, Value)>) {
        for (key, value) in entries {
            self.frontmatter.insert(Value::String(key), value);
        }
    }
}

/// Returns `(yaml, body)` when `text` opens with a delimiter line.
fn split_frontmatter(text: &str) -> Result<Option<(&str, &str)>, NoteError> {
    let Some(rest) = strip_delimiter_line(text) else {
        return Ok(None);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((yaml, body)));
        }
        offset += line.len();
    }

    Err(NoteError::Frontmatter(
        "missing closing '---' line".to_string(),
    ))
}

fn strip_delimiter_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(DELIMITER)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}
