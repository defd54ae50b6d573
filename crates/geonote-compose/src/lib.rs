//! Turning a location fix into note content.
//!
//! The `Composer` runs one resolution cycle and produces either inline text
//! rendered through a template or a set of frontmatter fields. The
//! `frontmatter` module merges those fields into Markdown notes.

pub mod composer;
pub mod context;
pub mod error;
pub mod formats;
pub mod frontmatter;
pub mod map;
pub mod picker;
pub mod template;
pub mod timestamp;

pub use composer::{Clock, Composer};
pub use context::RenderContext;
pub use error::{ComposeError, NoteError};
pub use formats::{BuiltinFormat, RenderPath};
pub use frontmatter::{
    apply_fields, FrontmatterFields, FrontmatterOutcome, InsertMode, MarkdownNote, MetadataStore,
};
pub use picker::{DetectedLocationPicker, NearestPlacePicker, PlaceChoice, PlacePicker};
pub use template::{render, TemplateValues};
pub use timestamp::Timestamp;
