//! Timezone-aware date/time strings for `{date}`, `{time}` and `{datetime}`.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;
use geonote_core::OutputConfig;

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";
const FALLBACK_TIME_FORMAT: &str = "%H:%M";

/// One instant rendered in the configured timezone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub date: String,
    pub time: String,
    pub datetime: String,
    /// RFC 3339 with the zone offset, used for frontmatter
    pub iso: String,
}

impl Timestamp {
    /// Render `instant` in `output.timezone`, or local time when unset or unknown.
    pub fn new(instant: DateTime<Utc>, output: &OutputConfig) -> Self {
        let zone = output
            .timezone
            .as_deref()
            .and_then(|name| name.parse::<Tz>().ok());

        match zone {
            Some(tz) => Self::in_zone(instant.with_timezone(&tz), output),
            None => Self::in_zone(instant.with_timezone(&Local), output),
        }
    }

    fn in_zone<Z: TimeZone>(moment: DateTime<Z>, output: &OutputConfig) -> Self
    where
        Z::Offset: std::fmt::Display,
    {
        let date = format_with(&moment, &output.date_format, FALLBACK_DATE_FORMAT);
        let time = format_with(&moment, &output.time_format, FALLBACK_TIME_FORMAT);
        let datetime = format!("{} {}", date, time);

        Self {
            date,
            time,
            datetime,
            iso: moment.to_rfc3339(),
        }
    }
}

/// Format with `pattern`, or `fallback` when the pattern is not valid strftime.
fn format_with<Z: TimeZone>(moment: &DateTime<Z>, pattern: &str, fallback: &str) -> String
where
    Z::Offset: std::fmt::Display,
{
    let valid = !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error));
    if valid {
        moment.format(pattern).to_string()
    } else {
        tracing::warn!("Invalid date/time format '{}', using '{}'", pattern, fallback);
        moment.format(fallback).to_string()
    }
}
