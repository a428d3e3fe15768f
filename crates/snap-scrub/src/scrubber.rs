//! Session-scoped scrubbing of volatile values.
//!
//! One [`ValueScrubber`] lives for one serialization call. Native values and
//! text that parses as a value of an enabled category share the same
//! placeholder table, so a `Uuid` field and a `String` field holding its text
//! render the same token.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::formats::TimestampFormats;
use crate::placeholder::Placeholders;

/// Built-in formats for timestamps without an offset, tried first.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Literal rendering of unscrubbed naive timestamps.
const NAIVE_LITERAL: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Families of volatile values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrubCategory {
    UniqueId,
    Instant,
}

/// A volatile value to scrub.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Volatile {
    UniqueId(Uuid),
    Instant(NaiveDateTime),
    OffsetInstant(DateTime<FixedOffset>),
}

impl Volatile {
    pub fn category(&self) -> ScrubCategory {
        match self {
            Volatile::UniqueId(_) => ScrubCategory::UniqueId,
            Volatile::Instant(_) | Volatile::OffsetInstant(_) => ScrubCategory::Instant,
        }
    }

    /// Returns `true` for the nil UUID and the Unix epoch.
    pub fn is_default(&self) -> bool {
        match self {
            Volatile::UniqueId(id) => id.is_nil(),
            Volatile::Instant(t) => *t == epoch(),
            Volatile::OffsetInstant(t) => t.naive_utc() == epoch(),
        }
    }

    /// Rendering used when the value is not replaced.
    pub fn literal(&self) -> String {
        match self {
            Volatile::UniqueId(id) => id.to_string(),
            Volatile::Instant(t) => t.format(NAIVE_LITERAL).to_string(),
            Volatile::OffsetInstant(t) => t.to_rfc3339(),
        }
    }
}

fn epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Replaces volatile values with first-seen placeholders.
#[derive(Debug)]
pub struct ValueScrubber<'f> {
    scrub_unique_ids: bool,
    scrub_instants: bool,
    formats: &'f TimestampFormats,
    unique_ids: Placeholders<Uuid>,
    instants: Placeholders<NaiveDateTime>,
    offset_instants: Placeholders<DateTime<FixedOffset>>,
}

impl<'f> ValueScrubber<'f> {
    pub fn new(scrub_unique_ids: bool, scrub_instants: bool, formats: &'f TimestampFormats) -> Self {
        Self {
            scrub_unique_ids,
            scrub_instants,
            formats,
            unique_ids: Placeholders::new("Guid"),
            instants: Placeholders::new("DateTime"),
            offset_instants: Placeholders::new("DateTimeOffset"),
        }
    }

    pub fn is_enabled(&self, category: ScrubCategory) -> bool {
        match category {
            ScrubCategory::UniqueId => self.scrub_unique_ids,
            ScrubCategory::Instant => self.scrub_instants,
        }
    }

    /// Placeholder for `value`, or its literal rendering when the category is
    /// disabled or the value is a default.
    pub fn scrub(&mut self, value: Volatile) -> String {
        if !self.is_enabled(value.category()) || value.is_default() {
            return value.literal();
        }
        match value {
            Volatile::UniqueId(id) => self.unique_ids.token(id),
            Volatile::Instant(t) => self.instants.token(t),
            Volatile::OffsetInstant(t) => self.offset_instants.token(t),
        }
    }

    /// Scrub text that parses as a value of an enabled category.
    ///
    /// Returns `None` when the text should be emitted unchanged.
    pub fn scrub_str(&mut self, text: &str) -> Option<String> {
        if text.trim().is_empty() {
            return None;
        }
        let value = self.parse(text)?;
        if value.is_default() {
            return None;
        }
        Some(self.scrub(value))
    }

    /// Identifier first, then naive and offset timestamps with the built-in
    /// formats, then the registered extras in the same order.
    fn parse(&self, text: &str) -> Option<Volatile> {
        if self.scrub_unique_ids {
            if let Ok(id) = Uuid::parse_str(text) {
                return Some(Volatile::UniqueId(id));
            }
        }
        if !self.scrub_instants {
            return None;
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|fmt| parse_naive(text, fmt))
            .map(Volatile::Instant)
            .or_else(|| {
                DateTime::parse_from_rfc3339(text)
                    .or_else(|_| DateTime::parse_from_rfc2822(text))
                    .ok()
                    .map(Volatile::OffsetInstant)
            })
            .or_else(|| {
                self.formats
                    .naive()
                    .iter()
                    .find_map(|fmt| parse_naive(text, fmt))
                    .map(Volatile::Instant)
            })
            .or_else(|| {
                self.formats
                    .offset()
                    .iter()
                    .find_map(|fmt| DateTime::parse_from_str(text, fmt).ok())
                    .map(Volatile::OffsetInstant)
            })
    }
}

/// Date-only formats parse to midnight.
fn parse_naive(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, fmt).ok().or_else(|| {
        NaiveDate::parse_from_str(text, fmt)
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN))
    })
}
