//! Extra timestamp formats for parsing textual values.

use chrono::format::{Item, StrftimeItems};

use crate::error::{ScrubError, ScrubResult};

/// Caller-registered strftime formats, tried after the built-in parses fail.
///
/// Formats are validated when added, so a typo surfaces at registration time
/// rather than silently never matching.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimestampFormats {
    naive: Vec<String>,
    offset: Vec<String>,
}

impl TimestampFormats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a format for timestamps without an offset.
    pub fn add_naive(&mut self, format: impl Into<String>) -> ScrubResult<()> {
        let format = validated(format.into())?;
        if !self.naive.contains(&format) {
            self.naive.push(format);
        }
        Ok(())
    }

    /// Register a format for timestamps carrying a UTC offset.
    pub fn add_offset(&mut self, format: impl Into<String>) -> ScrubResult<()> {
        let format = validated(format.into())?;
        if !self.offset.contains(&format) {
            self.offset.push(format);
        }
        Ok(())
    }

    pub fn naive(&self) -> &[String] {
        &self.naive
    }

    pub fn offset(&self) -> &[String] {
        &self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.naive.is_empty() && self.offset.is_empty()
    }
}

fn validated(format: String) -> ScrubResult<String> {
    if format.trim().is_empty() || StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
        return Err(ScrubError::InvalidFormat(format));
    }
    Ok(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_formats_once() {
        let mut formats = TimestampFormats::new();
        formats.add_naive("%d/%m/%Y %H:%M").unwrap();
        formats.add_naive("%d/%m/%Y %H:%M").unwrap();
        formats.add_offset("%d/%m/%Y %H:%M %z").unwrap();
        assert_eq!(formats.naive().len(), 1);
        assert_eq!(formats.offset().len(), 1);
    }

    #[test]
    fn rejects_invalid_items() {
        let mut formats = TimestampFormats::new();
        assert!(matches!(
            formats.add_naive("%Y-%Q"),
            Err(ScrubError::InvalidFormat(_))
        ));
        assert!(formats.add_offset("   ").is_err());
        assert!(formats.is_empty());
    }
}
