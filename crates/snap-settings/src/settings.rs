//! A complete configuration and the per-call snapshot built from it.

use std::fmt;
use std::sync::Arc;

use snap_filter::{ErrorRule, IgnoreRule, RuleSet};
use snap_scrub::TimestampFormats;
use snap_types::{ErrorKind, TypeDescriptor};

use crate::config::SnapConfig;
use crate::error::SettingsResult;
use crate::flags::{Flags, Overrides};
use crate::options::SerializerOptions;

/// Hook that adjusts serializer options after everything else is applied.
pub type ExtraSettings = Arc<dyn Fn(&mut SerializerOptions) + Send + Sync>;

/// The fixed default rule set.
///
/// Members failing with `NotImplemented` or `NotSupported` are dropped, and
/// the platform-dependent `RawOsError` of `std::io::Error` is never emitted.
pub fn default_rules() -> RuleSet {
    let mut rules = RuleSet::new();
    rules.push(IgnoreRule::Error(ErrorRule::Kind(ErrorKind::NotImplemented)));
    rules.push(IgnoreRule::Error(ErrorRule::Kind(ErrorKind::NotSupported)));
    rules.push(IgnoreRule::Member {
        declaring_type: TypeDescriptor::of::<std::io::Error>(),
        name: "RawOsError".to_string(),
    });
    rules
}

/// Everything a serialization call can be configured with.
#[derive(Clone)]
pub struct Settings {
    pub rules: RuleSet,
    pub flags: Flags,
    pub formats: TimestampFormats,
    pub options: SerializerOptions,
    pub extra: Option<ExtraSettings>,
}

impl Settings {
    /// Default rules, all flags on, no extra formats, default options.
    pub fn defaults() -> Self {
        Self {
            rules: default_rules(),
            flags: Flags::default(),
            formats: TimestampFormats::new(),
            options: SerializerOptions::default(),
            extra: None,
        }
    }

    /// Defaults overlaid with a configuration file. Formats are validated.
    pub fn from_config(config: &SnapConfig) -> SettingsResult<Self> {
        let mut settings = Self::defaults();
        settings.flags = config.flags;
        settings.options = config.serializer.clone();
        for format in &config.date_time_formats {
            settings.formats.add_naive(format.as_str())?;
        }
        for format in &config.date_time_offset_formats {
            settings.formats.add_offset(format.as_str())?;
        }
        Ok(settings)
    }

    /// Snapshot for one call. Overrides win over stored flags, and the extra
    /// hook runs last.
    pub fn build_session(&self, overrides: &Overrides) -> SessionConfig {
        let mut options = self.options.clone();
        if let Some(extra) = &self.extra {
            extra(&mut options);
        }
        SessionConfig {
            flags: self.flags.apply(overrides),
            rules: self.rules.clone(),
            formats: self.formats.clone(),
            options,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("rules", &self.rules)
            .field("flags", &self.flags)
            .field("formats", &self.formats)
            .field("options", &self.options)
            .field("extra", &self.extra.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Immutable configuration for exactly one serialization call.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub flags: Flags,
    pub rules: RuleSet,
    pub formats: TimestampFormats,
    pub options: SerializerOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Settings::defaults().build_session(&Overrides::default())
    }
}
