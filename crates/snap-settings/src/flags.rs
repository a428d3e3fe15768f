//! Boolean toggles and their per-call overrides.

use serde::{Deserialize, Serialize};

/// Store-level toggles. All default to `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flags {
    pub ignore_empty_collections: bool,
    pub scrub_guids: bool,
    pub scrub_date_times: bool,
    pub ignore_false: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            ignore_empty_collections: true,
            scrub_guids: true,
            scrub_date_times: true,
            ignore_false: true,
        }
    }
}

impl Flags {
    /// Flags for one call: explicit overrides win over these values.
    pub fn apply(self, overrides: &Overrides) -> Flags {
        Flags {
            ignore_empty_collections: overrides
                .ignore_empty_collections
                .unwrap_or(self.ignore_empty_collections),
            scrub_guids: overrides.scrub_guids.unwrap_or(self.scrub_guids),
            scrub_date_times: overrides.scrub_date_times.unwrap_or(self.scrub_date_times),
            ignore_false: overrides.ignore_false.unwrap_or(self.ignore_false),
        }
    }
}

/// Per-call overrides. `None` defers to the store.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Overrides {
    pub ignore_empty_collections: Option<bool>,
    pub scrub_guids: Option<bool>,
    pub scrub_date_times: Option<bool>,
    pub ignore_false: Option<bool>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_empty_collections(mut self, value: bool) -> Self {
        self.ignore_empty_collections = Some(value);
        self
    }

    pub fn scrub_guids(mut self, value: bool) -> Self {
        self.scrub_guids = Some(value);
        self
    }

    pub fn scrub_date_times(mut self, value: bool) -> Self {
        self.scrub_date_times = Some(value);
        self
    }

    pub fn ignore_false(mut self, value: bool) -> Self {
        self.ignore_false = Some(value);
        self
    }
}
