use snap_driver::SerializationDriver;
use snap_settings::{Overrides, SettingsStore, SnapConfig, ThreadingMode};
use snap_types::{Inspect, NamedValues};
use snap_verify::{Redaction, Verifier};
use tracing::info;

use crate::error::{SdkError, SdkResult};

/// Snapshot testing entry point.
///
/// Holds one settings store, fixed to a threading mode at construction, and
/// an optional redaction applied to every verified text.
pub struct Approver {
    driver: SerializationDriver,
    redaction: Option<Redaction>,
}

impl Approver {
    /// An approver with default settings in the given mode.
    pub fn new(mode: ThreadingMode) -> Self {
        Self {
            driver: SerializationDriver::new(SettingsStore::new(mode)),
            redaction: None,
        }
    }

    /// An approver seeded from a parsed configuration file.
    pub fn from_config(config: &SnapConfig) -> SdkResult<Self> {
        let store = SettingsStore::from_config(config)?;
        info!(mode = ?config.threading_mode, "approver configured");
        Ok(Self {
            driver: SerializationDriver::new(store),
            redaction: None,
        })
    }

    /// An approver configured from the file named by `SNAP_CONFIG`, or with
    /// defaults when the variable is unset.
    pub fn from_env() -> SdkResult<Self> {
        Self::from_config(&SnapConfig::from_env()?)
    }

    /// Apply `redaction` to every text before it is verified.
    pub fn with_redaction(mut self, redaction: Redaction) -> Self {
        self.redaction = Some(redaction);
        self
    }

    /// The registration surface.
    pub fn store(&self) -> &SettingsStore {
        self.driver.store()
    }

    pub fn serialize(&self, target: &dyn Inspect) -> SdkResult<String> {
        self.serialize_with(target, &Overrides::default())
    }

    pub fn serialize_with(&self, target: &dyn Inspect, overrides: &Overrides) -> SdkResult<String> {
        Ok(self.driver.serialize(target, overrides)?)
    }

    pub fn verify(&self, target: &dyn Inspect, verifier: &dyn Verifier) -> SdkResult<()> {
        self.verify_with(target, &Overrides::default(), verifier)
    }

    pub fn verify_with(
        &self,
        target: &dyn Inspect,
        overrides: &Overrides,
        verifier: &dyn Verifier,
    ) -> SdkResult<()> {
        self.driver
            .verify(target, overrides, verifier, self.redaction.as_ref())?;
        Ok(())
    }

    /// Serialize several values as one map keyed by the given names.
    ///
    /// Values share one walk, so a Guid seen under two names gets one token.
    pub fn serialize_named(&self, entries: &[(&str, &dyn Inspect)]) -> SdkResult<String> {
        self.serialize(&named(entries)?)
    }

    pub fn verify_named(
        &self,
        entries: &[(&str, &dyn Inspect)],
        verifier: &dyn Verifier,
    ) -> SdkResult<()> {
        self.verify(&named(entries)?, verifier)
    }
}

fn named<'a>(entries: &[(&'a str, &'a dyn Inspect)]) -> SdkResult<NamedValues<'a>> {
    let values = NamedValues::new(entries);
    match values.duplicate() {
        Some(name) => Err(SdkError::DuplicateName(name.to_string())),
        None => Ok(values),
    }
}
