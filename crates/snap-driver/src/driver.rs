use serde_json::Value;
use snap_settings::{Overrides, SessionConfig, SettingsStore};
use snap_types::Inspect;
use snap_verify::{Redaction, Verifier};
use tracing::debug;

use crate::error::DriverResult;
use crate::render::render;
use crate::walker::Walker;

/// Serializes object graphs against the settings held by a store.
///
/// Every call snapshots the caller's settings into a [`SessionConfig`], so
/// changes to the store never affect a call already in progress.
pub struct SerializationDriver {
    store: SettingsStore,
}

impl SerializationDriver {
    pub fn new(store: SettingsStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    /// Produce the canonical text for `target`.
    pub fn serialize(&self, target: &dyn Inspect, overrides: &Overrides) -> DriverResult<String> {
        let session = self.store.build_session(overrides)?;
        debug!(
            root = %target.descriptor(),
            mode = ?self.store.mode(),
            "serializing"
        );
        serialize_with(target, &session)
    }

    /// Serialize `target`, apply the optional redaction, and hand the text to
    /// `verifier`.
    pub fn verify(
        &self,
        target: &dyn Inspect,
        overrides: &Overrides,
        verifier: &dyn Verifier,
        redaction: Option<&Redaction>,
    ) -> DriverResult<()> {
        let text = self.serialize(target, overrides)?;
        let text = match redaction {
            Some(redact) => redact(text.as_str()),
            None => text,
        };
        verifier.verify(&text)?;
        Ok(())
    }
}

/// Serialize `target` with an explicit session configuration.
pub fn serialize_with(target: &dyn Inspect, session: &SessionConfig) -> DriverResult<String> {
    let value = to_value(target, session)?;
    render(&value, session.options.indent)
}

/// Walk `target` into a JSON tree without rendering it.
pub fn to_value(target: &dyn Inspect, session: &SessionConfig) -> DriverResult<Value> {
    Walker::new(session).walk(target)
}
