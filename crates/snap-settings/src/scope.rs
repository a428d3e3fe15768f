//! Lifetime strategies for settings.
//!
//! [`SharedScope`] keeps one instance for every caller. [`IsolatedScope`]
//! keeps one instance per thread, created from the seed on first access.
//! Both map lock poisoning to [`SettingsError::LockPoisoned`].

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};
use std::thread::{self, ThreadId};

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};
use crate::settings::Settings;

/// How settings are shared between concurrent callers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreadingMode {
    /// One instance, mutations visible to every thread.
    #[default]
    Shared,
    /// One private instance per thread.
    Isolated,
}

/// Provides the settings visible to the calling execution context.
pub trait SettingsScope: Send + Sync {
    fn mode(&self) -> ThreadingMode;

    /// Copy of the caller's current settings.
    fn current(&self) -> SettingsResult<Settings>;

    /// Mutate the caller's settings in place.
    fn update(&self, apply: &mut dyn FnMut(&mut Settings)) -> SettingsResult<()>;

    /// Restore the caller's settings to the seed.
    fn reset(&self) -> SettingsResult<()>;
}

fn poisoned<E: std::fmt::Display>(e: E) -> SettingsError {
    SettingsError::LockPoisoned(e.to_string())
}

/// One settings instance for all threads.
#[derive(Debug)]
pub struct SharedScope {
    seed: Settings,
    settings: RwLock<Settings>,
}

impl SharedScope {
    pub fn new(seed: Settings) -> Self {
        Self {
            settings: RwLock::new(seed.clone()),
            seed,
        }
    }
}

impl SettingsScope for SharedScope {
    fn mode(&self) -> ThreadingMode {
        ThreadingMode::Shared
    }

    fn current(&self) -> SettingsResult<Settings> {
        let settings = self.settings.read().map_err(poisoned)?;
        Ok(settings.clone())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Settings)) -> SettingsResult<()> {
        let mut settings = self.settings.write().map_err(poisoned)?;
        apply(&mut settings);
        Ok(())
    }

    fn reset(&self) -> SettingsResult<()> {
        let mut settings = self.settings.write().map_err(poisoned)?;
        *settings = self.seed.clone();
        Ok(())
    }
}

/// A private settings instance per thread, created lazily from the seed.
///
/// Entries are never shared. One exists only for a thread that has mutated
/// its settings and not reset them since, so the map is bounded by the
/// number of such threads. Call [`SettingsScope::reset`] before a worker
/// thread exits to release its entry.
#[derive(Debug)]
pub struct IsolatedScope {
    seed: Settings,
    contexts: Mutex<HashMap<ThreadId, Settings>>,
}

impl IsolatedScope {
    pub fn new(seed: Settings) -> Self {
        Self {
            seed,
            contexts: Mutex::new(HashMap::new()),
        }
    }

    /// Number of threads currently holding private settings.
    pub fn contexts(&self) -> SettingsResult<usize> {
        Ok(self.contexts.lock().map_err(poisoned)?.len())
    }
}

impl SettingsScope for IsolatedScope {
    fn mode(&self) -> ThreadingMode {
        ThreadingMode::Isolated
    }

    fn current(&self) -> SettingsResult<Settings> {
        let contexts = self.contexts.lock().map_err(poisoned)?;
        Ok(contexts
            .get(&thread::current().id())
            .unwrap_or(&self.seed)
            .clone())
    }

    fn update(&self, apply: &mut dyn FnMut(&mut Settings)) -> SettingsResult<()> {
        let mut contexts = self.contexts.lock().map_err(poisoned)?;
        let settings = contexts
            .entry(thread::current().id())
            .or_insert_with(|| self.seed.clone());
        apply(settings);
        Ok(())
    }

    fn reset(&self) -> SettingsResult<()> {
        let mut contexts = self.contexts.lock().map_err(poisoned)?;
        contexts.remove(&thread::current().id());
        Ok(())
    }
}
