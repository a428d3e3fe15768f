//! The settings store: registration surface and session builder.

use std::sync::Arc;

use snap_filter::{ErrorRule, IgnoreRule, InstancePredicate};
use snap_scrub::ScrubResult;
use snap_types::{ErrorKind, EvalError, Inspect, TypeDescriptor};
use tracing::{debug, info};

use crate::config::SnapConfig;
use crate::error::{SettingsError, SettingsResult};
use crate::flags::{Flags, Overrides};
use crate::options::SerializerOptions;
use crate::scope::{IsolatedScope, SettingsScope, SharedScope, ThreadingMode};
use crate::settings::{SessionConfig, Settings};

/// Mutable configuration with a lifetime mode fixed at construction.
///
/// Registration errors surface immediately; nothing is deferred to
/// serialization time.
pub struct SettingsStore {
    scope: Box<dyn SettingsScope>,
}

impl SettingsStore {
    /// A store seeded with the default settings.
    pub fn new(mode: ThreadingMode) -> Self {
        Self::with_seed(mode, Settings::defaults())
    }

    /// A store whose `reset` restores `seed`.
    pub fn with_seed(mode: ThreadingMode, seed: Settings) -> Self {
        let scope: Box<dyn SettingsScope> = match mode {
            ThreadingMode::Shared => Box::new(SharedScope::new(seed)),
            ThreadingMode::Isolated => Box::new(IsolatedScope::new(seed)),
        };
        info!(?mode, "settings store created");
        Self { scope }
    }

    /// A store backed by a caller-provided scope.
    pub fn with_scope(scope: Box<dyn SettingsScope>) -> Self {
        Self { scope }
    }

    /// A store seeded from a configuration file's contents.
    pub fn from_config(config: &SnapConfig) -> SettingsResult<Self> {
        let seed = Settings::from_config(config)?;
        Ok(Self::with_seed(config.threading_mode, seed))
    }

    pub fn mode(&self) -> ThreadingMode {
        self.scope.mode()
    }

    /// Copy of the caller's current settings.
    pub fn snapshot(&self) -> SettingsResult<Settings> {
        self.scope.current()
    }

    /// Restore the caller's settings to the seed.
    pub fn reset(&self) -> SettingsResult<()> {
        self.scope.reset()?;
        info!(mode = ?self.scope.mode(), "settings reset");
        Ok(())
    }

    /// Immutable configuration for one serialization call.
    pub fn build_session(&self, overrides: &Overrides) -> SettingsResult<SessionConfig> {
        Ok(self.scope.current()?.build_session(overrides))
    }

    // ---------------------------------------------------------------
    // Ignore rules
    // ---------------------------------------------------------------

    /// Ignore the member `name` on `declaring_type` and on every type
    /// assignable to it.
    pub fn ignore_member(&self, declaring_type: TypeDescriptor, name: &str) -> SettingsResult<()> {
        validate_member_name(&declaring_type, name)?;
        debug!(declaring_type = %declaring_type, name, "ignoring member");
        self.push(IgnoreRule::Member {
            declaring_type,
            name: name.to_string(),
        })
    }

    pub fn ignore_member_of<T: ?Sized>(&self, name: &str) -> SettingsResult<()> {
        self.ignore_member(TypeDescriptor::of::<T>(), name)
    }

    /// Ignore several members of `T`. Either all names are valid and
    /// registered, or none is.
    pub fn ignore_members_of<T: ?Sized>(&self, names: &[&str]) -> SettingsResult<()> {
        let declaring_type = TypeDescriptor::of::<T>();
        for name in names {
            validate_member_name(&declaring_type, name)?;
        }
        for name in names {
            self.ignore_member(declaring_type.clone(), name)?;
        }
        Ok(())
    }

    /// Ignore members declared on, or holding values of, `T`.
    pub fn ignore_members_with_type<T: ?Sized>(&self) -> SettingsResult<()> {
        self.ignore_type(TypeDescriptor::of::<T>())
    }

    pub fn ignore_type(&self, ty: TypeDescriptor) -> SettingsResult<()> {
        debug!(ty = %ty, "ignoring type");
        self.push(IgnoreRule::Type(ty))
    }

    /// Ignore values of `T` for which `predicate` holds.
    pub fn ignore_instance<T, F>(&self, predicate: F) -> SettingsResult<()>
    where
        T: 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate: InstancePredicate = Arc::new(move |value: &dyn Inspect| {
            value
                .as_any()
                .and_then(|any| any.downcast_ref::<T>())
                .is_some_and(&predicate)
        });
        self.ignore_instance_where(TypeDescriptor::of::<T>(), predicate)
    }

    /// Ignore values of `value_type` for which an untyped predicate holds.
    pub fn ignore_instance_where(
        &self,
        value_type: TypeDescriptor,
        predicate: InstancePredicate,
    ) -> SettingsResult<()> {
        debug!(value_type = %value_type, "ignoring instances");
        self.push(IgnoreRule::Instance {
            value_type,
            predicate,
        })
    }

    /// Drop members whose evaluation fails with `kind`.
    pub fn ignore_errors_of_kind(&self, kind: ErrorKind) -> SettingsResult<()> {
        debug!(%kind, "ignoring member errors");
        self.push(IgnoreRule::Error(ErrorRule::Kind(kind)))
    }

    /// Drop members whose evaluation failure matches `predicate`.
    pub fn ignore_errors_where<F>(&self, predicate: F) -> SettingsResult<()>
    where
        F: Fn(&EvalError) -> bool + Send + Sync + 'static,
    {
        self.push(IgnoreRule::Error(ErrorRule::Predicate(Arc::new(predicate))))
    }

    // ---------------------------------------------------------------
    // Scrubbing, flags and options
    // ---------------------------------------------------------------

    /// Register an extra strftime format for timestamps without an offset.
    pub fn add_date_time_format(&self, format: &str) -> SettingsResult<()> {
        self.try_update(|s| s.formats.add_naive(format))
    }

    /// Register an extra strftime format for timestamps with an offset.
    pub fn add_date_time_offset_format(&self, format: &str) -> SettingsResult<()> {
        self.try_update(|s| s.formats.add_offset(format))
    }

    /// Install the hook that adjusts serializer options last.
    pub fn set_extra_settings<F>(&self, hook: F) -> SettingsResult<()>
    where
        F: Fn(&mut SerializerOptions) + Send + Sync + 'static,
    {
        let hook: crate::settings::ExtraSettings = Arc::new(hook);
        self.scope.update(&mut |s: &mut Settings| s.extra = Some(Arc::clone(&hook)))
    }

    pub fn set_ignore_empty_collections(&self, value: bool) -> SettingsResult<()> {
        self.scope.update(&mut |s: &mut Settings| s.flags.ignore_empty_collections = value)
    }

    pub fn set_scrub_guids(&self, value: bool) -> SettingsResult<()> {
        self.scope.update(&mut |s: &mut Settings| s.flags.scrub_guids = value)
    }

    pub fn set_scrub_date_times(&self, value: bool) -> SettingsResult<()> {
        self.scope.update(&mut |s: &mut Settings| s.flags.scrub_date_times = value)
    }

    pub fn set_ignore_false(&self, value: bool) -> SettingsResult<()> {
        self.scope.update(&mut |s: &mut Settings| s.flags.ignore_false = value)
    }

    pub fn flags(&self) -> SettingsResult<Flags> {
        Ok(self.scope.current()?.flags)
    }

    fn push(&self, rule: IgnoreRule) -> SettingsResult<()> {
        let mut rule = Some(rule);
        self.scope.update(&mut |s: &mut Settings| {
            if let Some(rule) = rule.take() {
                s.rules.push(rule);
            }
        })
    }

    fn try_update<F>(&self, mut apply: F) -> SettingsResult<()>
    where
        F: FnMut(&mut Settings) -> ScrubResult<()>,
    {
        let mut outcome = Ok(());
        self.scope.update(&mut |s: &mut Settings| outcome = apply(s))?;
        Ok(outcome?)
    }
}

impl std::fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsStore")
            .field("mode", &self.scope.mode())
            .finish_non_exhaustive()
    }
}

/// A member name must be a single identifier.
fn validate_member_name(declaring_type: &TypeDescriptor, name: &str) -> SettingsResult<()> {
    let reason = if name.is_empty() {
        Some("member name must not be empty".to_string())
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        Some("member name must not start with a digit".to_string())
    } else {
        name.chars()
            .find(|c| !(c.is_alphanumeric() || *c == '_'))
            .map(|c| format!("contains forbidden character: {c:?}"))
    };
    match reason {
        Some(reason) => Err(SettingsError::InvalidMember {
            type_name: declaring_type.to_string(),
            name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}
