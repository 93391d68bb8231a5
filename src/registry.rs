//! The in-memory state of one invocation: aliases plus store-wide settings

use log::debug;

use crate::commands::command::Command;
use crate::resolver::{self, MatchMode, ResolveError, Resolution};
use crate::settings::Settings;
use crate::store::{CommandStore, StoreError, segments};

/// Document version written by this build
pub const CURRENT_VERSION: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub version: u32,
    pub commands: CommandStore,
    pub settings: Settings,
}

impl Default for Registry {
    fn default() -> Self {
        Registry {
            version: CURRENT_VERSION,
            commands: CommandStore::new(),
            settings: Settings::default(),
        }
    }
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the alias `key`. The alias is locked if it asks to be or
    /// `autolock` is on.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidKey` for an empty segment, `StoreError::EmptyPath`
    /// if the alias has no program and `StoreError::Locked` if the existing alias is
    /// locked.
    pub fn add(&mut self, key: &str, mut command: Command) -> Result<(), StoreError> {
        if segments(key).any(|segment| segment.trim().is_empty()) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        if !command.is_runnable() {
            return Err(StoreError::EmptyPath(key.to_string()));
        }
        command.locked = command.locked || self.settings.autolock;
        debug!("Adding alias `{key}` (locked: {})", command.locked);
        self.commands.set(key, command)?;
        Ok(())
    }

    /// Remove the alias `key`. Removing an unknown alias is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Locked` if the alias is locked.
    pub fn remove(&mut self, key: &str) -> Result<bool, StoreError> {
        Ok(self.commands.delete(key)?.is_some())
    }

    /// Set the lock gate of `key`, returning whether the alias exists.
    pub fn lock(&mut self, key: &str, locked: bool) -> bool {
        self.commands.set_locked(key, locked)
    }

    #[must_use]
    pub fn match_mode(&self) -> MatchMode {
        MatchMode::from_submatch(self.settings.submatch)
    }

    /// Resolve typed arguments using the configured match mode.
    ///
    /// # Errors
    ///
    /// See [`resolver::resolve`].
    pub fn find<'a>(&self, args: &'a [String]) -> Result<Resolution<'_, 'a>, ResolveError> {
        resolver::resolve(&self.commands, args, self.match_mode())
    }
}
