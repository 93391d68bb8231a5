//! Flat, ordered storage of aliases keyed by their dot-path

use indexmap::IndexMap;
use thiserror::Error;

use crate::commands::command::Command;

/// Separator between segments of an alias key
pub const SEPARATOR: char = '.';

/// Errors raised when mutating the alias store
#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("alias `{0}` is locked")]
    Locked(String),
    #[error("invalid alias name `{0}`: segments must be non-empty")]
    InvalidKey(String),
    #[error("alias `{0}` has no program")]
    EmptyPath(String),
}

/// Split a dot-path key into its segments.
pub fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(SEPARATOR)
}

/// Ordered mapping from dot-path key to alias. The hierarchy is implicit in the keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStore {
    commands: IndexMap<String, Command>,
}

impl CommandStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the alias at `key`. A replaced alias keeps its position.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Locked` if an existing alias at `key` is locked.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        command: Command,
    ) -> Result<Option<Command>, StoreError> {
        let key = key.into();
        self.ensure_unlocked(&key)?;
        Ok(self.commands.insert(key, command))
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Command> {
        self.commands.get(key)
    }

    /// Remove the alias at `key`, keeping the order of the remaining aliases.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Locked` if the alias at `key` is locked.
    pub fn delete(&mut self, key: &str) -> Result<Option<Command>, StoreError> {
        self.ensure_unlocked(key)?;
        Ok(self.commands.shift_remove(key))
    }

    /// Set the lock gate of an alias. Returns `false` if there is no alias at `key`.
    pub fn set_locked(&mut self, key: &str, locked: bool) -> bool {
        match self.commands.get_mut(key) {
            Some(command) => {
                command.locked = locked;
                true
            }
            None => false,
        }
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Command)> {
        self.commands.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    fn ensure_unlocked(&self, key: &str) -> Result<(), StoreError> {
        match self.commands.get(key) {
            Some(existing) if existing.locked => Err(StoreError::Locked(key.to_string())),
            _ => Ok(()),
        }
    }
}

impl FromIterator<(String, Command)> for CommandStore {
    fn from_iter<T: IntoIterator<Item = (String, Command)>>(iter: T) -> Self {
        CommandStore {
            commands: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_cmd(path: &str) -> Command {
        Command::new(path, ["x"])
    }

    #[test]
    fn test_set_and_get() {
        let mut store = CommandStore::new();
        assert_eq!(store.set("build", make_cmd("cargo")).unwrap(), None);
        assert_eq!(store.get("build").unwrap().path, "cargo");
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut store = CommandStore::new();
        for key in ["zeta", "alpha", "m.c"] {
            store.set(key, make_cmd("true")).unwrap();
        }
        store.set("alpha", make_cmd("false")).unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "m.c"]);

        store.delete("zeta").unwrap();
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["alpha", "m.c"]);
    }

    #[test]
    fn test_locked_entry_rejects_set_and_delete() {
        let mut store = CommandStore::new();
        store.set("build", make_cmd("cargo").locked(true)).unwrap();
        let before = store.clone();

        assert_eq!(
            store.set("build", make_cmd("make")),
            Err(StoreError::Locked("build".to_string()))
        );
        assert_eq!(
            store.delete("build"),
            Err(StoreError::Locked("build".to_string()))
        );
        assert_eq!(store, before);
    }

    #[test]
    fn test_set_locked_toggles_gate() {
        let mut store = CommandStore::new();
        store.set("build", make_cmd("cargo")).unwrap();

        assert!(store.set_locked("build", true));
        assert!(store.delete("build").is_err());
        assert!(store.set_locked("build", false));
        assert!(store.delete("build").unwrap().is_some());
    }

    #[test]
    fn test_set_locked_missing_key_is_noop() {
        let mut store = CommandStore::new();
        assert!(!store.set_locked("nope", true));
        assert!(store.is_empty());
    }

    #[test]
    fn test_segments() {
        assert_eq!(segments("m.c").collect::<Vec<_>>(), vec!["m", "c"]);
        assert_eq!(segments("build").collect::<Vec<_>>(), vec!["build"]);
    }
}
