use std::fmt;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("config entry `{0}` not found")]
    UnknownKey(String),
    #[error("value `{value}` is invalid for config entry `{key}`")]
    InvalidValue { key: String, value: String },
    #[error("config entries must be given as key/value pairs")]
    OddArguments,
}

/// Store-wide switches that change how aliases are resolved and added
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Allow abbreviated segments when resolving
    pub submatch: bool,
    /// Lock newly added aliases
    pub autolock: bool,
}

impl Settings {
    /// Set a single entry by name.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::UnknownKey` for an unknown entry and
    /// `SettingsError::InvalidValue` if `value` is not a boolean.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        let slot = match key {
            "submatch" => &mut self.submatch,
            "autolock" => &mut self.autolock,
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        };
        *slot = parse_bool(value).ok_or_else(|| SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })?;
        Ok(())
    }

    /// Apply `key value key value ...` pairs in order. Nothing is changed on error.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::OddArguments` for an unpaired key, or the first error from
    /// [`Settings::set`].
    pub fn apply<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<(), SettingsError> {
        if pairs.len() % 2 != 0 {
            return Err(SettingsError::OddArguments);
        }
        let mut updated = *self;
        for pair in pairs.chunks(2) {
            updated.set(pair[0].as_ref(), pair[1].as_ref())?;
        }
        *self = updated;
        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\tsubmatch: {}", self.submatch)?;
        writeln!(f, "\tautolock: {}", self.autolock)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
