//! Core implementation of the faker command aliaser
//!
//! Faker maps short, dot-separated names (`m.c`) to a program and a fixed argument
//! template. Typed arguments are resolved to the longest matching alias, optionally
//! accepting abbreviated segments, and the alias is run with the remaining arguments
//! appended. Templates may contain pipe markers to chain several processes.
//!
//! Aliases live in a JSON or YAML store file next to the executable or in the user
//! config directory. Each invocation loads the store into a [`registry::Registry`],
//! consults or mutates it, and writes it back when it changed.

use std::path::Path;

use log::{debug, warn};

use crate::registry::Registry;
use crate::store_file::StoreFileError;

pub mod commands;
pub mod listing;
pub mod logger;
pub mod pipeline;
pub mod registry;
pub mod resolver;
pub mod settings;
pub mod store;
pub mod store_file;

/// Load the store at `path`, upgrading legacy documents in place.
///
/// A legacy document is copied to a `.v<N>.bak` file next to the store before it is
/// rewritten in the current format. A missing file yields an empty registry.
///
/// # Errors
///
/// Returns `StoreFileError` if the file cannot be read or parsed, or if the upgraded
/// document cannot be written back.
pub fn load_store(path: &Path) -> Result<Registry, StoreFileError> {
    debug!("Loading store from {}", path.display());
    let loaded = store_file::read_store(path)?;
    if let Some(version) = loaded.upgraded_from {
        let backup = store_file::backup_path(path, version);
        std::fs::copy(path, &backup).map_err(|e| StoreFileError::Write {
            source: e,
            path: backup.clone(),
        })?;
        store_file::write_store(path, &loaded.registry)?;
        warn!(
            "Upgraded store {} from version {version} (backup at {})",
            path.display(),
            backup.display()
        );
    }
    check_runnable(&loaded.registry);
    Ok(loaded.registry)
}

/// Warn about aliases that cannot be executed
fn check_runnable(registry: &Registry) {
    for (key, command) in registry.commands.iter() {
        if !command.is_runnable() {
            warn!("Alias `{key}` has no program and cannot be run");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::command::Command;

    #[test]
    fn test_load_store_upgrades_and_backs_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        let legacy = r#"{"Commands": [{"Name": "gitinit", "Path": "git", "Args": ["init"]}]}"#;
        std::fs::write(&path, legacy).unwrap();

        let registry = load_store(&path).unwrap();
        assert_eq!(
            registry.commands.get("gitinit"),
            Some(&Command::new("git", ["init"]))
        );

        let backup = dir.path().join("f.json.v0.bak");
        assert_eq!(std::fs::read_to_string(backup).unwrap(), legacy);

        let reloaded = store_file::read_store(&path).unwrap();
        assert!(reloaded.upgraded_from.is_none());
        assert_eq!(reloaded.registry, registry);
    }

    #[test]
    fn test_load_store_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.yaml");
        assert_eq!(load_store(&path).unwrap(), Registry::new());
        assert!(!path.exists());
    }
}
