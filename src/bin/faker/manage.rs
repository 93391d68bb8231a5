use std::path::Path;
use std::process::ExitCode;

use log::{info, warn};

use faker::commands::command::Command;
use faker::registry::Registry;
use faker::store_file::write_store;

use crate::list::print_settings;

type CliResult = Result<ExitCode, Box<dyn std::error::Error>>;

/// Add or replace the alias `name`; `args[0]` is the program.
///
/// # Errors
///
/// Returns an error if no program is given, the alias is locked, or saving fails.
pub fn add(
    registry: &mut Registry,
    store_path: &Path,
    name: &str,
    args: &[String],
    comment: Option<String>,
) -> CliResult {
    let Some((program, template)) = args.split_first() else {
        return Err(format!("--add {name} requires a program").into());
    };
    let mut command = Command::new(program.as_str(), template);
    command.comment = comment;
    registry.add(name, command)?;
    write_store(store_path, registry)?;
    info!("Added alias `{name}`");
    Ok(ExitCode::SUCCESS)
}

/// Remove the alias `name`.
///
/// # Errors
///
/// Returns an error if the alias is locked or saving fails.
pub fn remove(registry: &mut Registry, store_path: &Path, name: &str) -> CliResult {
    if registry.remove(name)? {
        write_store(store_path, registry)?;
        info!("Removed alias `{name}`");
    } else {
        warn!("No alias named `{name}`");
    }
    Ok(ExitCode::SUCCESS)
}

/// Set or clear the lock on the alias `name`.
///
/// # Errors
///
/// Returns an error if saving fails.
pub fn lock(registry: &mut Registry, store_path: &Path, name: &str, locked: bool) -> CliResult {
    if registry.lock(name, locked) {
        write_store(store_path, registry)?;
        info!("Alias `{name}` locked: {locked}");
    } else {
        warn!("No alias named `{name}`");
    }
    Ok(ExitCode::SUCCESS)
}

/// Show the settings, or apply `KEY VALUE` pairs and save.
///
/// # Errors
///
/// Returns an error for unknown keys, invalid values, or if saving fails.
pub fn config(registry: &mut Registry, store_path: &Path, args: &[String]) -> CliResult {
    if args.is_empty() {
        print_settings(registry, store_path);
        return Ok(ExitCode::SUCCESS);
    }
    registry.settings.apply(args)?;
    write_store(store_path, registry)?;
    Ok(ExitCode::SUCCESS)
}
