//! Store file handling: document model, JSON/YAML encoding and discovery

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use log::{debug, info};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::commands::command::Command;
use crate::registry::{CURRENT_VERSION, Registry};
use crate::settings::Settings;
use crate::store::CommandStore;

/// Errors that can occur while reading or writing the store file
#[derive(Error, Debug)]
pub enum StoreFileError {
    #[error("Unable to read store file {path}: {source}")]
    Read {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Unable to write store file {path}: {source}")]
    Write {
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("Invalid YAML in store file {path}: {source}")]
    Yaml {
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("Invalid JSON in store file {path}: {source}")]
    Json {
        source: serde_json::Error,
        path: PathBuf,
    },
    #[error(
        "Store file {path} has version {version}, newer than supported ({})",
        CURRENT_VERSION
    )]
    UnsupportedVersion { version: u32, path: PathBuf },
}

/// Name used when the executable name cannot be determined
pub const DEFAULT_APP_NAME: &str = "faker";

/// Folder under the user config directory that holds store files
pub const CONFIG_FOLDER: &str = "faker";

/// Supported store file extensions, in order of preference
const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

/// On-disk encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

impl Format {
    /// `.json` files are JSON, anything else is read as YAML.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        {
            Format::Json
        } else {
            Format::Yaml
        }
    }

    fn parse<T: DeserializeOwned>(self, contents: &str, path: &Path) -> Result<T, StoreFileError> {
        match self {
            Format::Json => serde_json::from_str(contents).map_err(|e| StoreFileError::Json {
                source: e,
                path: path.to_path_buf(),
            }),
            Format::Yaml => serde_yaml::from_str(contents).map_err(|e| StoreFileError::Yaml {
                source: e,
                path: path.to_path_buf(),
            }),
        }
    }

    fn render<T: Serialize>(self, value: &T, path: &Path) -> Result<String, StoreFileError> {
        match self {
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| StoreFileError::Json {
                    source: e,
                    path: path.to_path_buf(),
                })
            }
            Format::Yaml => serde_yaml::to_string(value).map_err(|e| StoreFileError::Yaml {
                source: e,
                path: path.to_path_buf(),
            }),
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

fn current_version() -> u32 {
    CURRENT_VERSION
}

/// A single alias as persisted
#[derive(Debug, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct StoredCommand {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub locked: bool,
}

impl From<StoredCommand> for Command {
    fn from(stored: StoredCommand) -> Self {
        Command {
            comment: stored.comment,
            locked: stored.locked,
            ..Command::new(stored.path, stored.args)
        }
    }
}

impl From<&Command> for StoredCommand {
    fn from(command: &Command) -> Self {
        StoredCommand {
            path: command.path.clone(),
            args: command.args(),
            comment: command.comment.clone(),
            locked: command.locked,
        }
    }
}

/// Root of the current store document
#[derive(Debug, Deserialize, Serialize)]
pub struct StoreDocument {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub commands: IndexMap<String, StoredCommand>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub submatch: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub autolock: bool,
}

impl From<StoreDocument> for Registry {
    fn from(document: StoreDocument) -> Self {
        Registry {
            version: CURRENT_VERSION,
            commands: document
                .commands
                .into_iter()
                .map(|(key, stored)| (key, Command::from(stored)))
                .collect(),
            settings: Settings {
                submatch: document.submatch,
                autolock: document.autolock,
            },
        }
    }
}

impl From<&Registry> for StoreDocument {
    fn from(registry: &Registry) -> Self {
        StoreDocument {
            version: CURRENT_VERSION,
            commands: registry
                .commands
                .iter()
                .map(|(key, command)| (key.to_string(), StoredCommand::from(command)))
                .collect(),
            submatch: registry.settings.submatch,
            autolock: registry.settings.autolock,
        }
    }
}

/// Just enough of any document generation to tell them apart
#[derive(Deserialize)]
struct LayoutProbe {
    version: Option<u32>,
    cmds: Option<IgnoredAny>,
    #[serde(rename = "Commands")]
    legacy_commands: Option<IgnoredAny>,
}

/// Version 0: a flat list of named commands
#[derive(Deserialize)]
struct LegacyListDocument {
    #[serde(rename = "Commands", default)]
    commands: Vec<LegacyListCommand>,
}

#[derive(Deserialize)]
struct LegacyListCommand {
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Path", alias = "path", default)]
    path: String,
    #[serde(rename = "Args", alias = "args", default)]
    args: Vec<String>,
}

/// Version 1: a tree of nested sub-commands
#[derive(Deserialize)]
struct LegacyTreeDocument {
    cmds: Option<LegacyTreeNode>,
    #[serde(default)]
    submatch: bool,
}

#[derive(Deserialize, Default)]
struct LegacyTreeNode {
    #[serde(default)]
    path: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    sub: IndexMap<String, LegacyTreeNode>,
}

fn flatten_tree(
    prefix: Option<&str>,
    nodes: IndexMap<String, LegacyTreeNode>,
    out: &mut Vec<(String, Command)>,
) {
    for (name, node) in nodes {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name,
        };
        if !node.path.is_empty() {
            out.push((key.clone(), Command::new(node.path, node.args)));
        }
        flatten_tree(Some(&key), node.sub, out);
    }
}

impl From<LegacyTreeDocument> for Registry {
    fn from(document: LegacyTreeDocument) -> Self {
        let mut commands = Vec::new();
        if let Some(root) = document.cmds {
            flatten_tree(None, root.sub, &mut commands);
        }
        Registry {
            commands: commands.into_iter().collect(),
            settings: Settings {
                submatch: document.submatch,
                autolock: false,
            },
            ..Registry::default()
        }
    }
}

impl From<LegacyListDocument> for Registry {
    fn from(document: LegacyListDocument) -> Self {
        Registry {
            commands: document
                .commands
                .into_iter()
                .map(|c| (c.name, Command::new(c.path, c.args)))
                .collect::<CommandStore>(),
            ..Registry::default()
        }
    }
}

/// A registry read from disk
#[derive(Debug)]
pub struct LoadedStore {
    pub registry: Registry,
    /// Legacy version the document was upgraded from, if any
    pub upgraded_from: Option<u32>,
}

/// Parse store contents, upgrading legacy documents in memory.
///
/// # Errors
///
/// Returns `StoreFileError::Json`/`StoreFileError::Yaml` if parsing fails, or
/// `StoreFileError::UnsupportedVersion` for documents written by a newer version.
pub fn parse_store(contents: &str, path: &Path) -> Result<LoadedStore, StoreFileError> {
    if contents.trim().is_empty() {
        return Ok(LoadedStore {
            registry: Registry::new(),
            upgraded_from: None,
        });
    }
    let format = Format::from_path(path);
    let probe: LayoutProbe = format.parse(contents, path)?;

    if let Some(version) = probe.version
        && version > CURRENT_VERSION
    {
        return Err(StoreFileError::UnsupportedVersion {
            version,
            path: path.to_path_buf(),
        });
    }

    let (registry, upgraded_from) = if probe.cmds.is_some() {
        let document: LegacyTreeDocument = format.parse(contents, path)?;
        (Registry::from(document), Some(1))
    } else if probe.legacy_commands.is_some() {
        let document: LegacyListDocument = format.parse(contents, path)?;
        (Registry::from(document), Some(0))
    } else {
        let document: StoreDocument = format.parse(contents, path)?;
        (Registry::from(document), None)
    };
    Ok(LoadedStore {
        registry,
        upgraded_from,
    })
}

/// Read the store at `path`. A missing file yields an empty registry.
///
/// # Errors
///
/// Returns `StoreFileError::Read` if the file exists but cannot be read, or any
/// parse error from [`parse_store`].
pub fn read_store(path: &Path) -> Result<LoadedStore, StoreFileError> {
    if !path.exists() {
        debug!("No store file at {}, starting empty", path.display());
        return Ok(LoadedStore {
            registry: Registry::new(),
            upgraded_from: None,
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| StoreFileError::Read {
        source: e,
        path: path.to_path_buf(),
    })?;
    parse_store(&contents, path)
}

/// Write `registry` to `path` in the encoding its extension selects, creating parent
/// directories as needed.
///
/// # Errors
///
/// Returns `StoreFileError::Write` on I/O failure or an encoding error.
pub fn write_store(path: &Path, registry: &Registry) -> Result<(), StoreFileError> {
    let contents = Format::from_path(path).render(&StoreDocument::from(registry), path)?;
    let write_error = |e| StoreFileError::Write {
        source: e,
        path: path.to_path_buf(),
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, contents).map_err(write_error)?;
    info!(
        "Saved {} alias(es) to {}",
        registry.commands.len(),
        path.display()
    );
    Ok(())
}

/// Path a legacy document is copied to before it is rewritten
#[must_use]
pub fn backup_path(path: &Path, version: u32) -> PathBuf {
    let mut backup = OsString::from(path.as_os_str());
    backup.push(format!(".v{version}.bak"));
    PathBuf::from(backup)
}

/// The executable's file stem, used to name its store file.
#[must_use]
pub fn app_name() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| DEFAULT_APP_NAME.to_string())
}

/// Locate the store for `app_name` next to the executable or in the user config directory.
#[must_use]
pub fn find_store(app_name: &str) -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let config_dir = dirs::config_dir().map(|dir| dir.join(CONFIG_FOLDER));
    find_store_in(app_name, exe_dir.as_deref(), config_dir.as_deref())
}

/// Return the first existing `<app_name>.{json,yaml,yml}` in `exe_dir` then `config_dir`,
/// falling back to `<exe_dir>/<app_name>.json`.
#[must_use]
pub fn find_store_in(app_name: &str, exe_dir: Option<&Path>, config_dir: Option<&Path>) -> PathBuf {
    let search: Vec<&Path> = [exe_dir, config_dir].into_iter().flatten().collect();
    for dir in &search {
        for ext in EXTENSIONS {
            let candidate = dir.join(format!("{app_name}.{ext}"));
            if candidate.is_file() {
                info!("Found store file: {}", candidate.display());
                return candidate;
            }
        }
    }
    let fallback = search
        .first()
        .map_or_else(|| PathBuf::from("."), |dir| dir.to_path_buf())
        .join(format!("{app_name}.{}", EXTENSIONS[0]));
    debug!("No store file found, defaulting to {}", fallback.display());
    fallback
}
