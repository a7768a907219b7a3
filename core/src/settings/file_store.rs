//! TOML settings file (`<config dir>/audio.toml`)
//!
//! Dotted keys map to nested tables, so `audio.system` is stored as
//!
//! ```toml
//! [audio]
//! system = "ALSA"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml::{Table, Value};
use tracing::{debug, warn};

use super::{SettingsStore, StoreError};

/// File name inside the configuration directory.
pub const SETTINGS_FILE_NAME: &str = "audio.toml";

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Tonecanvas\config`
/// On macOS: `~/Library/Application Support/io.tonecanvas.Tonecanvas`
/// On Linux: `~/.config/tonecanvas`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.tonecanvas", "", "Tonecanvas")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of the settings file.
pub fn default_settings_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(SETTINGS_FILE_NAME))
}

/// Settings store backed by a TOML file.
///
/// The whole file is read on open and rewritten on [`flush`](SettingsStore::flush).
/// Keys outside `audio.*` are preserved.
#[derive(Debug, Clone)]
pub struct TomlFileStore {
    path: PathBuf,
    table: Table,
}

impl TomlFileStore {
    /// Open the settings file at `path`.
    ///
    /// A missing file is an empty store. A file that is not valid TOML is
    /// logged and treated as empty; it is replaced on the next flush.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<Table>(&content) {
                Ok(table) => table,
                Err(e) => {
                    warn!("Ignoring unreadable settings file {}: {}", path.display(), e);
                    Table::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No settings file at {}, using defaults", path.display());
                Table::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, table })
    }

    /// Open the settings file in the platform configuration directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = default_settings_path().ok_or(StoreError::NoConfigDir)?;
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut parts = key.split('.');
        let first = parts.next()?;
        parts.try_fold(self.table.get(first)?, |value, part| {
            value.as_table()?.get(part)
        })
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SettingsStore for TomlFileStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s.clone()),
            // Hand-edited files may hold bare numbers
            Value::Integer(i) => Some(i.to_string()),
            _ => None,
        }
    }

    fn set(&mut self, key: &str, value: String) {
        let mut parts: Vec<&str> = key.split('.').collect();
        let Some(leaf) = parts.pop() else {
            return;
        };

        let mut table = &mut self.table;
        for part in parts {
            let entry = table
                .entry(part.to_string())
                .or_insert(Value::Table(Table::new()));
            if !entry.is_table() {
                *entry = Value::Table(Table::new());
            }
            let Value::Table(child) = entry else {
                return;
            };
            table = child;
        }
        table.insert(leaf.to_string(), Value::String(value));
    }

    /// Write the file through a sibling temp file and rename, so readers
    /// never see a half-written file.
    fn flush(&mut self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let content = toml::to_string_pretty(&self.table)?;
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, content).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;

        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
