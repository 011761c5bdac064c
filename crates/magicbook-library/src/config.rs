//! Library configuration and issue folders.

use crate::types::*;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Timestamp format for issue folders.
pub const ISSUE_DIR_FORMAT: &str = "%Y-%m-%d %H%M%S";

/// Directory (relative to the library root) holding `config.json`.
pub const CONFIG_DIR: &str = "config";

/// Locations inside a magicbook library root.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Directories {
    pub library: PathBuf,
    pub output: PathBuf,
    #[cfg_attr(feature = "serde", serde(default = "default_templates"))]
    pub templates: PathBuf,
}

fn default_templates() -> PathBuf {
    PathBuf::from("templates")
}

impl Default for Directories {
    fn default() -> Self {
        Self {
            library: PathBuf::from("library"),
            output: PathBuf::from("output"),
            templates: default_templates(),
        }
    }
}

/// Contents of `<root>/config/config.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct LibraryConfig {
    pub directories: Directories,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_ensemble: Option<PathBuf>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_instruments: Option<PathBuf>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub split_table: Option<PathBuf>,
}

impl LibraryConfig {
    /// Load `config/config.json` from a library root.
    #[cfg(feature = "serde")]
    pub fn load(root: impl AsRef<Path>) -> Result<Self> {
        read_json(root.as_ref().join(CONFIG_DIR).join("config.json"))
    }

    pub fn library_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.directories.library)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.directories.output)
    }

    pub fn templates_dir(&self, root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(&self.directories.templates)
    }

    /// Resolve a path from the config directory.
    pub fn config_path(&self, root: &Path, relative: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(relative)
    }
}

#[cfg(feature = "serde")]
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|source| LibraryError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a directory that must not exist yet.
pub fn create_fresh_dir(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    match std::fs::create_dir(path) {
        Ok(()) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(LibraryError::DirectoryExists(path.to_path_buf()))
        }
        Err(e) => Err(e.into()),
    }
}

/// Make `<output>/<ensemble>/<timestamp>/` for one run.
///
/// The ensemble folder is created on demand; the timestamped issue folder
/// must be new.
pub fn prepare_issue_dir(
    output_dir: impl AsRef<Path>,
    ensemble_slug: &str,
    issued: NaiveDateTime,
) -> Result<PathBuf> {
    let ensemble_dir = output_dir.as_ref().join(ensemble_slug);
    std::fs::create_dir_all(&ensemble_dir)?;
    let issue_dir = ensemble_dir.join(issued.format(ISSUE_DIR_FORMAT).to_string());
    create_fresh_dir(issue_dir)
}
