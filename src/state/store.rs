//
//  devops-state
//  state/store.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File-backed state store.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{StateDocument, StateEntry, StateError};
use crate::resources::ResourceKind;

/// What the store does when the state file does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitMode {
    /// A missing file reads as an empty document and the first write creates it.
    #[default]
    CreateIfMissing,
    /// A missing file is an error; only [`StateStore::wipe`] creates it.
    FailIfMissing,
}

/// Where state is kept and how a missing file is treated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateConfig {
    /// State file path. `None` disables tracking.
    pub path: Option<PathBuf>,
    pub init: InitMode,
}

impl StateConfig {
    /// Tracking disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Tracking in the file at `path`.
    pub fn at(path: impl Into<PathBuf>, init: InitMode) -> Self {
        Self {
            path: Some(path.into()),
            init,
        }
    }
}

/// Persists the [`StateDocument`].
///
/// Every mutation reads the whole file, changes it in memory, and rewrites
/// the whole file through a temporary sibling that is renamed over the
/// original. Nothing is cached between calls.
///
/// With tracking disabled, [`add`](Self::add), [`remove`](Self::remove) and
/// [`update`](Self::update) log a notice and do nothing, while
/// [`load`](Self::load), [`write`](Self::write) and [`wipe`](Self::wipe) fail
/// with [`StateError::NotConfigured`].
#[derive(Debug, Clone)]
pub struct StateStore {
    config: StateConfig,
}

impl StateStore {
    pub fn open(config: StateConfig) -> Self {
        Self { config }
    }

    pub fn path(&self) -> Option<&Path> {
        self.config.path.as_deref()
    }

    pub fn is_enabled(&self) -> bool {
        self.config.path.is_some()
    }

    fn require_path(&self) -> Result<&Path, StateError> {
        self.path().ok_or(StateError::NotConfigured)
    }

    /// Reads the state file.
    ///
    /// A missing file is an empty document under [`InitMode::CreateIfMissing`]
    /// and [`StateError::Missing`] under [`InitMode::FailIfMissing`].
    pub fn load(&self) -> Result<StateDocument, StateError> {
        let path = self.require_path()?;
        if !path.exists() {
            return match self.config.init {
                InitMode::CreateIfMissing => Ok(StateDocument::empty()),
                InitMode::FailIfMissing => Err(StateError::Missing(path.to_path_buf())),
            };
        }

        let text = fs::read_to_string(path).map_err(|source| StateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        StateDocument::parse(path, &text)
    }

    /// Overwrites the state file with `document`.
    pub fn write(&self, document: &StateDocument) -> Result<(), StateError> {
        let path = self.require_path()?;
        if self.config.init == InitMode::FailIfMissing && !path.exists() {
            return Err(StateError::Missing(path.to_path_buf()));
        }
        persist(path, document)
    }

    /// Records an entry, replacing any existing entry for the same key.
    pub fn add(&mut self, kind: ResourceKind, id: &str, entry: StateEntry) -> Result<(), StateError> {
        if !self.is_enabled() {
            info!("State tracking disabled; not recording {}/{}", kind, id);
            return Ok(());
        }

        let mut document = self.load()?;
        if document.remove(kind, id).is_some() {
            debug!("Replacing state entry {}/{}", kind, id);
        }
        document.insert(kind, id, entry);
        self.write(&document)
    }

    /// Drops an entry. Nothing is written if it was not tracked.
    pub fn remove(&mut self, kind: ResourceKind, id: &str) -> Result<(), StateError> {
        if !self.is_enabled() {
            info!("State tracking disabled; not removing {}/{}", kind, id);
            return Ok(());
        }

        let mut document = self.load()?;
        if document.remove(kind, id).is_none() {
            debug!("{}/{} is not tracked", kind, id);
            return Ok(());
        }
        self.write(&document)
    }

    /// Overwrites an entry's data without checking it exists.
    pub fn update(&mut self, kind: ResourceKind, id: &str, entry: StateEntry) -> Result<(), StateError> {
        if !self.is_enabled() {
            info!("State tracking disabled; not updating {}/{}", kind, id);
            return Ok(());
        }

        let mut document = self.load()?;
        document.insert(kind, id, entry);
        self.write(&document)
    }

    /// Resets the file to the empty document, creating it if needed.
    pub fn wipe(&mut self) -> Result<(), StateError> {
        let path = self.require_path()?;
        info!("Wiping state file {}", path.display());
        persist(path, &StateDocument::empty())
    }

    /// Returns `true` if the entry is tracked. Always `false` when disabled.
    pub fn contains(&self, kind: ResourceKind, id: &str) -> Result<bool, StateError> {
        if !self.is_enabled() {
            return Ok(false);
        }
        Ok(self.load()?.contains(kind, id))
    }
}

/// Writes `document` to a sibling temp file, syncs it, renames it over
/// `path` and syncs the directory.
fn persist(path: &Path, document: &StateDocument) -> Result<(), StateError> {
    let io_err = |source| StateError::Io {
        path: path.to_path_buf(),
        source,
    };

    let text = document.to_json_pretty().map_err(|e| StateError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(io_err)?;

    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp = path.with_file_name(temp_name);

    let mut file = File::create(&temp).map_err(io_err)?;
    file.write_all(text.as_bytes()).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;
    drop(file);

    fs::rename(&temp, path).map_err(io_err)?;
    sync_directory(dir).map_err(io_err)?;
    debug!("Wrote state file {}", path.display());
    Ok(())
}

#[cfg(unix)]
fn sync_directory(dir: &Path) -> std::io::Result<()> {
    File::open(dir)?.sync_all()
}

// NTFS journals metadata; directories cannot be opened for sync.
#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
