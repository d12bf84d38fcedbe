// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load/save for `<base>/settings.json`. Absence is not an
//! error: a fresh install gets [`GlobalSettings::default`].

use std::path::Path;

use archon_core::GlobalSettings;

use crate::atomic::atomic_write_json;
use crate::error::{StoreError, StoreResult};

/// Loads settings from `path`, returning defaults if the file is absent.
pub fn load_settings(path: &Path) -> StoreResult<GlobalSettings> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).map_err(|e| StoreError::MalformedConfig {
            task_id: path.display().to_string(),
            source: e,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(GlobalSettings::default()),
        Err(e) => Err(StoreError::io(path.display().to_string(), e)),
    }
}

/// Writes `settings` atomically to `path`.
pub fn save_settings(path: &Path, settings: &GlobalSettings) -> StoreResult<()> {
    atomic_write_json(path, settings)
}

#[cfg(test)]
#[path = "settings_store_tests.rs"]
mod tests;
