// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Atomic file writes. Every JSON write goes to a sibling temp
//! file and is renamed onto the target so a crash mid-write never leaves a
//! corrupt `config.json` or `settings.json` visible.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{StoreError, StoreResult};

/// Writes `data` to `path` via a sibling `.tmp` file plus rename.
pub fn atomic_write(path: &Path, data: &[u8]) -> StoreResult<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent.display().to_string(), e))?;

    let tmp_path = tmp_path_for(path);
    {
        let mut file =
            File::create(&tmp_path).map_err(|e| StoreError::io(tmp_path.display().to_string(), e))?;
        file.write_all(data)
            .map_err(|e| StoreError::io(tmp_path.display().to_string(), e))?;
        file.sync_all()
            .map_err(|e| StoreError::io(tmp_path.display().to_string(), e))?;
    }
    std::fs::rename(&tmp_path, path).map_err(|e| StoreError::io(path.display().to_string(), e))?;
    Ok(())
}

/// Serializes `value` as two-space-indented JSON and writes it atomically.
pub fn atomic_write_json<T: serde::Serialize>(path: &Path, value: &T) -> StoreResult<()> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, serde_json::ser::PrettyFormatter::with_indent(b"  "));
    value
        .serialize(&mut ser)
        .map_err(|e| StoreError::MalformedConfig {
            task_id: path.display().to_string(),
            source: e,
        })?;
    buf.push(b'\n');
    atomic_write(path, &buf)
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("tmp");
    path.with_file_name(format!(".{file_name}.{}.tmp", std::process::id()))
}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
