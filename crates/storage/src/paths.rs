// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout: every path a task directory can contain, computed
//! from a base root and task id so the rest of the store never hand-builds
//! a `PathBuf` with a literal file name.

use std::path::{Path, PathBuf};

use archon_core::TaskId;

/// Default base root: `~/.claude/daemon-archon`, overridable via
/// `ARCHON_BASE_DIR` for tests and alternate installs.
pub fn default_base_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("ARCHON_BASE_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("daemon-archon")
}

/// Paths rooted at `<base>/`, independent of any single task.
#[derive(Debug, Clone)]
pub struct BasePaths {
    pub base: PathBuf,
}

impl BasePaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn settings_json(&self) -> PathBuf {
        self.base.join("settings.json")
    }

    pub fn pid_file(&self) -> PathBuf {
        self.base.join("archon.pid")
    }

    pub fn daemon_log(&self) -> PathBuf {
        self.base.join("archon.log")
    }

    pub fn task_dir(&self, task_id: &TaskId) -> TaskPaths {
        TaskPaths::new(self.base.join(task_id.as_str()))
    }
}

/// Paths rooted at `<base>/<task_id>/`.
#[derive(Debug, Clone)]
pub struct TaskPaths {
    pub dir: PathBuf,
}

impl TaskPaths {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn config_json(&self) -> PathBuf {
        self.dir.join("config.json")
    }

    pub fn status(&self) -> PathBuf {
        self.dir.join("status")
    }

    pub fn archon_log(&self) -> PathBuf {
        self.dir.join("archon.log")
    }

    pub fn task_lock(&self) -> PathBuf {
        self.dir.join("task.lock")
    }

    pub fn check_start(&self) -> PathBuf {
        self.dir.join(".check_start")
    }

    pub fn destination_md(&self) -> PathBuf {
        self.dir.join("destination.md")
    }

    pub fn corrections_md(&self) -> PathBuf {
        self.dir.join("corrections.md")
    }

    pub fn task_md(&self) -> PathBuf {
        self.dir.join("task.md")
    }

    pub fn workflow_md(&self) -> PathBuf {
        self.dir.join("workflow").join("workflow.md")
    }

    pub fn probe_stdout_log(&self) -> PathBuf {
        self.dir.join("probe_stdout.log")
    }

    pub fn probe_stderr_log(&self) -> PathBuf {
        self.dir.join("probe_stderr.log")
    }
}

/// `true` for directory entries the state store's `list_tasks` must skip:
/// dotfiles such as a stray `.DS_Store`, never a real task directory.
pub fn is_hidden_entry(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
