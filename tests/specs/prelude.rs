//! Test helpers for the black-box `archon` CLI specifications.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Returns the path to a binary built alongside this test binary.
fn binary_path(name: &str) -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let standard = manifest_dir.join("target/debug").join(name);
    if standard.exists() {
        return standard;
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(debug_dir) = exe.parent().and_then(|d| d.parent()) {
            let fallback = debug_dir.join(name);
            if fallback.exists() {
                return fallback;
            }
        }
    }
    standard
}

fn archon_binary() -> PathBuf {
    binary_path("archon")
}

fn fixture_cli_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/specs/fixtures/fake_cli.sh")
}

/// An isolated `ARCHON_BASE_DIR` with a settings.json pointed at the
/// fixture CLI stand-in, so `probe`/`cron` commands never try to spawn
/// a real assistant process.
pub struct Project {
    _dir: TempDir,
    base: PathBuf,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().to_path_buf();
        let settings = serde_json::json!({
            "cli": { "path": fixture_cli_path().to_string_lossy() },
            "notifications": { "enabled": false, "method": "noop" },
        });
        std::fs::write(base.join("settings.json"), serde_json::to_string_pretty(&settings).unwrap())
            .expect("write settings.json");
        Self { _dir: dir, base }
    }

    pub fn path(&self) -> &Path {
        &self.base
    }

    pub fn cli(&self) -> CliBuilder {
        CliBuilder::new(self.base.clone())
    }
}

pub struct CliBuilder {
    args: Vec<String>,
    base_dir: PathBuf,
}

impl CliBuilder {
    fn new(base_dir: PathBuf) -> Self {
        Self {
            args: Vec::new(),
            base_dir,
        }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    fn command(self) -> Command {
        let mut cmd = Command::new(archon_binary());
        cmd.args(&self.args);
        cmd.env("ARCHON_BASE_DIR", &self.base_dir);
        cmd
    }

    pub fn passes(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            output.status.success(),
            "expected command to pass, got exit code {:?}\nstdout: {}\nstderr: {}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }

    pub fn fails(self) -> RunAssert {
        let output = self.command().output().expect("command should run");
        assert!(
            !output.status.success(),
            "expected command to fail, but it passed\nstdout: {}\nstderr: {}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        RunAssert { output }
    }
}

pub struct RunAssert {
    output: Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout does not contain '{expected}'\nstdout: {stdout}");
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout()).expect("stdout should be valid JSON")
    }
}
