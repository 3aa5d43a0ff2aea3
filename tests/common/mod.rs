// Shared helpers for integration tests.
//
// Provides an isolated config location, a hand-written package manager spy
// that records every call, and an in-memory log, so each integration test can
// drive a full command without touching a real package manager.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use machine_setup::commands::setup::SetupOptions;
use machine_setup::error::{PackageError, PlatformError};
use machine_setup::logging::{Log, PackageStatus};
use machine_setup::packages::Manager;

/// An isolated config location backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct TestConfig {
    /// Temporary directory standing in for the user's home.
    pub home: tempfile::TempDir,
}

impl TestConfig {
    /// Create a new, empty location. No config file exists yet.
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Path the config file is read from and written to.
    pub fn path(&self) -> PathBuf {
        self.home
            .path()
            .join(".config")
            .join(".machine-setup")
            .join("config.yaml")
    }

    /// Write raw YAML to the config path, creating parent directories.
    pub fn write(&self, yaml: &str) {
        let path = self.path();
        std::fs::create_dir_all(path.parent().expect("config parent")).expect("create config dir");
        std::fs::write(&path, yaml).expect("write config");
    }

    /// Read the raw config file.
    pub fn read(&self) -> String {
        std::fs::read_to_string(self.path()).expect("read config")
    }

    /// Non-interactive setup options pointing at this location.
    pub fn setup_options(&self) -> SetupOptions {
        SetupOptions {
            config_path: self.path(),
            interactive: false,
        }
    }
}

/// One call observed by [`ManagerSpy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpyCall {
    Install(String),
    Uninstall(String),
    Update(String),
    IsInstalled(String),
}

#[derive(Debug, Default)]
struct SpyState {
    calls: Vec<SpyCall>,
    failing: HashSet<String>,
    installed: HashSet<String>,
}

/// A [`Manager`] that records every call and fails for configured names.
///
/// Clones share state, so a test can hand one clone to the command under
/// test and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct ManagerSpy {
    state: Arc<Mutex<SpyState>>,
}

impl ManagerSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation on `name` fail.
    pub fn failing(self, name: &str) -> Self {
        self.state
            .lock()
            .expect("spy state")
            .failing
            .insert(name.to_string());
        self
    }

    /// Report `name` as installed.
    pub fn installed(self, name: &str) -> Self {
        self.state
            .lock()
            .expect("spy state")
            .installed
            .insert(name.to_string());
        self
    }

    /// Every call, in order.
    pub fn calls(&self) -> Vec<SpyCall> {
        self.state.lock().expect("spy state").calls.clone()
    }

    /// Names passed to `install`, in order.
    pub fn installed_names(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SpyCall::Install(name) => Some(name),
                _ => None,
            })
            .collect()
    }

    /// A selector closure that hands out a clone of this spy.
    pub fn selector(&self) -> impl FnOnce() -> Result<Box<dyn Manager>, PlatformError> + use<> {
        let spy = self.clone();
        move || -> Result<Box<dyn Manager>, PlatformError> { Ok(Box::new(spy)) }
    }

    fn record(&self, call: SpyCall, name: &str) -> Result<(), PackageError> {
        let mut state = self.state.lock().expect("spy state");
        state.calls.push(call);
        if state.failing.contains(name) {
            Err(PackageError::Subprocess {
                command: format!("spy {name}"),
                code: Some(1),
            })
        } else {
            Ok(())
        }
    }
}

impl Manager for ManagerSpy {
    fn install(&self, name: &str) -> Result<(), PackageError> {
        self.record(SpyCall::Install(name.to_string()), name)
    }

    fn uninstall(&self, name: &str) -> Result<(), PackageError> {
        self.record(SpyCall::Uninstall(name.to_string()), name)
    }

    fn update(&self, name: &str) -> Result<(), PackageError> {
        self.record(SpyCall::Update(name.to_string()), name)
    }

    fn is_installed(&self, name: &str) -> Result<bool, PackageError> {
        let mut state = self.state.lock().expect("spy state");
        state.calls.push(SpyCall::IsInstalled(name.to_string()));
        Ok(state.installed.contains(name))
    }
}

/// A [`Log`] that keeps every line and package record in memory.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<String>>,
    packages: Mutex<Vec<(String, PackageStatus)>>,
}

impl RecordingLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("log lines").clone()
    }

    /// Lines logged at error level, without the level prefix.
    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|l| l.strip_prefix("error: ").map(String::from))
            .collect()
    }

    pub fn packages(&self) -> Vec<(String, PackageStatus)> {
        self.packages.lock().expect("log packages").clone()
    }

    fn push(&self, level: &str, msg: &str) {
        self.lines
            .lock()
            .expect("log lines")
            .push(format!("{level}: {msg}"));
    }
}

impl Log for RecordingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn record_package(&self, name: &str, status: PackageStatus, _message: Option<&str>) {
        self.packages
            .lock()
            .expect("log packages")
            .push((name.to_string(), status));
    }
}
