//! Structured logger with per-package summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{PACKAGE_TARGET, STAGE_TARGET};
use super::types::{Log, PackageEntry, PackageStatus};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with per-package summary collection.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/machine-setup/<command>.log` (default
/// `~/.cache/machine-setup/<command>.log`) with timestamps and ANSI codes
/// stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    packages: Mutex<Vec<PackageEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display in the run summary. The log file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber).
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            packages: Mutex::new(Vec::new()),
            log_file: log_file_path(command),
        }
    }

    /// Return the log file path, if available.
    #[cfg(test)]
    pub const fn log_path(&self) -> Option<&PathBuf> {
        self.log_file.as_ref()
    }

    /// Return a clone of all recorded package entries.
    #[must_use]
    pub fn package_entries(&self) -> Vec<PackageEntry> {
        self.packages.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Record a package result for the summary and write it to the log file
    /// as a `package`/`status`/`detail` event.
    pub fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>) {
        tracing::info!(
            target: PACKAGE_TARGET,
            package = name,
            status = status.as_str(),
            detail = message.unwrap_or_default()
        );
        if let Ok(mut guard) = self.packages.lock() {
            guard.push(PackageEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Print one line per recorded package, then the totals and the log
    /// file location.
    pub fn print_summary(&self) {
        let entries = self.package_entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");
        for entry in &entries {
            self.info(&summary_line(entry));
        }

        let ok = entries.iter().filter(|e| e.status.is_ok()).count();
        let failed = entries
            .iter()
            .filter(|e| e.status == PackageStatus::Failed)
            .count();
        self.info(&format!(
            "{} packages: \x1b[32m{ok} ok\x1b[0m, \x1b[31m{failed} failed\x1b[0m",
            entries.len()
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

fn summary_line(entry: &PackageEntry) -> String {
    let (icon, color) = match entry.status {
        PackageStatus::Installed | PackageStatus::Updated | PackageStatus::Removed => {
            ("✓", "\x1b[32m")
        }
        PackageStatus::Present => ("·", "\x1b[2m"),
        PackageStatus::Missing => ("○", "\x1b[33m"),
        PackageStatus::Failed => ("✗", "\x1b[31m"),
    };
    let suffix = entry
        .message
        .as_ref()
        .map_or_else(String::new, |msg| format!(" ({msg})"));
    format!("{color}{icon} {}{suffix}\x1b[0m", entry.name)
}

#[allow(clippy::unused_self)]
impl Logger {
    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error);

    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>) {
        self.record_package(name, status, message);
    }
}
