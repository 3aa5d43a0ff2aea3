//! Log file location, ANSI stripping and timestamps.
use std::fs;
use std::path::PathBuf;

/// Timestamp format for the run header.
pub(super) const HEADER_STAMP: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format prefixed to each log line.
pub(super) const LINE_STAMP: &str = "%H:%M:%S";

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}

/// `$XDG_CACHE_HOME/machine-setup`, falling back to `~/.cache/machine-setup`.
/// Created on first use.
pub(super) fn log_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".cache")))?;
    let dir = base.join("machine-setup");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Per-command log file, e.g. `~/.cache/machine-setup/setup.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(log_dir()?.join(format!("{command}.log")))
}

/// Remove CSI escape sequences (colours, erase-line) so package manager
/// output and summary icons land in the log file as plain text.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next_if_eq(&'[').is_some() {
            // parameter bytes, then one final byte in '@'..='~'
            let _final = chars.by_ref().find(|b| ('@'..='~').contains(b));
        }
    }
    out
}
