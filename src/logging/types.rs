//! Core logging types: package entries, status, and the [`Log`] trait.

/// Per-package result for summary reporting.
#[derive(Debug, Clone)]
pub struct PackageEntry {
    /// Canonical package name.
    pub name: String,
    /// Final status of the operation on this package.
    pub status: PackageStatus,
    /// Optional detail message (e.g., the error that caused a failure).
    pub message: Option<String>,
}

/// Outcome of a single package operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageStatus {
    /// The package was installed.
    Installed,
    /// The package was upgraded (or reinstalled, for custom installers).
    Updated,
    /// The package was removed.
    Removed,
    /// A status query found the package installed.
    Present,
    /// A status query found the package absent.
    Missing,
    /// The operation failed; the run continued with the next package.
    Failed,
}

impl PackageStatus {
    /// Lowercase tag written to the log file's `status` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Installed => "installed",
            Self::Updated => "updated",
            Self::Removed => "removed",
            Self::Present => "present",
            Self::Missing => "missing",
            Self::Failed => "failed",
        }
    }

    /// Whether the operation this status reports went through. `Missing` is
    /// an answer, not a failure, but is not counted as ok either.
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(
            self,
            Self::Installed | Self::Updated | Self::Removed | Self::Present
        )
    }
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the production implementation; tests
/// substitute a recording implementation to assert on what was printed.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record a package result for the summary.
    fn record_package(&self, name: &str, status: PackageStatus, message: Option<&str>);
}
