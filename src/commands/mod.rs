//! Subcommand orchestration.
//!
//! Every command that touches packages funnels through [`run_batch`], which
//! applies one [`Operation`] to each name in order and never lets a single
//! package failure stop the rest of the batch.
pub mod setup;
pub mod status;
pub mod uninstall;
pub mod update;
pub mod version;

use crate::error::{PackageError, PlatformError};
use crate::exec::Streams;
use crate::logging::{Log, PackageStatus};
use crate::packages::{self, Manager};
use crate::platform::Platform;

/// A package operation applied across a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// [`Manager::install`].
    Install,
    /// [`Manager::update`].
    Update,
    /// [`Manager::uninstall`].
    Uninstall,
}

impl Operation {
    const fn verb(self) -> &'static str {
        match self {
            Self::Install => "Installing",
            Self::Update => "Updating",
            Self::Uninstall => "Removing",
        }
    }

    const fn done(self) -> PackageStatus {
        match self {
            Self::Install => PackageStatus::Installed,
            Self::Update => PackageStatus::Updated,
            Self::Uninstall => PackageStatus::Removed,
        }
    }

    fn apply(self, manager: &dyn Manager, name: &str) -> Result<(), PackageError> {
        match self {
            Self::Install => manager.install(name),
            Self::Update => manager.update(name),
            Self::Uninstall => manager.uninstall(name),
        }
    }
}

/// Per-package outcome of a batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Names whose operation succeeded, in batch order.
    pub succeeded: Vec<String>,
    /// Names whose operation failed, with the error, in batch order.
    pub failed: Vec<(String, PackageError)>,
}

impl BatchReport {
    /// Names of the failed packages.
    #[must_use]
    pub fn failed_names(&self) -> Vec<&str> {
        self.failed.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Apply `op` to every name in order.
///
/// A failure is logged against its package, recorded for the summary, and
/// the batch moves on to the next name.
pub fn run_batch(
    manager: &dyn Manager,
    names: &[String],
    op: Operation,
    log: &dyn Log,
) -> BatchReport {
    let mut report = BatchReport::default();
    for name in names {
        log.info(&format!("{} {name}...", op.verb()));
        match op.apply(manager, name) {
            Ok(()) => {
                log.record_package(name, op.done(), None);
                report.succeeded.push(name.clone());
            }
            Err(err) => {
                log.error(&format!("{name}: {err}"));
                log.record_package(name, PackageStatus::Failed, Some(&err.to_string()));
                report.failed.push((name.clone(), err));
            }
        }
    }
    report
}

/// Bind the adapter for the running host, streaming to the terminal.
///
/// # Errors
///
/// Returns [`PlatformError::Unsupported`] when the host has no adapter.
pub fn host_manager() -> Result<Box<dyn Manager>, PlatformError> {
    packages::select(&Platform::detect(), Streams::stdio())
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::test_helpers::RecordingLog;
    use super::*;
    use crate::packages::MockManager;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn failure(name: &str) -> PackageError {
        PackageError::Subprocess {
            command: format!("brew install {name}"),
            code: Some(1),
        }
    }

    #[test]
    fn batch_continues_past_a_failure() {
        let mut manager = MockManager::new();
        let mut seq = Sequence::new();
        manager
            .expect_install()
            .with(eq("A"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        manager
            .expect_install()
            .with(eq("B"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|n| Err(failure(n)));
        manager
            .expect_install()
            .with(eq("C"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let log = RecordingLog::default();
        let report = run_batch(&manager, &names(&["A", "B", "C"]), Operation::Install, &log);

        assert_eq!(report.succeeded, names(&["A", "C"]));
        assert_eq!(report.failed_names(), ["B"]);
        assert!(
            log.lines().contains(&"error: B: brew install B failed (exit 1)".to_string()),
            "failure must be attributed: {:?}",
            log.lines()
        );
        assert_eq!(
            log.packages(),
            vec![
                ("A".to_string(), PackageStatus::Installed),
                ("B".to_string(), PackageStatus::Failed),
                ("C".to_string(), PackageStatus::Installed),
            ]
        );
    }

    #[test]
    fn batch_dispatches_update_and_uninstall() {
        let mut manager = MockManager::new();
        manager.expect_update().with(eq("jq")).times(1).returning(|_| Ok(()));
        manager
            .expect_uninstall()
            .with(eq("fzf"))
            .times(1)
            .returning(|_| Ok(()));
        manager.expect_install().never();

        let log = RecordingLog::default();
        let updated = run_batch(&manager, &names(&["jq"]), Operation::Update, &log);
        let removed = run_batch(&manager, &names(&["fzf"]), Operation::Uninstall, &log);

        assert_eq!(updated.succeeded, names(&["jq"]));
        assert_eq!(removed.succeeded, names(&["fzf"]));
        assert_eq!(
            log.lines(),
            vec!["info: Updating jq...", "info: Removing fzf..."]
        );
        assert_eq!(log.packages()[0].1, PackageStatus::Updated);
        assert_eq!(log.packages()[1].1, PackageStatus::Removed);
    }

    #[test]
    fn empty_batch_does_nothing() {
        let manager = MockManager::new();
        let log = RecordingLog::default();
        let report = run_batch(&manager, &[], Operation::Install, &log);
        assert!(report.succeeded.is_empty());
        assert!(report.failed.is_empty());
        assert!(log.lines().is_empty());
    }
}
