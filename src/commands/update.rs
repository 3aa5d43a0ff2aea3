//! Command: upgrade packages.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{BatchReport, Operation, run_batch};
use crate::config;
use crate::error::PlatformError;
use crate::logging::Log;
use crate::packages::Manager;

/// Upgrade `names`, or every package in the config when `names` is empty.
///
/// # Errors
///
/// Returns an error if the config cannot be read or the host has no package
/// manager. Per-package failures are reported in the [`BatchReport`].
pub fn run(
    config_path: &Path,
    names: &[String],
    log: &dyn Log,
    select_manager: impl FnOnce() -> Result<Box<dyn Manager>, PlatformError>,
) -> Result<BatchReport> {
    let targets: Vec<String> = if names.is_empty() {
        let cfg = config::load(config_path).context("loading config")?;
        cfg.packages.into_iter().map(|p| p.name).collect()
    } else {
        names.to_vec()
    };

    if targets.is_empty() {
        log.info("No packages to update");
        return Ok(BatchReport::default());
    }

    let manager = select_manager().context("detecting package manager")?;
    log.stage("Updating packages");
    Ok(run_batch(manager.as_ref(), &targets, Operation::Update, log))
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use mockall::Sequence;
    use mockall::predicate::eq;

    use super::*;
    use crate::commands::test_helpers::RecordingLog;
    use crate::config::{Config, Package};
    use crate::packages::MockManager;

    #[test]
    fn updates_every_persisted_package_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::with_architecture("amd64");
        cfg.packages = vec![Package::new("neovim", "brew"), Package::new("jq", "brew")];
        config::save(&path, &cfg).unwrap();

        let mut manager = MockManager::new();
        let mut seq = Sequence::new();
        for name in ["neovim", "jq"] {
            manager
                .expect_update()
                .with(eq(name))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_| Ok(()));
        }

        let log = RecordingLog::default();
        let report = run(&path, &[], &log, || Ok(Box::new(manager))).unwrap();
        assert_eq!(report.succeeded, ["neovim", "jq"]);
    }

    #[test]
    fn explicit_names_skip_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let mut manager = MockManager::new();
        manager.expect_update().with(eq("fzf")).times(1).returning(|_| Ok(()));

        let log = RecordingLog::default();
        run(&path, &["fzf".to_string()], &log, || Ok(Box::new(manager))).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn nothing_to_update_does_not_bind_a_manager() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let log = RecordingLog::default();
        let report = run(&path, &[], &log, || panic!("no manager needed")).unwrap();
        assert!(report.succeeded.is_empty());
        assert_eq!(log.lines(), ["info: No packages to update"]);
    }
}
