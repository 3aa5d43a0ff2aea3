//! Command: remove packages and drop them from the config.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::{BatchReport, Operation, run_batch};
use crate::config;
use crate::error::PlatformError;
use crate::logging::Log;
use crate::packages::Manager;

/// Uninstall `names`, then remove every successfully uninstalled name from
/// the config's package list. Names that failed stay in the config.
///
/// The config is only rewritten when its package list actually changed.
///
/// # Errors
///
/// Returns an error if the config cannot be read or written, or the host
/// has no package manager.
pub fn run(
    config_path: &Path,
    names: &[String],
    log: &dyn Log,
    select_manager: impl FnOnce() -> Result<Box<dyn Manager>, PlatformError>,
) -> Result<BatchReport> {
    let mut cfg = config::load(config_path).context("loading config")?;
    let manager = select_manager().context("detecting package manager")?;

    log.stage("Removing packages");
    let report = run_batch(manager.as_ref(), names, Operation::Uninstall, log);

    let before = cfg.packages.len();
    cfg.packages.retain(|p| !report.succeeded.contains(&p.name));
    if cfg.packages.len() != before {
        config::save(config_path, &cfg).context("saving config")?;
        log.info(&format!("Config written to {}", config_path.display()));
    }
    Ok(report)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::commands::test_helpers::RecordingLog;
    use crate::config::{Config, Package};
    use crate::error::PackageError;
    use crate::packages::MockManager;

    fn seeded(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::with_architecture("amd64");
        cfg.packages = vec![
            Package::new("neovim", "brew"),
            Package::new("jq", "brew"),
            Package::new("fzf", "brew"),
        ];
        config::save(&path, &cfg).unwrap();
        path
    }

    #[test]
    fn removed_packages_leave_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);
        let mut manager = MockManager::new();
        manager.expect_uninstall().with(eq("jq")).times(1).returning(|_| Ok(()));

        let log = RecordingLog::default();
        run(&path, &["jq".to_string()], &log, || Ok(Box::new(manager))).unwrap();

        let names: Vec<_> = config::load(&path)
            .unwrap()
            .packages
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, ["neovim", "fzf"]);
    }

    #[test]
    fn failed_uninstall_stays_in_the_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = seeded(&dir);
        let before = std::fs::read(&path).unwrap();
        let mut manager = MockManager::new();
        manager.expect_uninstall().returning(|_| {
            Err(PackageError::Subprocess {
                command: "brew uninstall fzf".to_string(),
                code: Some(1),
            })
        });

        let log = RecordingLog::default();
        let report = run(&path, &["fzf".to_string()], &log, || Ok(Box::new(manager))).unwrap();

        assert_eq!(report.failed_names(), ["fzf"]);
        assert_eq!(std::fs::read(&path).unwrap(), before, "config must be untouched");
    }

    #[test]
    fn missing_config_is_not_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut manager = MockManager::new();
        manager.expect_uninstall().returning(|_| Ok(()));

        let log = RecordingLog::default();
        run(&path, &["jq".to_string()], &log, || Ok(Box::new(manager))).unwrap();
        assert!(!path.exists());
    }
}
