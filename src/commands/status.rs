//! Command: report which configured packages are installed.
use std::path::Path;

use anyhow::{Context as _, Result};

use crate::config;
use crate::error::PlatformError;
use crate::logging::{Log, PackageStatus};
use crate::packages::Manager;

/// Query every package in the config and record it as present or missing.
///
/// Returns `(name, installed)` pairs in config order. A query that errors is
/// logged as a warning and counted as not installed.
///
/// # Errors
///
/// Returns an error if the config cannot be read or the host has no package
/// manager.
pub fn run(
    config_path: &Path,
    log: &dyn Log,
    select_manager: impl FnOnce() -> Result<Box<dyn Manager>, PlatformError>,
) -> Result<Vec<(String, bool)>> {
    let cfg = config::load(config_path).context("loading config")?;
    if cfg.packages.is_empty() {
        log.info("No packages configured");
        return Ok(Vec::new());
    }

    let manager = select_manager().context("detecting package manager")?;
    log.stage("Checking packages");

    let mut states = Vec::with_capacity(cfg.packages.len());
    for pkg in &cfg.packages {
        let installed = match manager.is_installed(&pkg.name) {
            Ok(installed) => installed,
            Err(err) => {
                log.warn(&format!("{}: {err}", pkg.name));
                false
            }
        };
        let status = if installed {
            PackageStatus::Present
        } else {
            PackageStatus::Missing
        };
        log.record_package(&pkg.name, status, None);
        states.push((pkg.name.clone(), installed));
    }
    Ok(states)
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

    #[test]
    fn reports_present_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::with_architecture("amd64");
        cfg.packages = vec![
            Package::new("jq", "brew"),
            Package::new("gh", "brew"),
            Package::new("bat", "brew"),
        ];
        config::save(&path, &cfg).unwrap();

        let mut manager = MockManager::new();
        manager.expect_is_installed().with(eq("jq")).returning(|_| Ok(true));
        manager.expect_is_installed().with(eq("gh")).returning(|_| Ok(false));
        manager.expect_is_installed().with(eq("bat")).returning(|_| {
            Err(PackageError::Spawn {
                command: "dpkg -l bat".to_string(),
                message: "not found".to_string(),
            })
        });

        let log = RecordingLog::default();
        let states = run(&path, &log, || Ok(Box::new(manager))).unwrap();

        assert_eq!(
            states,
            vec![
                ("jq".to_string(), true),
                ("gh".to_string(), false),
                ("bat".to_string(), false),
            ]
        );
        assert_eq!(
            log.packages(),
            vec![
                ("jq".to_string(), PackageStatus::Present),
                ("gh".to_string(), PackageStatus::Missing),
                ("bat".to_string(), PackageStatus::Missing),
            ]
        );
        assert!(log.lines().iter().any(|l| l.starts_with("warn: bat:")));
    }

    #[test]
    fn empty_config_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let states = run(&dir.path().join("config.yaml"), &log, || {
            Err(PlatformError::Unsupported {
                os: "windows".to_string(),
            })
        })
        .unwrap();
        assert!(states.is_empty());
    }
}
