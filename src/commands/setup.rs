//! Command: provision this machine with the default toolset.
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use super::{BatchReport, Operation, run_batch};
use crate::config;
use crate::error::PlatformError;
use crate::logging::Log;
use crate::packages::{Manager, catalog};
use crate::prompt::{Prompt, Welcome};

/// Explicit inputs to [`run`], resolved from flags and environment by the
/// caller.
#[derive(Debug, Clone)]
pub struct SetupOptions {
    /// Where the config file lives.
    pub config_path: PathBuf,
    /// Whether to show the welcome screen and selection prompt.
    pub interactive: bool,
}

/// Run setup: welcome, initialise the config, select tools, persist the
/// selection, then install each selected tool in catalog order.
///
/// The manager is bound only after the config has been written, so an
/// unsupported host still gets a config file.
///
/// Per-package failures are reported and recorded in the returned
/// [`BatchReport`]; they do not make this function fail.
///
/// # Errors
///
/// Returns an error if the prompt fails, the config cannot be initialised or
/// saved, or no package manager exists for this host.
pub fn run(
    opts: &SetupOptions,
    prompt: &dyn Prompt,
    log: &dyn Log,
    select_manager: impl FnOnce() -> Result<Box<dyn Manager>, PlatformError>,
) -> Result<BatchReport> {
    if prompt.welcome().context("welcome prompt")? == Welcome::Abort {
        log.info("Setup aborted");
        return Ok(BatchReport::default());
    }

    log.stage("Initializing config");
    let path = &opts.config_path;
    let mut cfg = config::init(path).context("initializing config")?;
    log.debug(&format!("config: {}", path.display()));

    let offered = catalog::dev_tool_names();
    let selected = prompt.select(&offered).context("tool selection")?;

    cfg.packages = catalog::names_to_packages(&selected, &cfg.packages);
    config::save(path, &cfg).context("saving config")?;

    log.info(&format!("Config written to {}", path.display()));
    log.info(&format!("Detected architecture: {}", cfg.architecture));

    let manager = select_manager().context("detecting package manager")?;

    log.stage("Installing packages");
    let report = run_batch(manager.as_ref(), &selected, Operation::Install, log);

    if report.failed.is_empty() {
        log.info("Setup complete.");
    } else {
        log.warn(&format!(
            "Setup complete with {} failed package(s)",
            report.failed.len()
        ));
    }
    Ok(report)
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::commands::test_helpers::RecordingLog;
    use crate::config::Package;
    use crate::error::PackageError;
    use crate::packages::MockManager;
    use crate::prompt::NonInteractive;

    #[derive(Debug)]
    struct Picks(Welcome, Vec<&'static str>);

    impl Prompt for Picks {
        fn welcome(&self) -> Result<Welcome> {
            Ok(self.0)
        }

        fn select(&self, _names: &[String]) -> Result<Vec<String>> {
            Ok(self.1.iter().map(|s| (*s).to_string()).collect())
        }
    }

    fn opts(dir: &tempfile::TempDir) -> SetupOptions {
        SetupOptions {
            config_path: dir.path().join(".machine-setup/config.yaml"),
            interactive: false,
        }
    }

    fn accepting_manager() -> MockManager {
        let mut manager = MockManager::new();
        manager.expect_install().returning(|_| Ok(()));
        manager
    }

    #[test]
    fn installs_every_catalog_tool_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let report = run(&opts(&dir), &NonInteractive, &log, || {
            Ok(Box::new(accepting_manager()))
        })
        .unwrap();

        assert_eq!(report.succeeded, catalog::dev_tool_names());
        let cfg = config::load(&opts(&dir).config_path).unwrap();
        assert_eq!(cfg.packages, catalog::dev_tools());
    }

    #[test]
    fn persists_only_the_selection() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let mut manager = MockManager::new();
        manager.expect_install().with(eq("jq")).times(1).returning(|_| Ok(()));
        manager
            .expect_install()
            .with(eq("lazygit"))
            .times(1)
            .returning(|_| Ok(()));

        let prompt = Picks(Welcome::Continue, vec!["jq", "lazygit"]);
        run(&opts(&dir), &prompt, &log, || Ok(Box::new(manager))).unwrap();

        let cfg = config::load(&opts(&dir).config_path).unwrap();
        assert_eq!(
            cfg.packages,
            vec![Package::new("jq", "brew"), Package::new("lazygit", "brew")]
        );
    }

    #[test]
    fn reselected_package_keeps_its_extra_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".machine-setup")).unwrap();
        std::fs::write(
            opts(&dir).config_path,
            "packages:\n- name: jq\n  manager: brew\n  version: '1.7'\n",
        )
        .unwrap();
        let log = RecordingLog::default();

        let prompt = Picks(Welcome::Continue, vec!["jq", "fzf"]);
        run(&opts(&dir), &prompt, &log, || Ok(Box::new(accepting_manager()))).unwrap();

        let cfg = config::load(&opts(&dir).config_path).unwrap();
        assert_eq!(
            cfg.packages[0].extra.get("version").and_then(serde_yaml::Value::as_str),
            Some("1.7")
        );
        assert!(cfg.packages[1].extra.is_empty());
    }

    #[test]
    fn abort_at_welcome_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let prompt = Picks(Welcome::Abort, vec![]);
        let report = run(&opts(&dir), &prompt, &log, || {
            panic!("manager must not be selected after an abort")
        })
        .unwrap();

        assert!(report.succeeded.is_empty());
        assert!(!opts(&dir).config_path.exists());
    }

    #[test]
    fn unsupported_platform_is_fatal_but_config_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let err = run(&opts(&dir), &NonInteractive, &log, || {
            Err(PlatformError::Unsupported {
                os: "windows".to_string(),
            })
        })
        .unwrap_err();

        assert!(format!("{err:#}").contains("unsupported OS: windows"));
        assert!(opts(&dir).config_path.exists());
    }

    #[test]
    fn package_failures_do_not_fail_setup() {
        let dir = tempfile::tempdir().unwrap();
        let log = RecordingLog::default();
        let mut manager = MockManager::new();
        manager.expect_install().with(eq("jq")).returning(|_| {
            Err(PackageError::Subprocess {
                command: "brew install jq".to_string(),
                code: Some(1),
            })
        });
        manager.expect_install().returning(|_| Ok(()));

        let report = run(&opts(&dir), &NonInteractive, &log, || Ok(Box::new(manager))).unwrap();

        assert_eq!(report.failed_names(), ["jq"]);
        assert_eq!(report.succeeded.len(), catalog::dev_tool_names().len() - 1);
        assert!(log.lines().iter().any(|l| l.starts_with("warn: Setup complete with 1")));
    }

    #[test]
    fn reports_config_path_and_architecture() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".machine-setup")).unwrap();
        std::fs::write(opts(&dir).config_path, "architecture: arm64\n").unwrap();
        let log = RecordingLog::default();

        run(&opts(&dir), &NonInteractive, &log, || {
            Ok(Box::new(accepting_manager()))
        })
        .unwrap();

        let lines = log.lines();
        let written = format!("info: Config written to {}", opts(&dir).config_path.display());
        assert!(lines.contains(&written), "{lines:?}");
        assert!(lines.contains(&"info: Detected architecture: arm64".to_string()));
    }

    #[test]
    fn corrupt_config_stops_before_installing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(".machine-setup")).unwrap();
        std::fs::write(opts(&dir).config_path, "packages: [oops\n").unwrap();
        let log = RecordingLog::default();

        let err = run(&opts(&dir), &NonInteractive, &log, || {
            panic!("manager must not be selected for a corrupt config")
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }
}
