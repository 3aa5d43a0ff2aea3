//! Load-or-initialise and persist the config file.
use std::path::Path;

use super::Config;
use crate::error::ConfigError;
use crate::fs::{ensure_parent_dir, write_atomic};
use crate::platform::host_architecture;

/// File mode for the config file on Unix.
const CONFIG_MODE: u32 = 0o644;

/// Read and parse the config at `path`.
///
/// Returns `Ok(None)` if no file exists. An empty file parses as all
/// defaults.
fn read(path: &Path) -> Result<Option<Config>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if content.trim().is_empty() {
        return Ok(Some(Config::default()));
    }

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Load the config at `path` without writing anything.
///
/// A missing file yields the defaults for the host.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] if the file exists but is not valid, or
/// [`ConfigError::Io`] if it cannot be read.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    Ok(read(path)?.unwrap_or_else(|| Config::with_architecture(&host_architecture())))
}

/// Initialise the config at `path`.
///
/// If no file exists, one is created from the host defaults (creating parent
/// directories as needed). If a file exists it is parsed, absent fields are
/// backfilled, and the result is written back. Running this twice with no
/// change in between leaves the file byte-for-byte identical.
///
/// An existing file that fails to parse is reported and left untouched.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] for an unparseable existing file, and
/// [`ConfigError::Io`] / [`ConfigError::Serialize`] if persisting fails.
pub fn init(path: &Path) -> Result<Config, ConfigError> {
    let config = load(path)?;
    save(path, &config)?;
    Ok(config)
}

/// Serialize `config` and overwrite the file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Serialize`] if rendering fails, or
/// [`ConfigError::Io`] if the directory or file cannot be written.
pub fn save(path: &Path, config: &Config) -> Result<(), ConfigError> {
    let yaml = serde_yaml::to_string(config).map_err(ConfigError::Serialize)?;

    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).map_err(io_err)?;
    write_atomic(path, yaml.as_bytes(), CONFIG_MODE).map_err(|e| io_err(e.source))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::{App, Package};

    #[test]
    fn init_creates_file_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/config.yaml");
        let cfg = init(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg, Config::with_architecture(&host_architecture()));

        let on_disk: Config = serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, cfg);
    }

    #[test]
    fn init_twice_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        init(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        init(&path).unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn init_backfills_packages_and_preserves_sources() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "architecture: arm64\nsources:\n- x\n").unwrap();

        let cfg = init(&path).unwrap();
        assert_eq!(cfg.sources, vec!["x"]);
        assert!(cfg.packages.is_empty());

        let raw: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["sources"], serde_yaml::Value::from(vec!["x"]));
        assert_eq!(raw["packages"], serde_yaml::Value::Sequence(vec![]));
        assert_eq!(raw["architecture"], serde_yaml::Value::from("arm64"));
    }

    #[test]
    fn init_preserves_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "team: platform\narchitecture: amd64\n").unwrap();

        init(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("team: platform"), "unknown key dropped: {content}");

        init(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), content);
    }

    #[test]
    fn init_preserves_unknown_keys_inside_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "packages:\n- name: jq\n  manager: brew\n  version: '1.7'\napps:\n- name: Slack\n  channel: beta\n",
        )
        .unwrap();

        init(&path).unwrap();
        let raw: serde_yaml::Value =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["packages"][0]["version"], serde_yaml::Value::from("1.7"));
        assert_eq!(raw["packages"][0]["manager"], serde_yaml::Value::from("brew"));
        assert_eq!(raw["apps"][0]["channel"], serde_yaml::Value::from("beta"));
    }

    #[test]
    fn init_rejects_corrupt_file_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let corrupt = "packages: [unterminated\n";
        std::fs::write(&path, corrupt).unwrap();

        let err = init(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }), "got {err:?}");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), corrupt);
    }

    #[test]
    fn init_rejects_wrong_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "sources: not-a-list\n").unwrap();
        assert!(matches!(init(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn init_treats_empty_file_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "").unwrap();
        let cfg = init(&path).unwrap();
        assert!(cfg.packages.is_empty());
        assert!(!std::fs::read_to_string(&path).unwrap().is_empty());
    }

    #[test]
    fn load_missing_file_does_not_create_it() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let cfg = load(&path).unwrap();
        assert!(cfg.packages.is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        let mut cfg = Config::with_architecture("amd64");
        cfg.packages = vec![Package::new("neovim", "brew"), Package::new("go", "apt")];
        cfg.apps = vec![App {
            name: "Slack".to_string(),
            extra: serde_yaml::Mapping::new(),
        }];
        save(&path, &cfg).unwrap();
        assert_eq!(load(&path).unwrap(), cfg);
    }

    #[cfg(unix)]
    #[test]
    fn save_reports_io_error_for_unwritable_parent() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let path = blocker.join("config.yaml");
        let err = save(&path, &Config::with_architecture("amd64")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "got {err:?}");
    }
}
