//! The persisted machine-setup configuration file.
//!
//! ```yaml
//! architecture: arm64
//! sources: []
//! packages:
//! - name: neovim
//!   manager: brew
//! apps: []
//! ```
//!
//! Keys this version does not know about are kept in [`Config::extra`] and
//! written back after the known keys.
pub mod store;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::platform::host_architecture;

pub use store::{init, load, save};

/// Top-level machine-setup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Host architecture token recorded on first run.
    #[serde(default = "host_architecture", deserialize_with = "null_as_arch")]
    pub architecture: String,
    /// Extra package sources (taps, repositories).
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<String>,
    /// Packages selected for this machine.
    #[serde(default, deserialize_with = "null_as_default")]
    pub packages: Vec<Package>,
    /// Desktop applications tracked for this machine.
    #[serde(default, deserialize_with = "null_as_default")]
    pub apps: Vec<App>,
    /// Top-level keys not modelled above, preserved across rewrites.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Config {
    /// A config with every field at its default for the given architecture.
    #[must_use]
    pub fn with_architecture(architecture: &str) -> Self {
        Self {
            architecture: architecture.to_string(),
            sources: Vec::new(),
            packages: Vec::new(),
            apps: Vec::new(),
            extra: serde_yaml::Mapping::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_architecture(&host_architecture())
    }
}

/// A managed package, abstracted over package managers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Canonical package name.
    pub name: String,
    /// Preferred backend tag (`"brew"` or `"apt"`).
    #[serde(default)]
    pub manager: String,
    /// Per-package keys not modelled above, preserved across rewrites.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl Package {
    /// Create a package entry.
    #[must_use]
    pub fn new(name: &str, manager: &str) -> Self {
        Self {
            name: name.to_string(),
            manager: manager.to_string(),
            extra: serde_yaml::Mapping::new(),
        }
    }
}

/// A desktop application to track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    /// Application name.
    pub name: String,
    /// Per-app keys not modelled above, preserved across rewrites.
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

/// Treat an explicit YAML `null` (e.g. `sources:` with no value) like an
/// absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_arch<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(host_architecture))
}

/// Return `~/.config/.machine-setup/config.yaml`, or a relative
/// `.machine-setup/config.yaml` when the home directory is unknown.
#[must_use]
pub fn default_path() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".machine-setup").join("config.yaml"),
        |home| home.join(".config").join(".machine-setup").join("config.yaml"),
    )
}

/// Resolve the config path: an explicit path wins, otherwise the default.
#[must_use]
pub fn resolve_path(explicit: Option<PathBuf>) -> PathBuf {
    explicit.unwrap_or_else(default_path)
}
