//! Package-manager abstraction: the [`Manager`] contract, its two adapters,
//! and host dispatch.
//!
//! - [`brew`]: Homebrew, the native manager on macOS
//! - [`apt`]: Debian-style `apt`/`dpkg`, with [`resolver`] name mapping and
//!   routing to [`installers`] for tools apt does not ship usefully
//! - [`catalog`]: the curated default toolset
pub mod apt;
pub mod brew;
pub mod catalog;
pub mod installers;
pub mod resolver;

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{PackageError, PlatformError};
use crate::exec::{Executor, Streams, SystemExecutor, display_command};
use crate::platform::{Os, Platform};

pub use apt::Apt;
pub use brew::Brew;

/// Supported package manager backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Homebrew.
    Brew,
    /// Debian `apt`.
    Apt,
}

impl Backend {
    /// Tag persisted in the config's `manager` field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Brew => "brew",
            Self::Apt => "apt",
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations every package manager adapter provides.
///
/// Exactly one implementation is bound per run, chosen by [`select`].
#[cfg_attr(test, mockall::automock)]
pub trait Manager {
    /// Install a package by canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the package manager or custom installer fails.
    fn install(&self, name: &str) -> Result<(), PackageError>;

    /// Remove a package by canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails.
    fn uninstall(&self, name: &str) -> Result<(), PackageError>;

    /// Upgrade a package by canonical name.
    ///
    /// # Errors
    ///
    /// Returns an error if the upgrade fails.
    fn update(&self, name: &str) -> Result<(), PackageError>;

    /// Whether the package is currently installed. A negative answer is
    /// `Ok(false)`, never an error.
    ///
    /// # Errors
    ///
    /// Reserved for adapters that cannot determine the state at all.
    fn is_installed(&self, name: &str) -> Result<bool, PackageError>;
}

/// Return the adapter for `platform`, streaming subprocess output into
/// `streams`.
///
/// # Errors
///
/// Returns [`PlatformError::Unsupported`] for any OS other than macOS and
/// Linux.
pub fn select(platform: &Platform, streams: Streams) -> Result<Box<dyn Manager>, PlatformError> {
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    match platform.os {
        Os::MacOs => Ok(Box::new(Brew::new(executor, streams))),
        Os::Linux => Ok(Box::new(Apt::new(
            executor,
            Arc::new(installers::UreqFetcher),
            streams,
            local_bin_dir(),
            &platform.arch,
        ))),
        os @ (Os::Windows | Os::Other(_)) => Err(PlatformError::Unsupported { os: os.to_string() }),
    }
}

/// Per-user binary directory (`~/.local/bin`).
#[must_use]
pub fn local_bin_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".local").join("bin"),
        |home| home.join(".local").join("bin"),
    )
}

/// Run a command with output streamed into `streams`, mapping a spawn failure
/// or a non-zero exit into a [`PackageError`].
pub(crate) fn stream_checked(
    executor: &dyn Executor,
    streams: &Streams,
    program: &str,
    args: &[&str],
    env: &[(&str, &str)],
) -> Result<(), PackageError> {
    let result = executor
        .run_streaming(program, args, env, streams)
        .map_err(|e| PackageError::Spawn {
            command: display_command(program, args),
            message: format!("{e:#}"),
        })?;
    if result.success {
        Ok(())
    } else {
        Err(PackageError::Subprocess {
            command: display_command(program, args),
            code: result.code,
        })
    }
}
