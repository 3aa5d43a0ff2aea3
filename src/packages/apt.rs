//! Debian `apt` adapter.
//!
//! Ordinary packages go through `sudo apt` under their resolved Debian name.
//! Packages with a [`CustomInstaller`] are installed and updated by that
//! installer and never touch the package database.
use std::path::PathBuf;
use std::sync::Arc;

use super::installers::{self, CustomInstaller, Fetch, InstallContext};
use super::resolver::resolve;
use super::{Manager, stream_checked};
use crate::error::PackageError;
use crate::exec::{Executor, Streams};

/// [`Manager`] backed by `apt` and `dpkg`.
#[derive(Debug)]
pub struct Apt {
    executor: Arc<dyn Executor>,
    fetcher: Arc<dyn Fetch>,
    streams: Streams,
    bin_dir: PathBuf,
    arch: String,
}

impl Apt {
    /// Create an adapter.
    ///
    /// `bin_dir` receives downloaded binaries and `arch` is the persisted
    /// architecture token used to pick release assets.
    #[must_use]
    pub fn new(
        executor: Arc<dyn Executor>,
        fetcher: Arc<dyn Fetch>,
        streams: Streams,
        bin_dir: PathBuf,
        arch: &str,
    ) -> Self {
        Self {
            executor,
            fetcher,
            streams,
            bin_dir,
            arch: arch.to_string(),
        }
    }

    fn context(&self) -> InstallContext<'_> {
        InstallContext {
            executor: self.executor.as_ref(),
            fetcher: self.fetcher.as_ref(),
            streams: &self.streams,
            bin_dir: &self.bin_dir,
            arch: &self.arch,
        }
    }

    fn apt(&self, args: &[&str]) -> Result<(), PackageError> {
        let mut argv = vec!["apt"];
        argv.extend_from_slice(args);
        stream_checked(self.executor.as_ref(), &self.streams, "sudo", &argv, &[])
    }
}

impl Manager for Apt {
    fn install(&self, name: &str) -> Result<(), PackageError> {
        if let Some(installer) = installers::lookup(name) {
            return installer.install(&self.context());
        }
        self.apt(&["install", "-y", resolve(name)])
    }

    fn uninstall(&self, name: &str) -> Result<(), PackageError> {
        self.apt(&["remove", "-y", resolve(name)])
    }

    fn update(&self, name: &str) -> Result<(), PackageError> {
        if let Some(installer) = installers::lookup(name) {
            return installer.install(&self.context());
        }
        self.apt(&["install", "-y", "--only-upgrade", resolve(name)])
    }

    fn is_installed(&self, name: &str) -> Result<bool, PackageError> {
        if let Some(installer) = installers::lookup(name) {
            return Ok(self.custom_binary_on_path(name, installer));
        }

        let installed = self
            .executor
            .run_unchecked("dpkg", &["-l", resolve(name)])
            .is_ok_and(|result| result.success && dpkg_reports_installed(&result.stdout));
        Ok(installed)
    }
}

impl Apt {
    /// A custom-installed package counts as installed when its executable is
    /// on `PATH`, under either the package name or the published binary name
    /// (`neovim` ships `nvim`).
    fn custom_binary_on_path(&self, name: &str, installer: CustomInstaller) -> bool {
        self.executor.which(name) || self.executor.which(installer.binary_name())
    }
}

/// Whether `dpkg -l` output lists a package in the installed (`ii`) state.
fn dpkg_reports_installed(listing: &str) -> bool {
    listing.lines().any(|line| line.starts_with("ii "))
}
