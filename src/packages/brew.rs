//! Homebrew adapter.
use std::sync::Arc;

use super::{Manager, stream_checked};
use crate::error::PackageError;
use crate::exec::{Executor, Streams};

/// Skips the dependent scan over every installed formula and cask, which can
/// fail on unrelated broken entries.
const NO_DEPENDENTS_CHECK: (&str, &str) = ("HOMEBREW_NO_INSTALLED_DEPENDENTS_CHECK", "1");

/// [`Manager`] backed by the `brew` CLI.
#[derive(Debug)]
pub struct Brew {
    executor: Arc<dyn Executor>,
    streams: Streams,
}

impl Brew {
    /// Create an adapter that streams `brew` output into `streams`.
    #[must_use]
    pub const fn new(executor: Arc<dyn Executor>, streams: Streams) -> Self {
        Self { executor, streams }
    }

    fn run(&self, args: &[&str], env: &[(&str, &str)]) -> Result<(), PackageError> {
        stream_checked(self.executor.as_ref(), &self.streams, "brew", args, env)
    }
}

impl Manager for Brew {
    fn install(&self, name: &str) -> Result<(), PackageError> {
        self.run(&["install", name], &[])
    }

    fn uninstall(&self, name: &str) -> Result<(), PackageError> {
        match self.run(&["uninstall", name], &[NO_DEPENDENTS_CHECK]) {
            Ok(()) => Ok(()),
            // brew can exit non-zero for reasons unrelated to the package; the
            // outcome that matters is whether it is still installed.
            Err(err) => match self.is_installed(name) {
                Ok(false) => Ok(()),
                _ => Err(err),
            },
        }
    }

    fn update(&self, name: &str) -> Result<(), PackageError> {
        self.run(&["upgrade", name], &[])
    }

    fn is_installed(&self, name: &str) -> Result<bool, PackageError> {
        let installed = self
            .executor
            .run_unchecked("brew", &["list", "--formula", name])
            .is_ok_and(|result| result.success && !result.stdout.trim().is_empty());
        Ok(installed)
    }
}
