//! Developer machine provisioning.
//!
//! Writes an idempotent per-user config file and installs a curated set of
//! command-line tools through the host's package manager: Homebrew on macOS,
//! `apt` on Debian-family Linux. A few tools bypass the package manager and
//! are fetched from their vendors directly.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: load, backfill and persist the YAML config file
//! - **[`packages`]**: the [`Manager`](packages::Manager) contract, its
//!   adapters, and the default tool catalog
//! - **[`commands`]**: subcommand orchestration (`setup`, `update`,
//!   `uninstall`, `status`)
//! - **[`exec`]** / **[`platform`]**: the subprocess seam and host detection
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]
#![cfg_attr(test, allow(missing_docs))]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod packages;
pub mod platform;
pub mod prompt;
