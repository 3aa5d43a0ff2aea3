//! Domain-specific error types for machine setup.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Internal modules return typed errors (e.g., [`ConfigError`], [`PackageError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error kinds
//!
//! ```text
//! PlatformError: no package manager for this host (fatal)
//! ConfigError:   config parse / persistence failures (fatal)
//! PackageError:  a single package operation (never fatal to a batch)
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Errors that arise from host platform dispatch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// No package manager adapter is available for the host operating system.
    #[error("unsupported OS: {os}")]
    Unsupported {
        /// Name of the operating system (e.g., `"windows"`).
        os: String,
    },
}

/// Errors that arise from loading and persisting the config file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// An existing config file is not valid YAML for the config schema.
    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A directory or file operation on the config path failed.
    #[error("IO error on config file {}: {source}", path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The in-memory config could not be rendered as YAML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Errors that arise from a single package operation.
#[derive(Error, Debug)]
pub enum PackageError {
    /// A download returned a non-success HTTP status.
    #[error("download failed: HTTP {status} ({url})")]
    DownloadStatus {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A download could not be completed (DNS, TLS, connection reset, ...).
    #[error("downloading {url}: {message}")]
    Download {
        /// URL that was requested.
        url: String,
        /// Transport error description.
        message: String,
    },

    /// A filesystem operation inside an installer failed.
    #[error("{action} {}: {source}", path.display())]
    Io {
        /// What was being attempted (e.g., `"creating directory"`).
        action: &'static str,
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A package manager subprocess exited non-zero.
    #[error("{command} failed (exit {})", code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    Subprocess {
        /// The command line that was run.
        command: String,
        /// Exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
    },

    /// A package manager subprocess could not be started.
    #[error("failed to execute {command}: {message}")]
    Spawn {
        /// The command line that was attempted.
        command: String,
        /// Description of the spawn failure.
        message: String,
    },
}
