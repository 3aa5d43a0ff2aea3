//! Subprocess seam and the stdout/stderr sink pair handed to package adapters.
use anyhow::{Context, Result};
use std::io::{self, Read, Write};
use std::process::{Command, Output, Stdio};
use std::sync::{Arc, Mutex, PoisonError};

/// Result of a command execution.
#[derive(Debug)]
pub struct ExecResult {
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, or `None` if terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// A shared, lockable output sink.
pub type Sink = Arc<Mutex<dyn Write + Send>>;

/// The pair of output sinks an adapter streams subprocess output into.
///
/// Cloning is cheap and shares the underlying writers, so every clone writes
/// into the same streams in call order.
#[derive(Clone)]
pub struct Streams {
    out: Sink,
    err: Sink,
}

impl std::fmt::Debug for Streams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Streams").finish_non_exhaustive()
    }
}

impl Streams {
    /// Build a pair from explicit sinks.
    #[must_use]
    pub const fn new(out: Sink, err: Sink) -> Self {
        Self { out, err }
    }

    /// Sinks bound to the process's standard output and standard error.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(
            Arc::new(Mutex::new(io::stdout())),
            Arc::new(Mutex::new(io::stderr())),
        )
    }

    /// In-memory sinks, returned together with handles for reading them back.
    #[must_use]
    pub fn capture() -> (Self, Captured) {
        let out = Arc::new(Mutex::new(Vec::new()));
        let err = Arc::new(Mutex::new(Vec::new()));
        let streams = Self::new(out.clone(), err.clone());
        (streams, Captured { out, err })
    }

    /// Standard output sink.
    #[must_use]
    pub const fn out(&self) -> &Sink {
        &self.out
    }

    /// Standard error sink.
    #[must_use]
    pub const fn err(&self) -> &Sink {
        &self.err
    }

    /// Write a line to the output sink. Write failures are ignored, matching
    /// how a terminal that has gone away is treated.
    pub fn say(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        let _ = writeln!(out, "{line}");
        let _ = out.flush();
    }
}

/// Read-back handles for [`Streams::capture`].
#[derive(Debug, Clone)]
pub struct Captured {
    out: Arc<Mutex<Vec<u8>>>,
    err: Arc<Mutex<Vec<u8>>>,
}

impl Captured {
    /// Everything written to the output sink so far.
    #[must_use]
    pub fn stdout(&self) -> String {
        let buf = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).to_string()
    }

    /// Everything written to the error sink so far.
    #[must_use]
    pub fn stderr(&self) -> String {
        let buf = self.err.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).to_string()
    }
}

/// Abstraction over process execution so adapters can be tested without
/// touching a real package manager.
pub trait Executor: std::fmt::Debug + Send + Sync {
    /// Run a command, capturing output, without failing on a non-zero exit.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command cannot be spawned.
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult>;

    /// Run a command with extra environment variables, copying its stdout and
    /// stderr into `streams` as it runs. The returned result carries the exit
    /// status only; its `stdout`/`stderr` fields are empty.
    ///
    /// # Errors
    ///
    /// Returns an error only if the command cannot be spawned or waited on.
    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        streams: &Streams,
    ) -> Result<ExecResult>;

    /// Check if a program is available on PATH.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

/// Copy a child pipe into a sink until EOF.
fn pump(mut from: impl Read, to: &Sink) -> io::Result<u64> {
    let mut sink = to.lock().unwrap_or_else(PoisonError::into_inner);
    let copied = io::copy(&mut from, &mut *sink)?;
    sink.flush()?;
    Ok(copied)
}

impl Executor for SystemExecutor {
    fn run_unchecked(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: {program}"))?;

        Ok(ExecResult::from(output))
    }

    fn run_streaming(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
        streams: &Streams,
    ) -> Result<ExecResult> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (k, v) in env {
            cmd.env(k, v);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to execute: {program}"))?;
        let child_out = child.stdout.take();
        let child_err = child.stderr.take();

        // Drain both pipes concurrently so a chatty stderr cannot fill its
        // pipe buffer and block the child while we wait on stdout.
        std::thread::scope(|s| {
            if let Some(err) = child_err {
                s.spawn(|| pump(err, streams.err()));
            }
            if let Some(out) = child_out {
                let _ = pump(out, streams.out());
            }
        });

        let status = child
            .wait()
            .with_context(|| format!("failed to wait for: {program}"))?;
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: status.success(),
            code: status.code(),
        })
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}

/// Render a command line for error messages.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
