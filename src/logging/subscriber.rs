//! Tracing subscriber: terminal output plus a per-command log file.
//!
//! Package results are emitted as events on [`PACKAGE_TARGET`] carrying
//! `package`, `status` and `detail` fields. They are written to the log file
//! only; the terminal already shows the per-package progress lines and the
//! end-of-run summary.
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::Level;
use tracing::field::{Field, Visit};

use super::utils::{HEADER_STAMP, LINE_STAMP, log_file_path, strip_ansi, utc_now};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "machine_setup::stage";

/// Target used for per-package result events.
pub(super) const PACKAGE_TARGET: &str = "machine_setup::package";

/// The fields this crate puts on its events.
#[derive(Debug, Default, PartialEq, Eq)]
pub(super) struct EventFields {
    pub(super) message: String,
    pub(super) package: Option<String>,
    pub(super) status: Option<String>,
    pub(super) detail: Option<String>,
}

impl EventFields {
    fn of(event: &tracing::Event<'_>) -> Self {
        let mut fields = Self::default();
        event.record(&mut fields);
        fields
    }

    fn set(&mut self, name: &str, value: String) {
        match name {
            "message" => self.message = value,
            "package" => self.package = Some(value),
            "status" => self.status = Some(value),
            "detail" if !value.is_empty() => self.detail = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.set(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.set(field.name(), format!("{value:?}"));
    }
}

/// Render an event as a log file line, without the timestamp.
pub(super) fn file_line(level: Level, target: &str, fields: &EventFields) -> String {
    if target == PACKAGE_TARGET {
        let package = fields.package.as_deref().unwrap_or("-");
        let status = fields.status.as_deref().unwrap_or("-");
        return match &fields.detail {
            Some(detail) => format!("    [{package}] {status}: {}", strip_ansi(detail)),
            None => format!("    [{package}] {status}"),
        };
    }

    let msg = strip_ansi(&fields.message);
    match level {
        Level::INFO if target == STAGE_TARGET => format!("==> {msg}"),
        Level::ERROR => format!("    [error] {msg}"),
        Level::WARN => format!("    [warn] {msg}"),
        Level::INFO => format!("    {msg}"),
        _ => format!("    [debug] {msg}"),
    }
}

/// Render an event for the terminal.
pub(super) fn console_line(level: Level, target: &str, msg: &str) -> String {
    match level {
        Level::ERROR => format!("\x1b[31mERROR\x1b[0m {msg}"),
        Level::WARN => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        Level::INFO if target == STAGE_TARGET => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
        Level::INFO => format!("  {msg}"),
        _ => format!("  \x1b[2m{msg}\x1b[0m"),
    }
}

/// Appends every event at `DEBUG` and above to the command's log file,
/// whatever the terminal verbosity.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command` and write the run header.
    ///
    /// Returns `None` if the cache directory or the file is unavailable; the
    /// run then continues with terminal output only.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let header = format!(
            "# machine-setup {} {command} {}\n",
            crate::commands::version::version(),
            utc_now(HEADER_STAMP),
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let metadata = event.metadata();
        let line = file_line(*metadata.level(), metadata.target(), &EventFields::of(event));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "[{}] {line}", utc_now(LINE_STAMP)).ok();
        }
    }
}

struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let fields = EventFields::of(event);
        writeln!(
            writer,
            "{}",
            console_line(*metadata.level(), metadata.target(), &fields.message)
        )
    }
}

/// Install the global subscriber for a run of `command`.
///
/// Terminal: warnings and errors on stderr, the rest on stdout, `INFO` and
/// above unless `verbose`; `RUST_LOG` overrides the level. Package result
/// events are kept off the terminal. Log file: everything at `DEBUG` and
/// above, see [`FileLayer`].
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, filter::filter_fn, fmt,
        layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let level_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let terminal = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(terminal)
        .with_filter(filter_fn(|meta| meta.target() != PACKAGE_TARGET))
        .with_filter(level_filter);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
