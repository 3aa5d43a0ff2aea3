//! Run output for machine-setup commands.
//!
//! Commands talk to a [`Log`]. The production [`Logger`] forwards to
//! [`tracing`] and keeps the per-package results for the end-of-run summary.
//! [`init_subscriber`] routes those events to the terminal and to
//! `~/.cache/machine-setup/<command>.log`, where each package result is a line
//! tagged with the package name.

mod logger;
mod subscriber;
mod types;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;
pub use types::{Log, PackageEntry, PackageStatus};

/// Guards `XDG_CACHE_HOME` while a test points the log directory elsewhere.
#[cfg(test)]
static CACHE_HOME_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// A [`Logger`] whose log file lives in a fresh temporary directory, with a
/// thread-local subscriber that writes to it. Keep the returned guard alive
/// for the whole test.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (Logger, tempfile::TempDir, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};

    let cache = tempfile::tempdir().expect("temp cache dir");
    let (layer, log) = {
        let _lock = CACHE_HOME_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: every writer of XDG_CACHE_HOME holds CACHE_HOME_LOCK.
        #[allow(unsafe_code)]
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", cache.path());
        }
        let layer = subscriber::FileLayer::new("test").expect("log file in temp cache");
        let log = Logger::new("test");
        // SAFETY: as above.
        #[allow(unsafe_code)]
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        (layer, log)
    };

    let dispatch = tracing::Dispatch::new(
        tracing_subscriber::registry().with(layer.with_filter(LevelFilter::DEBUG)),
    );
    let guard = tracing::dispatcher::set_default(&dispatch);
    (log, cache, guard)
}
