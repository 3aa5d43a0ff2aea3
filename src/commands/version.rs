//! Command: print version information.

/// Version stamped by the build script, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("MACHINE_SETUP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the machine-setup version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("machine-setup {}", version());
}
