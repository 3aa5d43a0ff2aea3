//! Host operating system and architecture detection.
use std::fmt;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// macOS (Homebrew host).
    MacOs,
    /// Linux (Debian-family host).
    Linux,
    /// Windows.
    Windows,
    /// Any other target OS, by its `std::env::consts::OS` name.
    Other(&'static str),
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacOs => write!(f, "darwin"),
            Self::Linux => write!(f, "linux"),
            Self::Windows => write!(f, "windows"),
            Self::Other(name) => write!(f, "{name}"),
        }
    }
}

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Host operating system.
    pub os: Os,
    /// Architecture token as persisted in the config (`amd64`, `arm64`, ...).
    pub arch: String,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: host_architecture(),
        }
    }

    fn detect_os() -> Os {
        match std::env::consts::OS {
            "macos" => Os::MacOs,
            "linux" => Os::Linux,
            "windows" => Os::Windows,
            other => Os::Other(other),
        }
    }
}

/// Return the host architecture using Debian/Go-style names.
///
/// `x86_64` becomes `amd64` and `aarch64` becomes `arm64`; anything else is
/// passed through from the Rust target architecture.
#[must_use]
pub fn host_architecture() -> String {
    normalize_arch(std::env::consts::ARCH).to_string()
}

/// Map a Rust target architecture name to the persisted architecture token.
#[must_use]
pub fn normalize_arch(rust_arch: &str) -> &str {
    match rust_arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}
