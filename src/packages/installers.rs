//! Out-of-band installers for packages that bypass the package manager.
//!
//! Each installer is also the update path for its package: reinstalling
//! fetches the pinned release again.
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::PackageError;
use crate::exec::{Executor, Streams};
use crate::fs::write_atomic;

/// Pinned Neovim release downloaded as an AppImage.
pub const NEOVIM_VERSION: &str = "v0.11.6";

/// Vendor install pipeline for starship.
const STARSHIP_SCRIPT: &str = "curl -sS https://starship.rs/install.sh | sh -s -- -y";

/// An installation routine used instead of the package manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomInstaller {
    /// Download the Neovim AppImage into the per-user binary directory.
    NeovimAppImage,
    /// Run the starship vendor install script.
    StarshipScript,
}

/// Package names routed to a custom installer.
const ROUTES: &[(&str, CustomInstaller)] = &[
    ("neovim", CustomInstaller::NeovimAppImage),
    ("starship", CustomInstaller::StarshipScript),
];

/// Return the custom installer for `name`, if it has one.
#[must_use]
pub fn lookup(name: &str) -> Option<CustomInstaller> {
    ROUTES
        .iter()
        .find_map(|&(routed, installer)| (routed == name).then_some(installer))
}

/// Everything an installer needs from its adapter.
#[derive(Debug, Clone, Copy)]
pub struct InstallContext<'a> {
    /// Subprocess seam for script installers.
    pub executor: &'a dyn Executor,
    /// HTTP seam for binary downloads.
    pub fetcher: &'a dyn Fetch,
    /// Sinks for progress lines and subprocess output.
    pub streams: &'a Streams,
    /// Directory downloaded binaries are written to.
    pub bin_dir: &'a Path,
    /// Persisted architecture token (`amd64`, `arm64`, ...).
    pub arch: &'a str,
}

impl CustomInstaller {
    /// Name of the executable the installer puts on `PATH`.
    #[must_use]
    pub const fn binary_name(self) -> &'static str {
        match self {
            Self::NeovimAppImage => "nvim",
            Self::StarshipScript => "starship",
        }
    }

    /// Run the installer.
    ///
    /// # Errors
    ///
    /// Returns a download, filesystem or subprocess [`PackageError`].
    pub fn install(self, ctx: &InstallContext<'_>) -> Result<(), PackageError> {
        match self {
            Self::NeovimAppImage => install_neovim_appimage(ctx),
            Self::StarshipScript => install_starship(ctx),
        }
    }
}

/// Map a persisted architecture token to the name used in release assets.
#[must_use]
pub fn download_arch(arch: &str) -> &str {
    match arch {
        "amd64" => "x86_64",
        "arm64" => "aarch64",
        other => other,
    }
}

/// Release URL of the Neovim AppImage for `arch`.
#[must_use]
pub fn neovim_url(arch: &str) -> String {
    format!(
        "https://github.com/neovim/neovim/releases/download/{NEOVIM_VERSION}/nvim-linux-{}.appimage",
        download_arch(arch)
    )
}

fn install_neovim_appimage(ctx: &InstallContext<'_>) -> Result<(), PackageError> {
    let url = neovim_url(ctx.arch);
    let dest: PathBuf = ctx.bin_dir.join("nvim");

    ctx.streams
        .say(&format!("Downloading Neovim AppImage to {}...", dest.display()));

    std::fs::create_dir_all(ctx.bin_dir).map_err(|source| PackageError::Io {
        action: "creating directory",
        path: ctx.bin_dir.to_path_buf(),
        source,
    })?;

    let body = ctx.fetcher.get(&url)?;
    write_atomic(&dest, body, 0o755).map_err(|e| PackageError::Io {
        action: e.action,
        path: dest.clone(),
        source: e.source,
    })?;

    ctx.streams
        .say(&format!("Neovim AppImage installed to {}", dest.display()));
    Ok(())
}

fn install_starship(ctx: &InstallContext<'_>) -> Result<(), PackageError> {
    ctx.streams.say("Installing starship via official installer...");
    super::stream_checked(ctx.executor, ctx.streams, "sh", &["-c", STARSHIP_SCRIPT], &[])
}

/// Blocking HTTP GET seam.
pub trait Fetch: std::fmt::Debug + Send + Sync {
    /// Request `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Returns [`PackageError::DownloadStatus`] for a non-success status and
    /// [`PackageError::Download`] for transport failures.
    fn get(&self, url: &str) -> Result<Box<dyn Read>, PackageError>;
}

/// [`Fetch`] backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqFetcher;

impl Fetch for UreqFetcher {
    fn get(&self, url: &str) -> Result<Box<dyn Read>, PackageError> {
        let response = ureq::get(url).call().map_err(|e| match e {
            ureq::Error::StatusCode(status) => PackageError::DownloadStatus {
                url: url.to_string(),
                status,
            },
            other => PackageError::Download {
                url: url.to_string(),
                message: other.to_string(),
            },
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PackageError::DownloadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(Box::new(response.into_body().into_reader()))
    }
}
