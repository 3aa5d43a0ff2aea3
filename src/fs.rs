//! File-system helpers shared by the config store and the binary installers.
use std::io::{self, Read, Write as _};
use std::path::Path;

use thiserror::Error;

/// A failed step of [`write_atomic`].
#[derive(Error, Debug)]
#[error("{action}: {source}")]
pub struct WriteError {
    /// The step that failed (e.g., `"creating file"`).
    pub action: &'static str,
    /// Underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl WriteError {
    const fn new(action: &'static str, source: io::Error) -> Self {
        Self { action, source }
    }
}

/// Directory that will hold `path`, treating a bare file name as the current
/// directory.
fn parent_or_cwd(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    std::fs::create_dir_all(parent_or_cwd(path))
}

/// Stream `content` into `dest` through a temporary file in the same
/// directory, then rename it over `dest`. Readers never observe a partially
/// written file. `mode` is applied on Unix before the rename.
///
/// The parent directory must already exist.
///
/// # Errors
///
/// Returns a [`WriteError`] naming the step that failed.
pub fn write_atomic(dest: &Path, mut content: impl Read, mode: u32) -> Result<u64, WriteError> {
    let dir = parent_or_cwd(dest);
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| WriteError::new("creating file", e))?;

    let written = io::copy(&mut content, &mut tmp).map_err(|e| WriteError::new("writing file", e))?;
    tmp.flush().map_err(|e| WriteError::new("writing file", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(mode))
            .map_err(|e| WriteError::new("setting permissions", e))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    tmp.persist(dest)
        .map_err(|e| WriteError::new("moving file into place", e.error))?;
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn ensure_parent_dir_creates_ancestors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c/config.yaml");
        ensure_parent_dir(&path).unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn write_atomic_replaces_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        std::fs::write(&path, "old content that is longer").unwrap();
        let n = write_atomic(&path, "new".as_bytes(), 0o644).unwrap();
        assert_eq!(n, 3);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn write_atomic_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file");
        write_atomic(&path, "x".as_bytes(), 0o644).unwrap();
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_applies_mode() {
        use std::os::unix::fs::PermissionsExt as _;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tool");
        write_atomic(&path, "#!/bin/sh\n".as_bytes(), 0o755).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn write_atomic_missing_directory_reports_step() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing/file");
        let err = write_atomic(&path, "x".as_bytes(), 0o644).unwrap_err();
        assert_eq!(err.action, "creating file");
    }
}
