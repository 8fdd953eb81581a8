// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::fs;
use std::io::{ErrorKind, Write as _};
use std::path::Path;

use tracing::info;

use crate::error::{FsError, LibmanResult};

/// What [`copy_if_absent`] did with a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// The destination was written.
    Copied,
    /// Something already occupies the destination name; nothing was written.
    AlreadyPresent,
    /// Dry run: the destination would have been written.
    Simulated,
}

impl CopyOutcome {
    /// Whether this run wrote (or would write) the destination.
    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::Copied | Self::Simulated)
    }
}

/// Copies `src` to `dst` unless something already exists at `dst`.
///
/// The existence check happens immediately before the copy: the first file
/// to claim a destination name keeps it, later sources are skipped and an
/// existing destination is never overwritten. The source modification time
/// is carried over. The parent of `dst` must exist.
///
/// # Example
/// ```no_run
/// use kicad_libman::utility::fs::copy::{copy_if_absent, CopyOutcome};
/// use std::path::Path;
///
/// let outcome = copy_if_absent(
///     Path::new("imports/parts/LIB_LM317/LM317/KiCad/LM317.lib"),
///     Path::new("library/symbols/LM317.lib"),
///     false,
/// )?;
/// assert_ne!(outcome, CopyOutcome::Simulated);
/// # Ok::<(), kicad_libman::error::LibmanError>(())
/// ```
///
/// # Errors
///
/// Returns `FsError::CopyFailed` if the destination cannot be inspected or
/// written.
pub fn copy_if_absent(src: &Path, dst: &Path, dry_run: bool) -> LibmanResult<CopyOutcome> {
    let failed = |source: std::io::Error| FsError::CopyFailed {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
        source,
    };

    match fs::symlink_metadata(dst) {
        Ok(_) => return Ok(CopyOutcome::AlreadyPresent),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(failed(e).into()),
    }

    if dry_run {
        info!(
            src = %src.display(),
            dst = %dst.display(),
            "[DRY-RUN] would copy"
        );
        return Ok(CopyOutcome::Simulated);
    }

    fs::copy(src, dst).map_err(failed)?;

    let modified = fs::metadata(src).and_then(|meta| meta.modified());
    if let Ok(modified) = modified {
        fs::File::options()
            .write(true)
            .open(dst)
            .and_then(|file| file.set_modified(modified))
            .map_err(failed)?;
    }

    Ok(CopyOutcome::Copied)
}

/// Creates `dir` and its parents if missing.
///
/// Returns `true` if the directory was (or, in a dry run, would be) created.
///
/// # Errors
///
/// Returns `FsError::CreateDirFailed` if the directory cannot be created,
/// e.g. because a file occupies the path.
pub fn ensure_dir(dir: &Path, dry_run: bool) -> LibmanResult<bool> {
    if dir.is_dir() {
        return Ok(false);
    }
    if dry_run {
        info!(path = %dir.display(), "[DRY-RUN] would create directory");
        return Ok(true);
    }
    fs::create_dir_all(dir).map_err(|source| FsError::CreateDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Replaces `path` with `contents` through a temporary file in the same
/// directory, so readers never see a half-written file.
///
/// # Errors
///
/// Returns `FsError::WriteFailed` if the temporary file cannot be created,
/// written or moved into place.
pub fn write_atomic(path: &Path, contents: &str) -> LibmanResult<()> {
    replace_file(path, contents).map_err(|source| {
        FsError::WriteFailed {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// [`write_atomic`] with the raw I/O error, for callers with their own error type.
///
/// An existing file keeps its permissions, and a symlink is written through
/// to its target instead of being replaced by a regular file.
pub(crate) fn replace_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let (target, permissions) = match fs::metadata(path) {
        Ok(meta) => (fs::canonicalize(path)?, Some(meta.permissions())),
        Err(e) if e.kind() == ErrorKind::NotFound => (path.to_path_buf(), None),
        Err(e) => return Err(e),
    };
    let dir = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    if let Some(permissions) = permissions {
        file.as_file().set_permissions(permissions)?;
    }
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(&target).map_err(|e| e.error)?;
    Ok(())
}
