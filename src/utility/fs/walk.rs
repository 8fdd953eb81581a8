// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Deterministic directory traversal.
//!
//! Import trees are vendor downloads, not repositories: `.gitignore` and
//! friends are never honored, entries come back sorted by file name so that
//! "first writer wins" picks the same file on every machine.

use std::path::{Path, PathBuf};

use bon::Builder;
use ignore::{DirEntry, WalkBuilder};
use tracing::warn;
use wax::{Glob, Program as _};

use crate::error::Result;

/// Directories unpacked archives leave behind.
const ARCHIVE_LEFTOVERS: &[&str] = &["__MACOSX"];

/// Options for directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// 1 = direct children; unlimited when unset.
    #[builder(setters(name = with_max_depth))]
    max_depth: Option<usize>,
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    #[builder(setters(name = with_include_hidden), default = false)]
    include_hidden: bool,
    /// Directory names pruned with everything below them.
    #[builder(setters(name = with_skip_dirs), default)]
    skip_dirs: Vec<String>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    /// Direct children only.
    #[must_use]
    pub fn shallow() -> Self {
        Self::builder().with_max_depth(1).build()
    }

    /// Whole part bundle: follows symlinked `3D/` folders, prunes archive
    /// leftovers.
    #[must_use]
    pub fn for_bundle() -> Self {
        Self::builder()
            .with_follow_links(true)
            .with_skip_dirs(ARCHIVE_LEFTOVERS.iter().map(ToString::to_string).collect())
            .build()
    }

    fn walker(&self, root: &Path) -> WalkBuilder {
        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(!self.include_hidden)
            .follow_links(self.follow_links)
            .max_depth(self.max_depth)
            .sort_by_file_name(|a, b| a.cmp(b));

        if !self.skip_dirs.is_empty() {
            let skip_dirs = self.skip_dirs.clone();
            builder.filter_entry(move |entry| !is_skipped_dir(entry, &skip_dirs));
        }
        builder
    }
}

fn is_skipped_dir(entry: &DirEntry, skip_dirs: &[String]) -> bool {
    entry.file_type().is_some_and(|ft| ft.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| skip_dirs.iter().any(|skip| skip == name))
}

/// Files and directories below a root, in depth-first name order.
#[derive(Debug, Default)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
    error_count: usize,
}

impl WalkResult {
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Excludes the root itself.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Entries that could not be read; each one was logged.
    #[must_use]
    pub const fn error_count(&self) -> usize {
        self.error_count
    }

    fn push(&mut self, entry: DirEntry) {
        match entry.file_type() {
            Some(ft) if ft.is_dir() => self.directories.push(entry.into_path()),
            Some(ft) if ft.is_file() => self.files.push(entry.into_path()),
            _ => {}
        }
    }
}

/// Walks `root`, skipping the root entry itself.
///
/// Unreadable entries are logged at WARN and counted, not returned as errors.
///
/// # Errors
///
/// Returns an error if the root directory does not exist.
///
/// # Example
/// ```no_run
/// use kicad_libman::utility::fs::walk::{walk, WalkOptions};
///
/// let containers = walk("imports/parts", &WalkOptions::shallow())?;
/// println!("{} containers", containers.directories().len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> Result<WalkResult> {
    let root = root.as_ref();
    if !root.exists() {
        anyhow::bail!("root directory does not exist: {}", root.display());
    }

    let mut result = WalkResult::default();
    for entry in options.walker(root).build() {
        match entry {
            Ok(entry) if entry.depth() == 0 => {}
            Ok(entry) => result.push(entry),
            Err(e) => {
                warn!(root = %root.display(), error = %e, "unreadable entry");
                result.error_count += 1;
            }
        }
    }
    Ok(result)
}

/// Direct child directories of `root`, sorted by name.
///
/// # Errors
///
/// Returns an error if `root` does not exist.
pub fn child_dirs<P: AsRef<Path>>(root: P) -> Result<Vec<PathBuf>> {
    Ok(walk(root, &WalkOptions::shallow())?.directories)
}

/// Files whose path relative to `root` matches `pattern`.
///
/// # Errors
///
/// Returns an error if the root directory does not exist or the pattern is
/// not a valid glob.
///
/// # Example
/// ```no_run
/// use kicad_libman::utility::fs::walk::{find_files, WalkOptions};
///
/// for pdf in find_files("imports/datasheets", "*.pdf", &WalkOptions::shallow())? {
///     println!("{}", pdf.display());
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn find_files<P: AsRef<Path>>(
    root: P,
    pattern: &str,
    options: &WalkOptions,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let glob =
        Glob::new(pattern).map_err(|e| anyhow::anyhow!("invalid glob pattern '{pattern}': {e}"))?;

    let mut files = walk(root, options)?.files;
    files.retain(|path| {
        path.strip_prefix(root)
            .is_ok_and(|relative| glob.is_match(relative))
    });
    Ok(files)
}
