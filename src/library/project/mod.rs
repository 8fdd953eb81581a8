// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Project descriptor (`*.kicad_pro`) patching.
//!
//! Only `libraries.pinned_symbol_libs` and `libraries.pinned_footprint_libs`
//! are written; every other field is carried through with its key order.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::info;

use crate::config::Config;
use crate::error::{ProjectError, Result};
use crate::library::table::TablesReport;
use crate::utility::fs::copy::replace_file;

/// Extension of project descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "kicad_pro";

/// Library names to pin in the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinnedLibraries {
    pub symbols: Vec<String>,
    pub footprints: Vec<String>,
}

impl From<&TablesReport> for PinnedLibraries {
    fn from(tables: &TablesReport) -> Self {
        Self {
            symbols: tables.symbol_libs.clone(),
            footprints: tables.footprint_libs.clone(),
        }
    }
}

/// Sets the pinned library lists in a parsed descriptor, creating the
/// `libraries` object when it is absent.
///
/// # Errors
///
/// Returns `ProjectError::NotAnObject` if the document root or its
/// `libraries` field is not a JSON object.
pub fn pin_libraries(
    document: &mut Value,
    pinned: &PinnedLibraries,
    path: &Path,
) -> std::result::Result<(), ProjectError> {
    let not_an_object = |field: &str| ProjectError::NotAnObject {
        path: path.to_path_buf(),
        field: field.to_string(),
    };

    let root = document
        .as_object_mut()
        .ok_or_else(|| not_an_object("<root>"))?;
    let libraries = root
        .entry("libraries")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| not_an_object("libraries"))?;

    libraries.insert("pinned_symbol_libs".to_string(), names(&pinned.symbols));
    libraries.insert("pinned_footprint_libs".to_string(), names(&pinned.footprints));
    Ok(())
}

fn names(names: &[String]) -> Value {
    Value::Array(names.iter().cloned().map(Value::String).collect())
}

/// Renders a descriptor the way it is stored: two-space indent, newline at
/// the end.
///
/// # Errors
///
/// Returns an error only if serialization fails, which a parsed `Value`
/// never does.
pub fn render(document: &Value) -> serde_json::Result<String> {
    let mut text = serde_json::to_string_pretty(document)?;
    text.push('\n');
    Ok(text)
}

/// Finds the first `*.kicad_pro` file in `dir`, by name.
///
/// # Errors
///
/// Returns `ProjectError::Read` if `dir` cannot be listed and
/// `ProjectError::NotFound` if it holds no descriptor.
pub fn find_descriptor(dir: &Path) -> std::result::Result<PathBuf, ProjectError> {
    let read_error = |source| ProjectError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext == DESCRIPTOR_EXTENSION)
        {
            candidates.push(path);
        }
    }
    candidates.sort();
    candidates.into_iter().next().ok_or_else(|| ProjectError::NotFound {
        dir: dir.to_path_buf(),
    })
}

/// Writes pinned library names into the project descriptor.
#[derive(Debug, Clone)]
pub struct ProjectPatcher {
    project: PathBuf,
    project_file: Option<PathBuf>,
    dry_run: bool,
}

impl ProjectPatcher {
    /// # Errors
    ///
    /// Returns an error if `paths.project` is unresolved.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        Ok(Self {
            project: config.paths.project()?.to_path_buf(),
            project_file: config.paths.project_file.clone(),
            dry_run,
        })
    }

    /// The configured descriptor, or the one discovered in the project root.
    ///
    /// # Errors
    ///
    /// See [`find_descriptor`].
    pub fn descriptor(&self) -> std::result::Result<PathBuf, ProjectError> {
        match &self.project_file {
            Some(path) => Ok(path.clone()),
            None => find_descriptor(&self.project),
        }
    }

    /// Reads, patches and rewrites the descriptor. Returns its path.
    ///
    /// # Errors
    ///
    /// Returns a `ProjectError` if the descriptor cannot be found, read,
    /// parsed, patched or written. Nothing is written on error.
    pub fn patch(&self, pinned: &PinnedLibraries) -> std::result::Result<PathBuf, ProjectError> {
        let path = self.descriptor()?;

        let text = fs::read_to_string(&path).map_err(|source| ProjectError::Read {
            path: path.clone(),
            source,
        })?;
        let parse_error = |source| ProjectError::Parse {
            path: path.clone(),
            source,
        };
        let mut document: Value = serde_json::from_str(&text).map_err(parse_error)?;
        pin_libraries(&mut document, pinned, &path)?;
        let rendered = render(&document).map_err(parse_error)?;

        if self.dry_run {
            info!(
                path = %path.display(),
                symbols = pinned.symbols.len(),
                footprints = pinned.footprints.len(),
                "[DRY-RUN] would update project libraries"
            );
            return Ok(path);
        }

        replace_file(&path, &rendered).map_err(|source| ProjectError::Write {
            path: path.clone(),
            source,
        })?;
        info!(
            path = %path.display(),
            symbols = pinned.symbols.len(),
            footprints = pinned.footprints.len(),
            "updated project libraries"
        );
        Ok(path)
    }
}
