// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Asset discovery and organization engine.
//!
//! # Architecture
//!
//! ```text
//!                    Engine
//!   Idle -> DirectoriesEnsured -> DatasheetsOrganized -> PartsOrganized
//!                                                          |
//!                              (symbol or footprint found) v
//!                                TablesGenerated -> MetadataPatched
//!
//!   AssetOrganizer --uses--> Classifier, BundleFilter, ManufacturerResolver
//!        |
//!        v  copy_if_absent (first writer wins)
//!   library/{symbols,footprints,models,datasheets/<KEY>}
//!        |
//!        v  re-scanned from disk
//!   TableGenerator --> sym-lib-table, fp-lib-table
//!   ProjectPatcher --> *.kicad_pro libraries.pinned_*
//! ```
//!
//! # Key Types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`AssetKind`] | Category of an organized asset |
//! | [`LibraryLayout`] | Resolved input and output locations |
//! | [`classify::Classifier`] | Ordered `{glob -> category}` rule table |
//! | [`organizer::OrganizeReport`] | What a walk copied, found and skipped |
//! | [`engine::Engine`] | Runs the stages in order |

pub mod classify;
pub mod engine;
pub mod manufacturer;
pub mod organizer;
pub mod project;
pub mod table;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::paths::PathsConfig;
use crate::error::Result;

/// Category of a part asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Symbol,
    Footprint,
    Model,
}

impl AssetKind {
    pub const ALL: [Self; 3] = [Self::Symbol, Self::Footprint, Self::Model];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Footprint => "footprint",
            Self::Model => "model",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified file found inside a part bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub source: PathBuf,
    pub kind: AssetKind,
    pub file_name: String,
}

/// Input that was expected but absent. The affected unit of work is skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingInput {
    /// The whole import root.
    ImportRoot(PathBuf),
    /// The datasheet pool.
    DatasheetPool(PathBuf),
    /// The directory holding library containers.
    PartsDir(PathBuf),
    /// A part bundle without its tool asset directory.
    AssetDir { bundle: PathBuf, path: PathBuf },
}

impl MissingInput {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::ImportRoot(path)
            | Self::DatasheetPool(path)
            | Self::PartsDir(path)
            | Self::AssetDir { path, .. } => path,
        }
    }
}

impl fmt::Display for MissingInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImportRoot(path) => write!(f, "imports directory not found: {}", path.display()),
            Self::DatasheetPool(path) => {
                write!(f, "datasheets directory not found: {}", path.display())
            }
            Self::PartsDir(path) => write!(f, "parts directory not found: {}", path.display()),
            Self::AssetDir { bundle, path } => write!(
                f,
                "no asset directory {} in part {}",
                path.display(),
                bundle.display()
            ),
        }
    }
}

/// Resolved locations of everything the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryLayout {
    pub project: PathBuf,
    pub imports: PathBuf,
    pub datasheet_pool: PathBuf,
    pub parts: PathBuf,
    pub library: PathBuf,
    pub symbols: PathBuf,
    pub footprints: PathBuf,
    pub models: PathBuf,
    pub datasheets: PathBuf,
    pub sym_lib_table: PathBuf,
    pub fp_lib_table: PathBuf,
    pub project_file: Option<PathBuf>,
}

impl LibraryLayout {
    /// Builds the layout from resolved path configuration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if a path was left unresolved.
    pub fn from_paths(paths: &PathsConfig) -> Result<Self> {
        let get = |path: &Option<PathBuf>, key: &str| {
            PathsConfig::require(path.as_deref(), key).map(Path::to_path_buf)
        };
        Ok(Self {
            project: get(&paths.project, "project")?,
            imports: get(&paths.imports, "imports")?,
            datasheet_pool: get(&paths.datasheets, "datasheets")?,
            parts: get(&paths.parts, "parts")?,
            library: get(&paths.library, "library")?,
            symbols: get(&paths.symbols, "symbols")?,
            footprints: get(&paths.footprints, "footprints")?,
            models: get(&paths.models, "models")?,
            datasheets: get(&paths.datasheets_organized, "datasheets_organized")?,
            sym_lib_table: get(&paths.sym_lib_table, "sym_lib_table")?,
            fp_lib_table: get(&paths.fp_lib_table, "fp_lib_table")?,
            project_file: paths.project_file.clone(),
        })
    }

    /// Destination directory for an asset category.
    #[must_use]
    pub fn category_dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Symbol => &self.symbols,
            AssetKind::Footprint => &self.footprints,
            AssetKind::Model => &self.models,
        }
    }

    /// Directories created before organizing, parents first.
    #[must_use]
    pub fn output_dirs(&self) -> [&Path; 5] {
        [
            &self.library,
            &self.symbols,
            &self.footprints,
            &self.models,
            &self.datasheets,
        ]
    }
}

#[cfg(test)]
mod tests;
