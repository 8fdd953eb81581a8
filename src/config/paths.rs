// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path configuration.
//!
//! ```text
//! project/
//!   imports/
//!     datasheets/   (datasheet pool)
//!     parts/        (LIB_* containers)
//!   library/
//!     symbols/
//!     footprints/
//!     models/
//!     datasheets/   (manufacturer groups)
//!   sym-lib-table
//!   fp-lib-table
//!   *.kicad_pro
//! ```
//!
//! All paths are optional and resolved from `project` if not set.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

/// Import and library paths configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root (default: current directory).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<PathBuf>,
    /// Import root (default: project/imports).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imports: Option<PathBuf>,
    /// Datasheet pool (default: imports/datasheets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasheets: Option<PathBuf>,
    /// Parts directory holding library containers (default: imports/parts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parts: Option<PathBuf>,
    /// Organized library root (default: project/library).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library: Option<PathBuf>,
    /// Symbol directory (default: library/symbols).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbols: Option<PathBuf>,
    /// Footprint directory (default: library/footprints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footprints: Option<PathBuf>,
    /// 3D model directory (default: library/models).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub models: Option<PathBuf>,
    /// Manufacturer-grouped datasheets (default: library/datasheets).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datasheets_organized: Option<PathBuf>,
    /// Symbol library table (default: project/sym-lib-table).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sym_lib_table: Option<PathBuf>,
    /// Footprint library table (default: project/fp-lib-table).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fp_lib_table: Option<PathBuf>,
    /// Project descriptor (default: first `*.kicad_pro` in project).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_file: Option<PathBuf>,
}

impl PathsConfig {
    /// Resolve all relative paths against their parent and fill in defaults.
    ///
    /// `project` defaults to `.`; `project_file` stays unset so it can be
    /// discovered at patch time.
    pub fn resolve(&mut self) {
        let project = self
            .project
            .get_or_insert_with(|| PathBuf::from("."))
            .clone();

        let resolve = |path: &mut Option<PathBuf>, parent: &Path, default: &str| match path {
            Some(p) if p.is_relative() => {
                *path = Some(parent.join(p.clone()));
            }
            None => {
                *path = Some(parent.join(default));
            }
            _ => {}
        };

        resolve(&mut self.imports, &project, "imports");
        resolve(&mut self.library, &project, "library");
        resolve(&mut self.sym_lib_table, &project, "sym-lib-table");
        resolve(&mut self.fp_lib_table, &project, "fp-lib-table");

        let imports = self
            .imports
            .clone()
            .unwrap_or_else(|| project.join("imports"));

        resolve(&mut self.datasheets, &imports, "datasheets");
        resolve(&mut self.parts, &imports, "parts");

        let library = self
            .library
            .clone()
            .unwrap_or_else(|| project.join("library"));

        resolve(&mut self.symbols, &library, "symbols");
        resolve(&mut self.footprints, &library, "footprints");
        resolve(&mut self.models, &library, "models");
        resolve(&mut self.datasheets_organized, &library, "datasheets");

        if let Some(file) = &self.project_file
            && file.is_relative()
        {
            self.project_file = Some(project.join(file));
        }
    }

    /// Returns a resolved path or a `MissingKey` error naming it.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if the path is not set, which only
    /// happens before [`PathsConfig::resolve`] ran.
    pub fn require<'a>(path: Option<&'a Path>, key: &str) -> Result<&'a Path> {
        path.ok_or_else(|| {
            ConfigError::MissingKey {
                section: "paths".to_string(),
                key: key.to_string(),
            }
            .into()
        })
    }

    /// Get the project root.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::MissingKey` if paths were not resolved.
    pub fn project(&self) -> Result<&Path> {
        Self::require(self.project.as_deref(), "project")
    }
}
