// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration types for kicad-libman.
//!
//! # Config Structure
//!
//! ```text
//! Config: GlobalConfig, PathsConfig, ClassifyConfig, DatasheetConfig, TablesConfig
//! ClassifyConfig.rules: ordered [{ pattern, category }]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::library::AssetKind;
use crate::logging::LogLevel;

/// Global configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log intended writes without touching the filesystem.
    pub dry: bool,
    /// Log level for stdout output (0-5).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-5).
    pub file_log_level: LogLevel,
    /// Path to log file, no file logging when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            dry: false,
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::DEBUG,
            log_file: None,
        }
    }
}

/// One row of the classification table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Glob matched against the file path relative to its part bundle.
    pub pattern: String,
    /// Category assigned on match.
    pub category: AssetKind,
}

impl RuleConfig {
    #[must_use]
    pub fn new(pattern: impl Into<String>, category: AssetKind) -> Self {
        Self {
            pattern: pattern.into(),
            category,
        }
    }
}

/// Part bundle discovery and classification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassifyConfig {
    /// Name prefix of library container directories under `paths.parts`.
    pub library_prefix: String,
    /// Bundle subdirectory that must exist for a bundle to be processed.
    pub asset_dir: String,
    /// Entries inside a library container that are never bundles (globs).
    pub exclude: Vec<String>,
    /// Classification rules, first match wins.
    pub rules: Vec<RuleConfig>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            library_prefix: "LIB_".to_string(),
            asset_dir: "KiCad".to_string(),
            exclude: vec!["license.txt".to_string()],
            rules: vec![
                RuleConfig::new("KiCad/*.{kicad_sym,lib,dcm}", AssetKind::Symbol),
                RuleConfig::new("KiCad/*.{kicad_mod,mod}", AssetKind::Footprint),
                RuleConfig::new("3D/*.{stp,step,wrl}", AssetKind::Model),
            ],
        }
    }
}

/// Datasheet grouping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasheetConfig {
    /// Glob selecting datasheet files directly under the pool.
    pub pattern: String,
    /// Separator between the manufacturer token and the rest of the name.
    pub delimiter: String,
    /// Group used when no manufacturer token can be derived.
    pub fallback: String,
}

impl Default for DatasheetConfig {
    fn default() -> Self {
        Self {
            pattern: "*.pdf".to_string(),
            delimiter: "_".to_string(),
            fallback: "Misc".to_string(),
        }
    }
}

impl DatasheetConfig {
    /// Checks values that would make grouping meaningless.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` if the delimiter or fallback is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            section: "datasheets".to_string(),
            key: key.to_string(),
            message: message.to_string(),
        };
        if self.delimiter.is_empty() {
            return Err(invalid("delimiter", "must not be empty"));
        }
        if self.fallback.is_empty() || self.fallback.contains(['/', '\\']) {
            return Err(invalid("fallback", "must be a single directory name"));
        }
        Ok(())
    }
}

/// Library table generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    /// Glob selecting symbol library files listed in `sym-lib-table`.
    pub symbol_pattern: String,
    /// `type` of symbol table entries.
    pub symbol_type: String,
    /// Glob selecting footprint files that make the footprint library non-empty.
    pub footprint_pattern: String,
    /// `type` of the footprint table entry.
    pub footprint_type: String,
    /// Logical name of the footprint collection.
    pub footprint_name: String,
    /// Path variable prefixed to project-relative URIs.
    pub uri_variable: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            symbol_pattern: "*.lib".to_string(),
            symbol_type: "Legacy".to_string(),
            footprint_pattern: "*.kicad_mod".to_string(),
            footprint_type: "KiCad".to_string(),
            footprint_name: "project_footprints".to_string(),
            uri_variable: "KIPRJMOD".to_string(),
        }
    }
}
