// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for kicad-libman.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. <project>/libman.toml
//! 3. --ini FILE (repeatable)
//! 4. LIBMAN_* env vars
//! 5. --set / CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! LIBMAN_GLOBAL__DRY=true             → global.dry = true
//! LIBMAN_PATHS__LIBRARY=lib           → paths.library = "lib"
//! LIBMAN_CLASSIFY__LIBRARY_PREFIX=X_  → classify.library_prefix = "X_"
//! ```
//!
//! # Classification Rules
//!
//! ```toml
//! [[classify.rules]]
//! pattern = "KiCad/*.{kicad_sym,lib,dcm}"
//! category = "symbol"
//! ```

pub mod loader;
pub mod paths;
pub mod types;


use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

use loader::ConfigLoader;
use paths::PathsConfig;
use types::{ClassifyConfig, DatasheetConfig, GlobalConfig, TablesConfig};

/// Name of the per-project configuration file.
pub const PROJECT_CONFIG_FILE: &str = "libman.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "LIBMAN";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Global options.
    pub global: GlobalConfig,
    /// Import, library and output paths.
    pub paths: PathsConfig,
    /// Part bundle discovery and classification.
    pub classify: ClassifyConfig,
    /// Datasheet grouping.
    pub datasheets: DatasheetConfig,
    /// Library table generation.
    pub tables: TablesConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use kicad_libman::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("libman.toml")
    ///     .with_env_prefix("LIBMAN")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Default configuration rooted at `project`, with paths resolved.
    ///
    /// # Errors
    ///
    /// Returns an error if the defaults fail validation.
    pub fn for_project(project: impl Into<PathBuf>) -> Result<Self> {
        let mut config = Self::default();
        config.paths.project = Some(project.into());
        config.resolve_and_validate()?;
        Ok(config)
    }

    /// Resolve all paths and validate configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is invalid (e.g. an empty datasheet delimiter).
    pub fn resolve_and_validate(&mut self) -> Result<()> {
        self.paths.resolve();
        self.datasheets.validate()?;
        Ok(())
    }

    /// `section.key = value` lines for the `options` command, sorted by key
    /// with the values aligned.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = OptionList::default();

        let global = &self.global;
        options.add("global.dry", global.dry);
        options.add("global.output_log_level", global.output_log_level.as_u8());
        options.add("global.file_log_level", global.file_log_level.as_u8());
        if let Some(log_file) = &global.log_file {
            options.add("global.log_file", log_file.display());
        }

        let paths = &self.paths;
        for (key, path) in [
            ("project", &paths.project),
            ("imports", &paths.imports),
            ("datasheets", &paths.datasheets),
            ("parts", &paths.parts),
            ("library", &paths.library),
            ("symbols", &paths.symbols),
            ("footprints", &paths.footprints),
            ("models", &paths.models),
            ("datasheets_organized", &paths.datasheets_organized),
            ("sym_lib_table", &paths.sym_lib_table),
            ("fp_lib_table", &paths.fp_lib_table),
        ] {
            options.add_path(format!("paths.{key}"), path.as_deref(), "");
        }
        options.add_path(
            "paths.project_file",
            paths.project_file.as_deref(),
            "(auto: *.kicad_pro)",
        );

        let classify = &self.classify;
        options.add("classify.library_prefix", &classify.library_prefix);
        options.add("classify.asset_dir", &classify.asset_dir);
        options.add("classify.exclude", classify.exclude.join(", "));
        for (i, rule) in classify.rules.iter().enumerate() {
            options.add(
                format!("classify.rules.{i:02}"),
                format_args!("{} -> {}", rule.pattern, rule.category),
            );
        }

        let datasheets = &self.datasheets;
        options.add("datasheets.pattern", &datasheets.pattern);
        options.add("datasheets.delimiter", &datasheets.delimiter);
        options.add("datasheets.fallback", &datasheets.fallback);

        let tables = &self.tables;
        options.add("tables.symbol_pattern", &tables.symbol_pattern);
        options.add("tables.symbol_type", &tables.symbol_type);
        options.add("tables.footprint_pattern", &tables.footprint_pattern);
        options.add("tables.footprint_type", &tables.footprint_type);
        options.add("tables.footprint_name", &tables.footprint_name);
        options.add("tables.uri_variable", &tables.uri_variable);

        options.into_lines()
    }
}

#[derive(Default)]
struct OptionList(BTreeMap<String, String>);

impl OptionList {
    fn add(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.0.insert(key.into(), value.to_string());
    }

    fn add_path(&mut self, key: impl Into<String>, path: Option<&Path>, unset: &str) {
        match path {
            Some(path) => self.add(key, path.display()),
            None => self.add(key, unset),
        }
    }

    fn into_lines(self) -> Vec<String> {
        let width = self.0.keys().map(String::len).max().unwrap_or(0);
        self.0
            .into_iter()
            .map(|(key, value)| format!("{key:<width$} = {value}"))
            .collect()
    }
}
