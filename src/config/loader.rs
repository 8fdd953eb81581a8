// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! defaults          #[serde(default)] on every section
//!   < libman.toml   add_toml_file_optional
//!   < --ini FILE    add_toml_file (must exist)
//!   < LIBMAN_*      with_env_prefix, LIBMAN_PATHS__LIBRARY=lib
//!   < --set a/b=c   apply_overrides
//!        |
//!        v
//!    build() --> Config (paths resolved, values validated)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};

use super::Config;
use crate::error::{ConfigError, Result};

/// Where a configuration layer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A file that must exist (`--ini`).
    File,
    /// A file that is read only when present (`libman.toml`).
    Optional,
    /// Inline TOML.
    String,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::File => "file",
            Self::Optional => "optional",
            Self::String => "string",
        })
    }
}

/// A layer listed by the `inis` command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSource {
    pub kind: SourceKind,
    pub path: PathBuf,
}

/// Collects configuration layers; later layers win.
pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<LoadedSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// Adds a TOML file that must exist when [`ConfigLoader::build`] runs.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.push_file(path.as_ref(), true)
    }

    /// Adds a TOML file that is skipped when absent.
    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(self, path: P) -> Self {
        self.push_file(path.as_ref(), false)
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(LoadedSource {
            kind: SourceKind::String,
            path: PathBuf::from("<string>"),
        });
        self
    }

    fn push_file(mut self, path: &Path, required: bool) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(required));
        let kind = if required {
            SourceKind::File
        } else if path.is_file() {
            SourceKind::Optional
        } else {
            return self;
        };
        self.sources.push(LoadedSource {
            kind,
            path: path.to_path_buf(),
        });
        self
    }

    /// Reads `PREFIX_SECTION__KEY` environment variables.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets a configuration override.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is invalid or if the value cannot be converted
    /// to a configuration value.
    pub fn set<T: Into<config::Value>>(mut self, key: &str, value: T) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .map_err(|e| anyhow::anyhow!("invalid override '{key}': {e}"))?;
        Ok(self)
    }

    /// Applies `section/key=value` overrides as produced by the CLI.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::InvalidValue` for an override without `=` or
    /// without a section, or any error from [`ConfigLoader::set`].
    pub fn apply_overrides<S: AsRef<str>>(mut self, overrides: &[S]) -> Result<Self> {
        for raw in overrides {
            let raw = raw.as_ref();
            let Some((key, value)) = raw.split_once('=') else {
                return Err(invalid_override(raw, "expected 'section/key=value'").into());
            };
            let key = key.trim().replace('/', ".");
            if !key.contains('.') {
                return Err(invalid_override(raw, "missing section").into());
            }
            self = self.set(&key, value.trim().to_string())?;
        }
        Ok(self)
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - Environment variables cannot be parsed.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - A value fails validation (e.g. an empty datasheet delimiter).
    pub fn build(self) -> Result<Config> {
        let mut builder = self.builder;
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }
        let mut config: Config = builder.build()?.try_deserialize()?;
        config.resolve_and_validate()?;
        Ok(config)
    }

    /// File and string layers in load order, absent optional files excluded.
    #[must_use]
    pub fn loaded_files(&self) -> &[LoadedSource] {
        &self.sources
    }

    /// Numbered lines for the `inis` command, environment layer last.
    #[must_use]
    pub fn format_loaded_files(&self) -> Vec<String> {
        let env = self
            .env_prefix
            .as_ref()
            .map(|prefix| format!("[env] {prefix}_*"));
        self.sources
            .iter()
            .map(|source| format!("[{}] {}", source.kind, source.path.display()))
            .chain(env)
            .enumerate()
            .map(|(i, line)| format!("{}. {line}", i + 1))
            .collect()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn invalid_override(raw: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: "cli".to_string(),
        key: raw.to_string(),
        message: message.to_string(),
    }
}
