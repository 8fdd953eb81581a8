// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!           LibmanError (~24 bytes)
//!                  |
//!   +------+------+------+------+------+
//!   |      |      |      |      |      |
//!   v      v      v      v      v      v
//! Bail   Cfg     Fs   Proj  Class   Io
//! Box<str> Box  Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Config   ReadError, ParseError, MissingKey, InvalidValue
//!   Fs       NotFound, CreateDirFailed, CopyFailed, WriteFailed
//!   Project  NotFound, Read, Parse, NotAnObject, Write
//!   Classify InvalidPattern
//!
//! Fatal:    Fs (a copy or write that fails aborts the run)
//! Isolated: Project (logged by the engine, run continues)
//! ```
//!
//! Missing inputs (import root, datasheet pool, bundle asset directory) are
//! not errors; they are recorded in the organize report.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`LibmanError`].
pub type LibmanResult<T> = std::result::Result<T, LibmanError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum LibmanError {
    /// Fatal error that should terminate the application.
    #[error("fatal error: {0}")]
    Bailed(Box<str>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Filesystem error.
    #[error("filesystem error: {0}")]
    Fs(#[from] Box<FsError>),

    /// Project descriptor error.
    #[error("project error: {0}")]
    Project(#[from] Box<ProjectError>),

    /// Classification rule error.
    #[error("classify error: {0}")]
    Classify(#[from] Box<ClassifyError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl LibmanError {
    /// Returns true if this error must abort the run.
    ///
    /// Project descriptor errors are the only isolated kind.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Project(_))
    }
}

/// Create a fatal [`LibmanError::Bailed`] that terminates the application.
pub fn bail_out(message: impl Into<String>) -> LibmanError {
    LibmanError::Bailed(message.into().into_boxed_str())
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for LibmanError {
                fn from(err: $error) -> Self {
                    LibmanError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ConfigError => Config,
    FsError => Fs,
    ProjectError => Project,
    ClassifyError => Classify,
    std::io::Error => Io,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Filesystem Errors ---

/// Filesystem operation errors. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum FsError {
    /// Path not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// A destination directory could not be created.
    #[error("failed to create directory '{}': {source}", path.display())]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Copying a file into the library failed.
    #[error("failed to copy '{}' to '{}': {source}", src.display(), dst.display())]
    CopyFailed {
        src: PathBuf,
        dst: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a generated file failed.
    #[error("failed to write '{}': {source}", path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Project Descriptor Errors ---

/// Errors raised while patching the project descriptor.
#[derive(Debug, Error)]
pub enum ProjectError {
    /// No descriptor configured and none found in the project root.
    #[error("no project descriptor (*.kicad_pro) found in {}", dir.display())]
    NotFound { dir: PathBuf },

    /// Descriptor could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor is not valid JSON.
    #[error("failed to parse '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Descriptor (or one of its sections) is not a JSON object.
    #[error("'{field}' in '{}' is not an object", path.display())]
    NotAnObject { path: PathBuf, field: String },

    /// Descriptor could not be written back.
    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Classification Errors ---

/// Errors in the classification rule table.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// A rule or exclusion pattern is not a valid glob.
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
