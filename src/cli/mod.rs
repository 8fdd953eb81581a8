// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for kicad-libman using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! kicad-libman [global options] [command]
//! run [--no-datasheets] [--no-tables] [--no-project]   (default)
//! options
//! inis
//! version
//! ```

pub mod global;
pub mod run;


use crate::cli::global::GlobalOptions;
use crate::cli::run::RunArgs;
use clap::{Parser, Subcommand};

/// KiCad Library Manager
///
/// Organizes imported KiCad parts into a project library.
#[derive(Debug, Parser)]
#[command(
    name = "kicad-libman",
    author,
    version,
    about = "KiCad Library Manager",
    long_about = "kicad-libman Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Copies symbols, footprints, 3D models and datasheets from\n\
                  imports/ into library/, then regenerates sym-lib-table,\n\
                  fp-lib-table and the pinned libraries of the .kicad_pro file.\n\n\
                  Invoking `kicad-libman -d some/project` runs everything. Existing\n\
                  library files are never overwritten, so running again is safe.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `libman.toml` in the project directory if\n\
                  present, then from every --ini file in order, then from LIBMAN_*\n\
                  environment variables (LIBMAN_PATHS__LIBRARY=lib), then from\n\
                  --set and the other command line flags. Use `options` to print\n\
                  the effective configuration."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute (default: run)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The command to execute, `run` with default arguments when omitted.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Run(RunArgs::default()))
    }
}

/// Available commands.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Organizes imports and regenerates library metadata.
    Run(RunArgs),

    /// Lists all options and their effective values.
    Options,

    /// Lists the configuration files that were loaded.
    Inis,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
