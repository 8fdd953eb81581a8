// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `options` and `inis`: print what the loader resolved.

use std::io::{self, Write};

use crate::config::Config;
use crate::config::loader::ConfigLoader;

/// Printed by `inis` when neither `libman.toml` nor `--ini` contributed.
pub const DEFAULTS_ONLY: &str = "no configuration files found, using built-in defaults";

/// `section.key = value` for every effective option, paths already resolved.
#[must_use]
pub fn options_report(config: &Config) -> String {
    config
        .format_options()
        .iter()
        .map(|line| format!("{line}\n"))
        .collect()
}

/// Configuration layers in load order.
///
/// The environment layer is always listed, so it is only reported alone when
/// no file or string layer was loaded.
#[must_use]
pub fn inis_report(loader: &ConfigLoader) -> String {
    let mut report = String::new();
    if loader.loaded_files().is_empty() {
        report.push_str(DEFAULTS_ONLY);
        report.push('\n');
    }
    for line in loader.format_loaded_files() {
        report.push_str(&line);
        report.push('\n');
    }
    report
}

/// # Errors
///
/// Returns an error if stdout is closed.
pub fn run_options_command(config: &Config) -> io::Result<()> {
    io::stdout().lock().write_all(options_report(config).as_bytes())
}

/// # Errors
///
/// Returns an error if stdout is closed.
pub fn run_inis_command(loader: &ConfigLoader) -> io::Result<()> {
    io::stdout().lock().write_all(inis_report(loader).as_bytes())
}
