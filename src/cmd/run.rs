// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The run command.

use tracing::info;

use crate::cli::run::RunArgs;
use crate::config::Config;
use crate::error::Result;
use crate::library::engine::{Engine, ProjectOutcome, RunOptions, RunSummary};

/// Runs the engine with the stages selected on the command line.
///
/// A project descriptor failure is logged and does not fail the command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the run hits a fatal
/// filesystem error.
pub fn run_run_command(args: &RunArgs, config: &Config) -> Result<RunSummary> {
    let options = RunOptions::builder()
        .with_dry_run(config.global.dry)
        .with_stages(args.stages())
        .build();

    let summary = Engine::new(config, options)?.run()?;

    info!(
        stage = %summary.stage,
        missing = summary.organize.missing().len(),
        project_updated = matches!(summary.project, ProjectOutcome::Patched(_)),
        "done"
    );
    Ok(summary)
}
