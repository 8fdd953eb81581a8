// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One organize run.
//!
//! ```text
//! Idle                       project directory must exist
//!  -> DirectoriesEnsured     library/ and category dirs exist
//!  -> DatasheetsOrganized    skipped when DATASHEETS is off
//!  -> PartsOrganized
//!     (no symbol or footprint found: stop here)
//!  -> TablesGenerated        written when TABLES is on, scanned otherwise
//!  -> MetadataPatched        when PROJECT is on; failure is logged, not raised
//! ```
//!
//! Nothing is kept between runs except the filesystem.

use std::fmt;
use std::path::PathBuf;

use bitflags::bitflags;
use bon::Builder;
use tracing::{debug, error, info, info_span};

use crate::config::Config;
use crate::error::{ProjectError, Result, bail_out};
use crate::library::organizer::{AssetOrganizer, OrganizeReport};
use crate::library::project::{PinnedLibraries, ProjectPatcher};
use crate::library::table::{TableGenerator, TablesReport};

/// Progress of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    DirectoriesEnsured,
    DatasheetsOrganized,
    PartsOrganized,
    TablesGenerated,
    MetadataPatched,
}

impl Stage {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::DirectoriesEnsured => "directories_ensured",
            Self::DatasheetsOrganized => "datasheets_organized",
            Self::PartsOrganized => "parts_organized",
            Self::TablesGenerated => "tables_generated",
            Self::MetadataPatched => "metadata_patched",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags! {
    /// Optional stages of a run. Directory setup and the part walk always run.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Stages: u8 {
        /// Group the datasheet pool by manufacturer.
        const DATASHEETS = 0x01;

        /// Write `sym-lib-table` and `fp-lib-table`.
        const TABLES = 0x02;

        /// Pin library names in the project descriptor.
        const PROJECT = 0x04;
    }
}

impl Default for Stages {
    fn default() -> Self {
        Self::all()
    }
}

/// Per-invocation options.
#[derive(Debug, Clone, Copy, Default, Builder)]
pub struct RunOptions {
    #[builder(setters(name = with_dry_run), default)]
    dry_run: bool,
    #[builder(setters(name = with_stages), default)]
    stages: Stages,
}

impl RunOptions {
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub const fn stages(&self) -> Stages {
        self.stages
    }
}

/// What happened to the project descriptor.
#[derive(Debug)]
pub enum ProjectOutcome {
    /// The stage did not run.
    Skipped,
    /// The descriptor was rewritten.
    Patched(PathBuf),
    /// Dry run: the descriptor would have been rewritten.
    Simulated(PathBuf),
    /// Patching failed; the run carried on.
    Failed(ProjectError),
}

/// Result of a completed run.
///
/// In a dry run nothing reaches `library/`, so on a fresh project the tables
/// and pinned lists come from an empty scan even though `organize` reports
/// simulated copies. They are not a preview of the real run.
#[derive(Debug)]
pub struct RunSummary {
    /// Last stage reached.
    pub stage: Stage,
    pub organize: OrganizeReport,
    /// Library names and written tables, when the table stage was reached.
    pub tables: Option<TablesReport>,
    pub project: ProjectOutcome,
}

/// Drives the organizer, table generator and project patcher in order.
#[derive(Debug, Clone)]
pub struct Engine {
    organizer: AssetOrganizer,
    tables: TableGenerator,
    patcher: ProjectPatcher,
    options: RunOptions,
}

impl Engine {
    /// Builds every component up front, so configuration errors surface
    /// before anything is written.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is unresolved or a pattern is invalid.
    pub fn new(config: &Config, options: RunOptions) -> Result<Self> {
        let dry_run = options.dry_run();
        Ok(Self {
            organizer: AssetOrganizer::from_config(config, dry_run)?,
            tables: TableGenerator::from_config(config, dry_run)?,
            patcher: ProjectPatcher::from_config(config, dry_run)?,
            options,
        })
    }

    #[must_use]
    pub const fn options(&self) -> RunOptions {
        self.options
    }

    /// Runs all enabled stages.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a missing project directory, a
    /// directory that cannot be created, a failed copy or a table that cannot
    /// be written. Missing inputs and
    /// project descriptor failures are reported in the summary instead.
    pub fn run(&self) -> Result<RunSummary> {
        let layout = self.organizer.layout();
        let span = info_span!(
            "run",
            project = %layout.project.display(),
            dry_run = self.options.dry_run()
        );
        let _enter = span.enter();

        if !layout.project.is_dir() {
            return Err(bail_out(format!(
                "project directory {} does not exist",
                layout.project.display()
            ))
            .into());
        }

        let stages = self.options.stages();
        let mut stage = Stage::Idle;

        self.organizer.ensure_output_dirs()?;
        advance(&mut stage, Stage::DirectoriesEnsured);

        let mut organize = OrganizeReport::default();
        let imports_present = self.organizer.import_root_present(&mut organize);

        if imports_present && stages.contains(Stages::DATASHEETS) {
            self.organizer.organize_datasheets(&mut organize)?;
        }
        advance(&mut stage, Stage::DatasheetsOrganized);

        if imports_present {
            self.organizer.organize_parts(&mut organize)?;
        }
        advance(&mut stage, Stage::PartsOrganized);
        organize.log_summary();

        if !organize.has_library_assets() {
            info!("no symbol or footprint assets found, skipping library tables and project file");
            return Ok(RunSummary {
                stage,
                organize,
                tables: None,
                project: ProjectOutcome::Skipped,
            });
        }

        let tables = if stages.contains(Stages::TABLES) {
            self.tables.generate()?
        } else {
            self.tables.scan_tables()?
        };
        advance(&mut stage, Stage::TablesGenerated);

        let project = if stages.contains(Stages::PROJECT) {
            let outcome = self.patch_project(&PinnedLibraries::from(&tables));
            advance(&mut stage, Stage::MetadataPatched);
            outcome
        } else {
            ProjectOutcome::Skipped
        };

        Ok(RunSummary {
            stage,
            organize,
            tables: Some(tables),
            project,
        })
    }

    fn patch_project(&self, pinned: &PinnedLibraries) -> ProjectOutcome {
        match self.patcher.patch(pinned) {
            Ok(path) if self.options.dry_run() => ProjectOutcome::Simulated(path),
            Ok(path) => ProjectOutcome::Patched(path),
            Err(e) => {
                error!(error = %e, "failed to update project file");
                ProjectOutcome::Failed(e)
            }
        }
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "stage");
    *stage = next;
}
