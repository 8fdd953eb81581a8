// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Run command arguments.

use clap::Args;

use crate::library::engine::Stages;

/// Arguments for the run command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct RunArgs {
    /// Does not group datasheets by manufacturer.
    #[arg(long = "no-datasheets")]
    pub no_datasheets: bool,

    /// Does not write sym-lib-table and fp-lib-table.
    #[arg(long = "no-tables")]
    pub no_tables: bool,

    /// Does not update the project file.
    #[arg(long = "no-project")]
    pub no_project: bool,
}

impl RunArgs {
    /// Optional stages left enabled.
    #[must_use]
    pub fn stages(&self) -> Stages {
        let mut stages = Stages::all();
        stages.set(Stages::DATASHEETS, !self.no_datasheets);
        stages.set(Stages::TABLES, !self.no_tables);
        stages.set(Stages::PROJECT, !self.no_project);
        stages
    }
}
