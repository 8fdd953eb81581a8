// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config (layered) --> Logging --> Command Dispatch
//!   Run | Options | Inis | Version
//! ```

use std::process::ExitCode;

use kicad_libman::cli::global::GlobalOptions;
use kicad_libman::cli::{self, Command};
use kicad_libman::cmd::config::{run_inis_command, run_options_command};
use kicad_libman::cmd::run::run_run_command;
use kicad_libman::config::loader::ConfigLoader;
use kicad_libman::config::{Config, ENV_PREFIX, PROJECT_CONFIG_FILE};
use kicad_libman::logging::{LogConfig, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    let cli = cli::parse();
    let command = cli.command();

    match command {
        Command::Version => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Command::Inis => {
            let loader = build_config_loader(&cli.global);
            return match run_inis_command(&loader) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            };
        }
        Command::Run(_) | Command::Options => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = LogConfig::from_global(&config.global, cli.global.log_format);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match command {
        Command::Run(args) => run_run_command(&args, &config).map(|_| ()),
        Command::Options => run_options_command(&config).map_err(Into::into),
        Command::Inis | Command::Version => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "run aborted");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader =
        ConfigLoader::new().add_toml_file_optional(global.project_dir().join(PROJECT_CONFIG_FILE));
    for ini_path in &global.inis {
        loader = loader.add_toml_file(ini_path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> kicad_libman::error::Result<Config> {
    build_config_loader(global)
        .apply_overrides(&global.to_config_overrides())?
        .build()
}
