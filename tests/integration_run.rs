// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for complete organize runs.
//!
//! Each test builds a project tree in a temporary directory and runs the
//! engine against it.

use std::fs;
use std::path::Path;

use kicad_libman::cli::run::RunArgs;
use kicad_libman::cmd::run::run_run_command;
use kicad_libman::config::Config;
use kicad_libman::error::{FsError, LibmanError, ProjectError};
use kicad_libman::library::engine::{Engine, ProjectOutcome, RunOptions, Stage};
use kicad_libman::library::{AssetKind, MissingInput};
use tempfile::TempDir;

const DESCRIPTOR: &str = r#"{
  "board": {
    "3dviewports": [],
    "design_settings": {}
  },
  "libraries": {
    "pinned_footprint_libs": [],
    "pinned_symbol_libs": []
  },
  "meta": {
    "filename": "demo.kicad_pro",
    "version": 1
  },
  "sheets": [
    [
      "e63e39d7-6ac0-4ffd-8aa3-1841a4541b55",
      "Root"
    ]
  ]
}
"#;

fn touch(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A project with two library containers, a broken bundle and a datasheet pool.
fn project() -> TempDir {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    touch(root, "demo.kicad_pro", DESCRIPTOR);
    touch(root, "imports/datasheets/TI_LM317.pdf", "lm317");
    touch(root, "imports/datasheets/TI_NE555.pdf", "ne555");
    touch(root, "imports/datasheets/resistor.pdf", "resistor");
    touch(root, "imports/parts/LIB_LM317/LM317/KiCad/LM317.lib", "lm317 sym");
    touch(root, "imports/parts/LIB_LM317/LM317/KiCad/LM317.dcm", "lm317 doc");
    touch(root, "imports/parts/LIB_LM317/LM317/KiCad/TO220.kicad_mod", "to220 v1");
    touch(root, "imports/parts/LIB_LM317/LM317/3D/TO220.stp", "to220 model");
    touch(root, "imports/parts/LIB_LM317/license.txt", "license");
    touch(root, "imports/parts/LIB_NE555/NE555/KiCad/NE555.lib", "ne555 sym");
    touch(root, "imports/parts/LIB_NE555/NE555/KiCad/TO220.kicad_mod", "to220 v2");
    touch(root, "imports/parts/LIB_NE555/Broken/3D/broken.wrl", "broken");
    temp
}

fn run(root: &Path) -> kicad_libman::library::engine::RunSummary {
    let config = Config::for_project(root).unwrap();
    Engine::new(&config, RunOptions::default())
        .unwrap()
        .run()
        .unwrap()
}

/// Every file below `dir`, relative and `/`-separated, with its contents.
fn snapshot_tree(dir: &Path) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                pending.push(path);
            } else {
                let relative = path
                    .strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/");
                entries.push((relative, fs::read_to_string(&path).unwrap()));
            }
        }
    }
    entries.sort();
    entries
}

// =============================================================================
// Full run
// =============================================================================

#[test]
fn run_organizes_everything() {
    let temp = project();
    let root = temp.path();

    let summary = run(root);

    assert_eq!(summary.stage, Stage::MetadataPatched);
    let files: Vec<_> = snapshot_tree(&root.join("library"))
        .into_iter()
        .map(|(path, contents)| format!("{path}: {contents}"))
        .collect();
    insta::assert_snapshot!(files.join("\n"), @r"
datasheets/Misc/resistor.pdf: resistor
datasheets/TI/TI_LM317.pdf: lm317
datasheets/TI/TI_NE555.pdf: ne555
footprints/TO220.kicad_mod: to220 v1
models/TO220.stp: to220 model
symbols/LM317.dcm: lm317 doc
symbols/LM317.lib: lm317 sym
symbols/NE555.lib: ne555 sym
");
}

#[test]
fn run_writes_tables() {
    let temp = project();
    let root = temp.path();

    run(root);

    insta::assert_snapshot!(fs::read_to_string(root.join("sym-lib-table")).unwrap(), @r#"
(sym_lib_table
  (lib (name "LM317")(type "Legacy")(uri "${KIPRJMOD}/library/symbols/LM317.lib")(options "")(descr ""))
  (lib (name "NE555")(type "Legacy")(uri "${KIPRJMOD}/library/symbols/NE555.lib")(options "")(descr ""))
)
"#);
    insta::assert_snapshot!(fs::read_to_string(root.join("fp-lib-table")).unwrap(), @r#"
(fp_lib_table
  (lib (name "project_footprints")(type "KiCad")(uri "${KIPRJMOD}/library/footprints")(options "")(descr ""))
)
"#);
}

#[test]
fn run_patches_only_pinned_libraries() {
    let temp = project();
    let root = temp.path();

    run(root);

    let patched = fs::read_to_string(root.join("demo.kicad_pro")).unwrap();
    let expected = DESCRIPTOR
        .replace(
            "\"pinned_footprint_libs\": []",
            "\"pinned_footprint_libs\": [\n      \"project_footprints\"\n    ]",
        )
        .replace(
            "\"pinned_symbol_libs\": []",
            "\"pinned_symbol_libs\": [\n      \"LM317\",\n      \"NE555\"\n    ]",
        );
    assert_eq!(patched, expected);
}

#[test]
fn run_records_broken_bundle_and_continues() {
    let temp = project();
    let root = temp.path();

    let summary = run(root);

    assert_eq!(
        summary.organize.missing(),
        [MissingInput::AssetDir {
            bundle: root.join("imports/parts/LIB_NE555/Broken"),
            path: root.join("imports/parts/LIB_NE555/Broken/KiCad"),
        }]
    );
    assert!(root.join("library/symbols/NE555.lib").is_file());
    assert!(!root.join("library/models/broken.wrl").exists());
}

// =============================================================================
// Idempotence
// =============================================================================

#[test]
fn rerun_is_idempotent() {
    let temp = project();
    let root = temp.path();
    run(root);
    let library = snapshot_tree(&root.join("library"));
    let sym_table = fs::read_to_string(root.join("sym-lib-table")).unwrap();
    let descriptor = fs::read_to_string(root.join("demo.kicad_pro")).unwrap();

    let summary = run(root);

    for kind in AssetKind::ALL {
        assert_eq!(summary.organize.copied(kind).count(), 0, "{kind}");
    }
    assert!(summary.organize.datasheets_copied().is_empty());
    assert_eq!(summary.stage, Stage::MetadataPatched);
    assert_eq!(snapshot_tree(&root.join("library")), library);
    assert_eq!(fs::read_to_string(root.join("sym-lib-table")).unwrap(), sym_table);
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), descriptor);
}

#[test]
fn rerun_never_overwrites_library_files() {
    let temp = project();
    let root = temp.path();
    run(root);
    fs::write(root.join("library/symbols/LM317.lib"), "hand edited").unwrap();
    touch(root, "imports/parts/LIB_LM317/LM317/KiCad/LM317.lib", "vendor update");

    run(root);

    assert_eq!(
        fs::read_to_string(root.join("library/symbols/LM317.lib")).unwrap(),
        "hand edited"
    );
}

// =============================================================================
// Regeneration and skipping
// =============================================================================

#[test]
fn tables_follow_library_contents() {
    let temp = project();
    let root = temp.path();
    run(root);
    fs::remove_file(root.join("library/symbols/NE555.lib")).unwrap();
    fs::remove_dir_all(root.join("imports/parts/LIB_NE555")).unwrap();
    touch(root, "library/symbols/Manual.lib", "added by hand");

    run(root);

    let table = fs::read_to_string(root.join("sym-lib-table")).unwrap();
    assert!(table.contains("(name \"Manual\")"));
    assert!(table.contains("(name \"LM317\")"));
    assert!(!table.contains("NE555"));
}

#[test]
fn deleted_tables_are_rebuilt_on_rerun() {
    let temp = project();
    let root = temp.path();
    run(root);
    let sym_table = fs::read_to_string(root.join("sym-lib-table")).unwrap();
    let fp_table = fs::read_to_string(root.join("fp-lib-table")).unwrap();
    fs::remove_file(root.join("sym-lib-table")).unwrap();
    fs::remove_file(root.join("fp-lib-table")).unwrap();

    let summary = run(root);

    assert_eq!(summary.organize.copied(AssetKind::Symbol).count(), 0);
    assert_eq!(summary.organize.copied(AssetKind::Footprint).count(), 0);
    assert_eq!(fs::read_to_string(root.join("sym-lib-table")).unwrap(), sym_table);
    assert_eq!(fs::read_to_string(root.join("fp-lib-table")).unwrap(), fp_table);
}

#[test]
fn empty_imports_write_no_tables() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();
    touch(root, "demo.kicad_pro", DESCRIPTOR);
    touch(root, "imports/datasheets/TI_LM317.pdf", "lm317");

    let summary = run(root);

    assert_eq!(summary.stage, Stage::PartsOrganized);
    assert!(!root.join("sym-lib-table").exists());
    assert!(!root.join("fp-lib-table").exists());
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), DESCRIPTOR);
    assert!(root.join("library/datasheets/TI/TI_LM317.pdf").is_file());
}

#[test]
fn missing_imports_is_not_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let root = temp.path();

    let summary = run(root);

    assert_eq!(
        summary.organize.missing(),
        [MissingInput::ImportRoot(root.join("imports"))]
    );
    assert!(root.join("library/symbols").is_dir());
}

// =============================================================================
// Failure policy
// =============================================================================

#[test]
fn broken_descriptor_does_not_abort() {
    let temp = project();
    let root = temp.path();
    fs::write(root.join("demo.kicad_pro"), "[]").unwrap();

    let summary = run(root);

    assert!(matches!(
        summary.project,
        ProjectOutcome::Failed(ProjectError::NotAnObject { .. })
    ));
    assert!(root.join("sym-lib-table").is_file());
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), "[]");
}

#[test]
fn copy_failure_aborts_run() {
    let temp = project();
    let root = temp.path();
    // A file where the symbols directory should be: directory creation fails.
    touch(root, "library/symbols", "not a directory");

    let config = Config::for_project(root).unwrap();
    let err = Engine::new(&config, RunOptions::default())
        .unwrap()
        .run()
        .unwrap_err();

    let err = err.downcast_ref::<LibmanError>().expect("typed error");
    assert!(err.is_fatal());
    assert!(matches!(err, LibmanError::Fs(inner) if matches!(**inner, FsError::CreateDirFailed { .. })));
    assert!(!root.join("sym-lib-table").exists());
}

#[test]
fn table_write_failure_aborts_run() {
    let temp = project();
    let root = temp.path();
    fs::create_dir(root.join("sym-lib-table")).unwrap();

    let config = Config::for_project(root).unwrap();
    let err = Engine::new(&config, RunOptions::default())
        .unwrap()
        .run()
        .unwrap_err();

    let err = err.downcast_ref::<LibmanError>().expect("typed error");
    assert!(matches!(err, LibmanError::Fs(inner) if matches!(**inner, FsError::WriteFailed { .. })));
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), DESCRIPTOR);
}

// =============================================================================
// Command entry point
// =============================================================================

#[test]
fn run_command_dry_run_changes_nothing() {
    let temp = project();
    let root = temp.path();
    let mut config = Config::for_project(root).unwrap();
    config.global.dry = true;

    let summary = run_run_command(&RunArgs::default(), &config).unwrap();

    assert!(summary.organize.has_library_assets());
    assert!(!root.join("library").exists());
    assert!(!root.join("sym-lib-table").exists());
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), DESCRIPTOR);
}

#[test]
fn run_command_honors_stage_flags() {
    let temp = project();
    let root = temp.path();
    let config = Config::for_project(root).unwrap();
    let args = RunArgs {
        no_datasheets: true,
        no_project: true,
        ..RunArgs::default()
    };

    let summary = run_run_command(&args, &config).unwrap();

    assert_eq!(summary.stage, Stage::TablesGenerated);
    assert!(matches!(summary.project, ProjectOutcome::Skipped));
    assert!(!root.join("library/datasheets/TI").exists());
    assert!(root.join("sym-lib-table").is_file());
    assert_eq!(fs::read_to_string(root.join("demo.kicad_pro")).unwrap(), DESCRIPTOR);
}

#[test]
fn configured_layout_is_used() {
    let temp = project();
    let root = temp.path();
    let config = kicad_libman::config::loader::ConfigLoader::new()
        .add_toml_str(
            r#"
[paths]
library = "kicad"

[tables]
footprint_name = "board_footprints"
"#,
        )
        .set("paths.project", root.to_string_lossy().into_owned())
        .unwrap()
        .build()
        .unwrap();

    Engine::new(&config, RunOptions::default())
        .unwrap()
        .run()
        .unwrap();

    assert!(root.join("kicad/symbols/LM317.lib").is_file());
    let table = fs::read_to_string(root.join("fp-lib-table")).unwrap();
    assert!(table.contains("(name \"board_footprints\")"));
    assert!(table.contains("${KIPRJMOD}/kicad/footprints"));
    assert!(!root.join("library").exists());
}
