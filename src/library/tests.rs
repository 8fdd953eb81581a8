// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{AssetKind, LibraryLayout, MissingInput};
use crate::config::Config;
use std::path::{Path, PathBuf};

#[test]
fn test_layout_defaults() {
    let config = Config::for_project("/proj").unwrap();
    let layout = LibraryLayout::from_paths(&config.paths).unwrap();

    assert_eq!(layout.project, Path::new("/proj"));
    assert_eq!(layout.datasheet_pool, Path::new("/proj/imports/datasheets"));
    assert_eq!(layout.parts, Path::new("/proj/imports/parts"));
    assert_eq!(layout.symbols, Path::new("/proj/library/symbols"));
    assert_eq!(layout.datasheets, Path::new("/proj/library/datasheets"));
    assert_eq!(layout.sym_lib_table, Path::new("/proj/sym-lib-table"));
    assert_eq!(layout.project_file, None);
}

#[test]
fn test_layout_category_dirs() {
    let config = Config::for_project("/proj").unwrap();
    let layout = LibraryLayout::from_paths(&config.paths).unwrap();

    assert_eq!(
        layout.category_dir(AssetKind::Footprint),
        Path::new("/proj/library/footprints")
    );
    assert_eq!(
        layout.category_dir(AssetKind::Model),
        Path::new("/proj/library/models")
    );
    assert_eq!(layout.output_dirs()[0], Path::new("/proj/library"));
}

#[test]
fn test_layout_unresolved_paths() {
    let config = Config::default();
    assert!(LibraryLayout::from_paths(&config.paths).is_err());
}

#[test]
fn test_asset_kind_names() {
    let names: Vec<_> = AssetKind::ALL.iter().map(ToString::to_string).collect();
    insta::assert_snapshot!(names.join(","), @"symbol,footprint,model");
}

#[test]
fn test_missing_input_display() {
    let missing = MissingInput::AssetDir {
        bundle: PathBuf::from("LIB_a/a"),
        path: PathBuf::from("LIB_a/a/KiCad"),
    };
    insta::assert_snapshot!(missing.to_string(), @"no asset directory LIB_a/a/KiCad in part LIB_a/a");
    assert_eq!(missing.path(), Path::new("LIB_a/a/KiCad"));
}
