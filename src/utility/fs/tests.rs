// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::copy::{CopyOutcome, copy_if_absent, ensure_dir, write_atomic};
use super::walk::{WalkOptions, child_dirs, find_files, walk};
use crate::error::{FsError, LibmanError};
use std::path::Path;
use tempfile::TempDir;

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn names(paths: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

#[test]
fn test_walk_is_sorted_and_excludes_root() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("b")).unwrap();
    std::fs::create_dir(temp.path().join("a")).unwrap();
    std::fs::write(temp.path().join("b/2.txt"), "").unwrap();
    std::fs::write(temp.path().join("a/1.txt"), "").unwrap();
    std::fs::write(temp.path().join("c.txt"), "").unwrap();

    let result = walk(temp.path(), &WalkOptions::default()).unwrap();

    assert_eq!(names(result.files(), temp.path()), ["a/1.txt", "b/2.txt", "c.txt"]);
    assert_eq!(names(result.directories(), temp.path()), ["a", "b"]);
    assert_eq!(result.error_count(), 0);
}

#[test]
fn test_walk_shallow_and_hidden() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join("dir/nested")).unwrap();
    std::fs::write(temp.path().join("dir/deep.txt"), "").unwrap();
    std::fs::write(temp.path().join(".hidden"), "").unwrap();
    std::fs::write(temp.path().join("top.txt"), "").unwrap();

    let result = walk(temp.path(), &WalkOptions::shallow()).unwrap();

    assert_eq!(names(result.files(), temp.path()), ["top.txt"]);
    assert_eq!(names(result.directories(), temp.path()), ["dir"]);
}

#[test]
fn test_walk_ignores_gitignore() {
    let temp = temp_dir();
    std::fs::write(temp.path().join(".gitignore"), "*.lib\n").unwrap();
    std::fs::write(temp.path().join("part.lib"), "").unwrap();

    let result = walk(temp.path(), &WalkOptions::default()).unwrap();

    assert_eq!(names(result.files(), temp.path()), ["part.lib"]);
}

#[test]
fn test_walk_skip_dirs() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join("__MACOSX/KiCad")).unwrap();
    std::fs::create_dir_all(temp.path().join("KiCad")).unwrap();
    std::fs::write(temp.path().join("__MACOSX/KiCad/._part.lib"), "").unwrap();
    std::fs::write(temp.path().join("KiCad/part.lib"), "").unwrap();

    let result = walk(temp.path(), &WalkOptions::for_bundle()).unwrap();

    assert_eq!(names(result.files(), temp.path()), ["KiCad/part.lib"]);
}

#[test]
fn test_child_dirs_skips_files() {
    let temp = temp_dir();
    std::fs::create_dir_all(temp.path().join("LIB_B/part")).unwrap();
    std::fs::create_dir(temp.path().join("LIB_A")).unwrap();
    std::fs::write(temp.path().join("license.txt"), "").unwrap();

    let dirs = child_dirs(temp.path()).unwrap();

    assert_eq!(names(&dirs, temp.path()), ["LIB_A", "LIB_B"]);
}

#[test]
fn test_walk_missing_root() {
    let temp = temp_dir();
    assert!(walk(temp.path().join("missing"), &WalkOptions::default()).is_err());
}

#[test]
fn test_find_files_relative_glob() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("sub")).unwrap();
    std::fs::write(temp.path().join("a.pdf"), "").unwrap();
    std::fs::write(temp.path().join("b.txt"), "").unwrap();
    std::fs::write(temp.path().join("sub/c.pdf"), "").unwrap();

    let shallow = find_files(temp.path(), "*.pdf", &WalkOptions::default()).unwrap();
    let deep = find_files(temp.path(), "**/*.pdf", &WalkOptions::default()).unwrap();

    assert_eq!(names(&shallow, temp.path()), ["a.pdf"]);
    assert_eq!(names(&deep, temp.path()), ["a.pdf", "sub/c.pdf"]);
}

#[test]
fn test_find_files_invalid_pattern() {
    let temp = temp_dir();
    assert!(find_files(temp.path(), "*.{pdf", &WalkOptions::default()).is_err());
}

#[test]
fn test_copy_if_absent_copies_once() {
    let temp = temp_dir();
    let src = temp.path().join("src.lib");
    let dst = temp.path().join("dst.lib");
    std::fs::write(&src, "first").unwrap();

    assert_eq!(copy_if_absent(&src, &dst, false).unwrap(), CopyOutcome::Copied);

    std::fs::write(&src, "changed").unwrap();
    assert_eq!(
        copy_if_absent(&src, &dst, false).unwrap(),
        CopyOutcome::AlreadyPresent
    );
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "first");
}

#[test]
fn test_copy_if_absent_first_writer_wins() {
    let temp = temp_dir();
    std::fs::create_dir(temp.path().join("a")).unwrap();
    std::fs::create_dir(temp.path().join("b")).unwrap();
    std::fs::create_dir(temp.path().join("out")).unwrap();
    let first = temp.path().join("a/part.kicad_mod");
    let second = temp.path().join("b/part.kicad_mod");
    let dst = temp.path().join("out/part.kicad_mod");
    std::fs::write(&first, "from a").unwrap();
    std::fs::write(&second, "from b").unwrap();

    let outcomes = [
        copy_if_absent(&first, &dst, false).unwrap(),
        copy_if_absent(&second, &dst, false).unwrap(),
    ];

    assert_eq!(outcomes, [CopyOutcome::Copied, CopyOutcome::AlreadyPresent]);
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "from a");
    assert_eq!(std::fs::read_dir(temp.path().join("out")).unwrap().count(), 1);
}

#[test]
fn test_copy_if_absent_preserves_mtime() {
    let temp = temp_dir();
    let src = temp.path().join("model.step");
    let dst = temp.path().join("copy.step");
    std::fs::write(&src, "solid").unwrap();
    let past = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
    std::fs::File::options()
        .write(true)
        .open(&src)
        .unwrap()
        .set_modified(past)
        .unwrap();

    copy_if_absent(&src, &dst, false).unwrap();

    let modified = std::fs::metadata(&dst).unwrap().modified().unwrap();
    assert_eq!(modified, past);
}

#[test]
fn test_copy_if_absent_dry_run_writes_nothing() {
    let temp = temp_dir();
    let src = temp.path().join("src.lib");
    let dst = temp.path().join("dst.lib");
    std::fs::write(&src, "x").unwrap();

    let outcome = copy_if_absent(&src, &dst, true).unwrap();

    assert_eq!(outcome, CopyOutcome::Simulated);
    assert!(outcome.is_new());
    assert!(!dst.exists());
}

#[test]
fn test_copy_if_absent_failure_is_copy_failed() {
    let temp = temp_dir();
    let src = temp.path().join("src.lib");
    std::fs::write(&src, "x").unwrap();
    let dst = temp.path().join("no-such-dir/dst.lib");

    let err = copy_if_absent(&src, &dst, false).unwrap_err();

    assert!(matches!(
        &err,
        LibmanError::Fs(fs) if matches!(**fs, FsError::CopyFailed { .. })
    ));
    assert!(err.is_fatal());
}

#[test]
fn test_ensure_dir() {
    let temp = temp_dir();
    let dir = temp.path().join("library/symbols");

    assert!(!ensure_dir(&dir, true).unwrap());
    assert!(!dir.exists());
    assert!(ensure_dir(&dir, false).unwrap());
    assert!(dir.is_dir());
    assert!(!ensure_dir(&dir, false).unwrap());
}

#[test]
fn test_ensure_dir_blocked_by_file() {
    let temp = temp_dir();
    let blocker = temp.path().join("library");
    std::fs::write(&blocker, "").unwrap();

    assert!(ensure_dir(&blocker.join("symbols"), false).is_err());
}

#[test]
fn test_write_atomic_replaces_contents() {
    let temp = temp_dir();
    let path = temp.path().join("sym-lib-table");
    std::fs::write(&path, "old contents that are longer").unwrap();

    write_atomic(&path, "new").unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[cfg(unix)]
#[test]
fn test_write_atomic_through_symlink_keeps_mode() {
    use std::os::unix::fs::{PermissionsExt, symlink};

    let temp = temp_dir();
    let real = temp.path().join("tables/fp-lib-table");
    std::fs::create_dir(temp.path().join("tables")).unwrap();
    std::fs::write(&real, "old").unwrap();
    std::fs::set_permissions(&real, std::fs::Permissions::from_mode(0o640)).unwrap();
    let link = temp.path().join("fp-lib-table");
    symlink(&real, &link).unwrap();

    write_atomic(&link, "new").unwrap();

    assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
    assert_eq!(std::fs::read_to_string(&real).unwrap(), "new");
    assert_eq!(
        std::fs::metadata(&real).unwrap().permissions().mode() & 0o777,
        0o640
    );
}
