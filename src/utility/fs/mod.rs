// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Filesystem utilities: sorted traversal and non-destructive writes.
//!
//! ```text
//! walk:  walk()            ignore::Walk, name-sorted, no ignore files
//!        find_files()      wax glob on root-relative paths
//!        WalkOptions       max_depth, hidden, follow_links, skip_dirs
//! copy:  copy_if_absent()  existence check, then copy (first writer wins)
//!        ensure_dir()      create_dir_all, dry-run aware
//!        write_atomic()    tempfile + persist
//! ```

pub mod copy;
pub mod walk;

#[cfg(test)]
mod tests;
