// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   walk:  walk(), find_files(), WalkOptions
//!   copy:  copy_if_absent(), ensure_dir(), write_atomic()
//! ```

pub mod fs;
