// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `sym-lib-table` and `fp-lib-table` generation.
//!
//! ```text
//! (sym_lib_table
//!   (lib (name "X")(type "Legacy")(uri "${KIPRJMOD}/library/symbols/X.lib")(options "")(descr ""))
//! )
//! ```
//!
//! Tables are rebuilt from the organized library on disk on every run, so
//! they always describe what is actually there. A table with no entries is
//! not written and an existing file is left as it is.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::config::types::TablesConfig;
use crate::error::Result;
use crate::library::LibraryLayout;
use crate::library::classify::compile;
use crate::utility::fs::copy::write_atomic;
use crate::utility::fs::walk::{WalkOptions, find_files};

/// Which of the two library tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Symbol,
    Footprint,
}

impl TableKind {
    /// Head token of the table's S-expression.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Symbol => "sym_lib_table",
            Self::Footprint => "fp_lib_table",
        }
    }
}

/// Quoted S-expression string with `\` and `"` escaped.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            match c {
                '\\' => f.write_str("\\\\")?,
                '"' => f.write_str("\\\"")?,
                c => write!(f, "{c}")?,
            }
        }
        f.write_str("\"")
    }
}

/// One `(lib ...)` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryTableEntry {
    pub name: String,
    pub lib_type: String,
    pub uri: String,
}

impl fmt::Display for LibraryTableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(lib (name {})(type {})(uri {})(options \"\")(descr \"\"))",
            Quoted(&self.name),
            Quoted(&self.lib_type),
            Quoted(&self.uri)
        )
    }
}

/// A complete library table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryTable {
    kind: TableKind,
    entries: Vec<LibraryTableEntry>,
}

impl LibraryTable {
    #[must_use]
    pub const fn new(kind: TableKind, entries: Vec<LibraryTableEntry>) -> Self {
        Self { kind, entries }
    }

    #[must_use]
    pub const fn kind(&self) -> TableKind {
        self.kind
    }

    #[must_use]
    pub fn entries(&self) -> &[LibraryTableEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Library names in table order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// File contents, newline-terminated.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LibraryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "({}", self.kind.token())?;
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        writeln!(f, ")")
    }
}

/// URI for `target` as seen from the project.
///
/// Paths inside `project` become `${VARIABLE}/relative/path`; anything else
/// is written as is. Separators are always `/`.
#[must_use]
pub fn library_uri(project: &Path, target: &Path, variable: &str) -> String {
    match target.strip_prefix(project) {
        Ok(relative) => {
            let mut uri = format!("${{{variable}}}");
            for component in relative.components() {
                match component {
                    Component::Normal(part) => {
                        uri.push('/');
                        uri.push_str(&part.to_string_lossy());
                    }
                    Component::ParentDir => uri.push_str("/.."),
                    _ => {}
                }
            }
            uri
        }
        Err(_) => to_slash(target),
    }
}

fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Outcome of the table stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TablesReport {
    /// Symbol library names, as listed in `sym-lib-table`.
    pub symbol_libs: Vec<String>,
    /// Footprint library names, as listed in `fp-lib-table`.
    pub footprint_libs: Vec<String>,
    /// Tables written (or, in a dry run, that would be written).
    pub written: Vec<PathBuf>,
}

/// Builds both tables from the organized library.
#[derive(Debug, Clone)]
pub struct TableGenerator {
    layout: LibraryLayout,
    tables: TablesConfig,
    dry_run: bool,
}

impl TableGenerator {
    /// # Errors
    ///
    /// Returns an error if a path is unresolved or a table pattern is not a
    /// valid glob.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        compile(&config.tables.symbol_pattern)?;
        compile(&config.tables.footprint_pattern)?;
        Ok(Self {
            layout: LibraryLayout::from_paths(&config.paths)?,
            tables: config.tables.clone(),
            dry_run,
        })
    }

    fn uri(&self, target: &Path) -> String {
        library_uri(&self.layout.project, target, &self.tables.uri_variable)
    }

    fn scan(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        find_files(dir, pattern, &WalkOptions::shallow())
    }

    /// One entry per symbol library file, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbol directory cannot be listed.
    pub fn symbol_table(&self) -> Result<LibraryTable> {
        let mut entries: Vec<_> = Self::scan(&self.layout.symbols, &self.tables.symbol_pattern)?
            .iter()
            .filter_map(|path| {
                let name = path.file_stem()?.to_string_lossy().into_owned();
                Some(LibraryTableEntry {
                    name,
                    lib_type: self.tables.symbol_type.clone(),
                    uri: self.uri(path),
                })
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(LibraryTable::new(TableKind::Symbol, entries))
    }

    /// A single entry for the footprint directory, or none when it holds no
    /// footprint files.
    ///
    /// # Errors
    ///
    /// Returns an error if the footprint directory cannot be listed.
    pub fn footprint_table(&self) -> Result<LibraryTable> {
        let footprints = &self.layout.footprints;
        let has_footprints = !Self::scan(footprints, &self.tables.footprint_pattern)?.is_empty();
        let entries = if has_footprints {
            vec![LibraryTableEntry {
                name: self.tables.footprint_name.clone(),
                lib_type: self.tables.footprint_type.clone(),
                uri: self.uri(footprints),
            }]
        } else {
            Vec::new()
        };
        Ok(LibraryTable::new(TableKind::Footprint, entries))
    }

    /// Scans both tables without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a library directory cannot be listed.
    pub fn scan_tables(&self) -> Result<TablesReport> {
        Ok(TablesReport {
            symbol_libs: self.symbol_table()?.names(),
            footprint_libs: self.footprint_table()?.names(),
            written: Vec::new(),
        })
    }

    /// Rebuilds and writes both tables.
    ///
    /// # Errors
    ///
    /// Returns `FsError::WriteFailed` if a table cannot be written.
    pub fn generate(&self) -> Result<TablesReport> {
        let symbols = self.symbol_table()?;
        let footprints = self.footprint_table()?;

        let mut written = Vec::new();
        for (table, path) in [
            (&symbols, &self.layout.sym_lib_table),
            (&footprints, &self.layout.fp_lib_table),
        ] {
            if self.write_table(table, path)? {
                written.push(path.clone());
            }
        }

        Ok(TablesReport {
            symbol_libs: symbols.names(),
            footprint_libs: footprints.names(),
            written,
        })
    }

    fn write_table(&self, table: &LibraryTable, path: &Path) -> Result<bool> {
        let token = table.kind().token();
        if table.is_empty() {
            info!(table = token, path = %path.display(), "no libraries, table left untouched");
            return Ok(false);
        }
        if self.dry_run {
            info!(
                table = token,
                path = %path.display(),
                entries = table.entries().len(),
                "[DRY-RUN] would write library table"
            );
            return Ok(true);
        }
        write_atomic(path, &table.render())?;
        info!(
            table = token,
            path = %path.display(),
            entries = table.entries().len(),
            "wrote library table"
        );
        Ok(true)
    }
}
