// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Copies imported assets into the organized library.
//!
//! ```text
//! imports/datasheets/*.pdf ──resolve──> library/datasheets/<KEY>/
//! imports/parts/LIB_*/<bundle>/
//!   KiCad/ missing ──> MissingInput::AssetDir, bundle skipped
//!   every file ──classify──> library/{symbols,footprints,models}/
//! ```
//!
//! Every copy goes through [`copy_if_absent`]: the first file to claim a
//! destination name keeps it. Missing inputs are recorded in the
//! [`OrganizeReport`] and logged; a failed copy aborts the walk.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use crate::config::Config;
use crate::error::Result;
use crate::library::classify::{BundleFilter, Classifier, compile};
use crate::library::manufacturer::ManufacturerResolver;
use crate::library::{AssetKind, AssetRecord, LibraryLayout, MissingInput};
use crate::utility::fs::copy::{CopyOutcome, copy_if_absent, ensure_dir};
use crate::utility::fs::walk::{WalkOptions, child_dirs, find_files, walk};

/// What an organize pass copied, found already in place and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizeReport {
    copied: BTreeMap<AssetKind, BTreeSet<PathBuf>>,
    existing: BTreeMap<AssetKind, BTreeSet<PathBuf>>,
    datasheets_copied: BTreeSet<PathBuf>,
    datasheets_existing: BTreeSet<PathBuf>,
    bundles: usize,
    unclassified: usize,
    missing: Vec<MissingInput>,
}

impl OrganizeReport {
    fn record(&mut self, kind: AssetKind, dst: PathBuf, outcome: CopyOutcome) {
        let target = if outcome.is_new() {
            &mut self.copied
        } else {
            &mut self.existing
        };
        target.entry(kind).or_default().insert(dst);
    }

    fn record_datasheet(&mut self, dst: PathBuf, outcome: CopyOutcome) {
        if outcome.is_new() {
            self.datasheets_copied.insert(dst);
        } else {
            self.datasheets_existing.insert(dst);
        }
    }

    fn record_missing(&mut self, missing: MissingInput) {
        warn!("{missing}, skipping");
        self.missing.push(missing);
    }

    /// Destinations written (or, in a dry run, that would be written).
    pub fn copied(&self, kind: AssetKind) -> impl Iterator<Item = &Path> {
        self.copied
            .get(&kind)
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }

    /// Destinations that were already occupied and left untouched.
    pub fn existing(&self, kind: AssetKind) -> impl Iterator<Item = &Path> {
        self.existing
            .get(&kind)
            .into_iter()
            .flatten()
            .map(PathBuf::as_path)
    }

    /// Number of classified assets of `kind`, copied or already present.
    #[must_use]
    pub fn found(&self, kind: AssetKind) -> usize {
        let count = |map: &BTreeMap<AssetKind, BTreeSet<PathBuf>>| {
            map.get(&kind).map_or(0, BTreeSet::len)
        };
        count(&self.copied) + count(&self.existing)
    }

    /// Whether any symbol or footprint asset was found.
    ///
    /// Assets already present count too, so a re-run with nothing new still
    /// regenerates the tables from the library on disk.
    #[must_use]
    pub fn has_library_assets(&self) -> bool {
        self.found(AssetKind::Symbol) + self.found(AssetKind::Footprint) > 0
    }

    /// Datasheets written to a manufacturer group.
    #[must_use]
    pub fn datasheets_copied(&self) -> &BTreeSet<PathBuf> {
        &self.datasheets_copied
    }

    /// Datasheets whose destination already existed.
    #[must_use]
    pub fn datasheets_existing(&self) -> &BTreeSet<PathBuf> {
        &self.datasheets_existing
    }

    /// Part bundles that had an asset directory and were scanned.
    #[must_use]
    pub const fn bundles(&self) -> usize {
        self.bundles
    }

    /// Bundle files no rule matched.
    #[must_use]
    pub const fn unclassified(&self) -> usize {
        self.unclassified
    }

    /// Inputs that were absent; their unit of work was skipped.
    #[must_use]
    pub fn missing(&self) -> &[MissingInput] {
        &self.missing
    }

    /// Logs one summary line per category.
    pub fn log_summary(&self) {
        for kind in AssetKind::ALL {
            info!(
                kind = %kind,
                copied = self.copied(kind).count(),
                existing = self.existing(kind).count(),
                "assets organized"
            );
        }
        info!(
            copied = self.datasheets_copied.len(),
            existing = self.datasheets_existing.len(),
            "datasheets organized"
        );
        info!(
            bundles = self.bundles,
            unclassified = self.unclassified,
            missing = self.missing.len(),
            "import walk complete"
        );
    }
}

/// Walks the import tree and copies classified assets into the library.
#[derive(Debug, Clone)]
pub struct AssetOrganizer {
    layout: LibraryLayout,
    classifier: Classifier,
    filter: BundleFilter,
    resolver: ManufacturerResolver,
    datasheet_pattern: String,
    dry_run: bool,
}

impl AssetOrganizer {
    /// Builds an organizer from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is unresolved or a classification, exclusion
    /// or datasheet pattern is not a valid glob.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        compile(&config.datasheets.pattern)?;
        Ok(Self {
            layout: LibraryLayout::from_paths(&config.paths)?,
            classifier: Classifier::from_config(&config.classify)?,
            filter: BundleFilter::from_config(&config.classify)?,
            resolver: ManufacturerResolver::from_config(&config.datasheets),
            datasheet_pattern: config.datasheets.pattern.clone(),
            dry_run,
        })
    }

    #[must_use]
    pub const fn layout(&self) -> &LibraryLayout {
        &self.layout
    }

    #[must_use]
    pub const fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Creates the library root and its category directories.
    ///
    /// # Errors
    ///
    /// Returns `FsError::CreateDirFailed` if a directory cannot be created.
    pub fn ensure_output_dirs(&self) -> Result<()> {
        for dir in self.layout.output_dirs() {
            if ensure_dir(dir, self.dry_run)? {
                debug!(path = %dir.display(), "created directory");
            }
        }
        Ok(())
    }

    /// Checks the import root, recording it as missing when absent.
    pub fn import_root_present(&self, report: &mut OrganizeReport) -> bool {
        if self.layout.imports.is_dir() {
            return true;
        }
        report.record_missing(MissingInput::ImportRoot(self.layout.imports.clone()));
        false
    }

    /// Copies datasheets directly under the pool into manufacturer groups.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be listed, or a group directory or
    /// copy fails.
    pub fn organize_datasheets(&self, report: &mut OrganizeReport) -> Result<()> {
        let pool = &self.layout.datasheet_pool;
        if !pool.is_dir() {
            report.record_missing(MissingInput::DatasheetPool(pool.clone()));
            return Ok(());
        }

        for file in find_files(pool, &self.datasheet_pattern, &WalkOptions::shallow())? {
            let Some(name) = file.file_name() else {
                continue;
            };
            let key = self.resolver.resolve(&name.to_string_lossy());
            let group = self.layout.datasheets.join(&key);
            ensure_dir(&group, self.dry_run)?;

            let dst = group.join(name);
            let outcome = copy_if_absent(&file, &dst, self.dry_run)?;
            if outcome == CopyOutcome::Copied {
                info!(file = %name.to_string_lossy(), manufacturer = %key, "copied datasheet");
            }
            report.record_datasheet(dst, outcome);
        }
        Ok(())
    }

    /// Processes every part bundle in every library container.
    ///
    /// Containers and bundles are visited in name order, which fixes the
    /// winner when two bundles ship a file with the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory cannot be listed or a copy fails.
    pub fn organize_parts(&self, report: &mut OrganizeReport) -> Result<()> {
        let parts = &self.layout.parts;
        if !parts.is_dir() {
            report.record_missing(MissingInput::PartsDir(parts.clone()));
            return Ok(());
        }

        for container in &child_dirs(parts)? {
            if !dir_name(container).is_some_and(|name| self.filter.is_library_container(name)) {
                continue;
            }
            debug!(container = %container.display(), "scanning library container");

            for bundle in &child_dirs(container)? {
                if dir_name(bundle).is_some_and(|name| self.filter.is_excluded(name)) {
                    debug!(path = %bundle.display(), "excluded");
                    continue;
                }
                self.organize_bundle(bundle, report)?;
            }
        }
        Ok(())
    }

    /// Runs the import root check and both phases.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error from either phase.
    pub fn organize(&self) -> Result<OrganizeReport> {
        let mut report = OrganizeReport::default();
        if self.import_root_present(&mut report) {
            self.organize_datasheets(&mut report)?;
            self.organize_parts(&mut report)?;
        }
        Ok(report)
    }

    fn organize_bundle(&self, bundle: &Path, report: &mut OrganizeReport) -> Result<()> {
        let name = bundle.file_name().unwrap_or_default().to_string_lossy();
        let span = info_span!("bundle", name = %name);
        let _enter = span.enter();

        let asset_dir = bundle.join(self.filter.asset_dir());
        if !asset_dir.is_dir() {
            report.record_missing(MissingInput::AssetDir {
                bundle: bundle.to_path_buf(),
                path: asset_dir,
            });
            return Ok(());
        }
        report.bundles += 1;

        let (records, unclassified) = self.scan_bundle(bundle)?;
        report.unclassified += unclassified;

        for record in records {
            let dst = self.layout.category_dir(record.kind).join(&record.file_name);
            let outcome = copy_if_absent(&record.source, &dst, self.dry_run)?;
            match outcome {
                CopyOutcome::Copied => info!(kind = %record.kind, file = %record.file_name, "copied"),
                CopyOutcome::AlreadyPresent => {
                    debug!(kind = %record.kind, file = %record.file_name, "already present");
                }
                CopyOutcome::Simulated => {}
            }
            report.record(record.kind, dst, outcome);
        }
        Ok(())
    }

    /// Classifies every file in a bundle.
    ///
    /// Returns the classified records in walk order and the number of files
    /// no rule matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundle does not exist.
    pub fn scan_bundle(&self, bundle: &Path) -> Result<(Vec<AssetRecord>, usize)> {
        let files = walk(bundle, &WalkOptions::for_bundle())?;
        let mut unclassified = 0;
        let mut records = Vec::new();

        for path in files.files() {
            let kind = path
                .strip_prefix(bundle)
                .ok()
                .and_then(|relative| self.classifier.classify(relative));
            match (kind, path.file_name()) {
                (Some(kind), Some(name)) => records.push(AssetRecord {
                    source: path.clone(),
                    kind,
                    file_name: name.to_string_lossy().into_owned(),
                }),
                _ => unclassified += 1,
            }
        }
        Ok((records, unclassified))
    }
}

fn dir_name(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}
