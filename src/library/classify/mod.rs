// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Path-convention classification.
//!
//! ```text
//! Classifier (ordered, first match wins)
//!   1. KiCad/*.{kicad_sym,lib,dcm}  -> symbol
//!   2. KiCad/*.{kicad_mod,mod}      -> footprint
//!   3. 3D/*.{stp,step,wrl}          -> model
//!   _                               -> unclassified (None)
//!
//! BundleFilter
//!   parts/LIB_*/            library containers (prefix match)
//!   parts/LIB_*/<bundle>/   part bundles, minus exclusion globs
//!   <bundle>/KiCad/         required asset directory
//! ```
//!
//! Patterns are matched against paths relative to the part bundle, so the
//! decision never depends on where the import tree lives.

use std::path::Path;

use wax::{Glob, Program as _};

use crate::config::types::{ClassifyConfig, RuleConfig};
use crate::error::ClassifyError;
use crate::library::AssetKind;

pub(crate) fn compile(pattern: &str) -> Result<Glob<'static>, ClassifyError> {
    Glob::new(pattern)
        .map(Glob::into_owned)
        .map_err(|e| ClassifyError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// A compiled classification rule.
#[derive(Debug, Clone)]
pub struct Rule {
    pattern: String,
    glob: Glob<'static>,
    kind: AssetKind,
}

impl Rule {
    /// Compiles a rule.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidPattern` if `pattern` is not a valid glob.
    pub fn new(pattern: &str, kind: AssetKind) -> Result<Self, ClassifyError> {
        Ok(Self {
            pattern: pattern.to_string(),
            glob: compile(pattern)?,
            kind,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn kind(&self) -> AssetKind {
        self.kind
    }

    #[must_use]
    pub fn matches(&self, relative: &Path) -> bool {
        self.glob.is_match(relative)
    }
}

/// Ordered rule table mapping bundle-relative paths to asset categories.
#[derive(Debug, Clone)]
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Compiles a rule table, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidPattern` for the first invalid pattern.
    pub fn new(rules: &[RuleConfig]) -> Result<Self, ClassifyError> {
        let rules = rules
            .iter()
            .map(|rule| Rule::new(&rule.pattern, rule.category))
            .collect::<Result<_, _>>()?;
        Ok(Self { rules })
    }

    /// Compiles the rules of a `[classify]` section.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidPattern` for the first invalid pattern.
    pub fn from_config(config: &ClassifyConfig) -> Result<Self, ClassifyError> {
        Self::new(&config.rules)
    }

    /// Category of the file at `relative` (relative to its part bundle), or
    /// `None` when no rule matches.
    #[must_use]
    pub fn classify(&self, relative: &Path) -> Option<AssetKind> {
        self.rules
            .iter()
            .find(|rule| rule.matches(relative))
            .map(Rule::kind)
    }

    /// Rules in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

/// Naming conventions that decide which directories are part bundles.
#[derive(Debug, Clone)]
pub struct BundleFilter {
    library_prefix: String,
    asset_dir: String,
    exclude: Vec<Glob<'static>>,
}

impl BundleFilter {
    /// Builds the filter from a `[classify]` section.
    ///
    /// # Errors
    ///
    /// Returns `ClassifyError::InvalidPattern` for an invalid exclusion glob.
    pub fn from_config(config: &ClassifyConfig) -> Result<Self, ClassifyError> {
        let exclude = config
            .exclude
            .iter()
            .map(|pattern| compile(pattern))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            library_prefix: config.library_prefix.clone(),
            asset_dir: config.asset_dir.clone(),
            exclude,
        })
    }

    /// Whether a directory directly under the parts directory is a library container.
    #[must_use]
    pub fn is_library_container(&self, name: &str) -> bool {
        name.starts_with(&self.library_prefix)
    }

    /// Whether an entry inside a library container is a known side file.
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude.iter().any(|glob| glob.is_match(name))
    }

    /// Subdirectory a bundle must contain to be processed.
    #[must_use]
    pub fn asset_dir(&self) -> &str {
        &self.asset_dir
    }
}
