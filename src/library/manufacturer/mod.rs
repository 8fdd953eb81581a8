// kicad-libman: KiCad Library Manager
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Manufacturer grouping key for datasheets.
//!
//! ```text
//! TI_LM317.pdf      -> "TI_" + "LM317.pdf"  -> TI
//! st_l7805_rev3.pdf -> "st" + ...          -> ST
//! resistor.pdf      -> one segment         -> Misc
//! _notes.pdf        -> empty first segment -> Misc
//! ```

use crate::config::types::DatasheetConfig;

/// Derives the manufacturer directory name for a datasheet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManufacturerResolver {
    delimiter: String,
    fallback: String,
}

impl Default for ManufacturerResolver {
    fn default() -> Self {
        Self::from_config(&DatasheetConfig::default())
    }
}

impl ManufacturerResolver {
    #[must_use]
    pub fn new(delimiter: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            fallback: fallback.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &DatasheetConfig) -> Self {
        Self::new(config.delimiter.clone(), config.fallback.clone())
    }

    /// Group key for `file_name`.
    ///
    /// The whole name (extension included) is split on the delimiter; with
    /// two or more segments the first one, uppercased, is the key. The
    /// fallback is used otherwise, and also when the first segment is empty,
    /// `.` or `..`, so the key is always one plain directory name.
    #[must_use]
    pub fn resolve(&self, file_name: &str) -> String {
        let mut segments = file_name.split(self.delimiter.as_str());
        let first = segments.next().unwrap_or_default();
        if segments.next().is_none() {
            return self.fallback.clone();
        }

        let key = first.to_uppercase();
        if matches!(key.as_str(), "" | "." | "..") {
            return self.fallback.clone();
        }
        key
    }

    #[must_use]
    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}

#[cfg(test)]
mod tests;
