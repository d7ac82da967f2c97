//! User alias file loading and parsing
//!
//! An alias file maps a short name to a full command line:
//!
//! ```text
//! # comments and blank lines are skipped
//! st = status --format short
//! ```

use crate::system::System;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

/// Alias name → replacement argument vector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasTable {
    aliases: BTreeMap<String, Vec<String>>,
}

impl AliasTable {
    /// Parse alias file contents; malformed lines are skipped
    #[must_use]
    #[inline]
    pub fn parse(content: &str) -> Self {
        let mut aliases = BTreeMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_number = index + 1;

            let Some((name, value)) = line.split_once('=') else {
                debug!("line {line_number} bad in alias file: {line}");
                continue;
            };
            let (name, value) = (name.trim(), value.trim());
            if name.is_empty() {
                debug!("line {line_number} missing alias name in alias file: {line}");
                continue;
            }
            if value.is_empty() {
                debug!("line {line_number} missing alias value in alias file: {line}");
                continue;
            }

            trace!("setting alias {name:?}={value:?}");
            aliases.insert(
                name.to_owned(),
                value.split_whitespace().map(str::to_owned).collect(),
            );
        }

        Self { aliases }
    }

    /// Load an alias file; a missing or unreadable file yields an empty table
    #[must_use]
    #[inline]
    pub fn load(system: &dyn System, path: &Path) -> Self {
        match system.read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                trace!("unable to read alias file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Replacement tokens for an alias
    #[must_use]
    #[inline]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.aliases.get(name).map(Vec::as_slice)
    }

    /// Number of aliases defined
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// Whether no aliases are defined
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
