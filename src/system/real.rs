//! Real system implementation using `std::env`, `std::fs` and `std::io`

use super::System;
use std::env::VarError;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library's
/// environment, filesystem and stream functions.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        return Self;
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn stdin(&self) -> Box<dyn Read + '_> {
        Box::new(io::stdin())
    }

    fn stdout(&self) -> Box<dyn Write + '_> {
        Box::new(io::stdout())
    }

    fn stderr(&self) -> Box<dyn Write + '_> {
        Box::new(io::stderr())
    }
}
