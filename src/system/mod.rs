//! System abstraction for environment, file and terminal access
//!
//! This module provides a unified trait for all external system interactions,
//! allowing commands to be dispatched and tested without touching the real
//! terminal or filesystem.

use std::env::VarError;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations (environment, files, standard streams)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `std::fs` and `std::io`
/// - `MockSystem`: Test implementation using in-memory storage and captured output
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    // ==================== Standard Streams ====================

    /// Open the standard input stream
    fn stdin(&self) -> Box<dyn Read + '_>;

    /// Open the standard output stream
    fn stdout(&self) -> Box<dyn Write + '_>;

    /// Open the standard error stream
    fn stderr(&self) -> Box<dyn Write + '_>;
}
