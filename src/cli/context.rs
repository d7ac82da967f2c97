//! Invocation context passed to every running command

use crate::cli::flags::FlagValues;
use crate::system::System;
use core::fmt::Display;
use std::collections::HashMap;
use std::io::{self, Read, Write as _};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a command may touch while it runs
///
/// The context is created once per invocation and handed down explicitly;
/// commands never reach for process-wide state.
pub struct Context<'sys> {
    system: &'sys dyn System,
    dir: PathBuf,
    env: HashMap<String, String>,
    quiet: bool,
    verbose: bool,
    flags: FlagValues,
}

impl<'sys> Context<'sys> {
    /// Create a context rooted at the system's current directory
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The current working directory cannot be determined
    #[inline]
    pub fn new(system: &'sys dyn System) -> io::Result<Self> {
        let dir = system.current_dir()?;
        Ok(Self::with_dir(system, dir))
    }

    /// Create a context rooted at an explicit directory
    #[must_use]
    #[inline]
    pub fn with_dir<P: Into<PathBuf>>(system: &'sys dyn System, dir: P) -> Self {
        Self {
            system,
            dir: dir.into(),
            env: HashMap::new(),
            quiet: false,
            verbose: false,
            flags: FlagValues::default(),
        }
    }

    /// Directory relative paths are resolved against
    #[must_use]
    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve a path against the context directory
    #[must_use]
    #[inline]
    pub fn abs_path<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.dir.join(path)
    }

    /// Look up an environment variable, honouring overrides set on the context
    #[must_use]
    #[inline]
    pub fn getenv(&self, key: &str) -> String {
        if let Some(value) = self.env.get(key) {
            return value.clone();
        }
        self.system.env_var(key).unwrap_or_default()
    }

    /// Override an environment variable for this invocation only
    #[inline]
    pub fn setenv<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.env.insert(key.into(), value.into());
    }

    /// Standard input
    #[inline]
    pub fn stdin(&self) -> Box<dyn Read + '_> {
        self.system.stdin()
    }

    /// Standard output
    #[inline]
    pub fn stdout(&self) -> Box<dyn std::io::Write + '_> {
        self.system.stdout()
    }

    /// Standard error
    #[inline]
    pub fn stderr(&self) -> Box<dyn std::io::Write + '_> {
        self.system.stderr()
    }

    /// Suppress informational output
    #[inline]
    pub const fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    /// Enable verbose output
    #[inline]
    pub const fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Whether informational output is suppressed
    #[must_use]
    #[inline]
    pub const fn is_quiet(&self) -> bool {
        self.quiet
    }

    /// Write an informational line to stderr unless quiet
    #[inline]
    pub fn infof<M: Display>(&self, message: M) {
        if !self.quiet {
            self.write_line(message);
        }
    }

    /// Write a line to stderr only when verbose
    #[inline]
    pub fn verbosef<M: Display>(&self, message: M) {
        if self.verbose {
            self.write_line(message);
        }
    }

    /// Global flag values parsed on the way to the running command
    #[must_use]
    #[inline]
    pub const fn flags(&self) -> &FlagValues {
        &self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut FlagValues {
        &mut self.flags
    }

    fn write_line<M: Display>(&self, message: M) {
        if let Err(err) = writeln!(self.stderr(), "{message}") {
            debug!("failed to write to stderr: {err}");
        }
    }
}
