//! Mock system implementation for testing

#![expect(clippy::module_name_repetitions)]

use super::System;
use std::collections::HashMap;
use std::env::VarError;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// In-memory implementation of System trait for testing
///
/// `MockSystem` provides an in-memory filesystem and environment and
/// captures everything written to stdout and stderr, perfect for fast,
/// isolated dispatch tests without side effects.
///
/// # Example
/// ```
/// use subcommander::system::{mock::MockSystem, System};
/// use std::io::Write as _;
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("HOME", "/home/user").unwrap()
///     .with_file("/home/user/aliases", b"st = status").unwrap();
///
/// assert_eq!(system.env_var("HOME").unwrap(), "/home/user");
/// assert_eq!(
///     system.read_to_string(Path::new("/home/user/aliases")).unwrap(),
///     "st = status"
/// );
///
/// writeln!(system.stdout(), "hello").unwrap();
/// assert_eq!(system.stdout_string(), "hello\n");
/// ```
#[derive(Clone)]
pub struct MockSystem {
    state: Arc<RwLock<MockSystemState>>,
}

struct MockSystemState {
    env_vars: HashMap<String, String>,
    current_dir: Option<PathBuf>,
    files: HashMap<PathBuf, Vec<u8>>,
    stdin: Vec<u8>,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(MockSystemState {
                env_vars: HashMap::new(),
                current_dir: Some(PathBuf::from("/")),
                files: HashMap::new(),
                stdin: Vec::new(),
                stdout: Vec::new(),
                stderr: Vec::new(),
            })),
        }
    }

    /// Set an environment variable (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_env(self, key: &str, value: &str) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.env_vars.insert(key.to_owned(), value.to_owned());
        drop(state);
        Ok(self)
    }

    /// Set the current working directory (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(self, dir: P) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.current_dir = Some(dir.as_ref().to_path_buf());
        drop(state);
        Ok(self)
    }

    /// Simulate a working directory that has been deleted underneath the process
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn without_current_dir(self) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.current_dir = None;
        drop(state);
        Ok(self)
    }

    /// Add a file with contents (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_file<P: AsRef<Path>>(self, path: P, contents: &[u8]) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.files.insert(path.as_ref().to_path_buf(), contents.to_vec());
        drop(state);
        Ok(self)
    }

    /// Provide bytes that will be returned when stdin is read (builder pattern)
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The state lock is poisoned
    #[inline]
    pub fn with_stdin(self, contents: &[u8]) -> io::Result<Self> {
        let mut state = self
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.stdin = contents.to_vec();
        drop(state);
        Ok(self)
    }

    /// Everything written to stdout so far, lossily decoded
    #[must_use]
    #[inline]
    pub fn stdout_string(&self) -> String {
        self.captured(Stream::Stdout)
    }

    /// Everything written to stderr so far, lossily decoded
    #[must_use]
    #[inline]
    pub fn stderr_string(&self) -> String {
        self.captured(Stream::Stderr)
    }

    /// Discard captured stdout and stderr
    #[inline]
    pub fn reset_output(&self) {
        if let Ok(mut state) = self.state.write() {
            state.stdout.clear();
            state.stderr.clear();
        }
    }

    fn captured(&self, stream: Stream) -> String {
        self.state.read().map_or_else(
            |_| String::new(),
            |state| {
                let bytes = match stream {
                    Stream::Stdout => &state.stdout,
                    Stream::Stderr => &state.stderr,
                };
                String::from_utf8_lossy(bytes).into_owned()
            },
        )
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl System for MockSystem {
    #[inline]
    #[expect(clippy::map_err_ignore, reason = "This is for VarError")]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        let state = self.state.read().map_err(|_| VarError::NotPresent)?;
        state.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        state.current_dir.clone().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "getwd: no such file or directory",
            )
        })
    }

    #[inline]
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        let state = self
            .state
            .read()
            .map_err(|e| io::Error::other(e.to_string()))?;
        let bytes = state.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;
        let result = bytes.clone();
        drop(state);
        String::from_utf8(result)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }

    #[inline]
    fn stdin(&self) -> Box<dyn Read + '_> {
        let contents = self
            .state
            .read()
            .map(|state| state.stdin.clone())
            .unwrap_or_default();
        Box::new(Cursor::new(contents))
    }

    #[inline]
    fn stdout(&self) -> Box<dyn Write + '_> {
        Box::new(MockStream {
            stream: Stream::Stdout,
            system: self,
        })
    }

    #[inline]
    fn stderr(&self) -> Box<dyn Write + '_> {
        Box::new(MockStream {
            stream: Stream::Stderr,
            system: self,
        })
    }
}

/// Writer appending to one of the captured output buffers
struct MockStream<'sys> {
    stream: Stream,
    system: &'sys MockSystem,
}

#[expect(
    clippy::missing_trait_methods,
    reason = "Only implementing what I need"
)]
impl Write for MockStream<'_> {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut state = self
            .system
            .state
            .write()
            .map_err(|e| io::Error::other(e.to_string()))?;
        match self.stream {
            Stream::Stdout => state.stdout.extend_from_slice(buf),
            Stream::Stderr => state.stderr.extend_from_slice(buf),
        }
        drop(state);
        Ok(buf.len())
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
