//! Construction parameters for a super-command

use crate::cli::context::Context;
use anyhow::Result;
use clap::Arg;
use core::fmt;
use std::path::PathBuf;

/// Called when the requested subcommand is not registered
///
/// Receives the context, the raw subcommand name and the remaining arguments.
pub type MissingCallback = Box<dyn Fn(&mut Context<'_>, &str, &[String]) -> Result<()>>;

/// Called just before a subcommand runs, with the (prefixed) super-command name
pub type NotifyRun = Box<dyn Fn(&str)>;

/// Called just before help is printed, with the arguments given to `help`
pub type NotifyHelp = Box<dyn Fn(&[String])>;

/// Parameters for [`SuperCommand::new`](crate::dispatch::SuperCommand::new)
#[derive(Default)]
#[non_exhaustive]
pub struct SuperCommandParams {
    /// Name used to invoke the super-command
    pub name: String,
    /// One-line purpose, also printed by `--description`
    pub purpose: String,
    /// Long form description shown above the command list
    pub doc: String,
    /// Path of parent commands, set when this super-command is nested
    pub usage_prefix: String,
    /// Alternative names when registered in a parent
    pub aliases: Vec<String>,
    /// Version string; enables the `version` command and `--version`
    pub version: String,
    /// Extra detail printed by `version --all`
    pub version_detail: Option<serde_json::Value>,
    /// Location of a `name = command args...` alias file; enables `--no-alias`
    pub user_aliases_filename: Option<PathBuf>,
    /// Word used for flags in messages, e.g. "option"; defaults to "flag"
    pub flag_known_as: String,
    /// Flags available before the subcommand name and on every leaf subcommand
    pub global_flags: Vec<Arg>,
    /// Fallback for unregistered subcommands
    pub missing_callback: Option<MissingCallback>,
    /// Notified before a subcommand runs
    pub notify_run: Option<NotifyRun>,
    /// Notified before help is printed
    pub notify_help: Option<NotifyHelp>,
}

impl SuperCommandParams {
    /// Parameters with a name and purpose, everything else defaulted
    #[must_use]
    #[inline]
    pub fn new<N: Into<String>, P: Into<String>>(name: N, purpose: P) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for SuperCommandParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperCommandParams")
            .field("name", &self.name)
            .field("purpose", &self.purpose)
            .field("usage_prefix", &self.usage_prefix)
            .field("aliases", &self.aliases)
            .field("version", &self.version)
            .field("user_aliases_filename", &self.user_aliases_filename)
            .field("flag_known_as", &self.flag_known_as)
            .field("missing_callback", &self.missing_callback.is_some())
            .finish_non_exhaustive()
    }
}
