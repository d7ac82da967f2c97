//! The built-in `version` command

use crate::cli::args::check_empty;
use crate::cli::command::Command;
use crate::cli::context::Context;
use crate::cli::flags::{FlagSet, flag_is_set};
use crate::cli::info::Info;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, ValueEnum, value_parser};
use std::io::Write as _;

/// Output format for `version`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum VersionFormat {
    /// The plain version string; detail as indented JSON
    #[default]
    Smart,
    /// A JSON string; detail as compact JSON
    Json,
}

/// Prints the configured version
#[derive(Debug, Clone)]
pub struct VersionCommand {
    version: String,
    detail: Option<serde_json::Value>,
    format: VersionFormat,
    all: bool,
}

impl VersionCommand {
    /// Create a version command
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(version: S, detail: Option<serde_json::Value>) -> Self {
        Self {
            version: version.into(),
            detail,
            format: VersionFormat::default(),
            all: false,
        }
    }

    fn render(&self) -> Result<String> {
        let text = match (self.all, &self.detail, self.format) {
            (true, Some(detail), VersionFormat::Smart) => serde_json::to_string_pretty(detail)?,
            (true, Some(detail), VersionFormat::Json) => serde_json::to_string(detail)?,
            (_, _, VersionFormat::Smart) => self.version.clone(),
            (_, _, VersionFormat::Json) => serde_json::to_string(&self.version)?,
        };
        Ok(text)
    }
}

impl Command for VersionCommand {
    fn info(&self) -> Info {
        Info::new("version", "Print the current version.")
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags
            .arg(
                Arg::new("format")
                    .long("format")
                    .value_parser(value_parser!(VersionFormat))
                    .default_value("smart")
                    .help("Specify output format (json|smart)"),
            )
            .arg(
                Arg::new("all")
                    .long("all")
                    .action(ArgAction::SetTrue)
                    .help("Prints all version information"),
            )
    }

    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        self.format = matches
            .try_get_one::<VersionFormat>("format")
            .ok()
            .flatten()
            .copied()
            .unwrap_or_default();
        self.all = flag_is_set(matches, "all");
        check_empty(&args)?;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let text = self.render()?;
        writeln!(ctx.stdout(), "{text}")?;
        Ok(())
    }
}
