//! Flag sets built on top of `clap`
//!
//! A [`FlagSet`] is a named collection of flag definitions. Commands add their
//! flags to one in `set_flags`, and the dispatcher parses argument lists
//! against it, either allowing flags interspersed with positional arguments
//! or stopping at the first positional argument.

use crate::error::CmdError;
use clap::builder::BoolishValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches};
use core::any::Any;

/// Id of the built-in help flag present on every flag set
pub const HELP_FLAG: &str = "help";

/// Purpose line for help, shared by the flag and the `help` command
pub const HELP_PURPOSE: &str = "Show help on a command or other topic.";

const POSITIONAL_ID: &str = "__positional_args";

/// A named set of flag definitions
#[derive(Debug, Clone)]
pub struct FlagSet {
    command: clap::Command,
    known_as: String,
}

/// Result of parsing an argument list against a [`FlagSet`]
#[derive(Debug, Clone, Default)]
#[non_exhaustive]
pub struct ParsedFlags {
    /// Values for every defined flag
    pub matches: ArgMatches,
    /// Positional arguments left after flag parsing
    pub args: Vec<String>,
}

impl FlagSet {
    /// Create an empty flag set with only `-h/--help` defined
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(name: S) -> Self {
        let command = clap::Command::new(name.into())
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .disable_help_subcommand(true)
            .args_override_self(true)
            .arg(gnu_style(
                Arg::new(HELP_FLAG)
                    .short('h')
                    .long("help")
                    .action(ArgAction::SetTrue)
                    .help(HELP_PURPOSE),
            ));
        Self {
            command,
            known_as: "flag".to_owned(),
        }
    }

    /// Change the word used for flags in error and help messages (e.g. "option")
    #[must_use]
    #[inline]
    pub fn with_known_as<S: Into<String>>(mut self, known_as: S) -> Self {
        let known_as = known_as.into();
        if !known_as.is_empty() {
            self.known_as = known_as;
        }
        self
    }

    /// Word used for flags in error and help messages
    #[must_use]
    #[inline]
    pub fn known_as(&self) -> &str {
        &self.known_as
    }

    /// Name of the command this flag set belongs to
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        self.command.get_name()
    }

    /// Add a flag definition
    #[must_use]
    #[inline]
    pub fn arg<A: Into<Arg>>(mut self, arg: A) -> Self {
        self.command = self.command.arg(gnu_style(arg.into()));
        self
    }

    /// Add several flag definitions
    #[must_use]
    #[inline]
    pub fn args<I: IntoIterator<Item = Arg>>(mut self, args: I) -> Self {
        self.command = self.command.args(args.into_iter().map(gnu_style));
        self
    }

    /// Whether a flag with the given id is defined
    #[must_use]
    #[inline]
    pub fn has_flag(&self, id: &str) -> bool {
        self.command.get_arguments().any(|arg| arg.get_id() == id)
    }

    /// Visible flag definitions
    #[inline]
    pub fn flags(&self) -> impl Iterator<Item = &Arg> {
        self.command
            .get_arguments()
            .filter(|arg| !arg.is_positional() && !arg.is_hide_set())
    }

    /// Parse an argument list
    ///
    /// With `allow_interspersed` false, parsing stops at the first positional
    /// argument and everything from there on is returned untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An undefined flag is given
    /// - A flag value is missing or invalid
    #[inline]
    pub fn parse(&self, allow_interspersed: bool, args: &[String]) -> Result<ParsedFlags, CmdError> {
        let positional = Arg::new(POSITIONAL_ID)
            .num_args(1..)
            .action(ArgAction::Append)
            .trailing_var_arg(!allow_interspersed)
            .hide(true);
        let matches = self
            .command
            .clone()
            .arg(positional)
            .try_get_matches_from(args)
            .map_err(|err| self.flag_error(&err))?;
        let args = matches
            .get_many::<String>(POSITIONAL_ID)
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        Ok(ParsedFlags { matches, args })
    }

    /// Render flag documentation in the `--name (= "default")` style
    #[must_use]
    #[inline]
    pub fn describe(&self) -> String {
        let mut flags: Vec<&Arg> = self.flags().collect();
        flags.sort_by_key(|arg| sort_key(arg));

        let mut output = String::new();
        for arg in flags {
            output.push_str(&flag_names(arg).join(", "));
            if !is_switch(arg) && arg.get_action().takes_values() {
                let default = arg
                    .get_default_values()
                    .first()
                    .map(|value| value.to_string_lossy().into_owned())
                    .unwrap_or_default();
                output.push_str(&format!(" (= {default:?})"));
            }
            output.push('\n');
            if let Some(help) = arg.get_help() {
                output.push_str(&format!("    {help}\n"));
            }
        }
        output
    }

    fn flag_error(&self, err: &clap::Error) -> CmdError {
        let invalid = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(arg)) => Some(arg.clone()),
            _ => None,
        };
        if err.kind() == ErrorKind::UnknownArgument
            && let Some(flag) = invalid
        {
            return CmdError::flag(format!("{} provided but not defined: {flag}", self.known_as));
        }
        let rendered = err.render().to_string();
        let first_line = rendered.lines().next().unwrap_or_default();
        CmdError::flag(first_line.trim_start_matches("error: ").to_owned())
    }
}

/// Give a flag definition the GNU-style parsing rules
///
/// Boolean switches also accept an explicit value (`--loud=false`), and
/// value-taking flags take the next argument even when it starts with `-`.
fn gnu_style(arg: Arg) -> Arg {
    if arg.is_positional() {
        return arg;
    }
    let action = arg.get_action().clone();
    match action {
        ArgAction::SetTrue => arg
            .action(ArgAction::Set)
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
            .default_value("false")
            .value_parser(BoolishValueParser::new()),
        action if action.takes_values() => arg.allow_hyphen_values(true),
        _ => arg,
    }
}

/// Boolean switches are the only flags whose value is optional
fn is_switch(arg: &Arg) -> bool {
    arg.get_num_args()
        .is_some_and(|range| range.min_values() == 0)
}

fn flag_names(arg: &Arg) -> Vec<String> {
    let mut names = Vec::new();
    if let Some(short) = arg.get_short() {
        names.push(format!("-{short}"));
    }
    if let Some(long) = arg.get_long() {
        names.push(format!("--{long}"));
    }
    if names.is_empty() {
        names.push(format!("--{}", arg.get_id()));
    }
    names
}

fn sort_key(arg: &Arg) -> String {
    arg.get_long()
        .map(str::to_owned)
        .or_else(|| arg.get_short().map(String::from))
        .unwrap_or_else(|| arg.get_id().to_string())
}

/// Read a boolean flag, treating undefined ids as unset
#[must_use]
#[inline]
pub fn flag_is_set(matches: &ArgMatches, id: &str) -> bool {
    matches
        .try_get_one::<bool>(id)
        .ok()
        .flatten()
        .copied()
        .unwrap_or(false)
}

/// Flag values from successive parses, consulted newest first
///
/// A super-command parses its global flags before the subcommand name and
/// again after it; both parses end up here so handlers see a value no matter
/// which side of the subcommand name it was given on.
#[derive(Debug, Clone, Default)]
pub struct FlagValues {
    layers: Vec<ArgMatches>,
}

impl FlagValues {
    /// Add the result of a later parse
    #[inline]
    pub fn push(&mut self, matches: ArgMatches) {
        self.layers.push(matches);
    }

    /// Get a typed value, preferring one given explicitly on the command line
    #[must_use]
    #[inline]
    pub fn get_one<T: Any + Clone + Send + Sync + 'static>(&self, id: &str) -> Option<&T> {
        let explicit = self.layers.iter().rev().find_map(|matches| {
            let given = matches.ids().any(|known| known.as_str() == id)
                && matches!(
                    matches.value_source(id),
                    Some(ValueSource::CommandLine | ValueSource::EnvVariable)
                );
            if given {
                matches.try_get_one::<T>(id).ok().flatten()
            } else {
                None
            }
        });
        explicit.or_else(|| {
            self.layers
                .iter()
                .rev()
                .find_map(|matches| matches.try_get_one::<T>(id).ok().flatten())
        })
    }

    /// Get a boolean flag; undefined flags read as false
    #[must_use]
    #[inline]
    pub fn get_flag(&self, id: &str) -> bool {
        self.get_one::<bool>(id).copied().unwrap_or(false)
    }
}
