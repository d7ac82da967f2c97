//! The built-in `help` command and help topics
//!
//! `help` is answered by the super-command that owns it: with no arguments it
//! prints the super-command's own help, with a command path it walks down
//! through nested super-commands and prints the help of the command found,
//! and otherwise it looks the argument up as a topic.

use crate::cli::flags::HELP_PURPOSE;
use crate::cli::info::Info;
use crate::dispatch::registry::{CommandReference, Handler};
use crate::dispatch::supercommand::SuperCommand;
use crate::error::CmdError;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Topic shown by `help` with no arguments, when registered
pub const BASICS_TOPIC: &str = "basics";

/// Produces the full text of a help topic on demand
pub type TopicCallback = Rc<dyn Fn() -> String>;

/// Metadata of the built-in `help` command
#[must_use]
#[inline]
pub fn help_info() -> Info {
    Info::new("help", HELP_PURPOSE)
        .with_args("[topic]")
        .with_doc("See also: topics")
}

#[derive(Clone)]
enum TopicBody {
    Text(String),
    Callback(TopicCallback),
    Commands,
    Flags,
    Topics,
}

#[derive(Clone)]
struct Topic {
    short: String,
    body: TopicBody,
    alias: bool,
}

/// Help topics known to one super-command
#[derive(Clone)]
pub struct HelpTopics {
    topics: BTreeMap<String, Topic>,
}

impl HelpTopics {
    /// The built-in topics: `commands`, `flags` (alias `global-options`) and `topics`
    pub(crate) fn with_builtins() -> Self {
        let mut topics = Self {
            topics: BTreeMap::new(),
        };
        let builtins = [
            ("commands", "Basic help for all commands", TopicBody::Commands, &[][..]),
            ("flags", "Flags common to all commands", TopicBody::Flags, &["global-options"][..]),
            ("topics", "Topic list", TopicBody::Topics, &[][..]),
        ];
        for (name, short, body, aliases) in builtins {
            topics.insert(name, short, body, aliases);
        }
        topics
    }

    /// Add a topic with fixed text
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or one of the aliases is already a topic
    pub(crate) fn add_text(
        &mut self,
        name: &str,
        short: &str,
        long: &str,
        aliases: &[&str],
    ) -> Result<(), CmdError> {
        self.check_unused(name, aliases)?;
        self.insert(name, short, TopicBody::Text(long.to_owned()), aliases);
        Ok(())
    }

    /// Add a topic whose text is produced when it is shown
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is already a topic
    pub(crate) fn add_callback(
        &mut self,
        name: &str,
        short: &str,
        callback: TopicCallback,
    ) -> Result<(), CmdError> {
        self.check_unused(name, &[])?;
        self.insert(name, short, TopicBody::Callback(callback), &[]);
        Ok(())
    }

    /// Whether `name` is a topic or a topic alias
    #[must_use]
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.topics.contains_key(name)
    }

    /// `name  short` for each topic, aliases excluded
    #[must_use]
    #[inline]
    pub fn list(&self) -> String {
        let listed: Vec<(&String, &Topic)> =
            self.topics.iter().filter(|(_, topic)| !topic.alias).collect();
        let longest = listed.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        listed
            .iter()
            .map(|(name, topic)| format!("{name:<longest$}  {}", topic.short))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub(crate) fn render(&self, name: &str, super_command: &SuperCommand) -> Option<String> {
        let topic = self.topics.get(name)?;
        let text = match &topic.body {
            TopicBody::Text(text) => text.clone(),
            TopicBody::Callback(callback) => callback(),
            TopicBody::Commands => super_command.registry().describe(true),
            TopicBody::Flags => global_flags_text(super_command),
            TopicBody::Topics => self.list(),
        };
        Some(text)
    }

    fn check_unused(&self, name: &str, aliases: &[&str]) -> Result<(), CmdError> {
        for topic in core::iter::once(&name).chain(aliases) {
            if self.topics.contains_key(*topic) {
                return Err(CmdError::configuration(format!(
                    "help topic already added: {topic:?}"
                )));
            }
        }
        Ok(())
    }

    fn insert(&mut self, name: &str, short: &str, body: TopicBody, aliases: &[&str]) {
        for alias in aliases {
            self.topics.insert(
                (*alias).to_owned(),
                Topic {
                    short: short.to_owned(),
                    body: body.clone(),
                    alias: true,
                },
            );
        }
        self.topics.insert(
            name.to_owned(),
            Topic {
                short: short.to_owned(),
                body,
                alias: false,
            },
        );
    }
}

fn global_flags_text(super_command: &SuperCommand) -> String {
    let known_as = super_command.known_as();
    let flags = super_command.common_flag_set(super_command.name());
    format!(
        "Global {known_as}s\nThese {known_as}s may be used with any command, and may appear in front of any\ncommand.\n\n{}",
        flags.describe()
    )
}

/// What `help` was asked for, worked out before anything runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum HelpRequest {
    /// Rendered help of a command or of the super-command itself
    Text(String),
    /// A topic by name
    Topic(String),
    /// Not a command or topic; handed to the missing callback with `--help`
    Missing { name: String, args: Vec<String> },
}

/// Work out what `help <args>` should print
///
/// # Errors
///
/// Returns an error if:
/// - A command path continues past a command that has no subcommands
/// - A command path names a subcommand that does not exist
/// - A non-command is followed by more arguments and there is no missing callback
pub(crate) fn prepare(
    super_command: &SuperCommand,
    args: &[String],
) -> Result<HelpRequest, CmdError> {
    let Some((first, rest)) = args.split_first() else {
        if super_command.topics().contains(BASICS_TOPIC) {
            return Ok(HelpRequest::Topic(BASICS_TOPIC.to_owned()));
        }
        let usage_name = super_command.usage_name();
        return Ok(HelpRequest::Text(super_command.help_text(&usage_name)));
    };

    if let Some(reference) = super_command.lookup(first) {
        let path = format!("{} {}", super_command.usage_name(), reference.name());
        return command_help(super_command, reference, rest, &path).map(HelpRequest::Text);
    }

    let has_callback = super_command.has_missing_callback();
    if !rest.is_empty() && !has_callback {
        return Err(CmdError::ExtraHelpArgs {
            args: rest.to_vec(),
        });
    }
    if rest.is_empty() && super_command.topics().contains(first) {
        return Ok(HelpRequest::Topic(first.clone()));
    }
    if has_callback {
        let mut plugin_args = rest.to_vec();
        plugin_args.push("--help".to_owned());
        return Ok(HelpRequest::Missing {
            name: first.clone(),
            args: plugin_args,
        });
    }
    Ok(HelpRequest::Topic(first.clone()))
}

fn command_help(
    owner: &SuperCommand,
    reference: &CommandReference,
    rest: &[String],
    path: &str,
) -> Result<String, CmdError> {
    let command = match reference.handler() {
        Handler::Help => return help_command_help(owner, rest, path),
        Handler::NestedHelp(nested) => {
            let nested = nested.borrow();
            let help_owner = nested.as_super_command().unwrap_or(owner);
            return help_command_help(help_owner, rest, path);
        }
        Handler::Command(command) => command.borrow(),
    };

    if let Some(nested) = command.as_super_command() {
        let Some((next, more)) = rest.split_first() else {
            return Ok(nested.help_text(path));
        };
        let Some(found) = nested.lookup(next) else {
            return Err(CmdError::UnknownHelpTopic {
                topic: next.clone(),
            });
        };
        return command_help(nested, found, more, &format!("{path} {next}"));
    }

    if !rest.is_empty() {
        return Err(CmdError::ExtraHelpArgs {
            args: rest.to_vec(),
        });
    }
    let mut info = command.info();
    info.name = path.to_owned();
    info.flag_known_as = owner.known_as().to_owned();
    let flags = command.set_flags(owner.common_flag_set(path));
    Ok(info.help(&flags))
}

fn help_command_help(owner: &SuperCommand, rest: &[String], path: &str) -> Result<String, CmdError> {
    if !rest.is_empty() {
        return Err(CmdError::ExtraHelpArgs {
            args: rest.to_vec(),
        });
    }
    let mut info = help_info();
    info.name = path.to_owned();
    info.flag_known_as = owner.known_as().to_owned();
    Ok(info.help(&owner.common_flag_set(path)))
}
