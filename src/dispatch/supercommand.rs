//! The super-command: selects a registered subcommand and delegates to it
//!
//! A [`SuperCommand`] is itself a [`Command`], so super-commands nest. Flag
//! handling is split in two:
//! - Common flags (`--help`, `--description` and the configured global flags)
//!   are accepted before the subcommand name and again on every leaf command.
//! - `--version` and `--no-alias` only apply before the subcommand name.

use crate::cli::args::check_empty;
use crate::cli::command::{Command, SharedCommand, shared};
use crate::cli::context::Context;
use crate::cli::flags::{FlagSet, HELP_FLAG, flag_is_set};
use crate::cli::info::Info;
use crate::config::aliases::AliasTable;
use crate::config::params::{MissingCallback, NotifyHelp, NotifyRun, SuperCommandParams};
use crate::dispatch::deprecation::{DeprecationCheck, DeprecationState};
use crate::dispatch::help::{self, HelpRequest, HelpTopics, TopicCallback};
use crate::dispatch::registry::{CommandReference, Handler, Registry};
use crate::dispatch::resolve::{Resolution, Resolver};
use crate::dispatch::version::VersionCommand;
use crate::error::{CmdError, is_err_silent, rc_passthrough_code};
use crate::system::{RealSystem, System};
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};
use core::fmt;
use std::io::Write as _;
use std::rc::Rc;
use tracing::{debug, info};

const DESCRIPTION_FLAG: &str = "description";
const VERSION_FLAG: &str = "version";
const NO_ALIAS_FLAG: &str = "no-alias";

/// The subcommand picked by `init`
enum Action {
    Command(SharedCommand),
    Help(HelpRequest),
    Missing { name: String, args: Vec<String> },
}

struct Selected {
    invoked: String,
    state: DeprecationState,
    action: Action,
}

/// A command that selects and runs one of its registered subcommands
pub struct SuperCommand {
    name: String,
    purpose: String,
    doc: String,
    usage_prefix: String,
    aliases: Vec<String>,
    version: String,
    known_as: String,
    global_flags: Vec<Arg>,
    has_alias_file: bool,
    user_aliases: AliasTable,
    registry: Registry,
    topics: HelpTopics,
    missing_callback: Option<MissingCallback>,
    notify_run: Option<NotifyRun>,
    notify_help: Option<NotifyHelp>,

    selected: Option<Selected>,
    show_description: bool,
    layers: Vec<ArgMatches>,
}

impl SuperCommand {
    /// Create a super-command, reading the user alias file from disk
    #[must_use]
    #[inline]
    pub fn new(params: SuperCommandParams) -> Self {
        Self::with_system(params, &RealSystem)
    }

    /// Create a super-command, reading the user alias file through `system`
    #[must_use]
    #[inline]
    pub fn with_system(params: SuperCommandParams, system: &dyn System) -> Self {
        let user_aliases = params
            .user_aliases_filename
            .as_deref()
            .map(|path| AliasTable::load(system, path))
            .unwrap_or_default();
        let known_as = if params.flag_known_as.is_empty() {
            "flag".to_owned()
        } else {
            params.flag_known_as
        };

        let mut registry = Registry::with_help();
        if !params.version.is_empty() {
            let version = VersionCommand::new(params.version.clone(), params.version_detail);
            registry = registry.with_version(shared(version));
        }

        Self {
            name: params.name,
            purpose: params.purpose,
            doc: params.doc,
            usage_prefix: params.usage_prefix,
            aliases: params.aliases,
            version: params.version,
            known_as,
            global_flags: params.global_flags,
            has_alias_file: params.user_aliases_filename.is_some(),
            user_aliases,
            registry,
            topics: HelpTopics::with_builtins(),
            missing_callback: params.missing_callback,
            notify_run: params.notify_run,
            notify_help: params.notify_help,
            selected: None,
            show_description: false,
            layers: Vec::new(),
        }
    }

    /// Register a subcommand under its name and declared aliases
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or one of the aliases is already registered
    #[inline]
    pub fn register(&mut self, command: SharedCommand) -> Result<(), CmdError> {
        self.registry.register(command)
    }

    /// Register a subcommand that may be deprecated or obsolete
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or one of the aliases is already registered
    #[inline]
    pub fn register_deprecated(
        &mut self,
        command: SharedCommand,
        check: Option<&dyn DeprecationCheck>,
    ) -> Result<(), CmdError> {
        self.registry.register_deprecated(command, check)
    }

    /// Make a registered subcommand available under another name
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `for_name` is not registered
    /// - `name` is already registered
    #[inline]
    pub fn register_alias(
        &mut self,
        name: &str,
        for_name: &str,
        check: Option<&dyn DeprecationCheck>,
    ) -> Result<(), CmdError> {
        self.registry.register_alias(name, for_name, check)
    }

    /// Make `super_name for_name` available as `name`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `super_name` is not a registered super-command
    /// - `for_name` is not registered on it
    /// - `name` is already registered
    #[inline]
    pub fn register_super_alias(
        &mut self,
        name: &str,
        super_name: &str,
        for_name: &str,
        check: Option<&dyn DeprecationCheck>,
    ) -> Result<(), CmdError> {
        self.registry
            .register_super_alias(name, super_name, for_name, check)
    }

    /// Add a help topic shown by `help <name>` and listed by `help topics`
    ///
    /// Aliases find the topic but are not listed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name or one of the aliases is already a topic
    #[inline]
    pub fn add_help_topic(
        &mut self,
        name: &str,
        short: &str,
        long: &str,
        aliases: &[&str],
    ) -> Result<(), CmdError> {
        self.topics.add_text(name, short, long, aliases)
    }

    /// Add a help topic whose text is produced when it is shown
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The name is already a topic
    #[inline]
    pub fn add_help_topic_callback<F>(&mut self, name: &str, short: &str, callback: F) -> Result<(), CmdError>
    where
        F: Fn() -> String + 'static,
    {
        let callback: TopicCallback = Rc::new(callback);
        self.topics.add_callback(name, short, callback)
    }

    /// Find a registered subcommand
    #[must_use]
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&CommandReference> {
        self.registry.lookup(name)
    }

    /// The registered subcommand closest to `name`, if any is close enough
    #[must_use]
    #[inline]
    pub fn find_closest_subcommand(&self, name: &str) -> Option<&CommandReference> {
        self.registry.closest(name)
    }

    /// Registered subcommands
    #[must_use]
    #[inline]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Name the super-command is invoked by
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Word used for flags in messages and help
    #[must_use]
    #[inline]
    pub fn known_as(&self) -> &str {
        &self.known_as
    }

    /// The name prefixed with the usage prefix, unless the two are the same
    #[must_use]
    #[inline]
    pub fn usage_name(&self) -> String {
        if self.usage_prefix.is_empty() || self.usage_prefix == self.name {
            self.name.clone()
        } else {
            format!("{} {}", self.usage_prefix, self.name)
        }
    }

    /// Help topics
    #[must_use]
    #[inline]
    pub const fn topics(&self) -> &HelpTopics {
        &self.topics
    }

    /// Describe the super-command itself, ignoring any selected subcommand
    #[must_use]
    #[inline]
    pub fn super_info(&self) -> Info {
        let mut doc_parts = Vec::new();
        let doc = self.doc.trim();
        if !doc.is_empty() {
            doc_parts.push(doc.to_owned());
        }
        doc_parts.push(self.registry.describe(false));

        let mut info = Info::new(self.name.clone(), self.purpose.clone())
            .with_args("<command> ...")
            .with_doc(doc_parts.join("\n\n"))
            .with_aliases(self.aliases.clone());
        info.flag_known_as.clone_from(&self.known_as);
        info
    }

    /// Full help text for the super-command, shown under `usage_name`
    #[must_use]
    #[inline]
    pub fn help_text(&self, usage_name: &str) -> String {
        let mut info = self.super_info();
        info.name = usage_name.to_owned();
        info.help(&self.set_flags(FlagSet::new(usage_name)))
    }

    /// A flag set holding only the common flags
    #[must_use]
    #[inline]
    pub fn common_flag_set(&self, name: &str) -> FlagSet {
        FlagSet::new(name.to_owned())
            .with_known_as(self.known_as.clone())
            .args(self.common_args())
    }

    pub(crate) const fn has_missing_callback(&self) -> bool {
        self.missing_callback.is_some()
    }

    fn common_args(&self) -> Vec<Arg> {
        let mut args = self.global_flags.clone();
        args.push(
            Arg::new(DESCRIPTION_FLAG)
                .long(DESCRIPTION_FLAG)
                .action(ArgAction::SetTrue)
                .help("Show short description of plugin, if any"),
        );
        args
    }

    fn select(&mut self, invoked: String, state: DeprecationState, action: Action) {
        self.selected = Some(Selected {
            invoked,
            state,
            action,
        });
    }

    fn select_help(&mut self, args: &[String]) -> Result<()> {
        if let Some(notify) = &self.notify_help {
            notify(args);
        }
        let request = help::prepare(self, args)?;
        self.select("help".to_owned(), DeprecationState::Active, Action::Help(request));
        Ok(())
    }

    fn run_help(&self, ctx: &mut Context<'_>, request: &HelpRequest) -> Result<()> {
        let text = match request {
            HelpRequest::Text(text) => text.clone(),
            HelpRequest::Topic(topic) => self
                .topics
                .render(topic, self)
                .ok_or_else(|| CmdError::UnknownHelpTopic {
                    topic: topic.clone(),
                })?,
            HelpRequest::Missing { name, args } => {
                return self.run_missing(ctx, name, args).map_err(|err| {
                    if is_unrecognized(&err) {
                        CmdError::UnknownHelpTopic { topic: name.clone() }.into()
                    } else {
                        err
                    }
                });
            }
        };
        let mut stdout = ctx.stdout();
        write!(stdout, "{text}")?;
        if !text.ends_with('\n') {
            writeln!(stdout)?;
        }
        Ok(())
    }

    fn run_missing(&self, ctx: &mut Context<'_>, name: &str, args: &[String]) -> Result<()> {
        let Some(callback) = &self.missing_callback else {
            return Err(CmdError::unrecognized_command(format!("{} {name}", self.name)).into());
        };
        callback(ctx, name, args).map_err(|err| {
            if is_unrecognized(&err) {
                CmdError::unrecognized_command(format!("{} {name}", self.name)).into()
            } else {
                err
            }
        })
    }

    fn run_action(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let Some(selected) = self.selected.take() else {
            return Err(CmdError::configuration("run called before a subcommand was selected").into());
        };
        let result = match &selected.action {
            Action::Command(command) => command.borrow_mut().run(ctx),
            Action::Help(request) => self.run_help(ctx, request),
            Action::Missing { name, args } => self.run_missing(ctx, name, args),
        };
        self.selected = Some(selected);
        result
    }
}

fn is_unrecognized(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<CmdError>(),
        Some(CmdError::UnrecognizedCommand { .. })
    )
}

impl Command for SuperCommand {
    fn info(&self) -> Info {
        if let Some(Selected {
            action: Action::Command(command),
            ..
        }) = &self.selected
            && let Ok(command) = command.try_borrow()
        {
            let mut info = command.info();
            info.name = format!("{} {}", self.name, info.name);
            info.flag_known_as.clone_from(&self.known_as);
            return info;
        }
        self.super_info()
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        let mut flags = flags
            .with_known_as(self.known_as.clone())
            .args(self.common_args());
        if !self.version.is_empty() {
            flags = flags.arg(
                Arg::new(VERSION_FLAG)
                    .long(VERSION_FLAG)
                    .action(ArgAction::SetTrue)
                    .help("show the command's version and exit"),
            );
        }
        if self.has_alias_file {
            flags = flags.arg(
                Arg::new(NO_ALIAS_FLAG)
                    .long(NO_ALIAS_FLAG)
                    .action(ArgAction::SetTrue)
                    .help("do not process command aliases when running this command"),
            );
        }
        flags
    }

    fn allow_interspersed_flags(&self) -> bool {
        false
    }

    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        self.selected = None;
        self.layers = vec![matches.clone()];
        self.show_description = flag_is_set(matches, DESCRIPTION_FLAG);
        let mut show_help = flag_is_set(matches, HELP_FLAG);
        let no_alias = flag_is_set(matches, NO_ALIAS_FLAG);

        if self.show_description {
            check_empty(&args)?;
            return Ok(());
        }

        let mut args = args;
        if flag_is_set(matches, VERSION_FLAG) {
            args.insert(0, VERSION_FLAG.to_owned());
        }
        let Some((name, rest)) = args.split_first() else {
            return self.select_help(&[]);
        };

        let aliases = (!no_alias).then_some(&self.user_aliases);
        let resolution = Resolver::new(&self.registry)
            .with_aliases(aliases)
            .with_fallback(self.missing_callback.is_some())
            .resolve(name, rest);
        let (reference, args) = match resolution {
            Resolution::Found { reference, args } => (reference.clone(), args),
            Resolution::Missing { name, args } => {
                // the missing callback parses its own arguments
                self.select(name.clone(), DeprecationState::Active, Action::Missing { name, args });
                return Ok(());
            }
            Resolution::Unrecognized { name, suggestion } => {
                return Err(CmdError::UnrecognizedCommand {
                    message: format!("unrecognized command: {} {name}", self.name),
                    suggestion,
                }
                .into());
            }
        };

        let full_name = format!("{} {}", self.name, reference.name());
        let common = self.common_flag_set(&full_name);
        let (flags, allow_interspersed, private) = match reference.handler() {
            Handler::Help => (common, true, None),
            Handler::NestedHelp(owner) => {
                let private = owner
                    .borrow()
                    .set_flags(FlagSet::new(reference.name().to_owned()))
                    .parse(false, &[])?;
                (common, false, Some(private.matches))
            }
            Handler::Command(command) => {
                let command = command.borrow();
                if command.is_super_command() {
                    let private = command
                        .set_flags(FlagSet::new(reference.name().to_owned()))
                        .parse(false, &[])?;
                    (common, false, Some(private.matches))
                } else {
                    let allow = command.allow_interspersed_flags();
                    (command.set_flags(common), allow, None)
                }
            }
        };
        let parsed = flags.parse(allow_interspersed, &args)?;
        show_help |= flag_is_set(&parsed.matches, HELP_FLAG);
        self.show_description |= flag_is_set(&parsed.matches, DESCRIPTION_FLAG);
        self.layers.push(parsed.matches.clone());

        if show_help {
            return self.select_help(&[reference.name().to_owned()]);
        }

        match reference.handler() {
            Handler::Help => self.select_help(&parsed.args),
            Handler::NestedHelp(owner) => {
                let own_matches = private.as_ref().unwrap_or(&parsed.matches);
                let mut args = vec!["help".to_owned()];
                args.extend(parsed.args);
                owner.borrow_mut().init(own_matches, args)?;
                self.select(
                    reference.name().to_owned(),
                    reference.state().clone(),
                    Action::Command(owner.clone()),
                );
                Ok(())
            }
            Handler::Command(command) => {
                let own_matches = private.as_ref().unwrap_or(&parsed.matches);
                command.borrow_mut().init(own_matches, parsed.args)?;
                self.select(
                    reference.name().to_owned(),
                    reference.state().clone(),
                    Action::Command(command.clone()),
                );
                Ok(())
            }
        }
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        if self.show_description {
            let mut stdout = ctx.stdout();
            if self.purpose.is_empty() {
                writeln!(stdout, "{}: no description available", self.name)?;
            } else {
                writeln!(stdout, "{}", self.purpose)?;
            }
            return Ok(());
        }

        if let Some(notify) = &self.notify_run {
            notify(&self.usage_name());
        }
        if let Some(selected) = &self.selected
            && let Some(replacement) = selected.state.replacement()
        {
            ctx.infof(format!(
                "WARNING: {:?} is deprecated, please use {replacement:?}",
                selected.invoked
            ));
        }
        for layer in &self.layers {
            ctx.flags_mut().push(layer.clone());
        }

        match self.run_action(ctx) {
            Err(err) if !is_err_silent(&err) => {
                if let Err(write_err) = writeln!(ctx.stderr(), "ERROR {err}") {
                    debug!("failed to write to stderr: {write_err}");
                }
                debug!("error chain: {err:?}");
                Err(CmdError::Silent.into())
            }
            Err(err) => {
                if let Some(code) = rc_passthrough_code(&err) {
                    debug!("passing through exit code {code}");
                }
                Err(err)
            }
            Ok(()) => {
                info!("command finished");
                Ok(())
            }
        }
    }

    fn as_super_command(&self) -> Option<&SuperCommand> {
        Some(self)
    }
}

impl fmt::Debug for SuperCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuperCommand")
            .field("name", &self.name)
            .field("usage_prefix", &self.usage_prefix)
            .field("version", &self.version)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
