//! Registry of subcommand names
//!
//! Maps every registered name (primary names, declared aliases and explicit
//! aliases) to the handler it runs. Names are unique; registering a name twice
//! is a configuration error reported to the caller before anything runs.

use crate::cli::command::SharedCommand;
use crate::cli::info::Info;
use crate::dispatch::deprecation::{DeprecationCheck, DeprecationState};
use crate::dispatch::fuzzy::closest_match;
use crate::dispatch::help::help_info;
use crate::error::CmdError;
use core::fmt;
use std::collections::BTreeMap;
use tracing::info;

/// What a registered name runs
#[derive(Clone)]
pub enum Handler {
    /// The super-command's built-in `help`
    Help,
    /// The built-in `help` of a nested super-command, reached through a super alias
    NestedHelp(SharedCommand),
    /// A registered command
    Command(SharedCommand),
}

impl Handler {
    /// Metadata of the handler
    #[must_use]
    #[inline]
    pub fn info(&self) -> Info {
        match self {
            Self::Help | Self::NestedHelp(_) => help_info(),
            Self::Command(command) => command.borrow().info(),
        }
    }

    /// Whether the handler is itself a super-command
    #[must_use]
    #[inline]
    pub fn is_super_command(&self) -> bool {
        match self {
            Self::Help | Self::NestedHelp(_) => false,
            Self::Command(command) => command.borrow().is_super_command(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Help => f.write_str("Help"),
            Self::NestedHelp(owner) => write!(f, "NestedHelp({:?})", owner.borrow().info().name),
            Self::Command(command) => write!(f, "Command({:?})", command.borrow().info().name),
        }
    }
}

/// One registered name
#[derive(Debug, Clone)]
pub struct CommandReference {
    name: String,
    handler: Handler,
    alias: Option<String>,
    state: DeprecationState,
}

impl CommandReference {
    /// Name the reference is registered under
    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Handler run for this name
    #[must_use]
    #[inline]
    pub const fn handler(&self) -> &Handler {
        &self.handler
    }

    /// The command path this name is an alias for, if it is an alias
    #[must_use]
    #[inline]
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Deprecation state fixed at registration
    #[must_use]
    #[inline]
    pub const fn state(&self) -> &DeprecationState {
        &self.state
    }
}

/// Registered names in lexicographic order
#[derive(Debug, Clone, Default)]
pub struct Registry {
    commands: BTreeMap<String, CommandReference>,
}

impl Registry {
    /// A registry holding only the built-in `help`
    #[must_use]
    #[inline]
    pub fn with_help() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert(
            "help".to_owned(),
            CommandReference {
                name: "help".to_owned(),
                handler: Handler::Help,
                alias: None,
                state: DeprecationState::Active,
            },
        );
        Self { commands }
    }

    /// Add the built-in `version` command
    #[must_use]
    #[inline]
    pub fn with_version(mut self, version: SharedCommand) -> Self {
        let name = version.borrow().info().name;
        self.commands.insert(
            name.clone(),
            CommandReference {
                name,
                handler: Handler::Command(version),
                alias: None,
                state: DeprecationState::Active,
            },
        );
        self
    }

    /// Register a command under its name and every alias declared in its info
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any of the names is already registered; nothing is inserted then
    #[inline]
    pub fn register(&mut self, command: SharedCommand) -> Result<(), CmdError> {
        let info = command.borrow().info();
        self.insert_command(&info, &command, &DeprecationState::Active)
    }

    /// Register a command that may be deprecated or obsolete
    ///
    /// Obsolete commands are skipped along with their declared aliases.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any of the names is already registered
    #[inline]
    pub fn register_deprecated(
        &mut self,
        command: SharedCommand,
        check: Option<&dyn DeprecationCheck>,
    ) -> Result<(), CmdError> {
        let info = command.borrow().info();
        let state = DeprecationState::evaluate(check);
        if state.is_suppressed() {
            info!("{:?} command not registered as it is obsolete", info.name);
            return Ok(());
        }
        self.insert_command(&info, &command, &state)
    }

    /// Make an existing command available under another name
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
        let state = DeprecationState::evaluate(check);
        if state.is_suppressed() {
            info!("{name:?} alias not registered as it is obsolete");
            return Ok(());
        }
        let Some(target) = self.commands.get(for_name) else {
            return Err(CmdError::configuration(format!(
                "{for_name:?} not found when registering alias"
            )));
        };
        let handler = target.handler.clone();
        self.insert(CommandReference {
            name: name.to_owned(),
            handler,
            alias: Some(for_name.to_owned()),
            state,
        })
    }

    /// Make a subcommand of a registered super-command available under another name
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `super_name` is not registered, or is not a super-command
    /// - `for_name` is not registered on that super-command
    /// - `name` is already registered
    #[inline]
    pub fn register_super_alias(
        &mut self,
        name: &str,
        super_name: &str,
        for_name: &str,
        check: Option<&dyn DeprecationCheck>,
    ) -> Result<(), CmdError> {
        let state = DeprecationState::evaluate(check);
        if state.is_suppressed() {
            info!("{name:?} alias not registered as it is obsolete");
            return Ok(());
        }
        let Some(action) = self.commands.get(super_name) else {
            return Err(CmdError::configuration(format!(
                "{super_name:?} not found when registering alias"
            )));
        };
        let not_super = || CmdError::configuration(format!("{super_name:?} is not a SuperCommand"));
        let Handler::Command(owner) = &action.handler else {
            return Err(not_super());
        };
        let handler = {
            let command = owner.borrow();
            let super_command = command.as_super_command().ok_or_else(not_super)?;
            let target = super_command.lookup(for_name).ok_or_else(|| {
                CmdError::configuration(format!(
                    "{for_name:?} not found as a command in {super_name:?}"
                ))
            })?;
            match &target.handler {
                // help answers for the super-command that owns it
                Handler::Help => Handler::NestedHelp(owner.clone()),
                handler => handler.clone(),
            }
        };
        self.insert(CommandReference {
            name: name.to_owned(),
            handler,
            alias: Some(format!("{super_name} {for_name}")),
            state,
        })
    }

    /// Find a registered name
    #[must_use]
    #[inline]
    pub fn lookup(&self, name: &str) -> Option<&CommandReference> {
        self.commands.get(name)
    }

    /// Registered names in order
    #[inline]
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Registered references in name order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &CommandReference> {
        self.commands.values()
    }

    /// Number of registered names, including `help`
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is registered
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The registered name closest to `name` by edit distance, if close enough
    #[must_use]
    #[inline]
    pub fn closest(&self, name: &str) -> Option<&CommandReference> {
        closest_match(name, self.names()).and_then(|found| self.commands.get(found))
    }

    /// One line per non-deprecated name: `name - purpose`
    ///
    /// The simple form drops the `commands:` header and the indentation.
    #[must_use]
    #[inline]
    pub fn describe(&self, simple: bool) -> String {
        let longest = self.names().map(str::len).max().unwrap_or(0);
        let lines: Vec<String> = self
            .iter()
            .filter(|reference| !reference.state.is_deprecated())
            .map(|reference| {
                let purpose = reference.alias.as_ref().map_or_else(
                    || reference.handler.info().purpose,
                    |target| format!("Alias for '{target}'."),
                );
                if simple {
                    format!("{:<longest$}  {purpose}", reference.name)
                } else {
                    format!("    {:<longest$} - {purpose}", reference.name)
                }
            })
            .collect();

        if simple {
            lines.join("\n")
        } else {
            format!("commands:\n{}", lines.join("\n"))
        }
    }

    fn insert_command(
        &mut self,
        info: &Info,
        command: &SharedCommand,
        state: &DeprecationState,
    ) -> Result<(), CmdError> {
        let names = core::iter::once(&info.name).chain(info.aliases.iter());
        for name in names.clone() {
            if self.commands.contains_key(name) {
                return Err(already_registered(name));
            }
        }
        for name in names {
            let alias = (name != &info.name).then(|| info.name.clone());
            self.insert(CommandReference {
                name: name.clone(),
                handler: Handler::Command(command.clone()),
                alias,
                state: state.clone(),
            })?;
        }
        Ok(())
    }

    fn insert(&mut self, reference: CommandReference) -> Result<(), CmdError> {
        if self.commands.contains_key(&reference.name) {
            return Err(already_registered(&reference.name));
        }
        self.commands.insert(reference.name.clone(), reference);
        Ok(())
    }
}

fn already_registered(name: &str) -> CmdError {
    CmdError::configuration(format!("command already registered: {name:?}"))
}
