//! The `Command` trait implemented by every dispatchable command

use crate::cli::context::Context;
use crate::cli::flags::FlagSet;
use crate::cli::info::Info;
use crate::dispatch::supercommand::SuperCommand;
use anyhow::Result;
use clap::ArgMatches;
use std::cell::RefCell;
use std::rc::Rc;

/// A command that can be registered on a [`SuperCommand`] or run directly
///
/// The lifecycle of one invocation is `set_flags` → flag parsing → `init`
/// → `run`.
pub trait Command {
    /// Describe the command
    fn info(&self) -> Info;

    /// Add the command's flags to `flags`
    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags
    }

    /// Whether flags may follow positional arguments
    fn allow_interspersed_flags(&self) -> bool {
        true
    }

    /// Take parsed flag values and positional arguments
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are not acceptable; the dispatcher
    /// reports it as a usage error.
    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()>;

    /// Execute the command
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()>;

    /// View this command as a super-command, if it is one
    fn as_super_command(&self) -> Option<&SuperCommand> {
        None
    }

    /// Whether this command selects and delegates to subcommands
    fn is_super_command(&self) -> bool {
        self.as_super_command().is_some()
    }
}

/// A command shared between the names it is registered under
pub type SharedCommand = Rc<RefCell<dyn Command>>;

/// Wrap a command for registration
#[must_use]
#[inline]
pub fn shared<C: Command + 'static>(command: C) -> SharedCommand {
    Rc::new(RefCell::new(command))
}
