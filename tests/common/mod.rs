//! Shared fixtures for the integration tests
#![allow(dead_code)]

use anyhow::{Result, bail};
use clap::{Arg, ArgMatches};
use std::cell::RefCell;
use std::io::{self, Write as _};
use std::rc::Rc;
use subcommander::cli::{Command, Context, FlagSet, Info, check_empty};
use subcommander::config::SuperCommandParams;
use subcommander::dispatch::{SuperCommand, run_main};
use subcommander::error::CmdError;
use subcommander::system::MockSystem;

/// Owned argument list from string literals
pub fn strings(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| (*arg).to_owned()).collect()
}

/// A leaf command whose behaviour is picked by `--option`
///
/// - `error`: fails with "BAM!"
/// - `silent-error`: fails silently
/// - `echo`: copies stdin to stdout
/// - anything else: prints the option value
#[derive(Debug, Default)]
pub struct TestCommand {
    pub name: String,
    pub option: String,
    pub minimal: bool,
    pub aliases: Vec<String>,
}

impl TestCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = strings(aliases);
        self
    }

    pub fn minimal(mut self) -> Self {
        self.minimal = true;
        self
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }
}

impl Command for TestCommand {
    fn info(&self) -> Info {
        if self.minimal {
            return Info::new(self.name.clone(), "");
        }
        Info::new(self.name.clone(), format!("{} the juju", self.name))
            .with_args("<something>")
            .with_doc(format!("{}-doc", self.name))
            .with_aliases(self.aliases.clone())
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        if self.minimal {
            return flags;
        }
        flags.arg(
            Arg::new("option")
                .long("option")
                .default_value("")
                .help("option-doc"),
        )
    }

    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        self.option = matches
            .try_get_one::<String>("option")
            .ok()
            .flatten()
            .cloned()
            .unwrap_or_default();
        check_empty(&args)?;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        match self.option.as_str() {
            "error" => bail!("BAM!"),
            "silent-error" => Err(CmdError::Silent.into()),
            "echo" => {
                io::copy(&mut ctx.stdin(), &mut ctx.stdout())?;
                Ok(())
            }
            option => {
                writeln!(ctx.stdout(), "{option}")?;
                Ok(())
            }
        }
    }
}

/// A super-command named `jujutest` with no subcommands
pub fn jujutest() -> SuperCommand {
    SuperCommand::new(SuperCommandParams::new("jujutest", ""))
}

/// Build a super-command from params, reading any alias file from `system`
pub fn super_command(params: SuperCommandParams, system: &MockSystem) -> SuperCommand {
    SuperCommand::with_system(params, system)
}

/// Parse `args` against the command's flags and initialise it, without running
pub fn init_command(command: &mut dyn Command, args: &[&str]) -> Result<()> {
    let flags = command.set_flags(FlagSet::new(command.info().name));
    let parsed = flags.parse(command.allow_interspersed_flags(), &strings(args))?;
    command.init(&parsed.matches, parsed.args)
}

/// Run through `run_main` against a mock system rooted at `/`
pub fn run(command: &mut dyn Command, system: &MockSystem, args: &[&str]) -> i32 {
    let mut ctx = Context::with_dir(system, "/");
    run_main(command, &mut ctx, strings(args))
}
