//! # `subcommander`
//!
//! A small program wired with the `subcommander` library. It registers a
//! couple of commands, a deprecated alias, a version and a global flag, and
//! reads user aliases from the alias file.
//!
//! ## Usage
//!
//! ```sh
//! subcommander echo --upper hello world
//! subcommander say hello
//! subcommander count a b c
//! subcommander help topics
//! subcommander version --format json --all
//! ```
//!
//! User aliases live in `$SUBCOMMANDER_ALIASES`, or `aliases` under the
//! platform config directory (`~/.config/subcommander/aliases` on Linux):
//!
//! ```text
//! shout = echo --upper
//! ```

use anyhow::{Result, bail};
use clap::{Arg, ArgAction, ArgMatches};
use serde::Serialize;
use std::io::Write as _;
use std::path::PathBuf;
use subcommander::cli::{Command, Context, FlagSet, Info, flag_is_set, shared};
use subcommander::config::SuperCommandParams;
use subcommander::dispatch::{Deprecation, SuperCommand, run_main};
use subcommander::error::CmdError;
use subcommander::system::{RealSystem, System};
use tracing::{debug, error};
use tracing_subscriber::{EnvFilter, fmt};

const ALIASES_ENV: &str = "SUBCOMMANDER_ALIASES";

const ALIASES_TOPIC: &str = "\
User aliases are read from the file named by $SUBCOMMANDER_ALIASES, or from
subcommander/aliases under the platform config directory. Each line has the form

    name = command [flags] [args]

and running `subcommander name extra` runs `subcommander command [flags] [args] extra`.
Blank lines and lines starting with # are ignored. Use --no-alias to bypass aliases.";

#[derive(Debug, Serialize)]
struct VersionDetail {
    name: &'static str,
    version: &'static str,
    #[serde(rename = "rust-edition")]
    rust_edition: &'static str,
}

/// Print the arguments back
#[derive(Debug, Default)]
struct EchoCommand {
    upper: bool,
    words: Vec<String>,
}

impl Command for EchoCommand {
    fn info(&self) -> Info {
        Info::new("echo", "Print the arguments.")
            .with_args("<word> ...")
            .with_doc("Print the words given, separated by single spaces.")
            .with_aliases(["say"])
            .with_examples("    subcommander echo --upper hello world")
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags.arg(
            Arg::new("upper")
                .long("upper")
                .action(ArgAction::SetTrue)
                .help("Print in upper case"),
        )
    }

    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        if args.is_empty() {
            bail!("nothing to echo");
        }
        self.upper = flag_is_set(matches, "upper");
        self.words = args;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        ctx.set_verbose(ctx.flags().get_flag("verbose"));
        ctx.verbosef(format!("echoing {} words", self.words.len()));
        let line = self.words.join(" ");
        let line = if self.upper { line.to_uppercase() } else { line };
        writeln!(ctx.stdout(), "{line}")?;
        Ok(())
    }
}

/// Count the arguments, or their characters
#[derive(Debug, Default)]
struct CountCommand {
    chars: bool,
    args: Vec<String>,
}

impl Command for CountCommand {
    fn info(&self) -> Info {
        Info::new("count", "Count the arguments.")
            .with_args("[<arg> ...]")
            .with_see_also(["echo"])
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags.arg(
            Arg::new("chars")
                .long("chars")
                .action(ArgAction::SetTrue)
                .help("Count characters instead of arguments"),
        )
    }

    fn allow_interspersed_flags(&self) -> bool {
        false
    }

    fn init(&mut self, matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        self.chars = flag_is_set(matches, "chars");
        self.args = args;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let count = if self.chars {
            self.args.iter().map(|arg| arg.chars().count()).sum()
        } else {
            self.args.len()
        };
        writeln!(ctx.stdout(), "{count}")?;
        Ok(())
    }
}

fn aliases_path(system: &dyn System) -> Option<PathBuf> {
    if let Ok(path) = system.env_var(ALIASES_ENV)
        && !path.is_empty()
    {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("subcommander").join("aliases"))
}

fn build_app(system: &dyn System) -> Result<SuperCommand, CmdError> {
    let detail = VersionDetail {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        rust_edition: "2024",
    };

    let mut params = SuperCommandParams::new("subcommander", "Dispatch subcommands.");
    params.doc = "subcommander runs one of the commands below; see \"subcommander help <command>\".".to_owned();
    params.version = env!("CARGO_PKG_VERSION").to_owned();
    params.version_detail = serde_json::to_value(&detail).ok();
    params.user_aliases_filename = aliases_path(system);
    params.global_flags = vec![
        Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Show more output"),
    ];

    let mut app = SuperCommand::with_system(params, system);
    app.register(shared(EchoCommand::default()))?;
    app.register(shared(CountCommand::default()))?;
    app.register_alias("tally", "count", Some(&Deprecation::replaced_by("count")))?;
    app.add_help_topic("aliases", "How user aliases work", ALIASES_TOPIC, &["alias-file"])?;
    Ok(app)
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Global flags are only known after parsing; peek for --verbose to pick the log level
    let verbose = args
        .iter()
        .take_while(|arg| arg.as_str() != "--")
        .any(|arg| arg == "--verbose" || arg == "-v");
    let log_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new();
    let mut app = match build_app(&system) {
        Ok(app) => app,
        Err(err) => {
            error!("{err}");
            std::process::exit(err.exit_code());
        }
    };
    let mut ctx = match Context::new(&system) {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("cannot determine working directory: {err}");
            std::process::exit(1);
        }
    };

    let code = run_main(&mut app, &mut ctx, args);
    debug!("exiting with code {code}");
    std::process::exit(code);
}
