//! `subcommander` - subcommand dispatch for command-line programs
//!
//! A program registers named commands on a [`SuperCommand`](dispatch::SuperCommand);
//! the library parses global and per-command flags, resolves the command
//! name (declared aliases, user aliases from an alias file, deprecations,
//! "did you mean" suggestions), renders help and runs the selected command.
//!
//! ```no_run
//! use subcommander::cli::Context;
//! use subcommander::config::SuperCommandParams;
//! use subcommander::dispatch::{SuperCommand, run_main};
//! use subcommander::system::RealSystem;
//!
//! let system = RealSystem;
//! let mut app = SuperCommand::new(SuperCommandParams::new("app", "do app things"));
//! let mut ctx = Context::new(&system).expect("working directory");
//! let code = run_main(&mut app, &mut ctx, std::env::args().skip(1).collect());
//! std::process::exit(code);
//! ```

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod system;

pub use cli::{Command, Context, FlagSet, Info, SharedCommand, shared};
pub use config::SuperCommandParams;
pub use dispatch::{SuperCommand, run_main};
pub use error::CmdError;
