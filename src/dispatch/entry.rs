//! Process entry point: parse, init and run a command, mapping the outcome to an exit code

use crate::cli::command::Command;
use crate::cli::context::Context;
use crate::cli::flags::{FlagSet, HELP_FLAG, flag_is_set};
use crate::error::CmdError;
use core::fmt::Display;
use std::io::Write as _;
use tracing::debug;

/// Run `command` with `args` and return the process exit code
///
/// - 0 on success, or when help was printed
/// - 2 when flags, arguments or the subcommand name are rejected
/// - 1 when the command fails while running
/// - the carried code for a pass-through error
#[inline]
pub fn run_main(command: &mut dyn Command, ctx: &mut Context<'_>, args: Vec<String>) -> i32 {
    let info = command.info();
    let flags = command.set_flags(FlagSet::new(info.name.clone()));
    let parsed = match flags.parse(command.allow_interspersed_flags(), &args) {
        Ok(parsed) => parsed,
        Err(err) => {
            write_error(ctx, &err);
            return err.exit_code();
        }
    };

    if !command.is_super_command() && flag_is_set(&parsed.matches, HELP_FLAG) {
        write_out(ctx, info.help(&flags));
        return 0;
    }
    ctx.flags_mut().push(parsed.matches.clone());

    if let Err(err) = command.init(&parsed.matches, parsed.args) {
        if let Some(cmd_err) = err.downcast_ref::<CmdError>() {
            if cmd_err.is_silent() {
                return 2;
            }
            write_error(ctx, &err);
            if let CmdError::UnrecognizedCommand {
                suggestion: Some(suggestion),
                ..
            } = cmd_err
            {
                write_err_line(ctx, format!("did you mean {suggestion:?}?"));
            }
            return 2;
        }
        write_error(ctx, &err);
        return 2;
    }

    match command.run(ctx) {
        Ok(()) => 0,
        Err(err) => match err.downcast_ref::<CmdError>() {
            Some(CmdError::RcPassthrough { code }) => *code,
            Some(cmd_err) if cmd_err.is_silent() => 1,
            _ => {
                write_error(ctx, &err);
                1
            }
        },
    }
}

fn write_error<E: Display>(ctx: &Context<'_>, err: &E) {
    write_err_line(ctx, format!("error: {err}"));
}

fn write_err_line(ctx: &Context<'_>, line: String) {
    if let Err(write_err) = writeln!(ctx.stderr(), "{line}") {
        debug!("failed to write to stderr: {write_err}");
    }
}

fn write_out(ctx: &Context<'_>, text: String) {
    if let Err(write_err) = write!(ctx.stdout(), "{text}") {
        debug!("failed to write to stdout: {write_err}");
    }
}
