//! End-to-end runs through `run_main`: exit codes, error output, deprecation
//! warnings, callbacks and global flags

mod common;

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {

use super::common::{TestCommand, jujutest, run, strings};
use anyhow::{Result, anyhow};
use clap::{Arg, ArgMatches};
use std::cell::RefCell;
use std::io::Write as _;
use std::rc::Rc;
use subcommander::cli::{Command, Context, FlagSet, Info, shared};
use subcommander::config::{MissingCallback, NotifyRun, SuperCommandParams};
use subcommander::dispatch::{Deprecation, SuperCommand};
use subcommander::error::CmdError;
use subcommander::system::MockSystem;

fn blah_super(params: SuperCommandParams) -> SuperCommand {
    let mut jc = SuperCommand::new(params);
    jc.register(shared(TestCommand::new("blah"))).unwrap();
    jc
}

/// Records the `--version` string flag of a leaf, which is unrelated to the top-level `--version`
#[derive(Debug, Default)]
struct VersionFlagCommand {
    version: Rc<RefCell<String>>,
}

impl Command for VersionFlagCommand {
    fn info(&self) -> Info {
        Info::new("test", "")
    }

    fn set_flags(&self, flags: FlagSet) -> FlagSet {
        flags.arg(Arg::new("version").long("version").default_value(""))
    }

    fn init(&mut self, matches: &ArgMatches, _args: Vec<String>) -> Result<()> {
        if let Some(version) = matches.get_one::<String>("version") {
            self.version.replace(version.clone());
        }
        Ok(())
    }

    fn run(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Ok(())
    }
}

/// Prints the value of the global `--model` flag
#[derive(Debug, Default)]
struct ModelCommand;

impl Command for ModelCommand {
    fn info(&self) -> Info {
        Info::new("model", "show the model")
    }

    fn init(&mut self, _matches: &ArgMatches, args: Vec<String>) -> Result<()> {
        subcommander::cli::check_empty(&args)?;
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context<'_>) -> Result<()> {
        let model = ctx.flags().get_one::<String>("model").cloned().unwrap_or_default();
        writeln!(ctx.stdout(), "model={model}")?;
        Ok(())
    }
}

/// Fails with a pass-through exit code
#[derive(Debug, Default)]
struct ExitCommand;

impl Command for ExitCommand {
    fn info(&self) -> Info {
        Info::new("exit", "exit with a code")
    }

    fn init(&mut self, _matches: &ArgMatches, _args: Vec<String>) -> Result<()> {
        Ok(())
    }

    fn run(&mut self, _ctx: &mut Context<'_>) -> Result<()> {
        Err(CmdError::rc_passthrough(42).into())
    }
}

#[test]
fn test_runtime_error_is_reported_once() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    let code = run(&mut jc, &system, &["blah", "--option", "error"]);
    assert_eq!(code, 1);
    assert_eq!(system.stderr_string(), "ERROR BAM!\n");
    assert_eq!(system.stdout_string(), "");
}

#[test]
fn test_silent_error_prints_nothing() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    let code = run(&mut jc, &system, &["blah", "--option", "silent-error"]);
    assert_eq!(code, 1);
    assert_eq!(system.stderr_string(), "");
}

#[test]
fn test_success_writes_stdout() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    assert_eq!(run(&mut jc, &system, &["blah", "--option", "hello"]), 0);
    assert_eq!(system.stdout_string(), "hello\n");
    assert_eq!(system.stderr_string(), "");
}

#[test]
fn test_stdin_is_wired_through() {
    let system = MockSystem::new().with_stdin(b"piped input").unwrap();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    assert_eq!(run(&mut jc, &system, &["blah", "--option", "echo"]), 0);
    assert_eq!(system.stdout_string(), "piped input");
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    assert_eq!(run(&mut jc, &system, &["blah", "--unknown"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: flag provided but not defined: --unknown\n"
    );
}

#[test]
fn test_flags_before_command_name_must_be_global() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    assert_eq!(run(&mut jc, &system, &["--option", "x", "blah"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: flag provided but not defined: --option\n"
    );
}

#[test]
fn test_flag_known_as() {
    let system = MockSystem::new();
    let mut params = SuperCommandParams::new("jujutest", "");
    params.flag_known_as = "option".to_owned();
    let mut jc = blah_super(params);
    assert_eq!(run(&mut jc, &system, &["blah", "--unknown"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: option provided but not defined: --unknown\n"
    );
}

#[test]
fn test_unrecognized_command_suggests_closest() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));
    assert_eq!(run(&mut jc, &system, &["hlp"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: unrecognized command: jujutest hlp\ndid you mean \"help\"?\n"
    );

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["barsomethingfoo"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: unrecognized command: jujutest barsomethingfoo\n"
    );
}

#[test]
fn test_version_flag_matches_version_command() {
    let system = MockSystem::new();
    let mut params = SuperCommandParams::new("jujutest", "");
    params.version = "111.222.333".to_owned();
    let mut jc = SuperCommand::new(params);
    let test = VersionFlagCommand::default();
    let recorded = Rc::clone(&test.version);
    jc.register(shared(test)).unwrap();

    assert_eq!(run(&mut jc, &system, &["version"]), 0);
    let baseline_stdout = system.stdout_string();
    let baseline_stderr = system.stderr_string();
    assert_eq!(baseline_stdout, "111.222.333\n");
    system.reset_output();

    assert_eq!(run(&mut jc, &system, &["--version"]), 0);
    assert_eq!(system.stdout_string(), baseline_stdout);
    assert_eq!(system.stderr_string(), baseline_stderr);
    system.reset_output();

    assert_eq!(run(&mut jc, &system, &["test", "--version=abc.123"]), 0);
    assert_eq!(system.stdout_string(), "");
    assert_eq!(system.stderr_string(), "");
    assert_eq!(*recorded.borrow(), "abc.123");
}

#[test]
fn test_version_not_provided() {
    let system = MockSystem::new();
    let mut params = SuperCommandParams::new("jujutest", "to be purposeful");
    params.doc = "doc\nblah\ndoc".to_owned();
    let mut jc = SuperCommand::new(params);

    let baseline = run(&mut jc, &system, &["version"]);
    assert_ne!(baseline, 0);
    assert_eq!(
        system.stderr_string(),
        "error: unrecognized command: jujutest version\n"
    );
    system.reset_output();

    assert_eq!(run(&mut jc, &system, &["--version"]), baseline);
    assert_eq!(
        system.stderr_string(),
        "error: flag provided but not defined: --version\n"
    );
}

#[test]
fn test_version_formats() {
    let system = MockSystem::new();
    let mut params = SuperCommandParams::new("jujutest", "");
    params.version = "1.2.3".to_owned();
    params.version_detail = Some(serde_json::json!({"version": "1.2.3", "git-commit": "abc"}));
    let mut jc = SuperCommand::new(params);

    assert_eq!(run(&mut jc, &system, &["version", "--format", "json"]), 0);
    assert_eq!(system.stdout_string(), "\"1.2.3\"\n");
    system.reset_output();

    assert_eq!(run(&mut jc, &system, &["version", "--format", "json", "--all"]), 0);
    assert_eq!(
        system.stdout_string(),
        "{\"git-commit\":\"abc\",\"version\":\"1.2.3\"}\n"
    );
    system.reset_output();

    assert_eq!(run(&mut jc, &system, &["version", "extra"]), 2);
    assert_eq!(system.stderr_string(), "error: unrecognized args: [\"extra\"]\n");
}

#[test]
fn test_notify_run() {
    let cases = [
        ("juju", "juju", "juju"),
        ("something", "else", "something else"),
        ("", "juju", "juju"),
        ("", "myapp", "myapp"),
    ];
    for (usage_prefix, name, expected) in cases {
        let notified = Rc::new(RefCell::new(String::new()));
        let sink = Rc::clone(&notified);
        let mut params = SuperCommandParams::new(name, "");
        params.usage_prefix = usage_prefix.to_owned();
        let notify: NotifyRun = Box::new(move |name| {
            sink.replace(name.to_owned());
        });
        params.notify_run = Some(notify);
        let mut jc = blah_super(params);

        let system = MockSystem::new();
        assert_eq!(run(&mut jc, &system, &["blah", "--option", "error"]), 1);
        assert_eq!(*notified.borrow(), expected);
    }
}

#[test]
fn test_description_after_command_name() {
    let system = MockSystem::new();
    let mut jc = blah_super(SuperCommandParams::new("jujutest", "blow up the death star"));
    assert_eq!(run(&mut jc, &system, &["blah", "--description"]), 0);
    assert_eq!(system.stdout_string(), "blow up the death star\n");
}

#[test]
fn test_description_without_purpose() {
    let system = MockSystem::new();
    let mut jc = jujutest();
    assert_eq!(run(&mut jc, &system, &["--description"]), 0);
    assert_eq!(system.stdout_string(), "jujutest: no description available\n");
}

#[test]
fn test_missing_callback_receives_raw_args() {
    let called = Rc::new(RefCell::new(None::<(String, Vec<String>)>));
    let sink = Rc::clone(&called);
    let mut params = SuperCommandParams::new("jujutest", "");
    let callback: MissingCallback = Box::new(move |_ctx, name, args| {
        sink.replace(Some((name.to_owned(), args.to_vec())));
        Ok(())
    });
    params.missing_callback = Some(callback);
    let mut jc = SuperCommand::new(params);

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["foo", "bar", "baz", "--debug"]), 0);
    let (name, args) = called.borrow().clone().unwrap();
    assert_eq!(name, "foo");
    assert_eq!(args, strings(&["bar", "baz", "--debug"]));
}

#[test]
fn test_missing_callback_errors() {
    let mut params = SuperCommandParams::new("jujutest", "");
    let callback: MissingCallback =
        Box::new(|_ctx, name, _args| Err(anyhow!("command not found {name:?}")));
    params.missing_callback = Some(callback);
    let mut jc = SuperCommand::new(params);

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["foo"]), 1);
    assert_eq!(system.stdout_string(), "");
    assert_eq!(system.stderr_string(), "ERROR command not found \"foo\"\n");
}

#[test]
fn test_missing_callback_unrecognized_uses_default_message() {
    let mut params = SuperCommandParams::new("jujutest", "");
    let callback: MissingCallback =
        Box::new(|_ctx, _name, _args| Err(CmdError::unrecognized_command("something else").into()));
    params.missing_callback = Some(callback);
    let mut jc = SuperCommand::new(params);

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["foo"]), 1);
    assert_eq!(
        system.stderr_string(),
        "ERROR unrecognized command: jujutest foo\n"
    );
}

#[test]
fn test_missing_callback_context_wired_in() {
    let mut params = SuperCommandParams::new("jujutest", "");
    let callback: MissingCallback = Box::new(|ctx, _name, _args| {
        write!(ctx.stdout(), "this is std out")?;
        write!(ctx.stderr(), "this is std err")?;
        Ok(())
    });
    params.missing_callback = Some(callback);
    let mut jc = SuperCommand::new(params);

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["foo", "bar", "baz", "--debug"]), 0);
    assert_eq!(system.stdout_string(), "this is std out");
    assert_eq!(system.stderr_string(), "this is std err");
}

#[test]
fn test_deprecated_alias_warns_once() {
    let mut jc = jujutest();
    jc.register(shared(TestCommand::new("test"))).unwrap();
    jc.register_alias("test-dep", "test", Some(&Deprecation::replaced_by("test")))
        .unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["test-dep", "--option", "done"]), 0);
    assert_eq!(
        system.stderr_string(),
        "WARNING: \"test-dep\" is deprecated, please use \"test\"\n"
    );
    assert_eq!(system.stdout_string(), "done\n");

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["test", "--option", "done"]), 0);
    assert_eq!(system.stderr_string(), "");
}

#[test]
fn test_obsolete_alias_is_unrecognized() {
    let mut jc = jujutest();
    jc.register(shared(TestCommand::new("test"))).unwrap();
    jc.register_alias("test-obs", "test", Some(&Deprecation::obsolete()))
        .unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["test-obs"]), 2);
    assert!(
        system
            .stderr_string()
            .starts_with("error: unrecognized command: jujutest test-obs\n")
    );
}

#[test]
fn test_super_alias_runs_nested_command() {
    let mut bar = SuperCommand::new(SuperCommandParams::new("bar", ""));
    bar.register(shared(TestCommand::new("foo"))).unwrap();
    let mut jc = jujutest();
    jc.register(shared(bar)).unwrap();
    jc.register_super_alias("bar-foo", "bar", "foo", None).unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["bar-foo", "--option", "aliased"]), 0);
    assert_eq!(system.stdout_string(), "aliased\n");

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["bar", "foo", "--option", "nested"]), 0);
    assert_eq!(system.stdout_string(), "nested\n");
}

#[test]
fn test_flag_values_starting_with_dash() {
    let mut jc = blah_super(SuperCommandParams::new("jujutest", ""));

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["blah", "--option", "-x"]), 0);
    assert_eq!(system.stdout_string(), "-x\n");

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["--description=false", "blah", "--option", "ok"]), 0);
    assert_eq!(system.stdout_string(), "ok\n");
}

#[test]
fn test_super_alias_to_nested_help() {
    let mut bar = SuperCommand::new(SuperCommandParams::new("bar", ""));
    bar.register(shared(TestCommand::new("foo"))).unwrap();
    let mut jc = jujutest();
    jc.register(shared(bar)).unwrap();
    jc.register_super_alias("bar-help", "bar", "help", None).unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["bar-help"]), 0);
    let stdout = system.stdout_string();
    assert!(stdout.starts_with("usage: bar [flags] <command> ...\n"), "{stdout}");
    assert!(stdout.contains("    foo  - foo the juju\n"));
    assert!(!stdout.contains("bar-help"));

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["bar-help", "foo"]), 0);
    assert!(system.stdout_string().starts_with("usage: bar foo [flags] <something>\n"));
}

#[test]
fn test_nested_super_unrecognized_command() {
    let mut bar = SuperCommand::new(SuperCommandParams::new("bar", ""));
    bar.register(shared(TestCommand::new("foo"))).unwrap();
    let mut jc = jujutest();
    jc.register(shared(bar)).unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["bar", "baz"]), 2);
    assert_eq!(
        system.stderr_string(),
        "error: unrecognized command: bar baz\ndid you mean \"foo\"?\n"
    );
}

#[test]
fn test_pass_through_exit_code() {
    let mut jc = jujutest();
    jc.register(shared(ExitCommand)).unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["exit"]), 42);
    assert_eq!(system.stderr_string(), "");
}

#[test]
fn test_global_flags_on_either_side_of_command_name() {
    let mut params = SuperCommandParams::new("jujutest", "");
    params.global_flags = vec![Arg::new("model").long("model").default_value("default")];
    let mut jc = SuperCommand::new(params);
    jc.register(shared(ModelCommand)).unwrap();

    let system = MockSystem::new();
    assert_eq!(run(&mut jc, &system, &["model"]), 0);
    assert_eq!(system.stdout_string(), "model=default\n");

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["--model", "before", "model"]), 0);
    assert_eq!(system.stdout_string(), "model=before\n");

    system.reset_output();
    assert_eq!(run(&mut jc, &system, &["model", "--model", "after"]), 0);
    assert_eq!(system.stdout_string(), "model=after\n");

    system.reset_output();
    assert_eq!(
        run(&mut jc, &system, &["--model", "before", "model", "--model", "after"]),
        0
    );
    assert_eq!(system.stdout_string(), "model=after\n");
}

#[test]
fn test_plain_command_help_flag() {
    let system = MockSystem::new();
    let mut tc = TestCommand::new("verb");
    assert_eq!(run(&mut tc, &system, &["--help"]), 0);
    assert!(system.stdout_string().starts_with("usage: verb [flags] <something>\npurpose: verb the juju\n"));
}

#[test]
fn test_plain_command_errors() {
    let system = MockSystem::new();
    let mut tc = TestCommand::new("verb");
    assert_eq!(run(&mut tc, &system, &["--option", "error"]), 1);
    assert_eq!(system.stderr_string(), "error: BAM!\n");

    system.reset_output();
    assert_eq!(run(&mut tc, &system, &["extra"]), 2);
    assert_eq!(system.stderr_string(), "error: unrecognized args: [\"extra\"]\n");
}

}
