//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for command dispatch
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CmdError {
    /// The requested subcommand is not registered
    #[error("{message}")]
    UnrecognizedCommand {
        message: String,
        /// Closest registered name, if one is close enough to be worth showing
        suggestion: Option<String>,
    },

    /// Positional arguments were left over after a command consumed its own
    #[error("unrecognized args: {args:?}")]
    UnrecognizedArgs { args: Vec<String> },

    /// Flag parsing failed
    #[error("{message}")]
    Flag { message: String },

    /// Programmer error while wiring commands together (duplicate names, bad aliases)
    #[error("{message}")]
    Configuration { message: String },

    /// `help` was asked about something that is neither a command nor a topic
    #[error("unknown command or topic for {topic}")]
    UnknownHelpTopic { topic: String },

    /// `help` was given arguments after a leaf command
    #[error("extra arguments to command help: {args:?}")]
    ExtraHelpArgs { args: Vec<String> },

    /// The error has already been reported to the user
    #[error("silent error")]
    Silent,

    /// A handler wants the process to exit with a specific code
    #[error("subprocess encountered error code {code}")]
    RcPassthrough { code: i32 },
}

impl CmdError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::UnrecognizedCommand { .. } | Self::UnrecognizedArgs { .. } | Self::Flag { .. } => 2,
            Self::RcPassthrough { code } => code,
            Self::Configuration { .. }
            | Self::UnknownHelpTopic { .. }
            | Self::ExtraHelpArgs { .. }
            | Self::Silent => 1,
        }
    }

    /// Whether the error should be swallowed without printing anything
    #[must_use]
    #[inline]
    pub const fn is_silent(&self) -> bool {
        matches!(*self, Self::Silent | Self::RcPassthrough { .. })
    }

    /// Create the default "unrecognized command" error for a full command path
    #[inline]
    pub fn unrecognized_command<S: AsRef<str>>(path: S) -> Self {
        Self::UnrecognizedCommand {
            message: format!("unrecognized command: {}", path.as_ref()),
            suggestion: None,
        }
    }

    /// Create an "unrecognized args" error
    #[inline]
    pub fn unrecognized_args(args: &[String]) -> Self {
        Self::UnrecognizedArgs {
            args: args.to_vec(),
        }
    }

    /// Create a flag parsing error
    #[inline]
    pub fn flag<S: Into<String>>(message: S) -> Self {
        Self::Flag {
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a pass-through error carrying an exit code
    #[inline]
    #[must_use]
    pub const fn rc_passthrough(code: i32) -> Self {
        Self::RcPassthrough { code }
    }
}

/// Check whether an `anyhow` error wraps a silent [`CmdError`]
#[must_use]
#[inline]
pub fn is_err_silent(err: &anyhow::Error) -> bool {
    err.downcast_ref::<CmdError>().is_some_and(CmdError::is_silent)
}

/// Return the pass-through exit code carried by an `anyhow` error, if any
#[must_use]
#[inline]
pub fn rc_passthrough_code(err: &anyhow::Error) -> Option<i32> {
    match err.downcast_ref::<CmdError>() {
        Some(CmdError::RcPassthrough { code }) => Some(*code),
        _ => None,
    }
}
