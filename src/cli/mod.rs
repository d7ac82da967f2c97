//! Command-line interface module
//!
//! The command abstraction, flag sets, help metadata and invocation context

pub mod args;
pub mod command;
pub mod context;
pub mod flags;
pub mod info;

pub use args::*;
pub use command::*;
pub use context::*;
pub use flags::*;
pub use info::*;
