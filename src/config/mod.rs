//! Configuration module
//!
//! Super-command construction parameters and the user alias file

pub mod aliases;
pub mod params;

pub use aliases::AliasTable;
pub use params::{MissingCallback, NotifyHelp, NotifyRun, SuperCommandParams};
