//! Subcommand dispatch
//!
//! The registry of names, name resolution with user aliases and suggestions,
//! the built-in `help` and `version` commands, the [`SuperCommand`] that ties
//! them together and the [`run_main`] entry point.

pub mod deprecation;
pub mod entry;
pub mod fuzzy;
pub mod help;
pub mod registry;
pub mod resolve;
pub mod supercommand;
pub mod version;

pub use deprecation::{Deprecation, DeprecationCheck, DeprecationState};
pub use entry::run_main;
pub use fuzzy::{closest_match, levenshtein_distance};
pub use help::{HelpTopics, help_info};
pub use registry::{CommandReference, Handler, Registry};
pub use resolve::{Resolution, Resolver};
pub use supercommand::SuperCommand;
pub use version::{VersionCommand, VersionFormat};
