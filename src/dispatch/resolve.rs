//! Subcommand resolution
//!
//! Turns the first positional argument into a registered command, going
//! through the user alias table once and falling back to either the missing
//! callback or an "unrecognized command" result with a suggestion.

use crate::config::aliases::AliasTable;
use crate::dispatch::registry::{CommandReference, Registry};
use tracing::debug;

/// Outcome of resolving a subcommand name
#[derive(Debug)]
pub enum Resolution<'reg> {
    /// A registered name, with the arguments that follow it
    Found {
        reference: &'reg CommandReference,
        args: Vec<String>,
    },
    /// Nothing matched and there is no fallback
    Unrecognized {
        name: String,
        suggestion: Option<String>,
    },
    /// Nothing matched; the missing callback takes over
    Missing { name: String, args: Vec<String> },
}

/// Resolves names against one registry
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'reg> {
    registry: &'reg Registry,
    aliases: Option<&'reg AliasTable>,
    has_fallback: bool,
}

impl<'reg> Resolver<'reg> {
    /// Resolve against `registry` only
    #[must_use]
    #[inline]
    pub const fn new(registry: &'reg Registry) -> Self {
        Self {
            registry,
            aliases: None,
            has_fallback: false,
        }
    }

    /// Substitute user aliases before looking names up
    #[must_use]
    #[inline]
    pub const fn with_aliases(mut self, aliases: Option<&'reg AliasTable>) -> Self {
        self.aliases = aliases;
        self
    }

    /// Report misses as [`Resolution::Missing`] instead of unrecognized
    #[must_use]
    #[inline]
    pub const fn with_fallback(mut self, has_fallback: bool) -> Self {
        self.has_fallback = has_fallback;
        self
    }

    /// Resolve `name` followed by `rest`
    ///
    /// A user alias is expanded once: its tokens replace `name` and the first
    /// token is looked up in the registry without further alias expansion.
    #[must_use]
    #[inline]
    pub fn resolve(&self, name: &str, rest: &[String]) -> Resolution<'reg> {
        let mut tokens: Vec<String> = match self.aliases.and_then(|aliases| aliases.get(name)) {
            Some(expansion) => {
                debug!("using alias {name:?}={:?}", expansion.join(" "));
                expansion.to_vec()
            }
            None => vec![name.to_owned()],
        };
        tokens.extend_from_slice(rest);

        let name = tokens.remove(0);
        if let Some(reference) = self.registry.lookup(&name) {
            return Resolution::Found {
                reference,
                args: tokens,
            };
        }
        if self.has_fallback {
            return Resolution::Missing { name, args: tokens };
        }
        let suggestion = self
            .registry
            .closest(&name)
            .map(|reference| reference.name().to_owned());
        Resolution::Unrecognized { name, suggestion }
    }
}
