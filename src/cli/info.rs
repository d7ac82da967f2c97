//! Command metadata and help rendering

use crate::cli::flags::FlagSet;

/// Metadata describing a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct Info {
    /// Name used to invoke the command
    pub name: String,
    /// Usage text describing positional arguments, e.g. `<name> [<value>]`
    pub args: String,
    /// One-line purpose
    pub purpose: String,
    /// Long form description
    pub doc: String,
    /// Alternative names the command is also registered under
    pub aliases: Vec<String>,
    /// Usage examples, shown verbatim
    pub examples: String,
    /// Related commands or topics
    pub see_also: Vec<String>,
    /// Word used for flags in help output; empty means "flag"
    pub flag_known_as: String,
}

impl Info {
    /// Create info with a name and purpose
    #[must_use]
    #[inline]
    pub fn new<N: Into<String>, P: Into<String>>(name: N, purpose: P) -> Self {
        Self {
            name: name.into(),
            purpose: purpose.into(),
            ..Self::default()
        }
    }

    /// Set the positional argument usage text
    #[must_use]
    #[inline]
    pub fn with_args<S: Into<String>>(mut self, args: S) -> Self {
        self.args = args.into();
        self
    }

    /// Set the long description
    #[must_use]
    #[inline]
    pub fn with_doc<S: Into<String>>(mut self, doc: S) -> Self {
        self.doc = doc.into();
        self
    }

    /// Set the alternative names
    #[must_use]
    #[inline]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Set the examples text
    #[must_use]
    #[inline]
    pub fn with_examples<S: Into<String>>(mut self, examples: S) -> Self {
        self.examples = examples.into();
        self
    }

    /// Set the related commands
    #[must_use]
    #[inline]
    pub fn with_see_also<I, S>(mut self, see_also: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.see_also = see_also.into_iter().map(Into::into).collect();
        self
    }

    /// Word used for flags, defaulting to "flag"
    #[must_use]
    #[inline]
    pub fn known_as(&self) -> &str {
        if self.flag_known_as.is_empty() {
            "flag"
        } else {
            &self.flag_known_as
        }
    }

    /// Render the help text for this command using the given flags
    #[must_use]
    #[inline]
    pub fn help(&self, flags: &FlagSet) -> String {
        let known_as = self.known_as();
        let described = flags.describe();

        let mut output = format!("usage: {}", self.name);
        if !described.is_empty() {
            output.push_str(&format!(" [{known_as}s]"));
        }
        if !self.args.is_empty() {
            output.push_str(&format!(" {}", self.args));
        }
        output.push('\n');

        if !self.purpose.is_empty() {
            output.push_str(&format!("purpose: {}\n", self.purpose));
        }
        if !described.is_empty() {
            output.push_str(&format!("\n{known_as}s:\n{described}"));
        }

        let doc = self.doc.trim();
        if !doc.is_empty() {
            output.push_str(&format!("\n{doc}\n"));
        }

        let examples = self.examples.trim_matches('\n');
        if !examples.trim().is_empty() {
            output.push_str(&format!("\nexamples:\n{examples}\n"));
        }

        if !self.see_also.is_empty() {
            output.push_str("\nsee also:\n");
            for related in &self.see_also {
                output.push_str(&format!(" - {related}\n"));
            }
        }

        if !self.aliases.is_empty() {
            output.push_str(&format!("\naliases: {}\n", self.aliases.join(", ")));
        }
        output
    }
}
