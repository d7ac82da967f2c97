//! Deprecation and obsolescence of registered names

/// Decides whether a command or alias is deprecated or obsolete
pub trait DeprecationCheck {
    /// The recommended replacement, if the name is deprecated
    ///
    /// Deprecated names still work but print a warning when run.
    fn deprecated(&self) -> Option<String>;

    /// Whether the name should not be registered at all
    fn obsolete(&self) -> bool;
}

/// State of a registered name, fixed at registration time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DeprecationState {
    /// No check was supplied, or the check reported nothing
    #[default]
    Active,
    /// Runs after printing a warning pointing at `replacement`
    ActiveWithWarning { replacement: String },
    /// Never inserted into the registry
    Suppressed,
}

impl DeprecationState {
    /// Evaluate a check once
    #[must_use]
    #[inline]
    pub fn evaluate(check: Option<&dyn DeprecationCheck>) -> Self {
        let Some(check) = check else {
            return Self::Active;
        };
        if check.obsolete() {
            return Self::Suppressed;
        }
        match check.deprecated() {
            Some(replacement) => Self::ActiveWithWarning { replacement },
            None => Self::Active,
        }
    }

    /// The replacement to recommend, if deprecated
    #[must_use]
    #[inline]
    pub fn replacement(&self) -> Option<&str> {
        match self {
            Self::ActiveWithWarning { replacement } => Some(replacement),
            Self::Active | Self::Suppressed => None,
        }
    }

    /// Whether the name is deprecated
    #[must_use]
    #[inline]
    pub const fn is_deprecated(&self) -> bool {
        matches!(self, Self::ActiveWithWarning { .. })
    }

    /// Whether the name is excluded from the registry
    #[must_use]
    #[inline]
    pub const fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed)
    }
}

/// A fixed deprecation check
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deprecation {
    replacement: Option<String>,
    obsolete: bool,
}

impl Deprecation {
    /// Deprecated in favour of `replacement`
    #[must_use]
    #[inline]
    pub fn replaced_by<S: Into<String>>(replacement: S) -> Self {
        Self {
            replacement: Some(replacement.into()),
            obsolete: false,
        }
    }

    /// No longer registered
    #[must_use]
    #[inline]
    pub const fn obsolete() -> Self {
        Self {
            replacement: None,
            obsolete: true,
        }
    }
}

impl DeprecationCheck for Deprecation {
    #[inline]
    fn deprecated(&self) -> Option<String> {
        self.replacement.clone()
    }

    #[inline]
    fn obsolete(&self) -> bool {
        self.obsolete
    }
}
