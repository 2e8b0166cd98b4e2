#![forbid(unsafe_code)]

//! Tactic candidates and the fixed templates gestures are translated with.
//!
//! | Gesture                         | Template                     |
//! |---------------------------------|------------------------------|
//! | hypothesis dropped on hypothesis | `apply <source> in <target>` |
//! | hypothesis dropped on the goal   | `apply <source>`             |
//!
//! A [`Tactic`] is transient: it is built for one check-then-commit cycle
//! and never stored by the view.

use std::fmt;

/// A rendered proof entity a gesture or menu can act on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Entity {
    /// A hypothesis, by name.
    Hypothesis(String),
    /// The current goal.
    Goal,
}

impl Entity {
    pub fn hyp(name: impl Into<String>) -> Self {
        Self::Hypothesis(name.into())
    }

    /// Hypothesis name, if this is one.
    #[must_use]
    pub fn hyp_name(&self) -> Option<&str> {
        match self {
            Self::Hypothesis(name) => Some(name),
            Self::Goal => None,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hypothesis(name) => write!(f, "hyp:{name}"),
            Self::Goal => f.write_str("goal"),
        }
    }
}

/// A candidate tactic string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tactic(String);

impl Tactic {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// `apply <source> in <target>`.
    #[must_use]
    pub fn apply_in(source: &str, target: &str) -> Self {
        Self(format!("apply {source} in {target}"))
    }

    /// `apply <source>`.
    #[must_use]
    pub fn apply(source: &str) -> Self {
        Self(format!("apply {source}"))
    }

    /// Translate a drop of hypothesis `source` onto `target`.
    ///
    /// Returns `None` for a self-drop, which is never a legal gesture and so
    /// never produces a candidate.
    #[must_use]
    pub fn for_drop(source: &str, target: &Entity) -> Option<Self> {
        match target {
            Entity::Hypothesis(name) if name == source => None,
            Entity::Hypothesis(name) => Some(Self::apply_in(source, name)),
            Entity::Goal => Some(Self::apply(source)),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Tactic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tactic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
