#![forbid(unsafe_code)]

//! The contract the view consumes from the proof engine.
//!
//! The engine is the single source of truth. The view only ever mutates it
//! through [`ProofEngine::send_tactic`]; everything else on the trait is a
//! read-only query. State flows back exclusively through listeners
//! registered with [`ProofEngine::subscribe`].
//!
//! # Two-phase protocol
//!
//! 1. `try_tactic(candidate) -> bool` is speculative and must not mutate
//!    engine state. It is called on every hover tick during a drag.
//! 2. `send_tactic(candidate)` commits. There is no atomicity between the
//!    two calls: another event may change the engine in between, in which
//!    case the commit is rejected and the next snapshot shows no change.

use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

use crate::state::ProofState;
use crate::tactic::Entity;

/// Callback invoked with every snapshot the engine emits.
///
/// Listeners may be invoked from any thread the engine notifies on.
pub type StateListener = Arc<dyn Fn(&ProofState) + Send + Sync>;

/// One entry of a suggestion menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Complete tactic text to commit when chosen.
    pub fragment: String,
    /// Whether this is the engine's default (double-activation) choice.
    pub is_default: bool,
}

impl Suggestion {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            is_default: false,
        }
    }

    #[must_use]
    pub fn default_choice(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Handle for one listener registration.
///
/// Calling [`unsubscribe`](Self::unsubscribe) or dropping the handle removes
/// the registration exactly once.
pub struct EngineSubscription {
    id: u64,
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl EngineSubscription {
    /// Wrap an engine-side removal routine.
    pub fn new(id: u64, cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            id,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle with nothing to remove (engine never pushes).
    #[must_use]
    pub fn detached() -> Self {
        Self {
            id: 0,
            cancel: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the registration now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for EngineSubscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for EngineSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSubscription")
            .field("id", &self.id)
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// Adapter over an interactive proof engine.
pub trait ProofEngine {
    /// Register a listener for state changes.
    ///
    /// If the engine already holds a snapshot it delivers it to the new
    /// listener before returning. Each call is an independent registration.
    fn subscribe(&self, listener: StateListener) -> EngineSubscription;

    /// Speculative check. Must not mutate engine state.
    fn try_tactic(&self, tactic: &str) -> bool;

    /// Commit a tactic. On success every listener is notified.
    fn send_tactic(&self, tactic: &str) -> Result<(), EngineError>;

    /// Ordered menu suggestions for a hypothesis or the current goal.
    fn suggest_menu(&self, entity: &Entity) -> Vec<Suggestion>;

    /// The default suggestion used by double activation, if any.
    fn suggest_default(&self, entity: &Entity) -> Option<String>;
}

macro_rules! forward_engine {
    ($ptr:ident) => {
        impl<E: ProofEngine + ?Sized> ProofEngine for $ptr<E> {
            fn subscribe(&self, listener: StateListener) -> EngineSubscription {
                (**self).subscribe(listener)
            }

            fn try_tactic(&self, tactic: &str) -> bool {
                (**self).try_tactic(tactic)
            }

            fn send_tactic(&self, tactic: &str) -> Result<(), EngineError> {
                (**self).send_tactic(tactic)
            }

            fn suggest_menu(&self, entity: &Entity) -> Vec<Suggestion> {
                (**self).suggest_menu(entity)
            }

            fn suggest_default(&self, entity: &Entity) -> Option<String> {
                (**self).suggest_default(entity)
            }
        }
    };
}

forward_engine!(Rc);
forward_engine!(Arc);

/// Errors an engine may report for a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The engine refused the tactic in its current state.
    Rejected { tactic: String, reason: String },
    /// No session has been started.
    SessionNotStarted,
    /// The engine could not be reached.
    Unavailable(String),
}

impl EngineError {
    pub fn rejected(tactic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Rejected {
            tactic: tactic.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { tactic, reason } => write!(f, "tactic `{tactic}` rejected: {reason}"),
            Self::SessionNotStarted => f.write_str("session is not started"),
            Self::Unavailable(msg) => write!(f, "engine unavailable: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
