#![forbid(unsafe_code)]

//! Gesture-to-tactic translation over a [`ProofEngine`].
//!
//! The translator is the only code that talks to the engine on behalf of
//! gestures. Legality queries go through [`ProofEngine::try_tactic`] and
//! never mutate anything; every mutation goes through
//! [`ProofEngine::send_tactic`]. Nothing returned here is an error the host
//! must handle: engine rejections are logged and reported as a
//! [`CommitOutcome`], and the next snapshot shows what actually happened.
//!
//! Check and commit are two separate engine calls. Another change can land
//! in between; with [`CommitPolicy::TrustLastCheck`] such a commit is sent
//! and rejected by the engine, with [`CommitPolicy::Recheck`] it is checked
//! again first and not sent.

use std::rc::Rc;

use pdeck_core::engine::{EngineError, ProofEngine, Suggestion};
use pdeck_core::tactic::{Entity, Tactic};
use pdeck_runtime::config::CommitPolicy;
use tracing::{debug, info, warn};

/// What a committing request led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The engine accepted the tactic.
    Committed(Tactic),
    /// The engine refused it; its state is unchanged.
    Rejected(Tactic, EngineError),
    /// Nothing was sent: a self-drop, or the commit-time re-check failed.
    NotLegal,
    /// No default suggestion exists for the entity.
    NoDefault,
}

impl CommitOutcome {
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Maps drops, menu picks and double clicks to engine calls.
#[derive(Clone)]
pub struct Translator {
    engine: Rc<dyn ProofEngine>,
    policy: CommitPolicy,
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Translator {
    pub fn new(engine: Rc<dyn ProofEngine>, policy: CommitPolicy) -> Self {
        Self { engine, policy }
    }

    #[must_use]
    pub fn engine(&self) -> &Rc<dyn ProofEngine> {
        &self.engine
    }

    #[must_use]
    pub fn policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Whether dropping hypothesis `source` on `target` would succeed now.
    ///
    /// A self-drop is never legal and never reaches the engine. Safe to call
    /// on every hover tick.
    pub fn is_legal_drop(&self, source: &str, target: &Entity) -> bool {
        let Some(tactic) = Tactic::for_drop(source, target) else {
            return false;
        };
        let legal = self.engine.try_tactic(tactic.as_str());
        debug!(tactic = %tactic, legal, "speculative check");
        legal
    }

    /// Commit the drop of `source` on `target`.
    ///
    /// The caller is expected to have seen `is_legal_drop` return `true`
    /// for the same pair; the check is repeated only under
    /// [`CommitPolicy::Recheck`].
    pub fn commit_drop(&self, source: &str, target: &Entity) -> CommitOutcome {
        let Some(tactic) = Tactic::for_drop(source, target) else {
            return CommitOutcome::NotLegal;
        };
        if self.policy == CommitPolicy::Recheck && !self.engine.try_tactic(tactic.as_str()) {
            debug!(tactic = %tactic, "re-check failed, drop not committed");
            return CommitOutcome::NotLegal;
        }
        self.send(tactic)
    }

    /// Engine suggestions for a hypothesis or the current goal, in order.
    pub fn suggestions_for(&self, entity: &Entity) -> Vec<Suggestion> {
        let suggestions = self.engine.suggest_menu(entity);
        debug!(entity = %entity, count = suggestions.len(), "menu suggestions");
        suggestions
    }

    /// Commit a menu suggestion picked on `entity`.
    pub fn run_suggestion(&self, entity: &Entity, fragment: &str) -> CommitOutcome {
        debug!(entity = %entity, fragment, "menu pick");
        self.send(Tactic::new(fragment))
    }

    /// Commit the engine's default suggestion for `entity`, if it has one.
    pub fn run_default_action(&self, entity: &Entity) -> CommitOutcome {
        match self.engine.suggest_default(entity) {
            Some(fragment) => {
                debug!(entity = %entity, fragment = %fragment, "default action");
                self.send(Tactic::new(fragment))
            }
            None => {
                debug!(entity = %entity, "no default action");
                CommitOutcome::NoDefault
            }
        }
    }

    /// Commit a fixed command such as the undo tactic.
    pub fn run_command(&self, command: &str) -> CommitOutcome {
        self.send(Tactic::new(command))
    }

    fn send(&self, tactic: Tactic) -> CommitOutcome {
        match self.engine.send_tactic(tactic.as_str()) {
            Ok(()) => {
                info!(tactic = %tactic, "tactic committed");
                CommitOutcome::Committed(tactic)
            }
            Err(error) => {
                warn!(tactic = %tactic, error = %error, "engine rejected tactic");
                CommitOutcome::Rejected(tactic, error)
            }
        }
    }
}
