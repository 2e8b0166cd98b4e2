#![forbid(unsafe_code)]

//! Core: proof-state model, engine contract, events, and gestures.
//!
//! # Role in ProofDeck
//! `pdeck-core` is the leaf of the workspace. It defines what a snapshot of
//! a proof session looks like ([`state`]), the narrow contract the view uses
//! to talk to an external proof engine ([`engine`]), the fixed tactic
//! templates gestures translate into ([`tactic`]), and the input layer that
//! turns raw pointer/keyboard events into drag and click intentions
//! ([`event`], [`gesture`], [`semantic_event`]).
//!
//! # How it fits in the system
//! `pdeck-runtime` binds engine notifications to the view, `pdeck-widgets`
//! renders entities and drop affordances, and `pdeck` wires the translator
//! and the session state machine. None of those talk to an engine except
//! through [`engine::ProofEngine`].

pub mod engine;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod semantic_event;
pub mod state;
pub mod tactic;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use engine::{EngineError, EngineSubscription, ProofEngine, StateListener, Suggestion};
pub use state::{Hypothesis, Monitor, ProofState};
pub use tactic::{Entity, Tactic};
