#![forbid(unsafe_code)]

//! ProofDeck: an interactive proof view over an external proof engine.
//!
//! The view renders the engine's latest [`ProofState`] and turns direct
//! manipulation into tactics. Dropping hypothesis `a` on hypothesis `b`
//! means `apply a in b`; dropping it on the current goal means `apply a`.
//! Every candidate is checked speculatively with
//! [`ProofEngine::try_tactic`] while the pointer hovers, and only a drop
//! whose latest check passed is committed with
//! [`ProofEngine::send_tactic`]. Menus and double clicks run the engine's
//! own suggestions through the same commit path.
//!
//! # Quick start
//!
//! ```ignore
//! use pdeck::{ProofView, ViewOptions};
//! use pdeck_runtime::Program;
//!
//! let view = ProofView::mount(engine, ViewOptions::new(|| println!("done")));
//! let mut program = Program::new(view, 80, 24);
//! program.dispatch(event);
//! println!("{}", program.text());
//! ```
//!
//! # Crates
//! - `pdeck-core`: snapshots, the engine trait, events and gestures.
//! - `pdeck-render`: buffers and hit testing.
//! - `pdeck-runtime`: the subscription bridge, program loop and config.
//! - `pdeck-widgets`: rows, menus and drag-and-drop capabilities.

pub mod translator;
pub mod view;

pub use pdeck_core::{Entity, EngineError, ProofEngine, ProofState, Suggestion, Tactic};
pub use pdeck_runtime::{CommitPolicy, Program, ViewConfig};
pub use translator::{CommitOutcome, Translator};
pub use view::{Msg, ProofView, Session, ViewOptions};
