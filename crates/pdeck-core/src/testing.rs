#![forbid(unsafe_code)]

//! A recording, scriptable [`ProofEngine`] for tests.
//!
//! Every call is logged as an [`EngineCall`] so tests can assert on exactly
//! what the view asked of the engine, in order. Clones share state, so a
//! test keeps one handle while the view owns another.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::engine::{EngineError, EngineSubscription, ProofEngine, StateListener, Suggestion};
use crate::state::ProofState;
use crate::tactic::Entity;

/// One recorded interaction with the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Subscribe(u64),
    Unsubscribe(u64),
    Try(String),
    Send(String),
    SuggestMenu(Entity),
    SuggestDefault(Entity),
}

#[derive(Default)]
struct Inner {
    state: Option<ProofState>,
    accept_all: bool,
    accepted: HashSet<String>,
    transitions: HashMap<String, ProofState>,
    rejected_sends: HashSet<String>,
    menus: HashMap<Entity, Vec<Suggestion>>,
    defaults: HashMap<Entity, String>,
    listeners: Vec<(u64, StateListener)>,
    next_id: u64,
    calls: Vec<EngineCall>,
}

/// Scriptable engine double.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for ScriptedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ScriptedEngine")
            .field("state", &inner.state)
            .field("listeners", &inner.listeners.len())
            .field("calls", &inner.calls.len())
            .finish()
    }
}

impl ScriptedEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a snapshot already available to new listeners.
    #[must_use]
    pub fn with_state(state: ProofState) -> Self {
        let engine = Self::new();
        engine.lock().state = Some(state);
        engine
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking test thread must not hide the recorded calls.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Make `try_tactic(tactic)` return true.
    pub fn accept(&self, tactic: impl Into<String>) -> &Self {
        self.lock().accepted.insert(tactic.into());
        self
    }

    /// Make every speculative check succeed.
    pub fn accept_all(&self) -> &Self {
        self.lock().accept_all = true;
        self
    }

    /// Committing `tactic` moves the engine to `next`.
    pub fn on_send(&self, tactic: impl Into<String>, next: ProofState) -> &Self {
        self.lock().transitions.insert(tactic.into(), next);
        self
    }

    /// Committing `tactic` fails even if it was accepted speculatively.
    pub fn reject_send(&self, tactic: impl Into<String>) -> &Self {
        self.lock().rejected_sends.insert(tactic.into());
        self
    }

    pub fn menu(&self, entity: Entity, suggestions: Vec<Suggestion>) -> &Self {
        self.lock().menus.insert(entity, suggestions);
        self
    }

    pub fn default_for(&self, entity: Entity, fragment: impl Into<String>) -> &Self {
        self.lock().defaults.insert(entity, fragment.into());
        self
    }

    /// Push a snapshot as if the engine changed on its own.
    pub fn emit(&self, state: ProofState) {
        let listeners = {
            let mut inner = self.lock();
            inner.state = Some(state.clone());
            inner
                .listeners
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect::<Vec<_>>()
        };
        for listener in listeners {
            listener(&state);
        }
    }

    #[must_use]
    pub fn calls(&self) -> Vec<EngineCall> {
        self.lock().calls.clone()
    }

    /// Tactics passed to `send_tactic`, in order.
    #[must_use]
    pub fn sent(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Send(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Tactics passed to `try_tactic`, in order.
    #[must_use]
    pub fn tried(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                EngineCall::Try(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    #[must_use]
    pub fn state(&self) -> Option<ProofState> {
        self.lock().state.clone()
    }
}

impl ProofEngine for ScriptedEngine {
    fn subscribe(&self, listener: StateListener) -> EngineSubscription {
        let (id, current) = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.listeners.push((id, Arc::clone(&listener)));
            inner.calls.push(EngineCall::Subscribe(id));
            (id, inner.state.clone())
        };
        if let Some(state) = current {
            listener(&state);
        }
        let inner = Arc::clone(&self.inner);
        EngineSubscription::new(id, move || {
            let mut inner = match inner.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            inner.listeners.retain(|(lid, _)| *lid != id);
            inner.calls.push(EngineCall::Unsubscribe(id));
        })
    }

    fn try_tactic(&self, tactic: &str) -> bool {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::Try(tactic.to_string()));
        inner.state.is_some()
            && (inner.accept_all
                || inner.accepted.contains(tactic)
                || inner.transitions.contains_key(tactic))
    }

    fn send_tactic(&self, tactic: &str) -> Result<(), EngineError> {
        let next = {
            let mut inner = self.lock();
            inner.calls.push(EngineCall::Send(tactic.to_string()));
            let Some(current) = inner.state.clone() else {
                return Err(EngineError::SessionNotStarted);
            };
            if inner.rejected_sends.contains(tactic) {
                return Err(EngineError::rejected(tactic, "scripted rejection"));
            }
            if let Some(next) = inner.transitions.get(tactic) {
                next.clone()
            } else if inner.accept_all || inner.accepted.contains(tactic) {
                current
            } else {
                return Err(EngineError::rejected(tactic, "no scripted transition"));
            }
        };
        self.emit(next);
        Ok(())
    }

    fn suggest_menu(&self, entity: &Entity) -> Vec<Suggestion> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::SuggestMenu(entity.clone()));
        inner.menus.get(entity).cloned().unwrap_or_default()
    }

    fn suggest_default(&self, entity: &Entity) -> Option<String> {
        let mut inner = self.lock();
        inner.calls.push(EngineCall::SuggestDefault(entity.clone()));
        inner.defaults.get(entity).cloned()
    }
}
