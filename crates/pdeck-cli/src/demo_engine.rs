#![forbid(unsafe_code)]

//! A small in-process proof engine for implicational logic.
//!
//! Understands `apply H`, `apply H in H'`, `intros`, `assumption` and
//! `Undo`. Each accepted tactic pushes the previous session onto a history
//! stack that `Undo` pops. Speculative checks run the tactic on a copy and
//! never touch the live session.

use std::sync::{Arc, Mutex, MutexGuard};

use pdeck_core::engine::{EngineError, EngineSubscription, ProofEngine, StateListener, Suggestion};
use pdeck_core::state::ProofState;
use pdeck_core::tactic::Entity;
use tracing::debug;

use crate::prop::Prop;

const UNDO: &str = "Undo";

#[derive(Debug, Clone, PartialEq, Eq)]
struct Goal {
    hyps: Vec<(String, Prop)>,
    target: Prop,
}

impl Goal {
    fn hyp(&self, name: &str) -> Option<&Prop> {
        self.hyps.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    /// `H`, then `H0`, `H1`, ... skipping names already in scope.
    fn fresh_name(&self) -> String {
        if self.hyp("H").is_none() {
            return "H".into();
        }
        (0..)
            .map(|i| format!("H{i}"))
            .find(|name| self.hyp(name).is_none())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step<'a> {
    Apply(&'a str),
    ApplyIn(&'a str, &'a str),
    Intros,
    Assumption,
}

fn parse_step(text: &str) -> Option<Step<'_>> {
    let words: Vec<&str> = text.trim().trim_end_matches('.').split_whitespace().collect();
    match *words.as_slice() {
        ["apply", h] => Some(Step::Apply(h)),
        ["apply", h, "in", t] => Some(Step::ApplyIn(h, t)),
        ["intros"] => Some(Step::Intros),
        ["assumption"] => Some(Step::Assumption),
        _ => None,
    }
}

/// The goal stack; index 0 is the current goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    goals: Vec<Goal>,
}

impl Session {
    pub fn new(hyps: Vec<(String, Prop)>, target: Prop) -> Self {
        Self {
            goals: vec![Goal { hyps, target }],
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn to_state(&self) -> ProofState {
        match self.goals.first() {
            None => ProofState::finished(),
            Some(current) => ProofState::running(
                current.hyps.iter().map(|(n, p)| (n.clone(), p.to_string())),
                self.goals.iter().map(|g| g.target.to_string()),
            ),
        }
    }

    fn step(&self, step: &Step<'_>) -> Result<Session, String> {
        let Some(current) = self.goals.first() else {
            return Err("no goals".into());
        };
        let rest = &self.goals[1..];
        let replaced = |new: Vec<Goal>| Session {
            goals: new.into_iter().chain(rest.iter().cloned()).collect(),
        };

        match *step {
            Step::Apply(h) => {
                let ty = current.hyp(h).ok_or_else(|| format!("no hypothesis {h}"))?;
                if ty.is_false() {
                    return Ok(replaced(Vec::new()));
                }
                let mut premises = Vec::new();
                let mut conclusion = ty;
                while *conclusion != current.target {
                    let Prop::Imp(lhs, rhs) = conclusion else {
                        return Err(format!("{h} does not conclude {}", current.target));
                    };
                    premises.push(Goal {
                        hyps: current.hyps.clone(),
                        target: (**lhs).clone(),
                    });
                    conclusion = rhs.as_ref();
                }
                Ok(replaced(premises))
            }
            Step::ApplyIn(h, t) => {
                if h == t {
                    return Err("cannot apply a hypothesis in itself".into());
                }
                let ty = current.hyp(h).ok_or_else(|| format!("no hypothesis {h}"))?;
                let target_ty = current.hyp(t).ok_or_else(|| format!("no hypothesis {t}"))?;
                let Prop::Imp(lhs, rhs) = ty else {
                    return Err(format!("{h} is not an implication"));
                };
                if **lhs != *target_ty {
                    return Err(format!("{t} does not match the premise of {h}"));
                }
                let mut goal = current.clone();
                for (name, prop) in &mut goal.hyps {
                    if name == t {
                        *prop = (**rhs).clone();
                    }
                }
                Ok(replaced(vec![goal]))
            }
            Step::Intros => {
                if !matches!(current.target, Prop::Imp(..)) {
                    return Err("nothing to introduce".into());
                }
                let mut goal = current.clone();
                while let Prop::Imp(lhs, rhs) = goal.target.clone() {
                    let name = goal.fresh_name();
                    goal.hyps.push((name, *lhs));
                    goal.target = *rhs;
                }
                Ok(replaced(vec![goal]))
            }
            Step::Assumption => {
                if current.hyps.iter().any(|(_, p)| *p == current.target) {
                    Ok(replaced(Vec::new()))
                } else {
                    Err("no matching hypothesis".into())
                }
            }
        }
    }
}

#[derive(Default)]
struct Inner {
    session: Option<Session>,
    history: Vec<Session>,
    listeners: Vec<(u64, StateListener)>,
    next_id: u64,
}

/// In-process engine over a [`Session`]. Clones share state.
#[derive(Clone, Default)]
pub struct DemoEngine {
    inner: Arc<Mutex<Inner>>,
}

impl std::fmt::Debug for DemoEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("DemoEngine")
            .field("session", &inner.session)
            .field("history", &inner.history.len())
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl DemoEngine {
    pub fn new(session: Session) -> Self {
        let engine = Self::default();
        engine.lock().session = Some(session);
        engine
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[must_use]
    pub fn state(&self) -> Option<ProofState> {
        self.lock().session.as_ref().map(Session::to_state)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn notify(&self) {
        let (state, listeners) = {
            let inner = self.lock();
            let Some(session) = inner.session.as_ref() else {
                return;
            };
            let listeners: Vec<StateListener> =
                inner.listeners.iter().map(|(_, l)| Arc::clone(l)).collect();
            (session.to_state(), listeners)
        };
        for listener in listeners {
            listener(&state);
        }
    }

    fn evaluate(&self, tactic: &str) -> Result<Session, String> {
        let inner = self.lock();
        let Some(session) = inner.session.as_ref() else {
            return Err("session is not started".into());
        };
        if tactic.trim().trim_end_matches('.') == UNDO {
            return inner
                .history
                .last()
                .cloned()
                .ok_or_else(|| "nothing to undo".into());
        }
        let step = parse_step(tactic).ok_or_else(|| "unknown tactic".to_string())?;
        session.step(&step)
    }

    fn legal(&self, tactic: &str) -> bool {
        self.evaluate(tactic).is_ok()
    }

    fn menu_for(&self, entity: &Entity) -> Vec<Suggestion> {
        let Some(current) = self
            .lock()
            .session
            .as_ref()
            .and_then(|s| s.goals.first().cloned())
        else {
            return Vec::new();
        };
        let (candidates, defaults): (Vec<String>, Vec<String>) = match entity {
            Entity::Hypothesis(name) => {
                let mut items = vec![format!("apply {name}")];
                items.extend(
                    current
                        .hyps
                        .iter()
                        .filter(|(other, _)| other != name)
                        .map(|(other, _)| format!("apply {name} in {other}")),
                );
                (items, vec![format!("apply {name}")])
            }
            Entity::Goal => {
                let mut items = vec!["intros".to_string(), "assumption".to_string()];
                items.extend(current.hyps.iter().map(|(h, _)| format!("apply {h}")));
                (items, vec!["intros".into(), "assumption".into()])
            }
        };

        let legal: Vec<String> = candidates.into_iter().filter(|t| self.legal(t)).collect();
        let default = defaults.into_iter().find(|d| legal.contains(d));
        legal
            .into_iter()
            .map(|fragment| {
                let is_default = default.as_deref() == Some(fragment.as_str());
                let suggestion = Suggestion::new(fragment);
                if is_default {
                    suggestion.default_choice()
                } else {
                    suggestion
                }
            })
            .collect()
    }
}

impl ProofEngine for DemoEngine {
    fn subscribe(&self, listener: StateListener) -> EngineSubscription {
        let (id, current) = {
            let mut inner = self.lock();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.listeners.push((id, Arc::clone(&listener)));
            (id, inner.session.as_ref().map(Session::to_state))
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
        })
    }

    fn try_tactic(&self, tactic: &str) -> bool {
        let legal = self.legal(tactic);
        debug!(tactic, legal, "demo engine check");
        legal
    }

    fn send_tactic(&self, tactic: &str) -> Result<(), EngineError> {
        let next = self
            .evaluate(tactic)
            .map_err(|reason| EngineError::rejected(tactic, reason))?;
        {
            let mut inner = self.lock();
            let undo = tactic.trim().trim_end_matches('.') == UNDO;
            if undo {
                inner.history.pop();
            } else if let Some(previous) = inner.session.take() {
                inner.history.push(previous);
            }
            inner.session = Some(next);
        }
        self.notify();
        Ok(())
    }

    fn suggest_menu(&self, entity: &Entity) -> Vec<Suggestion> {
        self.menu_for(entity)
    }

    fn suggest_default(&self, entity: &Entity) -> Option<String> {
        self.menu_for(entity)
            .into_iter()
            .find(|s| s.is_default)
            .map(|s| s.fragment)
    }
}
