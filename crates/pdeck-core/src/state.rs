#![forbid(unsafe_code)]

//! Proof-state snapshots as emitted by the engine.
//!
//! A [`ProofState`] is immutable once emitted and is always superseded
//! wholesale by the next one; nothing in the view patches it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A named, typed assumption in the current proof context.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "(String, String)", into = "(String, String)")
)]
pub struct Hypothesis {
    pub name: String,
    pub ty: String,
}

impl Hypothesis {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

impl From<(String, String)> for Hypothesis {
    fn from((name, ty): (String, String)) -> Self {
        Self { name, ty }
    }
}

impl From<Hypothesis> for (String, String) {
    fn from(h: Hypothesis) -> Self {
        (h.name, h.ty)
    }
}

/// Hypotheses and goals of the current frame.
///
/// `hyps` keeps the engine's order and names are unique within one
/// snapshot. `goals` is in stack order: index 0 is the current goal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Monitor {
    pub hyps: Vec<Hypothesis>,
    pub goals: Vec<String>,
}

impl Monitor {
    /// The goal tactics act on by default.
    #[must_use]
    pub fn current_goal(&self) -> Option<&str> {
        self.goals.first().map(String::as_str)
    }

    #[must_use]
    pub fn hyp(&self, name: &str) -> Option<&Hypothesis> {
        self.hyps.iter().find(|h| h.name == name)
    }
}

/// One complete snapshot of the proof session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ProofState {
    /// True when no subgoals remain.
    pub is_finished: bool,
    pub monitor: Monitor,
}

impl ProofState {
    /// A running session with the given hypotheses and goal stack.
    pub fn running<N, T, G>(
        hyps: impl IntoIterator<Item = (N, T)>,
        goals: impl IntoIterator<Item = G>,
    ) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        G: Into<String>,
    {
        Self {
            is_finished: false,
            monitor: Monitor {
                hyps: hyps
                    .into_iter()
                    .map(|(n, t)| Hypothesis::new(n, t))
                    .collect(),
                goals: goals.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// A session with no subgoals left.
    #[must_use]
    pub fn finished() -> Self {
        Self {
            is_finished: true,
            monitor: Monitor::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_preserves_order() {
        let s = ProofState::running([("H", "A"), ("H2", "A->B")], ["B", "C"]);
        assert!(!s.is_finished);
        let names: Vec<_> = s.monitor.hyps.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["H", "H2"]);
        assert_eq!(s.monitor.current_goal(), Some("B"));
        assert_eq!(s.monitor.hyp("H2").map(|h| h.ty.as_str()), Some("A->B"));
        assert!(s.monitor.hyp("H3").is_none());
    }

    #[test]
    fn finished_has_no_goal() {
        let s = ProofState::finished();
        assert!(s.is_finished);
        assert_eq!(s.monitor.current_goal(), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn decodes_engine_json() {
        let json = r#"{"isFinished":false,"monitor":{"hyps":[["H","False"]],"goals":["B"]}}"#;
        let s: ProofState = serde_json::from_str(json).expect("decode");
        assert_eq!(s, ProofState::running([("H", "False")], ["B"]));
        let back = serde_json::to_string(&s).expect("encode");
        assert_eq!(back, json);
    }
}
