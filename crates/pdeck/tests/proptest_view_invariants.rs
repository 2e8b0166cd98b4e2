//! Property-based invariant tests for the proof view.
//!
//! 1. Hypotheses render in snapshot order, goals in reverse stack order,
//!    each goal under its own separator.
//! 2. A drag commits at most once, only the template the engine last
//!    accepted for that pair, and never for a self-drop.
//! 3. Repeated legality checks with no engine change agree and send nothing.

use std::collections::BTreeSet;
use std::rc::Rc;

use pdeck::{CommitPolicy, Entity, ProofView, Translator, ViewOptions};
use pdeck_core::ProofState;
use pdeck_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use pdeck_core::testing::{EngineCall, ScriptedEngine};
use pdeck_runtime::Program;
use proptest::prelude::*;

fn arb_running() -> impl Strategy<Value = (Vec<(String, String)>, Vec<String>)> {
    (
        proptest::collection::btree_set("[A-Z][0-9]?", 1..5),
        proptest::collection::vec("[A-Z]( -> [A-Z])?", 1..4),
    )
        .prop_flat_map(|(names, goals)| {
            let names: Vec<String> = names.into_iter().collect();
            let n = names.len();
            (
                Just(names),
                proptest::collection::vec("[A-Z]( -> [A-Z])?", n),
                Just(goals),
            )
        })
        .prop_map(|(names, types, goals)| (names.into_iter().zip(types).collect(), goals))
}

fn mouse(kind: MouseEventKind, x: u16, y: u16) -> Event {
    Event::Mouse(MouseEvent::new(kind, x, y))
}

proptest! {
    #[test]
    fn display_order_is_hyps_then_reversed_goals((hyps, goals) in arb_running()) {
        let engine = ScriptedEngine::with_state(ProofState::running(hyps.clone(), goals.clone()));
        let program = Program::new(ProofView::mount(engine, ViewOptions::new(|| {})), 60, 20);
        let text = program.text();
        let rows: Vec<&str> = text.lines().collect();

        prop_assert_eq!(rows.len(), hyps.len() + 2 * goals.len());
        for (row, (name, ty)) in rows.iter().zip(&hyps) {
            prop_assert_eq!(row.trim_start(), format!("{name}: {ty}"));
        }
        let total = goals.len();
        for (i, goal) in goals.iter().rev().enumerate() {
            let sep = rows[hyps.len() + 2 * i];
            let suffix = format!("({}/{total})", i + 1);
            prop_assert!(sep.ends_with(&suffix));
            prop_assert_eq!(rows[hyps.len() + 2 * i + 1].trim_start(), goal.as_str());
        }
    }

    #[test]
    fn drag_commits_at_most_the_accepted_template(
        (hyps, goals) in arb_running(),
        source in 0usize..5,
        target in 0usize..6,
        accepts in proptest::collection::btree_set(0usize..6, 0..6),
    ) {
        let source = source % hyps.len();
        let rows = hyps.len() + 2 * goals.len();
        // Targets past the hypotheses land on the current goal row.
        let target_y = if target < hyps.len() { target } else { rows - 1 };
        let target_entity = if target < hyps.len() {
            Some(hyps[target].0.clone())
        } else {
            None
        };

        let engine = ScriptedEngine::with_state(ProofState::running(hyps.clone(), goals));
        let source_name = hyps[source].0.clone();
        let accepted: BTreeSet<String> = accepts
            .iter()
            .map(|&i| match hyps.get(i) {
                Some((name, _)) => format!("apply {source_name} in {name}"),
                None => format!("apply {source_name}"),
            })
            .collect();
        for tactic in &accepted {
            engine.accept(tactic.clone());
        }

        let mut program = Program::new(ProofView::mount(engine.clone(), ViewOptions::new(|| {})), 60, 20);
        program.dispatch(mouse(MouseEventKind::Down(MouseButton::Left), 1, source as u16));
        program.dispatch(mouse(MouseEventKind::Drag(MouseButton::Left), 3, target_y as u16));
        program.dispatch(mouse(MouseEventKind::Up(MouseButton::Left), 3, target_y as u16));

        let expected = match &target_entity {
            Some(name) if *name == source_name => None,
            Some(name) => Some(format!("apply {source_name} in {name}")),
            None => Some(format!("apply {source_name}")),
        };
        let sent = engine.sent();
        prop_assert!(sent.len() <= 1);
        match expected {
            None => {
                // Self-drop: the engine is never consulted.
                prop_assert!(
                    !engine.calls().iter().any(|c| matches!(c, EngineCall::Try(_) | EngineCall::Send(_)))
                );
            }
            Some(tactic) => {
                prop_assert_eq!(engine.tried(), vec![tactic.clone()]);
                if accepted.contains(&tactic) {
                    prop_assert_eq!(sent, vec![tactic]);
                } else {
                    prop_assert!(sent.is_empty());
                }
            }
        }
    }

    #[test]
    fn legality_checks_are_idempotent(
        source in "H[0-3]",
        target in proptest::option::of("H[0-3]"),
        accepts in proptest::collection::btree_set("apply H[0-3]( in H[0-3])?", 0..6),
        repeats in 2usize..8,
    ) {
        let engine = ScriptedEngine::with_state(ProofState::running([("H0", "A")], ["B"]));
        for tactic in &accepts {
            engine.accept(tactic.clone());
        }
        let translator = Translator::new(Rc::new(engine.clone()), CommitPolicy::TrustLastCheck);
        let target = target.map_or(Entity::Goal, Entity::hyp);

        let first = translator.is_legal_drop(&source, &target);
        for _ in 1..repeats {
            prop_assert_eq!(translator.is_legal_drop(&source, &target), first);
        }
        prop_assert!(engine.sent().is_empty());
        if target.hyp_name() == Some(source.as_str()) {
            prop_assert!(!first);
            prop_assert!(engine.tried().is_empty());
        } else {
            prop_assert_eq!(engine.tried().len(), repeats);
        }
    }
}
