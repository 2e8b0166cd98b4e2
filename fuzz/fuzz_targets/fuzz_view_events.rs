#![no_main]

mod input;

use input::RawInput;
use libfuzzer_sys::fuzz_target;
use pdeck::{Msg, ProofView, ViewOptions};
use pdeck_core::ProofState;
use pdeck_core::testing::ScriptedEngine;
use pdeck_runtime::Program;

fuzz_target!(|inputs: Vec<RawInput>| {
    let engine = ScriptedEngine::with_state(ProofState::running(
        [("H", "A"), ("H2", "A -> B")],
        ["B", "C"],
    ));
    engine.accept("apply H2 in H").accept("apply H").accept("Undo");
    let mut program = Program::new(ProofView::mount(engine.clone(), ViewOptions::new(|| {})), 40, 12);

    let mut releases = 0usize;
    let mut keys = 0usize;
    for raw in &inputs {
        let Ok(event) = raw.event() else {
            continue;
        };
        if matches!(raw, RawInput::Up(..)) {
            releases += 1;
        }
        if matches!(raw, RawInput::Key(..)) {
            keys += 1;
        }
        program.dispatch(event);
    }

    // Each commit needs a release (drop, pick, double click) or a key.
    assert!(engine.sent().len() <= releases + keys);
    // Only templates the engine accepted are ever sent.
    for tactic in engine.sent() {
        assert!(["apply H2 in H", "apply H", "Undo"].contains(&tactic.as_str()));
    }

    program.send(Msg::Unmount);
    assert_eq!(engine.listener_count(), 0);
});
