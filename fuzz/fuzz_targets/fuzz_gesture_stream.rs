#![no_main]

mod input;

use std::time::Duration;

use input::RawInput;
use libfuzzer_sys::fuzz_target;
use pdeck_core::gesture::GestureRecognizer;
use pdeck_core::semantic_event::SemanticEvent;
use web_time::Instant;

fuzz_target!(|inputs: Vec<RawInput>| {
    let mut recognizer = GestureRecognizer::default();
    let mut now = Instant::now();
    let mut in_drag = false;

    for raw in &inputs {
        let event = match raw.event() {
            Ok(event) => event,
            Err(ms) => {
                now += Duration::from_millis(u64::from(ms));
                continue;
            }
        };
        for semantic in recognizer.process(&event, now) {
            match semantic {
                SemanticEvent::DragStart { .. } => {
                    assert!(!in_drag, "nested DragStart");
                    in_drag = true;
                }
                SemanticEvent::DragMove { .. } => assert!(in_drag, "DragMove outside a drag"),
                SemanticEvent::DragEnd { .. } | SemanticEvent::DragCancel => {
                    assert!(in_drag, "drag terminated twice");
                    in_drag = false;
                }
                _ => {}
            }
        }
        assert_eq!(recognizer.is_dragging(), in_drag);
    }

    recognizer.reset();
    assert!(!recognizer.is_dragging());
});
