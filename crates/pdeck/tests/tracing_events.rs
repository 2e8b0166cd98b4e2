//! Log events emitted along the commit path.

use std::sync::{Arc, Mutex};

use pdeck::{ProofView, ViewOptions};
use pdeck_core::ProofState;
use pdeck_core::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use pdeck_core::testing::ScriptedEngine;
use pdeck_runtime::Program;
use tracing::{Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Captured {
    level: Level,
    message: String,
}

struct Capture {
    events: Arc<Mutex<Vec<Captured>>>,
}

impl<S: Subscriber> Layer<S> for Capture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        #[derive(Default)]
        struct MessageVisitor(String);

        impl tracing::field::Visit for MessageVisitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = format!("{value:?}");
                }
            }
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        self.events.lock().expect("capture lock").push(Captured {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<Captured> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        events: Arc::clone(&events),
    });
    {
        let _guard = tracing::subscriber::set_default(subscriber);
        tracing::callsite::rebuild_interest_cache();
        f();
    }
    events.lock().expect("capture lock").clone()
}

fn drop_h2_on_h(program: &mut Program<ProofView>) {
    let ev = |kind, y| Event::Mouse(MouseEvent::new(kind, 2, y));
    program.dispatch(ev(MouseEventKind::Down(MouseButton::Left), 1));
    program.dispatch(ev(MouseEventKind::Drag(MouseButton::Left), 0));
    program.dispatch(ev(MouseEventKind::Up(MouseButton::Left), 0));
}

fn scenario() -> ProofState {
    ProofState::running([("H", "A"), ("H2", "A -> B")], ["B"])
}

fn has(events: &[Captured], level: Level, message: &str) -> bool {
    events.iter().any(|e| e.level == level && e.message == message)
}

#[test]
fn commit_and_lifecycle_log_at_info() {
    let engine = ScriptedEngine::with_state(scenario());
    engine.accept("apply H2 in H");
    let events = capture(|| {
        let mut program = Program::new(ProofView::mount(engine.clone(), ViewOptions::new(|| {})), 40, 8);
        drop_h2_on_h(&mut program);
        drop(program);
    });
    assert!(has(&events, Level::INFO, "proof view mounted"));
    assert!(has(&events, Level::DEBUG, "speculative check"));
    assert!(has(&events, Level::INFO, "tactic committed"));
    assert!(has(&events, Level::INFO, "proof view unmounted"));
}

#[test]
fn stale_commit_logs_a_warning() {
    let engine = ScriptedEngine::with_state(scenario());
    engine.accept("apply H2 in H").reject_send("apply H2 in H");
    let events = capture(|| {
        let mut program = Program::new(ProofView::mount(engine.clone(), ViewOptions::new(|| {})), 40, 8);
        drop_h2_on_h(&mut program);
    });
    assert!(has(&events, Level::WARN, "engine rejected tactic"));
    assert!(!has(&events, Level::INFO, "tactic committed"));
}
