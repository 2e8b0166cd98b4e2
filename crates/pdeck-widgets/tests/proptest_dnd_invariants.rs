//! Property-based invariant tests for the drag-and-drop manager.
//!
//! 1. `on_drop` runs at most once per drag.
//! 2. `on_drop` runs only on a target whose accept test passed on the most
//!    recent check for that target.
//! 3. Release and cancel always leave the manager idle.

use std::cell::RefCell;

use pdeck_widgets::dnd::{DndManager, DragPayload, DragSource, DropOutcome, DropTarget};
use proptest::prelude::*;

struct Source;

impl DragSource for Source {
    fn drag_payload(&self) -> Option<DragPayload> {
        Some(DragPayload::new("H"))
    }
}

struct Target<'a> {
    key: u8,
    accept: bool,
    log: &'a RefCell<Vec<(u8, bool)>>,
    drops: &'a RefCell<Vec<u8>>,
}

impl DropTarget for Target<'_> {
    type Key = u8;

    fn key(&self) -> u8 {
        self.key
    }

    fn can_accept(&self, _payload: &DragPayload) -> bool {
        self.log.borrow_mut().push((self.key, self.accept));
        self.accept
    }

    fn on_drop(&self, _payload: &DragPayload) {
        self.drops.borrow_mut().push(self.key);
    }
}

#[derive(Debug, Clone)]
enum Op {
    Begin,
    Hover(Option<(u8, bool)>),
    Release(Option<(u8, bool)>),
    Cancel,
}

fn arb_target() -> impl Strategy<Value = Option<(u8, bool)>> {
    proptest::option::of((0u8..3, any::<bool>()))
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Begin),
        4 => arb_target().prop_map(Op::Hover),
        1 => arb_target().prop_map(Op::Release),
        1 => Just(Op::Cancel),
    ]
}

proptest! {
    #[test]
    fn drops_follow_the_latest_check(ops in proptest::collection::vec(arb_op(), 0..40)) {
        let log = RefCell::new(Vec::new());
        let drops = RefCell::new(Vec::new());
        let mut dnd = DndManager::new();
        let (log_ref, drops_ref) = (&log, &drops);
        let target = move |spec: Option<(u8, bool)>| {
            spec.map(|(key, accept)| Target { key, accept, log: log_ref, drops: drops_ref })
        };

        for op in ops {
            match op {
                Op::Begin => {
                    prop_assert!(dnd.begin(&Source));
                }
                Op::Hover(spec) => {
                    let t = target(spec);
                    let result = dnd.hover(t.as_ref());
                    if dnd.is_active() {
                        prop_assert_eq!(result, spec.map(|(_, accept)| accept));
                    } else {
                        prop_assert_eq!(result, None);
                    }
                }
                Op::Release(spec) => {
                    let was_active = dnd.is_active();
                    let drops_before = drops.borrow().len();
                    let t = target(spec);
                    let outcome = dnd.release(t.as_ref());
                    prop_assert!(!dnd.is_active());

                    let new_drops = drops.borrow().len() - drops_before;
                    prop_assert!(new_drops <= 1);
                    match outcome {
                        DropOutcome::Dropped(key) => {
                            prop_assert_eq!(new_drops, 1);
                            let last_check = log.borrow().iter().rev().find(|(k, _)| *k == key).copied();
                            prop_assert_eq!(last_check, Some((key, true)));
                        }
                        DropOutcome::Rejected(_) | DropOutcome::Missed => {
                            prop_assert!(was_active);
                            prop_assert_eq!(new_drops, 0);
                        }
                        DropOutcome::Idle => {
                            prop_assert!(!was_active);
                            prop_assert_eq!(new_drops, 0);
                        }
                    }
                }
                Op::Cancel => {
                    dnd.cancel();
                    prop_assert!(!dnd.is_active());
                }
            }
        }
    }
}
