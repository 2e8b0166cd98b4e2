#![forbid(unsafe_code)]

//! Gesture recognition: raw input → [`SemanticEvent`]s.
//!
//! # State Machine
//!
//! - **Click detector**: consecutive left clicks at the same spot inside the
//!   multi-click window emit `Click` then `DoubleClick`.
//! - **Context detector**: a right press/release emits `ContextMenu`.
//! - **Drag detector**: left press → move past the threshold → release emits
//!   `DragStart` / `DragMove`* / `DragEnd`.
//!
//! # Invariants
//!
//! 1. Drag and Click never both emit for the same press/release pair.
//! 2. Escape or focus loss during a started drag emits `DragCancel` and
//!    clears the tracker; the following release emits nothing.
//! 3. After `reset()` every detector is idle and nothing is emitted.

use std::time::Duration;

use web_time::Instant;

use crate::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use crate::geometry::Position;
use crate::semantic_event::SemanticEvent;

/// Thresholds and timeouts for gesture recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureConfig {
    /// Window for double-click detection (default: 300ms).
    pub multi_click_timeout: Duration,
    /// Minimum manhattan distance in cells before a drag starts (default: 1).
    pub drag_threshold: u16,
    /// Position tolerance for multi-click detection (default: 1).
    pub click_tolerance: u16,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            multi_click_timeout: Duration::from_millis(300),
            drag_threshold: 1,
            click_tolerance: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct ClickState {
    pos: Position,
    time: Instant,
    count: u8,
}

#[derive(Debug, Clone)]
struct DragTracker {
    start_pos: Position,
    button: MouseButton,
    last_pos: Position,
    started: bool,
}

/// Stateful recognizer; feed it every raw [`Event`] in order.
pub struct GestureRecognizer {
    config: GestureConfig,
    last_click: Option<ClickState>,
    drag: Option<DragTracker>,
    right_down: Option<Position>,
}

impl std::fmt::Debug for GestureRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureRecognizer")
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

impl Default for GestureRecognizer {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl GestureRecognizer {
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_click: None,
            drag: None,
            right_down: None,
        }
    }

    /// Process a raw event, returning the semantic events it completes.
    pub fn process(&mut self, event: &Event, now: Instant) -> Vec<SemanticEvent> {
        let mut out = Vec::with_capacity(1);
        match event {
            Event::Mouse(mouse) => {
                let pos = Position::new(mouse.x, mouse.y);
                match mouse.kind {
                    MouseEventKind::Down(MouseButton::Right) => {
                        self.right_down = Some(pos);
                    }
                    MouseEventKind::Up(MouseButton::Right) => {
                        if self.right_down.take().is_some() {
                            out.push(SemanticEvent::ContextMenu { pos });
                        }
                    }
                    MouseEventKind::Down(button) => self.on_mouse_down(pos, button, &mut out),
                    MouseEventKind::Up(button) => self.on_mouse_up(pos, button, now, &mut out),
                    MouseEventKind::Drag(MouseButton::Left) => {
                        self.on_mouse_drag(pos, MouseButton::Left, &mut out);
                    }
                    MouseEventKind::Drag(_) | MouseEventKind::Moved => {}
                }
            }
            Event::Key(key) => {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Escape {
                    self.cancel_drag(&mut out);
                }
            }
            Event::Focus(false) => {
                self.cancel_drag(&mut out);
                self.right_down = None;
            }
            _ => {}
        }
        out
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.as_ref().is_some_and(|d| d.started)
    }

    /// Return every detector to idle without emitting anything.
    pub fn reset(&mut self) {
        self.last_click = None;
        self.drag = None;
        self.right_down = None;
    }

    /// Forget the previous click so the next press cannot complete a double click.
    pub fn forget_clicks(&mut self) {
        self.last_click = None;
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    fn cancel_drag(&mut self, out: &mut Vec<SemanticEvent>) {
        if let Some(drag) = self.drag.take()
            && drag.started
        {
            out.push(SemanticEvent::DragCancel);
        }
    }

    fn on_mouse_down(&mut self, pos: Position, button: MouseButton, out: &mut Vec<SemanticEvent>) {
        // A press while dragging means the release was lost.
        self.cancel_drag(out);
        self.drag = Some(DragTracker {
            start_pos: pos,
            button,
            last_pos: pos,
            started: false,
        });
    }

    fn on_mouse_up(
        &mut self,
        pos: Position,
        button: MouseButton,
        now: Instant,
        out: &mut Vec<SemanticEvent>,
    ) {
        let Some(drag) = self.drag.take() else {
            // Release without a tracked press (cancelled drag, or press
            // happened before we were attached).
            return;
        };
        if drag.started {
            out.push(SemanticEvent::DragEnd {
                start: drag.start_pos,
                end: pos,
            });
            self.last_click = None;
            return;
        }

        if button != MouseButton::Left {
            out.push(SemanticEvent::Click { pos, button });
            return;
        }

        let count = match &self.last_click {
            Some(last)
                if last.pos.manhattan_distance(pos) <= u32::from(self.config.click_tolerance)
                    && now.duration_since(last.time) <= self.config.multi_click_timeout
                    && last.count < 2 =>
            {
                last.count + 1
            }
            _ => 1,
        };
        self.last_click = Some(ClickState {
            pos,
            time: now,
            count,
        });
        if count == 2 {
            out.push(SemanticEvent::DoubleClick { pos });
        } else {
            out.push(SemanticEvent::Click {
                pos,
                button: MouseButton::Left,
            });
        }
    }

    fn on_mouse_drag(&mut self, pos: Position, button: MouseButton, out: &mut Vec<SemanticEvent>) {
        let threshold = u32::from(self.config.drag_threshold);
        let Some(ref mut drag) = self.drag else {
            self.drag = Some(DragTracker {
                start_pos: pos,
                button,
                last_pos: pos,
                started: false,
            });
            return;
        };

        if !drag.started && drag.start_pos.manhattan_distance(pos) >= threshold {
            drag.started = true;
            out.push(SemanticEvent::DragStart {
                pos: drag.start_pos,
                button: drag.button,
            });
        }

        if drag.started {
            let delta = (axis_delta(drag.last_pos.x, pos.x), axis_delta(drag.last_pos.y, pos.y));
            out.push(SemanticEvent::DragMove {
                start: drag.start_pos,
                current: pos,
                delta,
            });
        }
        drag.last_pos = pos;
    }
}

fn axis_delta(from: u16, to: u16) -> i16 {
    let delta = i32::from(to) - i32::from(from);
    i16::try_from(delta).unwrap_or(if delta < 0 { i16::MIN } else { i16::MAX })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyEvent, MouseEvent};

    fn down(x: u16, y: u16, button: MouseButton) -> Event {
        Event::Mouse(MouseEvent::new(MouseEventKind::Down(button), x, y))
    }

    fn up(x: u16, y: u16, button: MouseButton) -> Event {
        Event::Mouse(MouseEvent::new(MouseEventKind::Up(button), x, y))
    }

    fn drag(x: u16, y: u16) -> Event {
        Event::Mouse(MouseEvent::new(MouseEventKind::Drag(MouseButton::Left), x, y))
    }

    const MS_50: Duration = Duration::from_millis(50);
    const MS_100: Duration = Duration::from_millis(100);
    const MS_500: Duration = Duration::from_millis(500);

    #[test]
    fn single_click() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        assert!(gr.process(&down(5, 5, MouseButton::Left), t).is_empty());
        let events = gr.process(&up(5, 5, MouseButton::Left), t + MS_50);
        assert_eq!(
            events,
            vec![SemanticEvent::Click {
                pos: Position::new(5, 5),
                button: MouseButton::Left
            }]
        );
    }

    #[test]
    fn double_click_within_window() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(5, 5, MouseButton::Left), t);
        gr.process(&up(5, 5, MouseButton::Left), t + MS_50);
        gr.process(&down(5, 5, MouseButton::Left), t + MS_100);
        let events = gr.process(&up(5, 5, MouseButton::Left), t + MS_100 + MS_50);
        assert_eq!(
            events,
            vec![SemanticEvent::DoubleClick {
                pos: Position::new(5, 5)
            }]
        );
    }

    #[test]
    fn slow_second_click_is_single() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(5, 5, MouseButton::Left), t);
        gr.process(&up(5, 5, MouseButton::Left), t + MS_50);
        gr.process(&down(5, 5, MouseButton::Left), t + MS_500);
        let events = gr.process(&up(5, 5, MouseButton::Left), t + MS_500 + MS_50);
        assert!(matches!(events[0], SemanticEvent::Click { .. }));
    }

    #[test]
    fn third_click_starts_over() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        for i in 0..2u32 {
            gr.process(&down(1, 1, MouseButton::Left), t + MS_50 * (2 * i));
            gr.process(&up(1, 1, MouseButton::Left), t + MS_50 * (2 * i + 1));
        }
        gr.process(&down(1, 1, MouseButton::Left), t + MS_50 * 4);
        let events = gr.process(&up(1, 1, MouseButton::Left), t + MS_50 * 5);
        assert!(matches!(events[0], SemanticEvent::Click { .. }));
    }

    #[test]
    fn right_click_opens_context_menu() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        assert!(gr.process(&down(3, 2, MouseButton::Right), t).is_empty());
        let events = gr.process(&up(3, 2, MouseButton::Right), t + MS_50);
        assert_eq!(
            events,
            vec![SemanticEvent::ContextMenu {
                pos: Position::new(3, 2)
            }]
        );
    }

    #[test]
    fn drag_sequence_is_well_formed() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(2, 1, MouseButton::Left), t);
        let events = gr.process(&drag(2, 0), t + MS_50);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SemanticEvent::DragStart { .. }));
        assert!(matches!(
            events[1],
            SemanticEvent::DragMove { delta: (0, -1), .. }
        ));
        assert!(gr.is_dragging());

        let events = gr.process(&up(2, 0, MouseButton::Left), t + MS_100);
        assert_eq!(
            events,
            vec![SemanticEvent::DragEnd {
                start: Position::new(2, 1),
                end: Position::new(2, 0)
            }]
        );
        assert!(!gr.is_dragging());
    }

    #[test]
    fn far_drag_delta_saturates() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(0, 40_000, MouseButton::Left), t);
        let events = gr.process(&drag(u16::MAX, 0), t + MS_50);
        assert!(matches!(
            events[1],
            SemanticEvent::DragMove {
                delta: (i16::MAX, i16::MIN),
                ..
            }
        ));
        let events = gr.process(&drag(u16::MAX - 3, 2), t + MS_100);
        assert!(matches!(
            events[0],
            SemanticEvent::DragMove { delta: (-3, 2), .. }
        ));
    }

    #[test]
    fn forgotten_click_does_not_pair() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(1, 1, MouseButton::Left), t);
        gr.process(&up(1, 1, MouseButton::Left), t);
        gr.forget_clicks();
        gr.process(&down(1, 1, MouseButton::Left), t + MS_50);
        let events = gr.process(&up(1, 1, MouseButton::Left), t + MS_50);
        assert!(matches!(events[0], SemanticEvent::Click { .. }));
    }

    #[test]
    fn drag_below_threshold_stays_click() {
        let mut gr = GestureRecognizer::new(GestureConfig {
            drag_threshold: 3,
            ..GestureConfig::default()
        });
        let t = Instant::now();
        gr.process(&down(2, 2, MouseButton::Left), t);
        assert!(gr.process(&drag(3, 2), t + MS_50).is_empty());
        let events = gr.process(&up(3, 2, MouseButton::Left), t + MS_100);
        assert!(matches!(events[0], SemanticEvent::Click { .. }));
    }

    #[test]
    fn escape_cancels_drag_and_swallows_release() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(0, 0, MouseButton::Left), t);
        gr.process(&drag(0, 2), t + MS_50);
        let events = gr.process(&Event::Key(KeyEvent::new(KeyCode::Escape)), t + MS_100);
        assert_eq!(events, vec![SemanticEvent::DragCancel]);
        assert!(gr.process(&up(0, 2, MouseButton::Left), t + MS_500).is_empty());
    }

    #[test]
    fn focus_loss_cancels_drag() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(0, 0, MouseButton::Left), t);
        gr.process(&drag(0, 1), t + MS_50);
        let events = gr.process(&Event::Focus(false), t + MS_100);
        assert_eq!(events, vec![SemanticEvent::DragCancel]);
    }

    #[test]
    fn escape_without_drag_emits_nothing() {
        let mut gr = GestureRecognizer::default();
        let events = gr.process(&Event::Key(KeyEvent::new(KeyCode::Escape)), Instant::now());
        assert!(events.is_empty());
    }

    #[test]
    fn reset_goes_idle() {
        let mut gr = GestureRecognizer::default();
        let t = Instant::now();
        gr.process(&down(0, 0, MouseButton::Left), t);
        gr.process(&drag(0, 3), t + MS_50);
        gr.reset();
        assert!(!gr.is_dragging());
        assert!(gr.process(&up(0, 3, MouseButton::Left), t + MS_100).is_empty());
    }
}
