#![forbid(unsafe_code)]

//! Elm-style update/view loop without a terminal attached.
//!
//! A [`Program`] owns a [`Model`] and the last rendered [`Frame`]. Hosts feed
//! it canonical events with [`Program::dispatch`]; the model converts them to
//! messages, updates, and returns [`Cmd`]s the program executes. After each
//! dispatch the model is rendered again. Changes that originate outside the
//! event stream (an engine notification) are picked up by
//! [`Program::sync`], which re-renders when [`Model::data_version`] moved.
//!
//! # Example
//!
//! ```
//! use pdeck_core::event::{Event, KeyCode};
//! use pdeck_render::cell::CellFlags;
//! use pdeck_render::frame::Frame;
//! use pdeck_runtime::program::{Cmd, Model, Program};
//!
//! struct Counter(u32);
//!
//! enum Msg {
//!     Bump,
//!     Quit,
//!     Ignore,
//! }
//!
//! impl From<Event> for Msg {
//!     fn from(event: Event) -> Self {
//!         match event {
//!             Event::Key(k) if k.is_char('+') => Msg::Bump,
//!             Event::Key(k) if k.code == KeyCode::Escape => Msg::Quit,
//!             _ => Msg::Ignore,
//!         }
//!     }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Bump => self.0 += 1,
//!             Msg::Quit => return Cmd::quit(),
//!             Msg::Ignore => {}
//!         }
//!         Cmd::none()
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.buffer.set_string(0, 0, &self.0.to_string(), CellFlags::empty(), 8);
//!     }
//! }
//!
//! let mut program = Program::new(Counter(0), 8, 1);
//! program.dispatch(Event::Key(pdeck_core::event::KeyEvent::new(KeyCode::Char('+'))));
//! assert_eq!(program.text(), "1");
//! ```

use std::collections::VecDeque;

use pdeck_core::event::Event;
use pdeck_render::frame::Frame;
use tracing::{info, trace_span};

/// Application state and behavior.
pub trait Model {
    /// Messages the model reacts to. Every raw event converts into one.
    type Message: From<Event>;

    /// Startup commands. Called once by [`Program::new`].
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// State transition for one message.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Draw the current state into `frame`.
    fn view(&self, frame: &mut Frame);

    /// Version of state the model reads from outside the event stream.
    ///
    /// The program re-renders whenever this differs from the value seen at
    /// the previous render.
    fn data_version(&self) -> u64 {
        0
    }
}

/// Side effects returned from `init` and `update`.
#[derive(Debug)]
pub enum Cmd<M> {
    None,
    /// Stop accepting events.
    Quit,
    /// Run several commands in order.
    Batch(Vec<Cmd<M>>),
    /// Feed a message back into `update`.
    Msg(M),
    /// Append a line to the program log.
    Log(String),
}

impl<M> Cmd<M> {
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    #[inline]
    pub fn quit() -> Self {
        Self::Quit
    }

    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl<M> Default for Cmd<M> {
    fn default() -> Self {
        Self::None
    }
}

/// Headless runtime for a [`Model`].
pub struct Program<M: Model> {
    model: M,
    frame: Frame,
    rendered_version: u64,
    running: bool,
    logs: Vec<String>,
}

impl<M: Model> Program<M> {
    /// Initialize `model` and render the first frame.
    pub fn new(model: M, width: u16, height: u16) -> Self {
        let mut program = Self {
            model,
            frame: Frame::with_hit_grid(width, height),
            rendered_version: 0,
            running: true,
            logs: Vec::new(),
        };
        let cmd = program.model.init();
        program.execute(cmd);
        program.render();
        program
    }

    /// Deliver one event. Returns `false` once the model asked to quit.
    pub fn dispatch(&mut self, event: Event) -> bool {
        if !self.running {
            return false;
        }
        if let Event::Resize { width, height } = event {
            self.frame = Frame::with_hit_grid(width, height);
        }
        let cmd = self.model.update(M::Message::from(event));
        self.execute(cmd);
        self.render();
        self.running
    }

    /// Deliver a message directly, bypassing event conversion.
    pub fn send(&mut self, msg: M::Message) -> bool {
        if !self.running {
            return false;
        }
        let cmd = self.model.update(msg);
        self.execute(cmd);
        self.render();
        self.running
    }

    /// Re-render if data the model reads changed. Returns whether it did.
    pub fn sync(&mut self) -> bool {
        if self.model.data_version() == self.rendered_version {
            return false;
        }
        self.render();
        true
    }

    fn execute(&mut self, cmd: Cmd<M::Message>) {
        let mut queue = VecDeque::from([cmd]);
        while let Some(cmd) = queue.pop_front() {
            match cmd {
                Cmd::None => {}
                Cmd::Quit => {
                    info!("program quit requested");
                    self.running = false;
                }
                Cmd::Batch(cmds) => {
                    // Keep batch order ahead of anything queued after it.
                    for c in cmds.into_iter().rev() {
                        queue.push_front(c);
                    }
                }
                Cmd::Msg(m) => {
                    let next = self.model.update(m);
                    queue.push_front(next);
                }
                Cmd::Log(line) => self.logs.push(line),
            }
        }
    }

    /// Render unconditionally.
    pub fn render(&mut self) {
        let _span = trace_span!(
            "render",
            width = self.frame.width(),
            height = self.frame.height()
        )
        .entered();
        self.frame.clear();
        self.model.view(&mut self.frame);
        self.rendered_version = self.model.data_version();
    }

    #[must_use]
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The last frame as text.
    #[must_use]
    pub fn text(&self) -> String {
        self.frame.buffer.to_text()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Drain lines produced by [`Cmd::Log`].
    pub fn take_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.logs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdeck_core::event::{KeyCode, KeyEvent};
    use pdeck_render::cell::CellFlags;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Probe {
        seen: Vec<&'static str>,
        external: Rc<Cell<u64>>,
        views: Rc<Cell<usize>>,
    }

    #[derive(Debug)]
    enum Msg {
        Key(char),
        Chain,
        Step(&'static str),
        Other,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(KeyEvent {
                    code: KeyCode::Char(c),
                    ..
                }) => Msg::Key(c),
                _ => Msg::Other,
            }
        }
    }

    impl Model for Probe {
        type Message = Msg;

        fn init(&mut self) -> Cmd<Msg> {
            Cmd::log("init")
        }

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Key('q') => Cmd::quit(),
                Msg::Key('c') => Cmd::msg(Msg::Chain),
                Msg::Key(_) | Msg::Other => Cmd::none(),
                Msg::Chain => Cmd::batch(vec![
                    Cmd::msg(Msg::Step("a")),
                    Cmd::none(),
                    Cmd::msg(Msg::Step("b")),
                ]),
                Msg::Step(s) => {
                    self.seen.push(s);
                    Cmd::log(s)
                }
            }
        }

        fn view(&self, frame: &mut Frame) {
            self.views.set(self.views.get() + 1);
            let text = self.seen.join(",");
            frame.buffer.set_string(0, 0, &text, CellFlags::empty(), frame.width());
        }

        fn data_version(&self) -> u64 {
            self.external.get()
        }
    }

    fn probe() -> (Program<Probe>, Rc<Cell<u64>>, Rc<Cell<usize>>) {
        let external = Rc::new(Cell::new(0));
        let views = Rc::new(Cell::new(0));
        let model = Probe {
            seen: Vec::new(),
            external: Rc::clone(&external),
            views: Rc::clone(&views),
        };
        (Program::new(model, 10, 2), external, views)
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    #[test]
    fn init_runs_and_renders_once() {
        let (mut program, _, views) = probe();
        assert_eq!(views.get(), 1);
        assert_eq!(program.take_logs(), vec!["init".to_string()]);
    }

    #[test]
    fn batches_run_in_order() {
        let (mut program, _, _) = probe();
        program.dispatch(key('c'));
        assert_eq!(program.text(), "a,b");
        assert_eq!(program.take_logs(), vec!["init", "a", "b"]);
    }

    #[test]
    fn quit_stops_dispatch() {
        let (mut program, _, _) = probe();
        assert!(!program.dispatch(key('q')));
        assert!(!program.is_running());
        assert!(!program.dispatch(key('c')));
        assert_eq!(program.text(), "");
    }

    #[test]
    fn sync_renders_only_on_version_change() {
        let (mut program, external, views) = probe();
        assert!(!program.sync());
        external.set(3);
        assert!(program.sync());
        assert!(!program.sync());
        assert_eq!(views.get(), 2);
    }

    #[test]
    fn resize_replaces_frame() {
        let (mut program, _, _) = probe();
        program.dispatch(Event::Resize {
            width: 4,
            height: 3,
        });
        assert_eq!((program.frame().width(), program.frame().height()), (4, 3));
        assert!(program.frame().hit_grid.is_some());
    }
}
