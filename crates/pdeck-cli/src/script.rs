#![forbid(unsafe_code)]

//! Gesture scripts.
//!
//! One step per line; `#` starts a comment.
//!
//! | Step                 | Input produced                                 |
//! |----------------------|------------------------------------------------|
//! | `drag SRC DST\|goal` | left press on SRC, move onto DST, release      |
//! | `menu NAME\|goal`    | right click on the entity                      |
//! | `pick N`             | left click on row N (1-based) of the open menu |
//! | `dbl NAME\|goal`     | two left clicks on the entity                  |
//! | `key K`              | `up`, `down`, `enter`, `esc` or `undo`         |
//! | `exit`               | left click on the exit button                  |
//!
//! Targets are resolved against the frame on screen when the step runs, so a
//! step can only address what the previous step left visible.

use std::path::Path;

use pdeck::view::{EXIT_HIT, GOAL_HIT, HYP_HIT, MENU_HIT};
use pdeck::{ProofView, Session};
use pdeck_core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};
use pdeck_core::geometry::Position;
use pdeck_render::frame::{Frame, HitData, HitId, HitRegion};

use crate::error::{CliError, Result};

/// Something a step points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Hyp(String),
    Goal,
}

impl Target {
    fn parse(word: &str) -> Self {
        if word == "goal" {
            Self::Goal
        } else {
            Self::Hyp(word.to_string())
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Hyp(name) => format!("hypothesis {name}"),
            Self::Goal => "the current goal".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Esc,
    Undo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Drag { source: String, target: Target },
    Menu(Target),
    Pick(usize),
    Double(Target),
    Key(Key),
    Exit,
}

/// A parsed script line, kept for echoing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub text: String,
    pub step: Step,
}

fn parse_step(text: &str) -> std::result::Result<Step, String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    match *words.as_slice() {
        ["drag", source, target] => Ok(Step::Drag {
            source: source.to_string(),
            target: Target::parse(target),
        }),
        ["menu", target] => Ok(Step::Menu(Target::parse(target))),
        ["dbl", target] => Ok(Step::Double(Target::parse(target))),
        ["pick", n] => match n.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(Step::Pick(n)),
            _ => Err(format!("menu rows are numbered from 1, got `{n}`")),
        },
        ["key", key] => {
            let key = match key {
                "up" => Key::Up,
                "down" => Key::Down,
                "enter" => Key::Enter,
                "esc" => Key::Esc,
                "undo" => Key::Undo,
                other => return Err(format!("unknown key `{other}`")),
            };
            Ok(Step::Key(key))
        }
        ["exit"] => Ok(Step::Exit),
        [] => Err("empty step".into()),
        [verb, ..] => Err(format!("cannot parse `{verb}` step")),
    }
}

/// Parse a whole script. `path` is only used for error messages.
pub fn parse(source: &str, path: &Path) -> Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();
    for (i, raw) in source.lines().enumerate() {
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let step = parse_step(text).map_err(|message| CliError::Script {
            path: path.to_path_buf(),
            line: i + 1,
            message,
        })?;
        steps.push(ScriptLine {
            line: i + 1,
            text: text.to_string(),
            step,
        });
    }
    Ok(steps)
}

// ---------------------------------------------------------------------------
// Resolution against the frame on screen
// ---------------------------------------------------------------------------

fn find_hit(frame: &Frame, pred: impl Fn(HitId, HitRegion, HitData) -> bool) -> Option<Position> {
    (0..frame.height()).find_map(|y| {
        (0..frame.width()).find_map(|x| {
            frame
                .hit_test(x, y)
                .filter(|&(id, region, data)| pred(id, region, data))
                .map(|_| Position::new(x, y))
        })
    })
}

fn locate(view: &ProofView, frame: &Frame, target: &Target) -> Option<Position> {
    match target {
        Target::Goal => find_hit(frame, |id, _, _| id == GOAL_HIT),
        Target::Hyp(name) => {
            let Session::Active(state) = view.session() else {
                return None;
            };
            let index = state.monitor.hyps.iter().position(|h| h.name == *name)? as HitData;
            find_hit(frame, |id, _, data| id == HYP_HIT && data == index)
        }
    }
}

fn mouse(kind: MouseEventKind, pos: Position) -> Event {
    Event::Mouse(MouseEvent::new(kind, pos.x, pos.y))
}

fn click(pos: Position) -> [Event; 2] {
    [
        mouse(MouseEventKind::Down(MouseButton::Left), pos),
        mouse(MouseEventKind::Up(MouseButton::Left), pos),
    ]
}

/// The raw events that perform `step` on the current screen.
pub fn events_for(view: &ProofView, frame: &Frame, index: usize, step: &Step) -> Result<Vec<Event>> {
    let missing = |what: String| CliError::NotOnScreen { step: index, what };
    let at = |target: &Target| locate(view, frame, target).ok_or_else(|| missing(target.describe()));

    let events = match step {
        Step::Drag { source, target } => {
            let from = at(&Target::Hyp(source.clone()))?;
            let to = at(target)?;
            vec![
                mouse(MouseEventKind::Down(MouseButton::Left), from),
                mouse(MouseEventKind::Drag(MouseButton::Left), to),
                mouse(MouseEventKind::Up(MouseButton::Left), to),
            ]
        }
        Step::Menu(target) => {
            let pos = at(target)?;
            vec![
                mouse(MouseEventKind::Down(MouseButton::Right), pos),
                mouse(MouseEventKind::Up(MouseButton::Right), pos),
            ]
        }
        Step::Double(target) => {
            let pos = at(target)?;
            let mut events = click(pos).to_vec();
            events.extend(click(pos));
            events
        }
        Step::Pick(n) => {
            let row = (*n - 1) as HitData;
            let pos = find_hit(frame, |id, region, data| {
                id == MENU_HIT && region == HitRegion::MenuItem && data == row
            })
            .ok_or_else(|| missing(format!("menu row {n}")))?;
            click(pos).to_vec()
        }
        Step::Exit => {
            let pos = find_hit(frame, |id, _, _| id == EXIT_HIT)
                .ok_or_else(|| missing("the exit button".into()))?;
            click(pos).to_vec()
        }
        Step::Key(key) => {
            let event = match key {
                Key::Up => KeyEvent::new(KeyCode::Up),
                Key::Down => KeyEvent::new(KeyCode::Down),
                Key::Enter => KeyEvent::new(KeyCode::Enter),
                Key::Esc => KeyEvent::new(KeyCode::Escape),
                Key::Undo => KeyEvent::new(KeyCode::Char('z')).with_modifiers(Modifiers::CTRL),
            };
            vec![Event::Key(event)]
        }
    };
    Ok(events)
}
