use arbitrary::Arbitrary;
use pdeck_core::event::{Event, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Arbitrary)]
pub enum RawInput {
    Down(u8, u8, u8),
    Up(u8, u8, u8),
    Drag(u8, u8),
    Moved(u8, u8),
    Key(u8, bool),
    Focus(bool),
    Wait(u16),
}

fn button(b: u8) -> MouseButton {
    match b % 3 {
        0 => MouseButton::Left,
        1 => MouseButton::Right,
        _ => MouseButton::Middle,
    }
}

fn key(k: u8) -> KeyCode {
    match k % 6 {
        0 => KeyCode::Escape,
        1 => KeyCode::Enter,
        2 => KeyCode::Up,
        3 => KeyCode::Down,
        4 => KeyCode::Char('z'),
        _ => KeyCode::Tab,
    }
}

impl RawInput {
    /// The event to feed, or the milliseconds to advance the clock.
    pub fn event(&self) -> Result<Event, u16> {
        let mouse = |kind, x: u8, y: u8| {
            Event::Mouse(MouseEvent::new(kind, u16::from(x % 40), u16::from(y % 12)))
        };
        Ok(match *self {
            Self::Down(b, x, y) => mouse(MouseEventKind::Down(button(b)), x, y),
            Self::Up(b, x, y) => mouse(MouseEventKind::Up(button(b)), x, y),
            Self::Drag(x, y) => mouse(MouseEventKind::Drag(MouseButton::Left), x, y),
            Self::Moved(x, y) => mouse(MouseEventKind::Moved, x, y),
            Self::Key(k, ctrl) => {
                let mods = if ctrl { Modifiers::CTRL } else { Modifiers::NONE };
                Event::Key(KeyEvent::new(key(k)).with_modifiers(mods))
            }
            Self::Focus(on) => Event::Focus(on),
            Self::Wait(ms) => return Err(ms),
        })
    }
}
