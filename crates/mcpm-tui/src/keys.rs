use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use mcpm_core::session::{KeyInput, SessionEvent};

/// A terminal key press the session cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Interrupt,
    Key(KeyInput),
}

impl Input {
    pub fn into_event(self) -> SessionEvent {
        match self {
            Input::Interrupt => SessionEvent::Interrupt,
            Input::Key(key) => SessionEvent::Key(key),
        }
    }
}

/// Map a crossterm key event; releases and unbound keys yield `None`.
pub fn translate(key: KeyEvent) -> Option<Input> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Input::Interrupt);
    }
    let input = match key.code {
        KeyCode::Esc => return Some(Input::Interrupt),
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Tab => KeyInput::Tab,
        KeyCode::BackTab => KeyInput::BackTab,
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Up => KeyInput::Up,
        KeyCode::Down => KeyInput::Down,
        _ => return None,
    };
    Some(Input::Key(input))
}
