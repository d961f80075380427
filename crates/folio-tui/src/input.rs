use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    LineDown,
    LineUp,
    HalfPageDown,
    HalfPageUp,
    Top,
    Reload,
    NextSlide,
    PrevSlide,
    None,
}

/// Map a key press to an action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => Action::LineDown,
        (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => Action::LineUp,
        (KeyCode::Char('d'), KeyModifiers::CONTROL) | (KeyCode::PageDown, _) => Action::HalfPageDown,
        (KeyCode::Char('u'), KeyModifiers::CONTROL) | (KeyCode::PageUp, _) => Action::HalfPageUp,
        (KeyCode::Char('g'), KeyModifiers::NONE) | (KeyCode::Home, _) => Action::Top,

        (KeyCode::Char('r'), KeyModifiers::NONE) => Action::Reload,

        // Project carousel
        (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => Action::NextSlide,
        (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => Action::PrevSlide,

        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_scroll_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE)), Action::LineDown);
        assert_eq!(handle_key_event(key(KeyCode::Char('k'), KeyModifiers::NONE)), Action::LineUp);
        assert_eq!(handle_key_event(key(KeyCode::Char('d'), KeyModifiers::CONTROL)), Action::HalfPageDown);
        assert_eq!(handle_key_event(key(KeyCode::Char('u'), KeyModifiers::CONTROL)), Action::HalfPageUp);
        assert_eq!(handle_key_event(key(KeyCode::Char('g'), KeyModifiers::NONE)), Action::Top);
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('r'), KeyModifiers::NONE)), Action::Reload);
        // Plain 'd' is not half-page
        assert_eq!(handle_key_event(key(KeyCode::Char('d'), KeyModifiers::NONE)), Action::None);
    }
}
