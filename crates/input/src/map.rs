//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::Deal),
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Draw),
        // The original single "Deal / Play" button.
        KeyCode::Enter => Some(GameAction::Primary),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('d'))),
            Some(GameAction::Deal)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(GameAction::Draw)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('P'))),
            Some(GameAction::Draw)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Enter)),
            Some(GameAction::Primary)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Left)), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('x'))));
    }
}
