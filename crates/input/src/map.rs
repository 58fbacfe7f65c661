//! Key mapping from terminal events to player intents.

use crate::types::InputAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to an input action.
pub fn handle_key_event(key: KeyEvent) -> Option<InputAction> {
    if is_ctrl_c(key) {
        return Some(InputAction::Quit);
    }
    map_key_code(key.code)
}

/// Map a bare key code (no modifier handling).
pub fn map_key_code(code: KeyCode) -> Option<InputAction> {
    match code {
        // Movement
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(InputAction::MoveForward)
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(InputAction::MoveBack)
        }

        // Turning
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(InputAction::TurnLeft)
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(InputAction::TurnRight)
        }

        // Stylization
        KeyCode::Char(' ') => Some(InputAction::ToggleStylization),
        KeyCode::Tab | KeyCode::Char('c') | KeyCode::Char('C') => Some(InputAction::CycleStyle),

        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputAction::Quit),

        _ => None,
    }
}

fn is_ctrl_c(key: KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    handle_key_event(key) == Some(InputAction::Quit)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn wasd_and_arrows_share_actions() {
        assert_eq!(handle_key_event(key(KeyCode::Char('w'))), Some(InputAction::MoveForward));
        assert_eq!(handle_key_event(key(KeyCode::Up)), Some(InputAction::MoveForward));
        assert_eq!(handle_key_event(key(KeyCode::Char('s'))), Some(InputAction::MoveBack));
        assert_eq!(handle_key_event(key(KeyCode::Left)), Some(InputAction::TurnLeft));
        assert_eq!(handle_key_event(key(KeyCode::Char('D'))), Some(InputAction::TurnRight));
    }

    #[test]
    fn space_toggles_and_tab_cycles() {
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' '))),
            Some(InputAction::ToggleStylization)
        );
        assert_eq!(handle_key_event(key(KeyCode::Tab)), Some(InputAction::CycleStyle));
    }

    #[test]
    fn ctrl_c_quits_but_plain_c_cycles() {
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(should_quit(ctrl_c));
        assert!(!should_quit(key(KeyCode::Char('c'))));
        assert!(should_quit(key(KeyCode::Esc)));
    }
}
