use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sectionlock_core::NavKey;

use crate::app::App;
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Keyboard navigation handed to the controller
    Navigate(NavKey),
    /// Jump straight to a section by position
    GoTo(usize),
    PendingG, // First 'g' press, waiting for second 'g'
    ToggleMenu,
    MenuUp,
    MenuDown,
    MenuSelect,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    if app.is_menu_open() {
        return handle_menu_mode(key, keymap);
    }

    let binding = KeyBinding::new(key.code, key.modifiers);

    if app.pending_g() {
        // Second key of a "gg" sequence; anything else cancels it
        if keymap.is_g_prefix(&binding) {
            return keymap.get_pending_g_action().copied().unwrap_or(Action::None);
        }
        return keymap.get(&binding).copied().unwrap_or(Action::None);
    }

    if let Some(action) = keymap.get(&binding) {
        return *action;
    }

    if keymap.is_g_prefix(&binding) {
        return Action::PendingG;
    }

    Action::None
}

/// Handle keys while the section menu covers the page
fn handle_menu_mode(key: KeyEvent, keymap: &Keymap) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => Action::ToggleMenu,
        (KeyCode::Enter, _) => Action::MenuSelect,
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MenuUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MenuDown,
        _ => match keymap.get(&KeyBinding::new(key.code, key.modifiers)) {
            Some(action @ (Action::Quit | Action::ToggleMenu | Action::GoTo(_))) => *action,
            _ => Action::None,
        },
    }
}
