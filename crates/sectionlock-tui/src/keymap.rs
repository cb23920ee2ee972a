use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyModifiers};
use sectionlock_core::config::KeymapConfig;
use sectionlock_core::NavKey;
use tracing::warn;

use crate::input::Action;

/// Parsed key binding (key code + modifiers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn simple(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::CONTROL)
    }

    pub fn shift(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::SHIFT)
    }
}

/// Runtime keymap for key-to-action lookup
pub struct Keymap {
    bindings: HashMap<KeyBinding, Action>,
    /// Action bound to the "gg" double press, if configured
    pending_g_action: Option<Action>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self::from_config(&KeymapConfig::default())
    }
}

impl Keymap {
    /// Create a keymap from configuration
    pub fn from_config(config: &KeymapConfig) -> Self {
        let mut bindings = HashMap::new();
        let mut pending_g_action = None;

        let mut add_binding = |key_str: &str, action: Action| {
            if key_str == "gg" {
                pending_g_action = Some(action);
                return;
            }

            if let Some(binding) = parse_key_binding(key_str) {
                if let Some(existing) = bindings.get(&binding) {
                    warn!(
                        "Key conflict: '{}' already bound to {:?}, ignoring binding to {:?}",
                        key_str, existing, action
                    );
                } else {
                    bindings.insert(binding, action);
                }
            } else {
                warn!("Invalid key binding: '{}', ignoring", key_str);
            }
        };

        add_binding(&config.quit, Action::Quit);
        add_binding(&config.next_section, Action::Navigate(NavKey::Down));
        add_binding(&config.prev_section, Action::Navigate(NavKey::Up));
        add_binding(&config.first_section, Action::Navigate(NavKey::Home));
        add_binding(&config.last_section, Action::Navigate(NavKey::End));
        add_binding(&config.toggle_menu, Action::ToggleMenu);

        // Always available, whatever the config says
        bindings.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        bindings.insert(KeyBinding::simple(KeyCode::Down), Action::Navigate(NavKey::Down));
        bindings.insert(KeyBinding::simple(KeyCode::Up), Action::Navigate(NavKey::Up));
        bindings.insert(KeyBinding::simple(KeyCode::PageDown), Action::Navigate(NavKey::PageDown));
        bindings.insert(KeyBinding::simple(KeyCode::PageUp), Action::Navigate(NavKey::PageUp));
        bindings.insert(KeyBinding::simple(KeyCode::Home), Action::Navigate(NavKey::Home));
        bindings.insert(KeyBinding::simple(KeyCode::End), Action::Navigate(NavKey::End));
        for digit in 1..=9u8 {
            let c = char::from(b'0' + digit);
            bindings
                .entry(KeyBinding::simple(KeyCode::Char(c)))
                .or_insert(Action::GoTo(digit as usize - 1));
        }

        Self {
            bindings,
            pending_g_action,
        }
    }

    /// Get action for a key binding
    pub fn get(&self, binding: &KeyBinding) -> Option<&Action> {
        self.bindings.get(binding)
    }

    /// Get the action for completed "gg" sequence
    pub fn get_pending_g_action(&self) -> Option<&Action> {
        self.pending_g_action.as_ref()
    }

    /// Check if a single 'g' press should start a pending sequence
    pub fn is_g_prefix(&self, binding: &KeyBinding) -> bool {
        self.pending_g_action.is_some()
            && binding.code == KeyCode::Char('g')
            && binding.modifiers == KeyModifiers::NONE
    }
}

/// Parse Vim-style key notation into KeyBinding
/// Supported formats:
/// - Single char: "j", "k", "q", etc.
/// - Uppercase (Shift): "G", "N", etc.
/// - Ctrl: "<C-j>", "<C-d>", etc.
/// - Shift: "<S-Tab>", etc.
/// - Special keys: "<CR>", "<Esc>", "<Space>", "<Up>", "<Down>", "<PageDown>", ...
pub fn parse_key_binding(s: &str) -> Option<KeyBinding> {
    let s = s.trim();

    if s.starts_with('<') && s.ends_with('>') && s.len() > 2 {
        let inner = &s[1..s.len() - 1];
        return parse_special_key(inner);
    }

    let mut chars = s.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if c.is_ascii_uppercase() {
        return Some(KeyBinding::shift(KeyCode::Char(c)));
    }
    Some(KeyBinding::simple(KeyCode::Char(c)))
}

/// Parse special key notation (content inside <...>)
fn parse_special_key(inner: &str) -> Option<KeyBinding> {
    if let Some(rest) = inner.strip_prefix("C-") {
        return parse_key_name(rest).map(KeyBinding::ctrl);
    }

    if let Some(rest) = inner.strip_prefix("S-") {
        return parse_key_name(rest).map(KeyBinding::shift);
    }

    parse_key_name(inner).map(KeyBinding::simple)
}

/// Parse a key name (without modifiers)
fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.to_lowercase().as_str() {
        "cr" | "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" | "spc" => Some(KeyCode::Char(' ')),
        "bs" | "backspace" => Some(KeyCode::Backspace),
        "left" => Some(KeyCode::Left),
        "right" => Some(KeyCode::Right),
        "up" => Some(KeyCode::Up),
        "down" => Some(KeyCode::Down),
        "home" => Some(KeyCode::Home),
        "end" => Some(KeyCode::End),
        "pageup" | "pgup" => Some(KeyCode::PageUp),
        "pagedown" | "pgdn" => Some(KeyCode::PageDown),
        _ => {
            // Single character after modifier (e.g., "j" in "<C-j>")
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(KeyCode::Char(c.to_ascii_lowercase())),
                _ => None,
            }
        }
    }
}
