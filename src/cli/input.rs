//! Keystroke input handling using crossterm
//!
//! Features:
//! - Non-blocking keystroke capture
//! - Digit and letter pickers for menus and game choices
//! - Ctrl+C graceful exit

use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use std::io::Result as IoResult;
use std::time::Duration;

/// Handles user input from terminal
pub struct InputHandler {
    /// Timeout for poll operations (milliseconds)
    poll_timeout: Duration,
}

impl InputHandler {
    /// Create new input handler with default timeout (50ms for responsive input)
    pub fn new() -> Self {
        InputHandler {
            poll_timeout: Duration::from_millis(50),
        }
    }

    /// Enable raw mode for terminal input
    pub fn enable_raw_mode() -> IoResult<()> {
        crossterm::terminal::enable_raw_mode()
    }

    /// Disable raw mode and restore terminal
    pub fn disable_raw_mode() -> IoResult<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// Poll for keystroke with timeout (non-blocking)
    /// Returns Some(KeyEvent) if key pressed, None if timeout
    pub fn read_key(&self) -> Result<Option<KeyEvent>, Box<dyn std::error::Error>> {
        if event::poll(self.poll_timeout)? {
            match event::read()? {
                event::Event::Key(key_event) => Ok(Some(key_event)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Check if key event is an exit signal (Ctrl+C or Escape)
    pub fn is_exit(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            KeyCode::Esc => true,
            _ => false,
        }
    }

    /// Convert key event to character
    pub fn key_to_char(key: &KeyEvent) -> Option<char> {
        match key.code {
            // Regular character input (including space which is KeyCode::Char(' '))
            KeyCode::Char(c) => {
                // Only return if no special modifiers (not Ctrl, not Alt)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT)
                {
                    Some(c)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Zero-based index for digit keys 1-9
    pub fn digit_choice(key: &KeyEvent) -> Option<usize> {
        match Self::key_to_char(key) {
            Some(c @ '1'..='9') => Some(c as usize - '1' as usize),
            _ => None,
        }
    }

    /// Zero-based index for letter keys a-e
    pub fn letter_choice(key: &KeyEvent) -> Option<usize> {
        match Self::key_to_char(key) {
            Some(c @ 'a'..='e') => Some(c as usize - 'a' as usize),
            _ => None,
        }
    }

    /// Check if key is backspace
    pub fn is_backspace(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Backspace)
    }

    /// Check if key is enter/return
    pub fn is_enter(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Enter)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    #[test]
    fn test_digit_choice_maps_to_index() {
        assert_eq!(InputHandler::digit_choice(&key(KeyCode::Char('1'))), Some(0));
        assert_eq!(InputHandler::digit_choice(&key(KeyCode::Char('4'))), Some(3));
        assert_eq!(InputHandler::digit_choice(&key(KeyCode::Char('0'))), None);
        assert_eq!(InputHandler::digit_choice(&key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_letter_choice_maps_to_index() {
        assert_eq!(InputHandler::letter_choice(&key(KeyCode::Char('a'))), Some(0));
        assert_eq!(InputHandler::letter_choice(&key(KeyCode::Char('e'))), Some(4));
        assert_eq!(InputHandler::letter_choice(&key(KeyCode::Char('f'))), None);
    }

    #[test]
    fn test_ctrl_c_is_exit() {
        let exit = KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        };
        assert!(InputHandler::is_exit(&exit));
        assert!(InputHandler::is_exit(&key(KeyCode::Esc)));
        assert!(!InputHandler::is_exit(&key(KeyCode::Char('c'))));
    }
}
