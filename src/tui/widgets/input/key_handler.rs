use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{InputAction, InputWidget};

impl InputWidget<'_> {
    pub fn handle_key(&mut self, key: KeyEvent) -> InputAction {
        if !self.enabled {
            return InputAction::Blocked;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Enter, KeyModifiers::SHIFT | KeyModifiers::ALT) => {
                self.textarea.insert_newline();
                InputAction::Continue
            }
            (KeyCode::Enter, KeyModifiers::NONE) => {
                if self.is_empty() {
                    InputAction::Continue
                } else {
                    InputAction::Submit(self.prompt())
                }
            }

            (KeyCode::Char('k' | 'u'), KeyModifiers::CONTROL) => {
                self.clear();
                InputAction::Clear
            }

            _ => {
                self.textarea.input(key);
                InputAction::Continue
            }
        }
    }

    pub fn handle_paste(&mut self, text: &str) -> InputAction {
        if !self.enabled {
            return InputAction::Blocked;
        }

        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, line) in normalized.split('\n').enumerate() {
            if i > 0 {
                self.textarea.insert_newline();
            }
            for ch in line.chars() {
                self.textarea.insert_char(ch);
            }
        }

        InputAction::Continue
    }
}
