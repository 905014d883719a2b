/// Longest quick-pick input accepted from the keyboard.
const MAX_INPUT_LEN: usize = 7;

/// State of the "pick N total" overlay.
#[derive(Debug, Clone, Default)]
pub struct QuickPickState {
    pub active: bool,
    pub buffer: String,
}

impl QuickPickState {
    /// Open the overlay pre-filled with the current request (empty when 0).
    pub fn open(&mut self, current: usize) {
        self.active = true;
        self.buffer = if current > 0 {
            current.to_string()
        } else {
            String::new()
        };
    }

    pub fn close(&mut self) {
        self.active = false;
        self.buffer.clear();
    }

    /// Append a typed character. Only digits and a leading `-` are kept;
    /// anything else is silently dropped.
    pub fn push(&mut self, c: char) {
        if self.buffer.len() >= MAX_INPUT_LEN {
            return;
        }
        if c.is_ascii_digit() || (c == '-' && self.buffer.is_empty()) {
            self.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        self.buffer.pop();
    }
}
