use crossterm::style::{Color, Stylize};
use std::cmp::min;
use std::fmt;

const INITIAL_CAP: usize = 256;

#[derive(Debug, Clone)]
pub struct InputConfig {
    pub fg_color: Color,
    pub completion_color: Color,
}

impl Default for InputConfig {
    fn default() -> InputConfig {
        InputConfig {
            fg_color: Color::Reset,
            completion_color: Color::DarkGrey,
        }
    }
}

/// Line buffer with a character-indexed cursor.
#[derive(Debug, Clone)]
pub struct Input {
    config: InputConfig,
    cursor: usize,
    input: String,
    indices: Vec<usize>,

    pub completion: Option<String>,
}

impl Input {
    pub fn new(config: InputConfig) -> Input {
        Input {
            config,
            cursor: 0,
            input: String::with_capacity(INITIAL_CAP),
            indices: Vec::with_capacity(INITIAL_CAP),
            completion: None,
        }
    }

    pub fn reset(&mut self, input: String) {
        self.input = input;
        self.update_indices();
        self.move_to_end();
        self.completion = None;
    }

    pub fn as_str(&self) -> &str {
        self.input.as_str()
    }

    pub fn clear(&mut self) {
        self.cursor = 0;
        self.input.clear();
        self.indices.clear();
        self.completion = None;
    }

    pub fn move_to_begin(&mut self) {
        self.cursor = 0;
    }

    pub fn move_to_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn is_at_end(&self) -> bool {
        self.cursor == self.len()
    }

    pub fn insert(&mut self, ch: char) {
        self.input.insert(self.byte_index(), ch);
        self.update_indices();
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, string: &str) {
        self.input.insert_str(self.byte_index(), string);
        self.update_indices();
        self.cursor += string.chars().count();
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.input.remove(self.byte_index());
            self.update_indices();
        }
    }

    /// Removes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.len() {
            self.input.remove(self.byte_index());
            self.update_indices();
        }
    }

    /// Drops everything before the cursor.
    pub fn kill_to_begin(&mut self) {
        let end = self.byte_index();
        self.input.replace_range(..end, "");
        self.update_indices();
        self.cursor = 0;
    }

    pub fn move_by(&mut self, offset: isize) {
        if offset < 0 {
            self.cursor = self.cursor.saturating_sub(offset.unsigned_abs());
        } else {
            self.cursor = min(self.len(), self.cursor + offset.unsigned_abs());
        }
    }

    /// Text left of the cursor.
    pub fn before_cursor(&self) -> &str {
        &self.input[..self.byte_index()]
    }

    fn byte_index(&self) -> usize {
        if self.cursor == self.indices.len() {
            self.input.len()
        } else {
            self.indices[self.cursor]
        }
    }

    fn update_indices(&mut self) {
        self.indices.clear();
        for index in self.input.char_indices() {
            self.indices.push(index.0);
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }

    /// The buffer followed by the pending completion as ghost text.
    pub fn styled(&self) -> String {
        let mut out = format!("{}", self.as_str().with(self.config.fg_color));
        if let Some(completion) = &self.completion {
            out.push_str(&format!(
                "{}",
                completion.as_str().with(self.config.completion_color)
            ));
        }
        out
    }

    /// Inserts the pending completion at the cursor. Returns false if there was none.
    pub fn accept_completion(&mut self) -> bool {
        match self.completion.take() {
            Some(completion) => {
                self.insert_str(&completion);
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.input.as_str())
    }
}
