/// The line editor's own history, walked with Up/Down.
///
/// Seeded from the session's HistoryStore and replaced with a fresh one when
/// history is cleared.
#[derive(Debug, Default)]
pub struct ReplHistory {
    entries: Vec<String>,
    position: Option<usize>,
    draft: String,
}

impl ReplHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: &[String]) -> Self {
        let mut history = Self::new();
        for record in records {
            history.push(record);
        }
        history
    }

    /// Adds a submitted line. Blank lines and repeats of the newest entry are ignored.
    pub fn push(&mut self, line: &str) {
        self.position = None;
        if line.trim().is_empty() || self.entries.last().map(String::as_str) == Some(line) {
            return;
        }
        self.entries.push(line.to_string());
    }

    /// Steps to the previous entry. `current` is kept so walking forward past the
    /// newest entry restores it.
    pub fn back(&mut self, current: &str) -> Option<&str> {
        let next = match self.position {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => 0,
            Some(pos) => pos - 1,
        };
        self.position = Some(next);
        self.entries.get(next).map(String::as_str)
    }

    pub fn forward(&mut self) -> Option<&str> {
        let pos = self.position?;
        if pos + 1 < self.entries.len() {
            self.position = Some(pos + 1);
            self.entries.get(pos + 1).map(String::as_str)
        } else {
            self.position = None;
            Some(self.draft.as_str())
        }
    }

    pub fn reset_position(&mut self) {
        self.position = None;
        self.draft.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
