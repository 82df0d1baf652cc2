//! Event expansion: `!!`, `!N` and `!prefix`.

use super::{HistoryError, HistoryStore};

impl HistoryStore {
    /// Resolves a history reference. Text that is not a reference comes back unchanged.
    /// Never modifies the log.
    pub fn expand(&self, text: &str) -> Result<String, HistoryError> {
        let Some(rest) = text.strip_prefix('!') else {
            return Ok(text.to_string());
        };

        if rest == "!" {
            return self
                .last()
                .map(str::to_string)
                .ok_or(HistoryError::Empty);
        }

        if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            return rest
                .parse::<usize>()
                .ok()
                .and_then(|n| self.get(n))
                .map(str::to_string)
                .ok_or_else(|| HistoryError::NoSuchEvent(text.to_string()));
        }

        if rest.is_empty() {
            return Ok(text.to_string());
        }

        self.iter()
            .rev()
            .find(|record| record.starts_with(rest))
            .cloned()
            .ok_or_else(|| HistoryError::NoPrefixMatch(rest.to_string()))
    }
}

/// Whether a line should go through event expansion.
pub fn is_event_reference(text: &str) -> bool {
    text.starts_with('!')
}
