//! Deny-list gate applied to every translated command before it can run.

use tracing::warn;

#[derive(Debug, Clone, PartialEq)]
pub enum SafetyResult {
    Allowed,
    Denied(String),
}

/// Substrings that block a command outright. Matched against the lower-cased command.
const DENY_LIST: &[&str] = &[
    // file system wipes and raw disk writes
    "rm -rf",
    "rm -fr",
    "mkfs",
    "dd if",
    "> /dev/sd",
    // power state
    "shutdown",
    "reboot",
    "poweroff",
    // fork bomb
    ":(){",
    // recursive permission changes
    "chmod -r 777",
    "chmod 777 -r",
    "chmod --recursive",
    // killing by name, stopping services
    "killall",
    "pkill",
    "systemctl stop",
];

#[derive(Debug, Clone)]
pub struct SafetyGuard {
    deny_list: Vec<String>,
}

impl Default for SafetyGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl SafetyGuard {
    pub fn new() -> Self {
        Self::with_patterns(DENY_LIST.iter().copied())
    }

    /// Builds a guard from custom patterns. Patterns are lower-cased on the way in.
    pub fn with_patterns<'a>(patterns: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            deny_list: patterns.into_iter().map(str::to_lowercase).collect(),
        }
    }

    pub fn check(&self, command: &str) -> SafetyResult {
        let lowered = command.to_lowercase();
        match self
            .deny_list
            .iter()
            .find(|pattern| lowered.contains(pattern.as_str()))
        {
            Some(pattern) => {
                warn!("blocked command {command:?}: matches {pattern:?}");
                SafetyResult::Denied(pattern.clone())
            }
            None => SafetyResult::Allowed,
        }
    }

    pub fn is_dangerous(&self, command: &str) -> bool {
        matches!(self.check(command), SafetyResult::Denied(_))
    }
}
