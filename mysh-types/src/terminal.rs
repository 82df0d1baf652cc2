use nix::unistd::isatty;
use std::os::unix::io::RawFd;
use tracing::debug;

/// Whether the shell talks to a terminal or is being fed from a pipe or a `-c` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Interactive,
    Pipe,
    Command,
}

/// Structure representing terminal state
#[derive(Debug, Clone, Copy)]
pub struct TerminalState {
    /// Whether the specified file descriptor is a terminal
    pub is_terminal: bool,
}

impl TerminalState {
    /// Detect terminal state for the specified file descriptor
    pub fn detect(fd: RawFd) -> Self {
        let is_terminal = isatty(fd).unwrap_or(false);
        debug!("Terminal detection for fd {}: {}", fd, is_terminal);
        Self { is_terminal }
    }
}
