use libc::{STDERR_FILENO, STDIN_FILENO, STDOUT_FILENO};
use std::fmt::Debug;
use std::fs::File;
use std::io::{self, Write};
use std::mem;
use std::os::unix::io::FromRawFd;
use std::os::unix::io::RawFd;
use thiserror::Error;

pub mod terminal;
pub use terminal::{ShellMode, TerminalState};

/// mysh specific error types
#[derive(Error, Debug)]
pub enum MyshError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("Process execution failed: {message}")]
    Process { message: String },

    #[error("{path}: {source}")]
    File {
        operation: &'static str,
        path: String,
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type MyshResult<T> = std::result::Result<T, MyshError>;

/// Per-session I/O context handed to every builtin.
#[derive(Clone, Copy)]
pub struct Context {
    pub terminal_state: TerminalState,
    pub shell_mode: ShellMode,
    pub infile: RawFd,
    pub outfile: RawFd,
    pub errfile: RawFd,
}

impl Context {
    pub fn new(shell_mode: ShellMode) -> Self {
        let terminal_state = TerminalState::detect(STDIN_FILENO);
        Context {
            terminal_state,
            shell_mode,
            infile: STDIN_FILENO,
            outfile: STDOUT_FILENO,
            errfile: STDERR_FILENO,
        }
    }
}

impl Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Context")
            .field("terminal_state", &self.terminal_state)
            .field("shell_mode", &self.shell_mode)
            .field("infile", &self.infile)
            .field("outfile", &self.outfile)
            .field("errfile", &self.errfile)
            .finish()
    }
}

impl Context {
    pub fn write_stdout(&self, msg: &str) -> io::Result<()> {
        Self::write_line(self.outfile, msg)
    }

    pub fn write_stderr(&self, msg: &str) -> io::Result<()> {
        Self::write_line(self.errfile, msg)
    }

    /// Writes without a trailing newline, used for file contents that carry their own.
    pub fn write_stdout_raw(&self, msg: &str) -> io::Result<()> {
        let mut file = unsafe { File::from_raw_fd(self.outfile) };
        let res = file.write_all(msg.as_bytes()).and_then(|_| file.flush());
        mem::forget(file);
        res
    }

    fn write_line(fd: RawFd, msg: &str) -> io::Result<()> {
        let mut file = unsafe { File::from_raw_fd(fd) };
        let res = writeln!(&mut file, "{msg}");
        mem::forget(file);
        res
    }
}

/// Result of running a builtin.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    ExitedWith(i32),
    /// The builtin emptied the command history; anything caching it must be rebuilt.
    HistoryCleared,
    /// The builtin asked the session to terminate.
    Exit,
}
