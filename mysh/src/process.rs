//! Delegation of non-builtin commands to the operating system.

use mysh_types::{ExitStatus, MyshError, MyshResult};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use std::io;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Command, Stdio};
use tracing::debug;

/// Keyboard-generated signals the shell itself must survive.
const INTERACTIVE_SIGNALS: [Signal; 3] = [Signal::SIGINT, Signal::SIGQUIT, Signal::SIGTSTP];

fn set_signals(handler: SigHandler) -> nix::Result<()> {
    let action = SigAction::new(handler, SaFlags::empty(), SigSet::empty());
    for signal in INTERACTIVE_SIGNALS {
        // SAFETY: only SIG_IGN or SIG_DFL is installed, no handler code runs.
        unsafe { sigaction(signal, &action) }?;
    }
    Ok(())
}

/// Ignores Ctrl-C, Ctrl-\ and Ctrl-Z in the shell process so they only reach
/// the foreground child.
pub fn ignore_interactive_signals() -> nix::Result<()> {
    set_signals(SigHandler::SigIgn)
}

/// Spawns `argv` with inherited stdio and waits for it to finish.
///
/// A missing program is reported as [`MyshError::CommandNotFound`], every other
/// spawn failure as [`MyshError::Process`].
pub fn run_external(argv: &[String]) -> MyshResult<ExitStatus> {
    let (program, args) = argv.split_first().ok_or_else(|| MyshError::Process {
        message: "empty command".to_string(),
    })?;
    debug!("spawning {:?}", argv);

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    // Ignored dispositions survive exec, so the child gets the defaults back.
    // SAFETY: sigaction is async-signal-safe and nothing is allocated.
    unsafe {
        command.pre_exec(|| set_signals(SigHandler::SigDfl).map_err(io::Error::from));
    }

    let status = command
        .status()
        .map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => MyshError::CommandNotFound(program.clone()),
            _ => MyshError::Process {
                message: format!("{program}: {err}"),
            },
        })?;

    let code = match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    };
    debug!("{} exited with {}", program, code);
    Ok(ExitStatus::ExitedWith(code))
}
