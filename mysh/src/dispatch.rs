//! Builtin dispatch over the shared registry.

use mysh_builtin::{ShellProxy, get_command};
use mysh_types::{Context, ExitStatus};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Handled,
    /// The line editor's history must be replaced.
    HistoryWasCleared,
    NotABuiltin,
}

/// A tokenized command line. The first word is the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    argv: Vec<String>,
}

impl CommandInvocation {
    /// Tokenizes `line` with POSIX shell quoting rules. `Ok(None)` if there are no words.
    pub fn parse(line: &str) -> Result<Option<Self>, shell_words::ParseError> {
        Ok(Self::new(shell_words::split(line)?))
    }

    pub fn new(argv: Vec<String>) -> Option<Self> {
        (!argv.is_empty()).then_some(Self { argv })
    }

    pub fn name(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }
}

pub fn dispatch(
    ctx: &Context,
    invocation: &CommandInvocation,
    proxy: &mut dyn ShellProxy,
) -> DispatchOutcome {
    let Some(handler) = get_command(invocation.name()) else {
        return DispatchOutcome::NotABuiltin;
    };

    match handler(ctx, invocation.argv.clone(), proxy) {
        ExitStatus::HistoryCleared => DispatchOutcome::HistoryWasCleared,
        status => {
            debug!("builtin {} finished: {:?}", invocation.name(), status);
            DispatchOutcome::Handled
        }
    }
}
