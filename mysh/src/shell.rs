//! One shell session: expansion, classification, dispatch and delegation of input lines.

use crate::dispatch::{self, CommandInvocation, DispatchOutcome};
use crate::environment::Environment;
use crate::history::{HistoryStore, is_event_reference};
use crate::nlp::{self, Orchestrator, SegmentExecutor};
use anyhow::{Result, anyhow};
use mysh_types::{Context, MyshError};
use tracing::{debug, warn};

/// What the session loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    /// History was cleared; the line editor must drop its copy.
    HistoryCleared,
    Exit,
}

pub struct Shell {
    pub environment: Environment,
    pub history: HistoryStore,
    orchestrator: Orchestrator,
    exited: bool,
    history_cleared: bool,
}

impl Shell {
    pub fn new(environment: Environment, history: HistoryStore, orchestrator: Orchestrator) -> Self {
        Shell {
            environment,
            history,
            orchestrator,
            exited: false,
            history_cleared: false,
        }
    }

    pub fn exit(&mut self) {
        debug!("exit requested");
        self.exited = true;
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Evaluates one input line to completion.
    pub fn eval_line(&mut self, ctx: &Context, line: &str) -> LineOutcome {
        // surrounding spaces are kept: they decide expansion and are recorded as typed
        let text = line.trim_end_matches(['\n', '\r']);
        if text.trim().is_empty() {
            return LineOutcome::Continue;
        }
        self.history_cleared = false;

        let mut record = true;
        let text = if is_event_reference(text) {
            match self.history.expand(text.trim()) {
                Ok(expanded) if expanded != text => {
                    let _ = ctx.write_stdout(&expanded);
                    record = false;
                    expanded
                }
                Ok(unchanged) => unchanged,
                Err(err) => {
                    let _ = ctx.write_stderr(&err.to_string());
                    return LineOutcome::Continue;
                }
            }
        } else {
            text.to_string()
        };

        if nlp::is_natural_language(&text, &self.environment) {
            let orchestrator = self.orchestrator.clone();
            let outcome = orchestrator.run(ctx, &text, self);
            debug!("natural language line {:?}: {:?}", text, outcome);
        } else {
            self.run_direct(ctx, &text, record);
        }

        if self.exited {
            LineOutcome::Exit
        } else if self.history_cleared {
            LineOutcome::HistoryCleared
        } else {
            LineOutcome::Continue
        }
    }

    fn run_direct(&mut self, ctx: &Context, text: &str, record: bool) {
        let invocation = match CommandInvocation::parse(text) {
            Ok(Some(invocation)) => invocation,
            Ok(None) => return,
            Err(err) => {
                let _ = ctx.write_stderr(&format!("syntax error: {err}"));
                return;
            }
        };

        if record && let Err(err) = self.history.append(text) {
            warn!("failed to record history: {err}");
        }
        self.execute(ctx, &invocation);
    }

    /// Runs a builtin, or delegates to the operating system.
    fn execute(&mut self, ctx: &Context, invocation: &CommandInvocation) {
        match dispatch::dispatch(ctx, invocation, self) {
            DispatchOutcome::Handled => {}
            DispatchOutcome::HistoryWasCleared => self.history_cleared = true,
            DispatchOutcome::NotABuiltin => match crate::process::run_external(invocation.argv()) {
                Ok(status) => debug!("{} finished: {:?}", invocation.name(), status),
                Err(err @ MyshError::CommandNotFound(_)) => {
                    let _ = ctx.write_stderr(&err.to_string());
                }
                Err(err) => {
                    let _ = ctx.write_stderr(&format!("error: {err}"));
                }
            },
        }
    }
}

impl SegmentExecutor for Shell {
    fn execute_segment(&mut self, ctx: &Context, segment: &str) -> Result<()> {
        if self.exited {
            return Ok(());
        }
        let invocation = CommandInvocation::parse(segment)?
            .ok_or_else(|| anyhow!("empty command: {segment:?}"))?;
        self.execute(ctx, &invocation);
        Ok(())
    }
}
