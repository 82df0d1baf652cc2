//! Natural-language command pipeline: classify, translate, repair, gate, execute.

mod classify;
mod interpret;
mod repair;

#[cfg(test)]
mod tests;

pub use classify::is_natural_language;
pub use interpret::{
    Interpretation, Interpreter, LiveInterpreter, TranslateError, UnavailableInterpreter,
    parse_interpretation,
};
pub use repair::{MIN_SIMILARITY, fuzzy_fix, fuzzy_fix_in, similarity_ratio};

use crate::safety::{SafetyGuard, SafetyResult};
use anyhow::Result;
use mysh_types::Context;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// Translations at or above this confidence run without asking.
pub const AUTO_EXECUTE_CONFIDENCE: u8 = 85;

pub const CONFIRM_PROMPT: &str = "Run this? [y/N]: ";

/// Terminal state of one natural-language line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NlOutcome {
    Executed,
    Declined,
    Blocked,
    Skipped,
}

/// Asks the user to approve a low-confidence translation.
pub trait Confirmation: Send + Sync {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Runs one `;`-separated segment the way a typed line would run.
pub trait SegmentExecutor {
    fn execute_segment(&mut self, ctx: &Context, segment: &str) -> Result<()>;
}

#[derive(Clone)]
pub struct Orchestrator {
    interpreter: Arc<dyn Interpreter>,
    confirmation: Arc<dyn Confirmation>,
    guard: SafetyGuard,
    workdir: Option<PathBuf>,
}

impl Orchestrator {
    pub fn new(interpreter: Arc<dyn Interpreter>, confirmation: Arc<dyn Confirmation>) -> Self {
        Self {
            interpreter,
            confirmation,
            guard: SafetyGuard::new(),
            workdir: None,
        }
    }

    /// Repairs against `dir` instead of the process working directory.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    pub fn run(&self, ctx: &Context, text: &str, executor: &mut dyn SegmentExecutor) -> NlOutcome {
        let interpretation = match self.interpreter.translate(text) {
            Ok(interpretation) => interpretation,
            Err(err) => {
                warn!("translation failed for {text:?}: {err}");
                let _ = ctx.write_stderr(&format!("AI error: {err}"));
                return NlOutcome::Skipped;
            }
        };
        debug!("interpretation: {:?}", interpretation);

        let (command, notes) = match &self.workdir {
            Some(dir) => fuzzy_fix_in(dir, &interpretation.command),
            None => fuzzy_fix(&interpretation.command),
        };
        if !notes.is_empty() {
            let _ = ctx.write_stdout(&format!("Fuzzy fix: {}", notes.join(", ")));
        }

        // requoting can split a pattern such as `dd if=`, so the raw translation is checked too
        if [command.as_str(), interpretation.command.as_str()]
            .iter()
            .any(|candidate| matches!(self.guard.check(candidate), SafetyResult::Denied(_)))
        {
            let _ = ctx.write_stdout("⚠️ Dangerous command blocked.");
            return NlOutcome::Blocked;
        }

        let _ = ctx.write_stdout(&format!("Interpreted as: {command}"));
        let _ = ctx.write_stdout(&format!("Explanation : {}", interpretation.explanation));
        let _ = ctx.write_stdout(&format!("Confidence  : {}%", interpretation.confidence));

        if interpretation.confidence >= AUTO_EXECUTE_CONFIDENCE {
            let _ = ctx.write_stdout("Auto-executing...");
        } else {
            match self.confirmation.confirm(CONFIRM_PROMPT) {
                Ok(true) => {}
                Ok(false) => return NlOutcome::Declined,
                Err(err) => {
                    warn!("confirmation failed: {err:#}");
                    return NlOutcome::Declined;
                }
            }
        }

        execute_segments(ctx, &command, executor);
        NlOutcome::Executed
    }
}

/// Runs every non-empty segment; a failing segment is reported and the rest still run.
fn execute_segments(ctx: &Context, command: &str, executor: &mut dyn SegmentExecutor) {
    for segment in command.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        if let Err(err) = executor.execute_segment(ctx, segment) {
            let _ = ctx.write_stderr(&format!("execution error: {err:#}"));
        }
    }
}
