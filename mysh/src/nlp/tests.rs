//! Tests for the natural-language pipeline.

use super::*;
use crate::environment::Environment;
use anyhow::anyhow;
use mysh_types::ShellMode;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

struct FakeInterpreter {
    reply: Result<Interpretation, String>,
    requests: Mutex<Vec<String>>,
}

impl FakeInterpreter {
    fn replying(command: &str, confidence: u8) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(Interpretation {
                command: command.to_string(),
                explanation: "test".to_string(),
                confidence,
            }),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(reason.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }
}

impl Interpreter for FakeInterpreter {
    fn translate(&self, instruction: &str) -> Result<Interpretation, TranslateError> {
        self.requests.lock().unwrap().push(instruction.to_string());
        self.reply
            .clone()
            .map_err(|reason| TranslateError::Service(anyhow!(reason)))
    }
}

struct FakeConfirmation {
    answer: bool,
    asked: AtomicUsize,
}

impl FakeConfirmation {
    fn answering(answer: bool) -> Arc<Self> {
        Arc::new(Self {
            answer,
            asked: AtomicUsize::new(0),
        })
    }

    fn times_asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmation for FakeConfirmation {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        assert_eq!(prompt, CONFIRM_PROMPT);
        self.asked.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

#[derive(Default)]
struct RecordingExecutor {
    segments: Vec<String>,
    fail_on: Option<String>,
}

impl SegmentExecutor for RecordingExecutor {
    fn execute_segment(&mut self, _ctx: &Context, segment: &str) -> Result<()> {
        self.segments.push(segment.to_string());
        if self.fail_on.as_deref() == Some(segment) {
            return Err(anyhow!("boom"));
        }
        Ok(())
    }
}

fn ctx() -> Context {
    Context::new(ShellMode::Command)
}

fn orchestrator(
    interpreter: Arc<FakeInterpreter>,
    confirmation: Arc<FakeConfirmation>,
    dir: &TempDir,
) -> Orchestrator {
    Orchestrator::new(interpreter, confirmation).with_workdir(dir.path())
}

#[test]
fn test_high_confidence_runs_every_segment() {
    let dir = TempDir::new().unwrap();
    let confirm = FakeConfirmation::answering(false);
    let orch = orchestrator(FakeInterpreter::replying("ls -la; pwd;", 92), confirm.clone(), &dir);
    let mut exec = RecordingExecutor::default();

    assert_eq!(orch.run(&ctx(), "show me the files", &mut exec), NlOutcome::Executed);
    assert_eq!(exec.segments, vec!["ls -la", "pwd"]);
    assert_eq!(confirm.times_asked(), 0);
}

#[test]
fn test_threshold_is_inclusive() {
    let dir = TempDir::new().unwrap();
    let confirm = FakeConfirmation::answering(false);
    let orch = orchestrator(FakeInterpreter::replying("pwd", 85), confirm.clone(), &dir);
    let mut exec = RecordingExecutor::default();

    assert_eq!(orch.run(&ctx(), "where am i", &mut exec), NlOutcome::Executed);
    assert_eq!(confirm.times_asked(), 0);
}

#[test]
fn test_deny_list_beats_confidence() {
    let dir = TempDir::new().unwrap();
    for command in ["rm -rf /tmp/x", "shutdown -h now"] {
        let confirm = FakeConfirmation::answering(true);
        let orch = orchestrator(FakeInterpreter::replying(command, 99), confirm.clone(), &dir);
        let mut exec = RecordingExecutor::default();

        assert_eq!(orch.run(&ctx(), "wipe it all", &mut exec), NlOutcome::Blocked);
        assert!(exec.segments.is_empty());
        assert_eq!(confirm.times_asked(), 0);
    }
}

#[test]
fn test_low_confidence_asks_first() {
    let dir = TempDir::new().unwrap();

    let yes = FakeConfirmation::answering(true);
    let orch = orchestrator(FakeInterpreter::replying("pwd", 40), yes.clone(), &dir);
    let mut exec = RecordingExecutor::default();
    assert_eq!(orch.run(&ctx(), "where am i", &mut exec), NlOutcome::Executed);
    assert_eq!(exec.segments, vec!["pwd"]);
    assert_eq!(yes.times_asked(), 1);

    let no = FakeConfirmation::answering(false);
    let orch = orchestrator(FakeInterpreter::replying("pwd", 84), no.clone(), &dir);
    let mut exec = RecordingExecutor::default();
    assert_eq!(orch.run(&ctx(), "where am i", &mut exec), NlOutcome::Declined);
    assert!(exec.segments.is_empty());
    assert_eq!(no.times_asked(), 1);
}

#[test]
fn test_translation_failure_skips() {
    let dir = TempDir::new().unwrap();
    let interpreter = FakeInterpreter::failing("network down");
    let orch = orchestrator(interpreter.clone(), FakeConfirmation::answering(true), &dir);
    let mut exec = RecordingExecutor::default();

    assert_eq!(orch.run(&ctx(), "list my files", &mut exec), NlOutcome::Skipped);
    assert!(exec.segments.is_empty());
    assert_eq!(*interpreter.requests.lock().unwrap(), vec!["list my files"]);
}

#[test]
fn test_repaired_command_is_executed() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.txt"), "q3").unwrap();
    let orch = orchestrator(
        FakeInterpreter::replying("cat report.tx", 95),
        FakeConfirmation::answering(false),
        &dir,
    );
    let mut exec = RecordingExecutor::default();

    assert_eq!(orch.run(&ctx(), "show the report", &mut exec), NlOutcome::Executed);
    assert_eq!(exec.segments, vec!["cat report.txt"]);
}

#[test]
fn test_failing_segment_does_not_abort() {
    let dir = TempDir::new().unwrap();
    let orch = orchestrator(
        FakeInterpreter::replying("pwd; ls", 90),
        FakeConfirmation::answering(false),
        &dir,
    );
    let mut exec = RecordingExecutor {
        fail_on: Some("pwd".to_string()),
        ..Default::default()
    };

    assert_eq!(orch.run(&ctx(), "where and what", &mut exec), NlOutcome::Executed);
    assert_eq!(exec.segments, vec!["pwd", "ls"]);
}

#[test]
fn test_is_natural_language() {
    let bin = TempDir::new().unwrap();
    let env = Environment::with_paths(vec![bin.path().to_string_lossy().into_owned()]);

    assert!(is_natural_language("open my config file", &env));
    assert!(!is_natural_language("openconfig", &env));
    assert!(!is_natural_language("cd somewhere else", &env));
    assert!(!is_natural_language("history -c", &env));
    assert!(!is_natural_language("/ is the root", &env));
}

#[test]
fn test_is_natural_language_respects_search_path() {
    use std::os::unix::fs::PermissionsExt;

    let bin = TempDir::new().unwrap();
    let tool = bin.path().join("frobnicate");
    std::fs::write(&tool, "#!/bin/sh\n").unwrap();
    std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
    let env = Environment::with_paths(vec![bin.path().to_string_lossy().into_owned()]);

    assert!(!is_natural_language("frobnicate all the things", &env));
    assert!(is_natural_language("defrobnicate all the things", &env));
}

#[test]
fn test_parse_interpretation_tolerates_prose() {
    let reply = "Sure! Here it is:\n```json\n{\"command\": \" ls -la \", \"explanation\": \"list\", \"confidence\": 91}\n```\nEnjoy.";
    let parsed = parse_interpretation(reply).unwrap();
    assert_eq!(
        parsed,
        Interpretation {
            command: "ls -la".to_string(),
            explanation: "list".to_string(),
            confidence: 91,
        }
    );
}

#[test]
fn test_parse_interpretation_coerces_confidence() {
    let parse = |confidence: &str| {
        parse_interpretation(&format!("{{\"command\": \"ls\"{confidence}}}"))
            .map(|i| i.confidence)
    };
    assert_eq!(parse("").unwrap(), 0);
    assert_eq!(parse(", \"confidence\": null").unwrap(), 0);
    assert_eq!(parse(", \"confidence\": \"87\"").unwrap(), 87);
    assert_eq!(parse(", \"confidence\": 92.7").unwrap(), 92);
    assert_eq!(parse(", \"confidence\": 150").unwrap(), 100);
    assert_eq!(parse(", \"confidence\": -3").unwrap(), 0);
    assert!(matches!(
        parse(", \"confidence\": \"high\""),
        Err(TranslateError::Confidence(_))
    ));
}

#[test]
fn test_parse_interpretation_errors() {
    assert!(matches!(
        parse_interpretation("no json here"),
        Err(TranslateError::MissingPayload)
    ));
    assert!(matches!(
        parse_interpretation("} backwards {"),
        Err(TranslateError::MissingPayload)
    ));
    assert!(matches!(
        parse_interpretation("{\"explanation\": \"no command\"}"),
        Err(TranslateError::Malformed(_))
    ));
    assert!(matches!(
        parse_interpretation("{\"command\": \"   \"}"),
        Err(TranslateError::EmptyCommand)
    ));
}

#[test]
fn test_unavailable_interpreter_reports_reason() {
    let interpreter = UnavailableInterpreter::new("API key is not configured");
    let err = interpreter.translate("list files").unwrap_err();
    assert_eq!(err.to_string(), "API key is not configured");
}

#[test]
fn test_similarity_ratio() {
    assert_eq!(similarity_ratio("abcd", "bcde"), 0.75);
    assert_eq!(similarity_ratio("apple", "appel"), 0.8);
    assert_eq!(similarity_ratio("ape", "appel"), 0.75);
    assert_eq!(similarity_ratio("peach", "appel"), 0.4);
    assert_eq!(similarity_ratio("", ""), 1.0);
    assert_eq!(similarity_ratio("same", "same"), 1.0);
}

#[test]
fn test_fuzzy_fix_replaces_close_names() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.txt"), "").unwrap();
    std::fs::create_dir(dir.path().join("projects")).unwrap();

    let (fixed, notes) = fuzzy_fix_in(dir.path(), "cat report.tx; cd project");
    assert_eq!(fixed, "cat report.txt; cd projects/");
    assert_eq!(notes, vec!["report.tx → report.txt", "project → projects/"]);
}

#[test]
fn test_fuzzy_fix_keeps_existing_and_unmatched_tokens() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("report.txt"), "").unwrap();
    std::fs::write(dir.path().join("report.txu"), "").unwrap();

    let (fixed, notes) = fuzzy_fix_in(dir.path(), "wc report.txu zzzzzz");
    assert_eq!(fixed, "wc report.txu zzzzzz");
    assert!(notes.is_empty());
}

#[test]
fn test_fuzzy_fix_keeps_unparsable_segment() {
    let dir = TempDir::new().unwrap();
    let (fixed, notes) = fuzzy_fix_in(dir.path(), "echo 'unterminated ;  ls");
    assert_eq!(fixed, "echo 'unterminated; ls");
    assert!(notes.is_empty());
}

#[test]
fn test_fuzzy_fix_ties_go_to_greater_name() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("data1"), "").unwrap();
    std::fs::write(dir.path().join("data2"), "").unwrap();

    let (fixed, notes) = fuzzy_fix_in(dir.path(), "cat data");
    assert_eq!(fixed, "cat data2");
    assert_eq!(notes, vec!["data → data2"]);
}
