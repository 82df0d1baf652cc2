//! Shared fixtures for builtin tests.

use super::ShellProxy;
use anyhow::{Result, anyhow};
use mysh_types::{Context, ExitStatus, ShellMode};
use std::collections::HashSet;

pub(crate) fn test_context() -> Context {
    Context::new(ShellMode::Command)
}

// Mock ShellProxy for testing
#[derive(Default)]
pub(crate) struct MockShellProxy {
    pub exited: bool,
    pub cwd: Option<String>,
    pub history: Vec<String>,
    pub installed: HashSet<String>,
    pub spawned: Vec<Vec<String>>,
}

impl MockShellProxy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(tools: &[&str]) -> Self {
        Self {
            installed: tools.iter().map(|t| t.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl ShellProxy for MockShellProxy {
    fn exit_shell(&mut self) {
        self.exited = true;
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        if std::path::Path::new(path).is_dir() {
            self.cwd = Some(path.to_string());
            Ok(())
        } else {
            Err(anyhow!("No such file or directory"))
        }
    }

    fn history_entries(&self) -> Vec<String> {
        self.history.clone()
    }

    fn clear_history(&mut self) -> Result<()> {
        self.history.clear();
        Ok(())
    }

    fn lookup(&self, cmd: &str) -> Option<String> {
        self.installed
            .contains(cmd)
            .then(|| format!("/usr/bin/{cmd}"))
    }

    fn run_external(&mut self, _ctx: &Context, argv: Vec<String>) -> Result<ExitStatus> {
        self.spawned.push(argv);
        Ok(ExitStatus::ExitedWith(0))
    }
}
