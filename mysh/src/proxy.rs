use crate::process;
use crate::shell::Shell;
use anyhow::{Context as _, Result};
use mysh_builtin::ShellProxy;
use mysh_types::{Context, ExitStatus};
use tracing::debug;

impl ShellProxy for Shell {
    fn exit_shell(&mut self) {
        self.exit();
    }

    fn changepwd(&mut self, path: &str) -> Result<()> {
        std::env::set_current_dir(path).with_context(|| format!("cannot change to {path}"))?;
        debug!("changed directory to {}", path);
        Ok(())
    }

    fn history_entries(&self) -> Vec<String> {
        self.history.records().to_vec()
    }

    fn clear_history(&mut self) -> Result<()> {
        self.history.clear()?;
        Ok(())
    }

    fn lookup(&self, cmd: &str) -> Option<String> {
        self.environment.lookup(cmd)
    }

    fn run_external(&mut self, _ctx: &Context, argv: Vec<String>) -> Result<ExitStatus> {
        Ok(process::run_external(&argv)?)
    }
}
