use anyhow::Result;
use mysh_types::{Context, ExitStatus};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt::Display;
use tracing::debug;

// Builtin command modules
mod basic;
pub mod cd;
mod fs;
mod help;
mod history;
mod net;
pub mod scan;
#[cfg(test)]
mod test_support;

/// Trait that provides an interface for builtin commands to interact with the shell
/// This allows builtin commands to perform shell operations without direct coupling
pub trait ShellProxy {
    /// Initiates shell exit process
    fn exit_shell(&mut self);

    /// Changes the current working directory and updates shell state
    fn changepwd(&mut self, path: &str) -> Result<()>;

    /// Recorded command lines, oldest first
    fn history_entries(&self) -> Vec<String>;

    /// Empties the in-memory history and truncates its durable store
    fn clear_history(&mut self) -> Result<()>;

    /// Resolves an executable name against the shell's search path
    fn lookup(&self, cmd: &str) -> Option<String>;

    /// Spawns an external program and waits for it to finish
    fn run_external(&mut self, ctx: &Context, argv: Vec<String>) -> Result<ExitStatus>;
}

/// Type alias for builtin command function signature
/// All builtin commands must conform to this signature
pub type BuiltinCommand =
    fn(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus;

/// Section a builtin is listed under by `help`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinGroup {
    Basic,
    Network,
    Extra,
    History,
}

/// A registry entry: the builtin's name, where `help` lists it, and its handler.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub group: BuiltinGroup,
    pub handler: BuiltinCommand,
}

/// Global registry of all builtin commands.
/// Built once on first use and never mutated afterwards.
pub static BUILTIN_REGISTRY: Lazy<BuiltinRegistry> = Lazy::new(BuiltinRegistry::new);

pub struct BuiltinRegistry {
    entries: Vec<Builtin>,
    index: HashMap<&'static str, usize>,
}

impl BuiltinRegistry {
    fn new() -> Self {
        use BuiltinGroup::*;

        let mut registry = BuiltinRegistry {
            entries: Vec::new(),
            index: HashMap::new(),
        };

        // Core shell commands
        registry.register("cd", Basic, cd::command);
        registry.register("help", Basic, help::command);
        registry.register("exit", Basic, exit);
        registry.register("pwd", Basic, basic::pwd);
        registry.register("echo", Basic, basic::echo);
        registry.register("clear", Basic, basic::clear);

        // File system
        registry.register("mkdir", Basic, fs::mkdir);
        registry.register("rmdir", Basic, fs::rmdir);
        registry.register("touch", Basic, fs::touch);
        registry.register("rm", Basic, fs::rm);
        registry.register("cat", Basic, fs::cat);
        registry.register("ls", Basic, fs::ls);

        // Network diagnostics
        registry.register("ping", Network, net::ping);
        registry.register("traceroute", Network, net::traceroute);
        registry.register("dnslookup", Network, net::dnslookup);
        registry.register("publicip", Network, net::publicip);
        registry.register("hostinfo", Network, net::hostinfo);
        registry.register("ifconfig", Network, net::ifconfig);
        registry.register("ipaddr", Network, net::ifconfig);

        registry.register("scan", Extra, scan::command);
        registry.register("whois", Extra, net::whois);
        registry.register("netstat", Extra, net::netstat);

        registry.register("history", History, history::command);

        registry
    }

    fn register(&mut self, name: &'static str, group: BuiltinGroup, handler: BuiltinCommand) {
        self.index.insert(name, self.entries.len());
        self.entries.push(Builtin {
            name,
            group,
            handler,
        });
    }

    /// Get a builtin by name.
    pub fn get(&self, name: &str) -> Option<&Builtin> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Check if a command is a builtin.
    pub fn is_builtin(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// All builtin names in lexicographic order.
    pub fn sorted_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries.iter().map(|b| b.name).collect();
        names.sort_unstable();
        names
    }

    /// Names in a group, in registration order.
    pub fn group(&self, group: BuiltinGroup) -> Vec<&'static str> {
        self.entries
            .iter()
            .filter(|b| b.group == group)
            .map(|b| b.name)
            .collect()
    }
}

/// Retrieves a builtin command function by name
/// Returns None if the command is not found
pub fn get_command(name: &str) -> Option<BuiltinCommand> {
    BUILTIN_REGISTRY.get(name).map(|b| b.handler)
}

/// Built-in exit command implementation
/// Initiates graceful shell termination
pub fn exit(_ctx: &Context, _argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    debug!("Exit command called - initiating normal shell exit");
    proxy.exit_shell();
    ExitStatus::Exit
}

/// Writes `name: err` on the error stream and returns a failing status.
pub(crate) fn report(ctx: &Context, name: &str, err: impl Display) -> ExitStatus {
    debug!("{name} failed: {err}");
    let _ = ctx.write_stderr(&format!("{name}: {err}"));
    ExitStatus::ExitedWith(1)
}

/// Returns the first operand, or prints `usage: <name> <operand>` and returns None.
pub(crate) fn first_operand<'a>(
    ctx: &Context,
    argv: &'a [String],
    operand: &str,
) -> Option<&'a str> {
    match argv.get(1) {
        Some(arg) => Some(arg.as_str()),
        None => {
            let name = argv.first().map(String::as_str).unwrap_or_default();
            let _ = ctx.write_stderr(&format!("usage: {name} <{operand}>"));
            None
        }
    }
}

/// Runs an external tool through the proxy, reporting spawn failures under `name`.
pub(crate) fn run_tool(
    ctx: &Context,
    proxy: &mut dyn ShellProxy,
    name: &str,
    argv: Vec<String>,
) -> ExitStatus {
    match proxy.run_external(ctx, argv) {
        Ok(status) => status,
        Err(err) => report(ctx, name, err),
    }
}
