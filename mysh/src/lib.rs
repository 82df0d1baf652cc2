use crate::environment::Environment;
use crate::history::HistoryStore;
use crate::nlp::{Interpreter, LiveInterpreter, Orchestrator, UnavailableInterpreter};
use crate::repl::Repl;
use crate::repl::confirmation::TerminalConfirmation;
use crate::shell::{LineOutcome, Shell};
use anyhow::{Context as _, Result};
use clap::Parser;
use mysh_types::{Context, ShellMode, TerminalState};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

pub mod dispatch;
pub mod environment;
pub mod errors;
pub mod history;
pub mod input;
pub mod nlp;
pub mod process;
pub mod prompt;
mod proxy;
pub mod repl;
pub mod safety;
pub mod shell;
pub mod suggestion;

const LOG_FILE_NAME: &str = "mysh.log";
const PANIC_LOG_FILE_NAME: &str = "panic.log";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Evaluate one line and exit
    #[arg(short, long)]
    pub command: Option<String>,
}

pub fn lib_main() -> ExitCode {
    if let Err(err) = init_tracing() {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    setup_panic_handler();
    if let Err(err) = process::ignore_interactive_signals() {
        warn!("failed to ignore interactive signals: {err}");
    }

    let cli = Cli::parse();
    match run_shell(cli) {
        Ok(code) => code,
        Err(err) => {
            error!("shell terminated: {err:#}");
            errors::display_user_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Wires the session together from the process environment.
pub fn build_shell() -> Shell {
    let environment = Environment::new();
    let history = HistoryStore::open_default();

    let interpreter: Arc<dyn Interpreter> = match LiveInterpreter::from_env() {
        Ok(interpreter) => Arc::new(interpreter),
        Err(err) => {
            debug!("natural language translation unavailable: {err:#}");
            Arc::new(UnavailableInterpreter::new(format!("{err:#}")))
        }
    };
    let orchestrator = Orchestrator::new(interpreter, Arc::new(TerminalConfirmation));

    Shell::new(environment, history, orchestrator)
}

pub fn run_shell(cli: Cli) -> Result<ExitCode> {
    let mut shell = build_shell();

    if let Some(command) = cli.command.as_deref() {
        let ctx = Context::new(ShellMode::Command);
        shell.eval_line(&ctx, command);
        return Ok(ExitCode::SUCCESS);
    }

    if TerminalState::detect(libc::STDIN_FILENO).is_terminal {
        let ctx = Context::new(ShellMode::Interactive);
        Repl::new(&mut shell).run_interactive(&ctx)?;
    } else {
        let ctx = Context::new(ShellMode::Pipe);
        run_pipe(&mut shell, &ctx)?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Evaluates standard input line by line until end of input or `exit`.
fn run_pipe(shell: &mut Shell, ctx: &Context) -> Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        // the lock is released between lines so a confirmation prompt can read its answer
        let read = stdin
            .read_line(&mut line)
            .context("failed to read standard input")?;
        if read == 0 || shell.eval_line(ctx, &line) == LineOutcome::Exit {
            break;
        }
    }
    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let path = environment::get_state_file(LOG_FILE_NAME)?;
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_file(true)
        .with_line_number(true)
        .with_writer(Arc::new(log_file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}

pub fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();

        let payload = panic_info.payload().downcast_ref::<&str>().map_or_else(
            || {
                panic_info
                    .payload()
                    .downcast_ref::<String>()
                    .cloned()
                    .unwrap_or_else(|| "Unknown panic payload".to_string())
            },
            |s| (*s).to_string(),
        );
        let location = panic_info.location().map_or_else(
            || "Unknown location".to_string(),
            |location| format!("{}:{}:{}", location.file(), location.line(), location.column()),
        );

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f UTC");
        let report = format!(
            "\n=== PANIC OCCURRED ===\n\
            Timestamp: {timestamp}\n\
            Location: {location}\n\
            Message: {payload}\n\
            ======================\n"
        );

        if let Ok(path) = environment::get_state_file(PANIC_LOG_FILE_NAME)
            && let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
        {
            use std::io::Write;
            let _ = file.write_all(report.as_bytes());
        }

        error!("panic at {}: {}", location, payload);
        eprintln!("mysh: internal error at {location}: {payload}");
    }));
}
