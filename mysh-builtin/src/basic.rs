use super::{ShellProxy, report};
use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use mysh_types::{Context, ExitStatus};

pub fn pwd(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    match std::env::current_dir() {
        Ok(dir) => match ctx.write_stdout(&dir.to_string_lossy()) {
            Ok(_) => ExitStatus::ExitedWith(0),
            Err(err) => report(ctx, "pwd", err),
        },
        Err(err) => report(ctx, "pwd", err),
    }
}

pub fn echo(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let line = argv.get(1..).unwrap_or_default().join(" ");
    match ctx.write_stdout(&line) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => report(ctx, "echo", err),
    }
}

pub fn clear(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    let mut stdout = std::io::stdout();
    match execute!(stdout, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0)) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => report(ctx, "clear", err),
    }
}
