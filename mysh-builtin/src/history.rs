use super::{ShellProxy, report};
use mysh_types::{Context, ExitStatus};

/// Built-in history command implementation
/// `history` lists the recorded lines numbered from 1, `history -c` clears them.
pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    if argv.get(1).map(String::as_str) == Some("-c") {
        return match proxy.clear_history() {
            Ok(()) => {
                let _ = ctx.write_stdout("History cleared.");
                ExitStatus::HistoryCleared
            }
            Err(err) => report(ctx, "history", err),
        };
    }

    for line in numbered(&proxy.history_entries()) {
        if let Err(err) = ctx.write_stdout(&line) {
            return report(ctx, "history", err);
        }
    }
    ExitStatus::ExitedWith(0)
}

fn numbered(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("{}  {}", i + 1, entry))
        .collect()
}
