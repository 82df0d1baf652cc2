use super::{ShellProxy, report};
use mysh_types::{Context, ExitStatus};
use std::path::Path;

/// Resolves the `cd` operand to an absolute directory.
/// No operand means the home directory; `~` is expanded.
pub fn resolve_target(current_dir: &Path, arg: Option<&str>) -> std::io::Result<String> {
    let dir = match arg {
        Some(dir) if dir.starts_with('/') => dir.to_string(),
        Some(dir) if dir.starts_with('~') => shellexpand::tilde(dir).to_string(),
        Some(dir) => current_dir
            .join(dir)
            .canonicalize()?
            .to_string_lossy()
            .into_owned(),
        None => match dirs::home_dir() {
            Some(home_dir) => home_dir.to_string_lossy().into_owned(),
            None => String::from("/"),
        },
    };
    Ok(dir)
}

pub fn command(ctx: &Context, argv: Vec<String>, proxy: &mut dyn ShellProxy) -> ExitStatus {
    let current_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => return report(ctx, "cd", err),
    };
    let arg = argv.get(1).map(String::as_str);

    let dir = match resolve_target(&current_dir, arg) {
        Ok(dir) => dir,
        Err(err) => return report(ctx, "cd", format!("{}: {}", arg.unwrap_or_default(), err)),
    };

    match proxy.changepwd(&dir) {
        Ok(_) => ExitStatus::ExitedWith(0),
        Err(err) => report(ctx, "cd", format!("{dir}: {err}")),
    }
}
