//! Thin file system builtins. Each one maps to a single OS call.

use super::{ShellProxy, first_operand, report};
use mysh_types::{Context, ExitStatus, MyshError, MyshResult};
use std::fs::{self, OpenOptions};
use std::path::Path;

fn file_op<T>(
    operation: &'static str,
    path: &str,
    f: impl FnOnce(&Path) -> std::io::Result<T>,
) -> MyshResult<T> {
    f(Path::new(path)).map_err(|source| MyshError::File {
        operation,
        path: path.to_string(),
        source,
    })
}

/// Runs a single-operand file operation, reporting failures under the builtin's name.
fn with_operand(
    ctx: &Context,
    argv: &[String],
    f: impl FnOnce(&str) -> MyshResult<()>,
) -> ExitStatus {
    let Some(path) = first_operand(ctx, argv, "path") else {
        return ExitStatus::ExitedWith(2);
    };
    match f(path) {
        Ok(()) => ExitStatus::ExitedWith(0),
        Err(err) => report(ctx, &argv[0], err),
    }
}

pub fn mkdir(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    with_operand(ctx, &argv, |path| file_op("mkdir", path, |p| fs::create_dir(p)))
}

pub fn rmdir(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    with_operand(ctx, &argv, |path| file_op("rmdir", path, |p| fs::remove_dir(p)))
}

pub fn touch(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    with_operand(ctx, &argv, |path| {
        file_op("touch", path, |p| {
            OpenOptions::new().create(true).append(true).open(p).map(|_| ())
        })
    })
}

pub fn rm(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    with_operand(ctx, &argv, |path| file_op("rm", path, |p| fs::remove_file(p)))
}

pub fn cat(ctx: &Context, argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    with_operand(ctx, &argv, |path| {
        let bytes = file_op("cat", path, |p| fs::read(p))?;
        ctx.write_stdout_raw(&String::from_utf8_lossy(&bytes))?;
        Ok(())
    })
}

/// Non-hidden entries of `dir`, sorted.
pub fn list_visible(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    Ok(names)
}

pub fn ls(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    match list_visible(Path::new(".")) {
        Ok(names) => match ctx.write_stdout(&names.join("  ")) {
            Ok(_) => ExitStatus::ExitedWith(0),
            Err(err) => report(ctx, "ls", err),
        },
        Err(err) => report(ctx, "ls", err),
    }
}
