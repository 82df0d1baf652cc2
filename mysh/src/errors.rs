use mysh_types::MyshError;

/// One-line rendering of a top-level error, without stack traces.
pub fn format_user_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<MyshError>() {
        Some(MyshError::CommandNotFound(name)) => format!("mysh: {name}: command not found"),
        _ => format!("mysh: {err:#}"),
    }
}

pub fn display_user_error(err: &anyhow::Error) {
    eprintln!("{}", format_user_error(err));
}
