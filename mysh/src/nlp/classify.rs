use crate::environment::Environment;
use mysh_builtin::BUILTIN_REGISTRY;
use std::path::Path;

/// Whether `text` reads as an instruction rather than a command line.
///
/// It must contain a space, and its first word must not be a builtin, an executable
/// on the search path, or an existing path.
pub fn is_natural_language(text: &str, environment: &Environment) -> bool {
    if !text.contains(' ') {
        return false;
    }
    let Some(first) = text.split_whitespace().next() else {
        return false;
    };

    !(BUILTIN_REGISTRY.is_builtin(first)
        || environment.lookup(first).is_some()
        || Path::new(first).exists())
}
