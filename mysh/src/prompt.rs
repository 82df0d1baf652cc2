use std::path::Path;
use tracing::warn;

pub fn prompt_for(cwd: &Path) -> String {
    format!("mysh:{}$ ", cwd.display())
}

/// The prompt for the process working directory.
pub fn current_prompt() -> String {
    match std::env::current_dir() {
        Ok(cwd) => prompt_for(&cwd),
        Err(err) => {
            warn!("Failed to get current directory: {}", err);
            "mysh:?$ ".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_shows_cwd() {
        assert_eq!(prompt_for(Path::new("/tmp/work")), "mysh:/tmp/work$ ");
    }
}
