//! Inline autosuggestion for the line editor.
//!
//! Suggestions are the unmatched suffix of the best candidate for the token
//! before the cursor, shown as ghost text and inserted on request.

use crate::environment::Environment;
use mysh_builtin::BUILTIN_REGISTRY;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::debug;

/// How long a PATH scan stays fresh before the next command-position lookup rescans.
const REFRESH_INTERVAL: Duration = Duration::from_secs(5);

/// Executable names found on the search path. Refreshed by full rescan only.
#[derive(Debug)]
pub struct ExecutableCache {
    names: Vec<String>,
    refreshed_at: Option<Instant>,
    refresh_interval: Duration,
}

impl ExecutableCache {
    pub fn new(refresh_interval: Duration) -> Self {
        Self {
            names: Vec::new(),
            refreshed_at: None,
            refresh_interval,
        }
    }

    pub fn refresh(&mut self, environment: &Environment) {
        self.names = environment.scan_executables();
        self.refreshed_at = Some(Instant::now());
    }

    fn refresh_if_stale(&mut self, environment: &Environment) {
        let stale = self
            .refreshed_at
            .is_none_or(|at| at.elapsed() >= self.refresh_interval);
        if stale {
            self.refresh(environment);
        }
    }

    /// Cached names, sorted.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[derive(Debug)]
pub struct SuggestionEngine {
    cache: ExecutableCache,
}

impl Default for SuggestionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionEngine {
    pub fn new() -> Self {
        Self::with_refresh_interval(REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(refresh_interval: Duration) -> Self {
        Self {
            cache: ExecutableCache::new(refresh_interval),
        }
    }

    pub fn cache(&self) -> &ExecutableCache {
        &self.cache
    }

    /// Suggestion for `line` (the text before the cursor) relative to the process cwd.
    pub fn suggest(&mut self, line: &str, environment: &Environment) -> Option<String> {
        let cwd = std::env::current_dir().ok()?;
        self.suggest_in(line, &cwd, environment)
    }

    pub fn suggest_in(
        &mut self,
        line: &str,
        cwd: &Path,
        environment: &Environment,
    ) -> Option<String> {
        if line.is_empty() {
            return None;
        }

        match line.rfind(' ') {
            None => self.complete_command(line, environment),
            Some(pos) => {
                let token = &line[pos + 1..];
                let dirs_only = line.split_whitespace().next() == Some("cd");
                complete_path(cwd, token, dirs_only)
            }
        }
    }

    fn complete_command(&mut self, token: &str, environment: &Environment) -> Option<String> {
        if let Some(name) = first_extension(BUILTIN_REGISTRY.sorted_names(), token) {
            return Some(name[token.len()..].to_string());
        }

        self.cache.refresh_if_stale(environment);
        first_extension(self.cache.names().iter().map(String::as_str), token)
            .map(|name| name[token.len()..].to_string())
    }
}

/// First candidate that starts with `token` and is strictly longer.
fn first_extension<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    token: &str,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .find(|name| name.starts_with(token) && *name != token)
}

/// Completes a path token. Directories carry a trailing `/`.
fn complete_path(cwd: &Path, token: &str, dirs_only: bool) -> Option<String> {
    let (dir_part, prefix) = match token.rfind('/') {
        Some(i) => token.split_at(i + 1),
        None => ("", token),
    };
    let base = cwd.join(dir_part);

    let mut matches: Vec<String> = std::fs::read_dir(&base)
        .ok()?
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_str()?.to_string();
            if !name.starts_with(prefix) {
                return None;
            }
            if base.join(&name).is_dir() {
                Some(format!("{name}/"))
            } else {
                Some(name)
            }
        })
        .collect();
    matches.sort();
    debug!("{} path candidates for {:?}", matches.len(), token);

    matches
        .into_iter()
        .find(|candidate| (!dirs_only || candidate.ends_with('/')) && candidate != prefix)
        .map(|candidate| candidate[prefix.len()..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn executable(dir: &Path, name: &str) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn env_with(bin: &TempDir) -> Environment {
        Environment::with_paths(vec![bin.path().to_string_lossy().into_owned()])
    }

    #[test]
    fn test_empty_input_has_no_suggestion() {
        let bin = TempDir::new().unwrap();
        let mut engine = SuggestionEngine::new();
        assert_eq!(engine.suggest_in("", bin.path(), &env_with(&bin)), None);
    }

    #[test]
    fn test_builtins_win_over_executables() {
        let bin = TempDir::new().unwrap();
        executable(bin.path(), "hostinfo-extra");
        executable(bin.path(), "hos");
        let mut engine = SuggestionEngine::new();
        let env = env_with(&bin);

        // "hostinfo" is a builtin
        assert_eq!(engine.suggest_in("hos", bin.path(), &env), Some("tinfo".into()));
        // sorted builtins: "help" comes before "history" and "hostinfo"
        assert_eq!(engine.suggest_in("h", bin.path(), &env), Some("elp".into()));
    }

    #[test]
    fn test_falls_back_to_executables() {
        let bin = TempDir::new().unwrap();
        executable(bin.path(), "zebra-tool");
        executable(bin.path(), "zeal");
        fs::write(bin.path().join("zed-not-executable"), "").unwrap();
        let mut engine = SuggestionEngine::new();
        let env = env_with(&bin);

        assert_eq!(engine.suggest_in("ze", bin.path(), &env), Some("al".into()));
        assert_eq!(engine.suggest_in("zeb", bin.path(), &env), Some("ra-tool".into()));
        assert_eq!(engine.suggest_in("zeal", bin.path(), &env), None);
        assert_eq!(engine.suggest_in("zed", bin.path(), &env), None);
    }

    #[test]
    fn test_cache_is_reused_until_stale() {
        let bin = TempDir::new().unwrap();
        executable(bin.path(), "qqone");
        let env = env_with(&bin);

        let mut cached = SuggestionEngine::with_refresh_interval(Duration::from_secs(3600));
        assert_eq!(cached.suggest_in("qq", bin.path(), &env), Some("one".into()));
        executable(bin.path(), "qqa");
        assert_eq!(cached.suggest_in("qq", bin.path(), &env), Some("one".into()));

        let mut fresh = SuggestionEngine::with_refresh_interval(Duration::ZERO);
        assert_eq!(fresh.suggest_in("qq", bin.path(), &env), Some("a".into()));
        assert_eq!(fresh.cache().names(), ["qqa", "qqone"]);
    }

    #[test]
    fn test_cd_suggests_directories_only() {
        let cwd = TempDir::new().unwrap();
        fs::write(cwd.path().join("docs.txt"), "").unwrap();
        fs::create_dir(cwd.path().join("docs")).unwrap();
        let env = env_with(&cwd);
        let mut engine = SuggestionEngine::new();

        assert_eq!(engine.suggest_in("cd do", cwd.path(), &env), Some("cs/".into()));
        assert_eq!(engine.suggest_in("cd docs", cwd.path(), &env), Some("/".into()));
        assert_eq!(engine.suggest_in("cd docs/", cwd.path(), &env), None);
    }

    #[test]
    fn test_file_arguments() {
        let cwd = TempDir::new().unwrap();
        fs::write(cwd.path().join("report.txt"), "").unwrap();
        fs::write(cwd.path().join("readme.md"), "").unwrap();
        let env = env_with(&cwd);
        let mut engine = SuggestionEngine::new();

        assert_eq!(engine.suggest_in("cat re", cwd.path(), &env), Some("adme.md".into()));
        assert_eq!(engine.suggest_in("cat rep", cwd.path(), &env), Some("ort.txt".into()));
        assert_eq!(engine.suggest_in("cat report.txt", cwd.path(), &env), None);
        assert_eq!(engine.suggest_in("cat x", cwd.path(), &env), None);
    }

    #[test]
    fn test_nested_path_token() {
        let cwd = TempDir::new().unwrap();
        fs::create_dir(cwd.path().join("src")).unwrap();
        fs::write(cwd.path().join("src").join("main.rs"), "").unwrap();
        let env = env_with(&cwd);
        let mut engine = SuggestionEngine::new();

        assert_eq!(engine.suggest_in("cat src/ma", cwd.path(), &env), Some("in.rs".into()));
    }
}
