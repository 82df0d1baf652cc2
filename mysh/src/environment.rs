//! Search path, executable lookup and XDG file locations.

use anyhow::Context as _;
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::{BTreeSet, HashMap};
use std::env;
use std::fs::read_dir;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tracing::debug;

pub const APP_NAME: &str = "mysh";

const DEFAULT_PATHS: [&str; 4] = ["/bin", "/usr/bin", "/sbin", "/usr/sbin"];

/// Shell environment: the PATH-like search list and a lookup cache over it.
pub struct Environment {
    pub paths: Vec<String>,
    /// Cache for PATH command lookups to avoid repeated filesystem access
    command_cache: RwLock<HashMap<String, Option<String>>>,
}

impl Environment {
    /// Create an environment from `$PATH`, falling back to the usual system directories.
    pub fn new() -> Self {
        let paths = match env::var("PATH") {
            Ok(val) => split_path(&val),
            Err(_) => DEFAULT_PATHS.iter().map(|s| s.to_string()).collect(),
        };
        debug!("default path {:?}", &paths);
        Self::with_paths(paths)
    }

    pub fn with_paths(paths: Vec<String>) -> Self {
        Environment {
            paths,
            command_cache: RwLock::new(HashMap::new()),
        }
    }

    /// Lookup a command in PATH with caching.
    /// Names containing a `/` are resolved against the current directory instead.
    pub fn lookup(&self, cmd: &str) -> Option<String> {
        if cmd.is_empty() {
            return None;
        }
        if cmd.contains('/') {
            return self.lookup_uncached(cmd);
        }

        if let Some(cached) = self.command_cache.read().get(cmd) {
            return cached.clone();
        }

        let result = self.lookup_uncached(cmd);
        self.command_cache
            .write()
            .insert(cmd.to_string(), result.clone());
        result
    }

    fn lookup_uncached(&self, cmd: &str) -> Option<String> {
        let cwd = env::current_dir().ok()?;
        let search = env::join_paths(&self.paths).ok()?;
        which::which_in(cmd, Some(search), cwd)
            .ok()
            .map(|p| p.to_string_lossy().into_owned())
    }

    /// Scans every PATH directory and returns the executable names found, sorted and unique.
    pub fn scan_executables(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for path in self.paths.iter().filter(|p| !p.is_empty()) {
            let Ok(entries) = read_dir(path) else {
                continue;
            };
            for entry in entries.flatten() {
                if let Ok(meta) = std::fs::metadata(entry.path())
                    && meta.is_file()
                    && meta.permissions().mode() & 0o111 != 0
                    && let Some(name) = entry.file_name().to_str()
                {
                    names.insert(name.to_string());
                }
            }
        }
        debug!("scanned {} executable names", names.len());
        names.into_iter().collect()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::result::Result<(), std::fmt::Error> {
        f.debug_struct("Environment")
            .field("paths", &self.paths)
            .finish()
    }
}

fn split_path(val: &str) -> Vec<String> {
    env::split_paths(val)
        .map(|p| p.to_string_lossy().into_owned())
        .collect()
}

/// Get the path to a data file, creating its parent directory.
pub fn get_data_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_data_file(name).context("failed get path")
}

/// Get the path to a state file (e.g. logs).
pub fn get_state_file(name: &str) -> Result<PathBuf> {
    let xdg_dir =
        xdg::BaseDirectories::with_prefix(APP_NAME).context("failed get xdg directory")?;
    xdg_dir.place_state_file(name).context("failed get path")
}
