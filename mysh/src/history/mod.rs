//! Persistent command history.
//!
//! The durable copy is a plain text file with one raw command line per line.
//! The in-memory log mirrors it and is rebuilt from the file on every [`HistoryStore::load`].

mod expansion;

pub use expansion::is_event_reference;

#[cfg(test)]
mod tests;

use crate::environment;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const HISTORY_FILE_NAME: &str = "history";

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no history")]
    Empty,

    #[error("no such event: {0}")]
    NoSuchEvent(String),

    #[error("no such event starting with {0}")]
    NoPrefixMatch(String),

    #[error("history store {}: {source}", path.display())]
    Store { path: PathBuf, source: io::Error },
}

/// Append-only record of raw command lines, 1-indexed for event lookups.
#[derive(Debug, Default)]
pub struct HistoryStore {
    path: Option<PathBuf>,
    records: Vec<String>,
}

impl HistoryStore {
    /// A store with no durable copy. Used when the history file cannot be created.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store under the XDG data directory, creating it if absent.
    pub fn from_file(name: &str) -> anyhow::Result<Self> {
        let path = environment::get_data_file(name)?;
        Ok(Self::open(path)?)
    }

    /// Opens (creating if absent) the history file at `path` and loads it.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, HistoryError> {
        let mut store = HistoryStore {
            path: Some(path.into()),
            records: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-reads the durable log. Blank lines are skipped and invalid UTF-8 is replaced.
    pub fn load(&mut self) -> Result<usize, HistoryError> {
        let Some(path) = &self.path else {
            return Ok(self.records.len());
        };
        ensure_file(path).map_err(|source| store_error(path, source))?;
        let bytes = std::fs::read(path).map_err(|source| store_error(path, source))?;

        self.records = String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect();
        debug!("loaded {} history records from {}", self.records.len(), path.display());
        Ok(self.records.len())
    }

    /// Records `line` unless it is blank or repeats the last record.
    ///
    /// The file holds one record per line, so a multi-line input is recorded line by
    /// line. Returns whether anything was recorded.
    pub fn append(&mut self, line: &str) -> Result<bool, HistoryError> {
        let mut recorded = false;
        for record in line.split('\n').map(|part| part.trim_end_matches('\r')) {
            recorded |= self.append_record(record)?;
        }
        Ok(recorded)
    }

    /// The durable file is written before the in-memory log. If that write fails the
    /// record is still kept in memory for this session and the error is returned.
    fn append_record(&mut self, line: &str) -> Result<bool, HistoryError> {
        if line.trim().is_empty() || self.last() == Some(line) {
            return Ok(false);
        }

        let written = match &self.path {
            Some(path) => append_line(path, line).map_err(|source| store_error(path, source)),
            None => Ok(()),
        };
        self.records.push(line.to_string());
        written.map(|_| true)
    }

    /// Empties the in-memory log and truncates the durable file.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.records.clear();
        if let Some(path) = &self.path {
            File::create(path).map_err(|source| store_error(path, source))?;
        }
        Ok(())
    }

    pub fn records(&self) -> &[String] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&str> {
        self.records.last().map(String::as_str)
    }

    /// The `n`th record, counting from 1.
    pub fn get(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.records.get(i))
            .map(String::as_str)
    }

    /// Opens the default store, falling back to an in-memory one with a warning.
    pub fn open_default() -> Self {
        match Self::from_file(HISTORY_FILE_NAME) {
            Ok(store) => store,
            Err(err) => {
                warn!("Failed to open command history: {err:#}");
                Self::in_memory()
            }
        }
    }
}

fn store_error(path: &Path, source: io::Error) -> HistoryError {
    HistoryError::Store {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_file(path: &Path) -> io::Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }
    OpenOptions::new().create(true).append(true).open(path)?;
    Ok(())
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
