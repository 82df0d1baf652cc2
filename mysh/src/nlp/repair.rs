//! Fuzzy file name repair for translated commands.

use std::path::Path;
use tracing::debug;

/// Minimum similarity for a directory entry to replace a token.
pub const MIN_SIMILARITY: f64 = 0.6;

/// Repairs tokens of `command` against the current directory.
pub fn fuzzy_fix(command: &str) -> (String, Vec<String>) {
    let dir = std::env::current_dir().unwrap_or_else(|_| ".".into());
    fuzzy_fix_in(&dir, command)
}

/// Replaces every token that names nothing under `dir` with the closest entry of `dir`.
///
/// Returns the rebuilt command (segments joined with `"; "`) and one `old → new` note
/// per replacement. Segments that fail to tokenize are kept verbatim.
pub fn fuzzy_fix_in(dir: &Path, command: &str) -> (String, Vec<String>) {
    let entries = directory_entries(dir);
    let mut notes = Vec::new();

    let segments: Vec<String> = command
        .split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let Ok(tokens) = shell_words::split(segment) else {
                return segment.to_string();
            };
            let repaired: Vec<String> = tokens
                .into_iter()
                .map(|token| {
                    if dir.join(&token).exists() {
                        return token;
                    }
                    match closest_entry(dir, &entries, &token) {
                        Some(guess) if guess != token => {
                            notes.push(format!("{token} → {guess}"));
                            guess
                        }
                        _ => token,
                    }
                })
                .collect();
            shell_words::join(repaired)
        })
        .collect();

    if !notes.is_empty() {
        debug!("fuzzy repairs: {:?}", notes);
    }
    (segments.join("; "), notes)
}

fn directory_entries(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(err) => {
            debug!("cannot list {}: {}", dir.display(), err);
            Vec::new()
        }
    }
}

/// Best-scoring entry at or above [`MIN_SIMILARITY`]; equal scores go to the greater name.
/// Directories come back with a trailing `/`.
fn closest_entry(dir: &Path, entries: &[String], token: &str) -> Option<String> {
    let bare = token.trim_end_matches('/');
    let (_, name) = entries
        .iter()
        .map(|entry| (similarity_ratio(entry, bare), entry))
        .filter(|(score, _)| *score >= MIN_SIMILARITY)
        .max_by(|(sa, na), (sb, nb)| sa.total_cmp(sb).then_with(|| na.cmp(nb)))?;

    if dir.join(name).is_dir() {
        Some(format!("{name}/"))
    } else {
        Some(name.clone())
    }
}

/// Ratcliff/Obershelp similarity: twice the matched characters over the total length.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    matched
}

/// Longest common run of `a[alo..ahi]` and `b[blo..bhi]`; the earliest one wins ties.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    // run[x + 1]: length of the common run ending at b[blo + x] on the previous row
    let mut prev = vec![0usize; bhi - blo + 1];
    for i in alo..ahi {
        let mut cur = vec![0usize; bhi - blo + 1];
        for j in blo..bhi {
            if a[i] == b[j] {
                let k = prev[j - blo] + 1;
                cur[j - blo + 1] = k;
                if k > best_k {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_k = k;
                }
            }
        }
        prev = cur;
    }
    (best_i, best_j, best_k)
}
