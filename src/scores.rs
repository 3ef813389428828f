/// Local high-score table.
///
/// Plain text, one `name,score` record per line.  Reading is lenient
/// (semicolon or whitespace separators, junk lines skipped, missing file is
/// an empty table); writing always rewrites the whole file with commas,
/// sorted by score descending.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

/// Entries shown on the leaderboard.
pub const TOP_N: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

#[derive(Debug)]
pub enum ScoreError {
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "score file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NameError {
    Empty,
    ContainsDelimiter,
    Taken(String),
}

impl fmt::Display for NameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Enter a name"),
            Self::ContainsDelimiter => write!(f, "Names cannot contain ',' or ';'"),
            Self::Taken(name) => write!(f, "The name '{name}' already exists"),
        }
    }
}

impl std::error::Error for NameError {}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse one record.  Comma is preferred, then semicolon, then whitespace.
pub fn parse_line(line: &str) -> Option<ScoreEntry> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut parts: Vec<&str> = if line.contains(',') {
        line.split(',').collect()
    } else if line.contains(';') {
        line.split(';').collect()
    } else {
        line.split_whitespace().collect()
    };
    if parts.len() < 2 {
        return None;
    }
    let score = parts.swap_remove(1).trim().parse::<u32>().ok()?;
    let name = parts[0].trim();
    Some(ScoreEntry::new(name, score))
}

/// Every well-formed record in file order.  A missing file is empty.
fn read_all(path: &Path) -> Result<Vec<ScoreEntry>, ScoreError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ScoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut entries = Vec::new();
    for (lineno, line) in raw.lines().enumerate() {
        match parse_line(line) {
            Some(entry) => entries.push(entry),
            None if line.trim().is_empty() => {}
            None => debug!("skipping malformed score line {}: {line:?}", lineno + 1),
        }
    }
    Ok(entries)
}

// ── Public operations ─────────────────────────────────────────────────────────

/// Top `TOP_N` records, score descending; ties keep file order.
pub fn load(path: &Path) -> Result<Vec<ScoreEntry>, ScoreError> {
    let mut entries = read_all(path)?;
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(TOP_N);
    Ok(entries)
}

/// Record `score` for `name`, keeping the best score per name, and rewrite
/// the whole file sorted descending.
pub fn save(path: &Path, name: &str, score: u32) -> Result<(), ScoreError> {
    let mut merged: Vec<ScoreEntry> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for entry in read_all(path)? {
        match index.get(&entry.name) {
            Some(&i) => merged[i].score = merged[i].score.max(entry.score),
            None => {
                index.insert(entry.name.clone(), merged.len());
                merged.push(entry);
            }
        }
    }
    match index.get(name) {
        Some(&i) => merged[i].score = merged[i].score.max(score),
        None => merged.push(ScoreEntry::new(name, score)),
    }
    merged.sort_by(|a, b| b.score.cmp(&a.score));

    let io_err = |source| ScoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let body: String = merged
        .iter()
        .map(|e| format!("{},{}\n", e.name, e.score))
        .collect();
    fs::write(path, body).map_err(io_err)?;

    info!(name, score, records = merged.len(), "score saved");
    Ok(())
}

/// Stored best for `name` (case-insensitive), 0 when absent.
pub fn best_for(path: &Path, name: &str) -> Result<u32, ScoreError> {
    let needle = name.trim().to_lowercase();
    Ok(read_all(path)?
        .into_iter()
        .filter(|e| e.name.to_lowercase() == needle)
        .map(|e| e.score)
        .max()
        .unwrap_or(0))
}

/// Case-insensitive existence check.
pub fn name_exists(path: &Path, name: &str) -> Result<bool, ScoreError> {
    let needle = name.trim().to_lowercase();
    Ok(read_all(path)?
        .iter()
        .any(|e| !e.name.is_empty() && e.name.to_lowercase() == needle))
}

/// Trim `name` and make sure it can be stored as one record.
pub fn check_name_format(name: &str) -> Result<String, NameError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name.contains(',') || name.contains(';') {
        return Err(NameError::ContainsDelimiter);
    }
    Ok(name.to_string())
}

/// Vet a name typed on the new-game screen and return it trimmed.  An
/// unreadable score file is treated as holding no names.
pub fn validate_new_name(path: &Path, name: &str) -> Result<String, NameError> {
    let name = check_name_format(name)?;
    match name_exists(path, &name) {
        Ok(true) => Err(NameError::Taken(name)),
        Ok(false) => Ok(name),
        Err(e) => {
            warn!("{e}; accepting name without a duplicate check");
            Ok(name)
        }
    }
}
