//! Distribution sheet loader.
//!
//! Reads the tabular assignment sheet, normalises a fixed set of known
//! header variants to canonical field names, fills missing canonical
//! columns with empty strings, and trims whitespace on every field. The
//! parsed table is cached keyed on the file's modification time, so sheet
//! edits are picked up without a process restart.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::SystemTime;

use parley_core::assignment::AssignmentRecord;

use crate::{Error, Result, atomic::atomic_write};

// ─── Header normalisation ────────────────────────────────────────────────────

/// Map a sheet header (already trimmed) to its canonical column name.
/// Unknown headers are ignored by the loader.
pub fn canonical_header(header: &str) -> Option<&'static str> {
  match header {
    "reviewer" | "Reviewer" | "Student (Reviewer)" => Some("reviewer"),
    "reviewer_chamber" | "Chamber" | "Reviewer Chamber" => {
      Some("reviewer_chamber")
    }
    "reviewer_profile" | "Profile" | "Reviewer Profile" => {
      Some("reviewer_profile")
    }
    "author" | "Author" | "Assigned Author" | "Project Received (Author)" => {
      Some("author")
    }
    "author_chamber" | "Author Chamber" => Some("author_chamber"),
    // Any of these names is accepted for the project reference.
    "pdf" | "Project PDF" | "Author PDF" | "Project Link (PDF)" => Some("pdf"),
    _ => None,
  }
}

/// Parse sheet bytes into normalised assignment records.
///
/// Missing canonical columns default to `""`; all fields are trimmed.
pub fn parse_distribution(bytes: &[u8]) -> Result<Vec<AssignmentRecord>> {
  let mut reader = csv::ReaderBuilder::new()
    .flexible(true)
    .from_reader(bytes);

  // Column index of each canonical field, first matching header wins.
  let mut indices: [Option<usize>; 6] = [None; 6];
  for (position, header) in reader.headers()?.iter().enumerate() {
    if let Some(canonical) = canonical_header(header.trim()) {
      let slot = canonical_slot(canonical);
      if indices[slot].is_none() {
        indices[slot] = Some(position);
      }
    }
  }

  let field = |row: &csv::StringRecord, slot: usize| -> String {
    indices[slot]
      .and_then(|i| row.get(i))
      .unwrap_or("")
      .trim()
      .to_string()
  };

  let mut records = Vec::new();
  for row in reader.records() {
    let row = row?;
    records.push(AssignmentRecord {
      reviewer:         field(&row, 0),
      reviewer_chamber: field(&row, 1),
      reviewer_profile: field(&row, 2),
      author:           field(&row, 3),
      author_chamber:   field(&row, 4),
      pdf:              field(&row, 5),
    });
  }
  Ok(records)
}

fn canonical_slot(canonical: &str) -> usize {
  match canonical {
    "reviewer" => 0,
    "reviewer_chamber" => 1,
    "reviewer_profile" => 2,
    "author" => 3,
    "author_chamber" => 4,
    _ => 5,
  }
}

// ─── Cached loader ───────────────────────────────────────────────────────────

struct CacheEntry {
  mtime:   SystemTime,
  records: Vec<AssignmentRecord>,
}

/// Loads the sheet at a fixed path, caching on (path, mtime).
pub struct DistributionLoader {
  path:  PathBuf,
  cache: Mutex<Option<CacheEntry>>,
}

impl DistributionLoader {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into(), cache: Mutex::new(None) }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the table, reusing the cached parse when the file's mtime is
  /// unchanged. A missing sheet is an error — the portal cannot run
  /// without it.
  pub fn load(&self) -> Result<Vec<AssignmentRecord>> {
    let metadata = fs::metadata(&self.path)
      .map_err(|_| Error::MissingDistribution(self.path.clone()))?;
    // Filesystems without mtime support fall back to re-parsing every time.
    let mtime = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);

    let mut cache = self
      .cache
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(entry) = cache.as_ref()
      && entry.mtime == mtime
    {
      return Ok(entry.records.clone());
    }

    let bytes = fs::read(&self.path)?;
    let records = parse_distribution(&bytes)?;
    tracing::debug!(path = %self.path.display(), rows = records.len(), "reloaded distribution sheet");
    *cache = Some(CacheEntry { mtime, records: records.clone() });
    Ok(records)
  }

  /// Re-read from disk unconditionally, refreshing the cache. Useful when
  /// the sheet may have been swapped without an mtime change (some network
  /// filesystems have coarse timestamps).
  pub fn reload(&self) -> Result<Vec<AssignmentRecord>> {
    *self
      .cache
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    self.load()
  }

  /// Replace the sheet wholesale. The new content must parse before the old
  /// file is touched; the write itself is temp-then-rename. Returns the row
  /// count of the new sheet.
  pub fn replace(&self, bytes: &[u8]) -> Result<usize> {
    let records = parse_distribution(bytes)?;
    atomic_write(&self.path, bytes)?;
    // Drop the cached parse; the next load re-reads from disk.
    *self
      .cache
      .lock()
      .unwrap_or_else(std::sync::PoisonError::into_inner) = None;
    tracing::info!(path = %self.path.display(), rows = records.len(), "distribution sheet replaced");
    Ok(records.len())
  }
}
