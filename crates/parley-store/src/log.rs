//! Submission log persistence.
//!
//! One CSV with the fixed header `timestamp,reviewer,chamber,profile,author,
//! author_chamber,text,score,files`. One row per submission event; file
//! paths are pipe-delimited inside the `files` column. The file is replaced
//! wholesale on every append (temp-then-rename), never patched in place.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use parley_core::submission::SubmissionRecord;
use serde::{Deserialize, Serialize};

use crate::{Result, atomic::atomic_write};

/// Separator for the stored-paths column.
const FILES_SEPARATOR: char = '|';

// ─── Wire row ────────────────────────────────────────────────────────────────

/// The CSV representation of one submission row. Everything is a string on
/// the wire; coercion to domain types happens on read.
#[derive(Debug, Serialize, Deserialize)]
struct LogRow {
  timestamp:      String,
  reviewer:       String,
  chamber:        String,
  profile:        String,
  author:         String,
  author_chamber: String,
  text:           String,
  score:          String,
  files:          String,
}

impl From<&SubmissionRecord> for LogRow {
  fn from(record: &SubmissionRecord) -> Self {
    Self {
      timestamp:      record
        .timestamp
        .map(|t| t.to_rfc3339())
        .unwrap_or_default(),
      reviewer:       record.reviewer.clone(),
      chamber:        record.chamber.clone(),
      profile:        record.profile.clone(),
      author:         record.author.clone(),
      author_chamber: record.author_chamber.clone(),
      text:           record.text.clone().unwrap_or_default(),
      score:          record.score.map(|s| s.to_string()).unwrap_or_default(),
      files:          record.files.join(&FILES_SEPARATOR.to_string()),
    }
  }
}

impl From<LogRow> for SubmissionRecord {
  fn from(row: LogRow) -> Self {
    // Unparseable timestamps coerce to None; the row itself is kept.
    let timestamp = DateTime::parse_from_rfc3339(&row.timestamp)
      .ok()
      .map(|t| t.with_timezone(&Utc));
    let text = (!row.text.is_empty()).then_some(row.text);
    let score = row.score.parse::<u8>().ok();
    let files = row
      .files
      .split(FILES_SEPARATOR)
      .filter(|p| !p.is_empty())
      .map(str::to_string)
      .collect();
    Self {
      timestamp,
      reviewer: row.reviewer,
      chamber: row.chamber,
      profile: row.profile,
      author: row.author,
      author_chamber: row.author_chamber,
      text,
      score,
      files,
    }
  }
}

// ─── Read / write ────────────────────────────────────────────────────────────

/// Load the log. An absent file is an empty table, not an error.
pub fn read_log(path: &Path) -> Result<Vec<SubmissionRecord>> {
  if !path.exists() {
    return Ok(Vec::new());
  }
  let bytes = std::fs::read(path)?;
  let mut reader = csv::Reader::from_reader(bytes.as_slice());
  let mut records = Vec::new();
  for row in reader.deserialize::<LogRow>() {
    records.push(row?.into());
  }
  Ok(records)
}

/// Serialise and atomically replace the log file.
pub fn write_log(path: &Path, records: &[SubmissionRecord]) -> Result<()> {
  let mut writer = csv::Writer::from_writer(Vec::new());
  for record in records {
    writer.serialize(LogRow::from(record))?;
  }
  let bytes = writer.into_inner().map_err(|e| e.into_error())?;
  atomic_write(path, &bytes)
}

/// The sibling path used to back up the log before a clear, e.g.
/// `log_submissions.20250821-153000.bak.csv`.
pub fn backup_path(path: &Path, now: DateTime<Utc>) -> PathBuf {
  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_else(|| "log".to_string());
  let name = format!("{stem}.{}.bak.csv", now.format("%Y%m%d-%H%M%S"));
  path.with_file_name(name)
}
