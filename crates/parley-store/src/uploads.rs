//! Upload persistence for review files.
//!
//! Files land under `<submissions_dir>/<reviewer>/` with a timestamp prefix
//! and path separators stripped from the client filename. Only document and
//! archive types are accepted.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use parley_core::store::UploadedFile;

use crate::{Error, Result};

/// Strip path separators from a client-supplied filename.
pub fn sanitize_filename(name: &str) -> String {
  name.replace(['/', '\\'], "_")
}

/// Directory name for a reviewer: spaces become underscores.
pub fn reviewer_dir_name(reviewer: &str) -> String {
  reviewer.replace(' ', "_")
}

/// Persist `files` for `reviewer`; returns the stored paths in input order.
///
/// Extensions are checked for the whole batch before anything is written, so
/// a rejected file never leaves a partial batch behind.
pub fn save_uploads(
  submissions_dir: &Path,
  reviewer: &str,
  files: &[UploadedFile],
  now: DateTime<Utc>,
) -> Result<Vec<String>> {
  for file in files {
    if !file.extension_allowed() {
      return Err(Error::UnsupportedFileType(file.name.clone()));
    }
  }

  let reviewer_dir = submissions_dir.join(reviewer_dir_name(reviewer));
  fs::create_dir_all(&reviewer_dir)?;

  let prefix = now.format("%Y%m%d-%H%M%S");
  let mut paths = Vec::with_capacity(files.len());
  for file in files {
    let name = format!("{prefix}__{}", sanitize_filename(&file.name));
    let destination = reviewer_dir.join(name);
    fs::write(&destination, &file.bytes)?;
    paths.push(destination.to_string_lossy().into_owned());
  }
  tracing::info!(reviewer, count = paths.len(), "stored review uploads");
  Ok(paths)
}
