//! The `ReviewStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. the flat-file store in
//! `parley-store`). The HTTP layer depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;
use std::path::PathBuf;

use crate::{
  assignment::AssignmentRecord,
  submission::{NewSubmission, ReviewStats, SubmissionFilter, SubmissionRecord},
};

// ─── Upload input ────────────────────────────────────────────────────────────

/// Accepted review file extensions (case-insensitive). Reviews are document
/// or archive files only.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["pdf", "docx", "zip"];

/// A review file received from the client, not yet persisted.
#[derive(Debug, Clone)]
pub struct UploadedFile {
  /// The client-supplied filename; the store sanitises it before writing.
  pub name:  String,
  pub bytes: Vec<u8>,
}

impl UploadedFile {
  /// Whether the filename carries an accepted extension.
  pub fn extension_allowed(&self) -> bool {
    std::path::Path::new(&self.name)
      .extension()
      .and_then(|e| e.to_str())
      .map(|e| {
        let lower = e.to_ascii_lowercase();
        ALLOWED_EXTENSIONS.contains(&lower.as_str())
      })
      .unwrap_or(false)
  }
}


// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Parley review-portal backend.
///
/// The submission log is append-only; the only destructive operation is
/// [`ReviewStore::clear_log`], which must write a backup first. All methods
/// return `Send` futures so the trait can be used from multi-threaded async
/// runtimes (tokio with `axum`).
pub trait ReviewStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Distribution ──────────────────────────────────────────────────────

  /// Load the full assignment table, normalised per the canonical columns.
  /// A missing sheet is an error, not an empty table.
  fn distribution(
    &self,
  ) -> impl Future<Output = Result<Vec<AssignmentRecord>, Self::Error>> + Send + '_;

  /// Sorted, de-duplicated reviewer names from the distribution.
  fn reviewers(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// The first assignment row for `reviewer`, or `None`.
  fn assignment<'a>(
    &'a self,
    reviewer: &'a str,
  ) -> impl Future<Output = Result<Option<AssignmentRecord>, Self::Error>> + Send + 'a;

  /// Replace the distribution sheet wholesale with `bytes`. The new content
  /// must parse as a valid sheet before anything is overwritten.
  fn replace_distribution<'a>(
    &'a self,
    bytes: &'a [u8],
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + 'a;

  // ── Submissions ───────────────────────────────────────────────────────

  /// Read the log, filtered. An absent log file is an empty table.
  fn submissions<'a>(
    &'a self,
    filter: &'a SubmissionFilter,
  ) -> impl Future<Output = Result<Vec<SubmissionRecord>, Self::Error>> + Send + 'a;

  /// Persist `files` for `reviewer` and return the stored paths.
  fn save_uploads<'a>(
    &'a self,
    reviewer: &'a str,
    files: Vec<UploadedFile>,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + 'a;

  /// Append one submission record, resolving the reviewer's assignment row
  /// and stamping the capture time. Fails if the reviewer has no row.
  fn append_submission(
    &self,
    input: NewSubmission,
  ) -> impl Future<Output = Result<SubmissionRecord, Self::Error>> + Send + '_;

  /// Back up the log to a timestamped sibling file, then discard it.
  /// Returns the backup path, or `None` when there was no log to clear.
  fn clear_log(
    &self,
  ) -> impl Future<Output = Result<Option<PathBuf>, Self::Error>> + Send + '_;

  // ── Admin reads ───────────────────────────────────────────────────────

  /// Dashboard headline numbers.
  fn stats(
    &self,
  ) -> impl Future<Output = Result<ReviewStats, Self::Error>> + Send + '_;

  /// A two-sheet XLSX workbook (`submissions`, `distribution`) as bytes.
  fn export_xlsx(
    &self,
  ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send + '_;
}
