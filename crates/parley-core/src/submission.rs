//! Submission records — one row of the append-only submission log.
//!
//! A record is written once per submission event and never updated. The only
//! destructive operation is the admin clear-log action, which the store
//! guards with a backup copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Highest accepted review score.
pub const MAX_SCORE: u8 = 10;

/// One persisted submission event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
  /// Capture-time timestamp, set by the store. `None` when a persisted row
  /// carried an unparseable timestamp — the row is kept, not dropped.
  pub timestamp:      Option<DateTime<Utc>>,
  pub reviewer:       String,
  pub chamber:        String,
  pub profile:        String,
  pub author:         String,
  pub author_chamber: String,
  pub text:           Option<String>,
  pub score:          Option<u8>,
  /// Stored paths of the uploaded review files.
  pub files:          Vec<String>,
}

// ─── Input type ──────────────────────────────────────────────────────────────

/// Input to [`crate::store::ReviewStore::append_submission`]. The store fills
/// in the assignment fields and the timestamp.
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
  pub reviewer: String,
  pub text:     Option<String>,
  pub score:    Option<u8>,
  /// Paths already persisted by the upload step.
  pub files:    Vec<String>,
}

impl NewSubmission {
  /// Reject structurally invalid input before anything touches disk.
  pub fn validate(&self) -> Result<()> {
    if self.reviewer.trim().is_empty() {
      return Err(Error::EmptyField("reviewer"));
    }
    let text_empty =
      self.text.as_deref().map(|t| t.trim().is_empty()).unwrap_or(true);
    if self.files.is_empty() && text_empty {
      return Err(Error::EmptySubmission);
    }
    if let Some(score) = self.score
      && score > MAX_SCORE
    {
      return Err(Error::ScoreOutOfRange(score));
    }
    Ok(())
  }
}

// ─── Filtering ───────────────────────────────────────────────────────────────

/// Exact-match predicates over the submission log. Set predicates compose
/// with AND semantics; row order is preserved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionFilter {
  pub chamber: Option<String>,
  pub author:  Option<String>,
}

impl SubmissionFilter {
  pub fn matches(&self, record: &SubmissionRecord) -> bool {
    if let Some(chamber) = &self.chamber
      && record.chamber != *chamber
    {
      return false;
    }
    if let Some(author) = &self.author
      && record.author != *author
    {
      return false;
    }
    true
  }

  /// Apply the filter, preserving input order.
  pub fn apply(&self, records: Vec<SubmissionRecord>) -> Vec<SubmissionRecord> {
    records.into_iter().filter(|r| self.matches(r)).collect()
  }
}

// ─── Stats ───────────────────────────────────────────────────────────────────

/// The admin dashboard headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewStats {
  /// Distinct reviewers present in the distribution sheet.
  pub reviewers_assigned: usize,
  /// Total submission events logged.
  pub submissions:        usize,
  /// Distinct reviewers that have submitted at least once, as a percentage
  /// of `reviewers_assigned`. Zero when nobody is assigned.
  pub coverage_percent:   f64,
}
