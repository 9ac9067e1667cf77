//! [`FlatFileStore`] — the flat-file implementation of [`ReviewStore`].

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use parley_core::{
  assignment::{self, AssignmentRecord},
  store::{ReviewStore, UploadedFile},
  submission::{
    NewSubmission, ReviewStats, SubmissionFilter, SubmissionRecord,
  },
};

use crate::{
  Error, Result,
  distribution::DistributionLoader,
  export::export_workbook,
  log::{backup_path, read_log, write_log},
  uploads::save_uploads,
};

// ─── Paths ───────────────────────────────────────────────────────────────────

/// Where the store keeps its files.
#[derive(Debug, Clone)]
pub struct StorePaths {
  /// The distribution sheet (CSV with a header row).
  pub distribution:    PathBuf,
  /// Uploads and the submission log live under here.
  pub submissions_dir: PathBuf,
  /// Local project documents referenced from the sheet.
  pub projects_dir:    PathBuf,
}

impl StorePaths {
  /// Conventional layout under a single data directory.
  pub fn under(data_dir: impl AsRef<Path>) -> Self {
    let data_dir = data_dir.as_ref();
    Self {
      distribution:    data_dir.join("distribution.csv"),
      submissions_dir: data_dir.join("submissions"),
      projects_dir:    data_dir.join("projects"),
    }
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A review-portal store backed by flat files.
///
/// Cloning is cheap — the inner state is reference-counted.
#[derive(Clone)]
pub struct FlatFileStore {
  inner: Arc<Inner>,
}

struct Inner {
  distribution:    DistributionLoader,
  submissions_dir: PathBuf,
  projects_dir:    PathBuf,
  log_path:        PathBuf,
}

impl FlatFileStore {
  /// Open the store, creating the submissions and projects directories if
  /// absent. The distribution sheet itself is not required to exist until
  /// the first read.
  pub fn open(paths: StorePaths) -> Result<Self> {
    fs::create_dir_all(&paths.submissions_dir)?;
    fs::create_dir_all(&paths.projects_dir)?;
    let log_path = paths.submissions_dir.join("log_submissions.csv");
    Ok(Self {
      inner: Arc::new(Inner {
        distribution: DistributionLoader::new(paths.distribution),
        submissions_dir: paths.submissions_dir,
        projects_dir: paths.projects_dir,
        log_path,
      }),
    })
  }

  pub fn projects_dir(&self) -> &Path {
    &self.inner.projects_dir
  }

  pub fn log_path(&self) -> &Path {
    &self.inner.log_path
  }
}

// I/O here is synchronous: the files are small and the portal serves a
// handful of reviewers at a time.
impl ReviewStore for FlatFileStore {
  type Error = Error;

  async fn distribution(&self) -> Result<Vec<AssignmentRecord>> {
    self.inner.distribution.load()
  }

  async fn reviewers(&self) -> Result<Vec<String>> {
    let records = self.inner.distribution.load()?;
    Ok(assignment::unique_reviewers(&records))
  }

  async fn assignment(
    &self,
    reviewer: &str,
  ) -> Result<Option<AssignmentRecord>> {
    let records = self.inner.distribution.load()?;
    Ok(records.into_iter().find(|r| r.reviewer == reviewer))
  }

  async fn replace_distribution(&self, bytes: &[u8]) -> Result<usize> {
    self.inner.distribution.replace(bytes)
  }

  async fn submissions(
    &self,
    filter: &SubmissionFilter,
  ) -> Result<Vec<SubmissionRecord>> {
    Ok(filter.apply(read_log(&self.inner.log_path)?))
  }

  async fn save_uploads(
    &self,
    reviewer: &str,
    files: Vec<UploadedFile>,
  ) -> Result<Vec<String>> {
    save_uploads(&self.inner.submissions_dir, reviewer, &files, Utc::now())
  }

  async fn append_submission(
    &self,
    input: NewSubmission,
  ) -> Result<SubmissionRecord> {
    input.validate()?;
    let assignment = self
      .inner
      .distribution
      .load()?
      .into_iter()
      .find(|r| r.reviewer == input.reviewer)
      .ok_or_else(|| Error::ReviewerNotFound(input.reviewer.clone()))?;

    let record = SubmissionRecord {
      timestamp:      Some(Utc::now()),
      reviewer:       assignment.reviewer,
      chamber:        assignment.reviewer_chamber,
      profile:        assignment.reviewer_profile,
      author:         assignment.author,
      author_chamber: assignment.author_chamber,
      text:           input.text.filter(|t| !t.trim().is_empty()),
      score:          input.score,
      files:          input.files,
    };

    let mut records = read_log(&self.inner.log_path)?;
    records.push(record.clone());
    write_log(&self.inner.log_path, &records)?;
    tracing::info!(
      reviewer = %record.reviewer,
      files = record.files.len(),
      total = records.len(),
      "submission appended"
    );
    Ok(record)
  }

  async fn clear_log(&self) -> Result<Option<PathBuf>> {
    let path = &self.inner.log_path;
    if !path.exists() {
      return Ok(None);
    }
    let backup = backup_path(path, Utc::now());
    fs::copy(path, &backup)?;
    fs::remove_file(path)?;
    tracing::warn!(backup = %backup.display(), "submission log cleared");
    Ok(Some(backup))
  }

  async fn stats(&self) -> Result<ReviewStats> {
    let distribution = self.inner.distribution.load()?;
    let submissions = read_log(&self.inner.log_path)?;

    let assigned: BTreeSet<&str> = distribution
      .iter()
      .map(|r| r.reviewer.as_str())
      .filter(|r| !r.is_empty())
      .collect();
    let submitted: BTreeSet<&str> =
      submissions.iter().map(|r| r.reviewer.as_str()).collect();

    let coverage_percent = if assigned.is_empty() {
      0.0
    } else {
      submitted.len() as f64 / assigned.len() as f64 * 100.0
    };

    Ok(ReviewStats {
      reviewers_assigned: assigned.len(),
      submissions: submissions.len(),
      coverage_percent,
    })
  }

  async fn export_xlsx(&self) -> Result<Vec<u8>> {
    let distribution = self.inner.distribution.load()?;
    let submissions = read_log(&self.inner.log_path)?;
    export_workbook(&submissions, &distribution)
  }
}
