//! Assignment records — one row of the externally edited distribution sheet.
//!
//! The sheet maps each reviewer to the author whose project they must review.
//! It is read-only from the portal's perspective except for the admin
//! full-replace action.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The canonical distribution columns, in persisted order. Loaders must
/// produce exactly these fields, defaulting any missing column to `""`.
pub const CANONICAL_COLUMNS: [&str; 6] = [
  "reviewer",
  "reviewer_chamber",
  "reviewer_profile",
  "author",
  "author_chamber",
  "pdf",
];

/// One row of the distribution sheet, normalised and whitespace-trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
  pub reviewer:         String,
  pub reviewer_chamber: String,
  pub reviewer_profile: String,
  pub author:           String,
  pub author_chamber:   String,
  /// Optional reference to the author's project: a URL or a local file name.
  pub pdf:              String,
}

// ─── Project reference ───────────────────────────────────────────────────────

/// Where the project document for an assignment lives, resolved from the
/// free-text `pdf` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ProjectRef {
  /// No reference configured (empty cell, or the literal string "nan" left
  /// behind by spreadsheet tooling).
  None,
  /// An external link (Drive, OneDrive, …) to open in a new tab.
  Url(String),
  /// A file on the server. Relative names resolve under the projects
  /// directory; existence is the caller's concern.
  File(PathBuf),
}

impl AssignmentRecord {
  /// Resolve the `pdf` column against `projects_dir`.
  pub fn project_ref(&self, projects_dir: &Path) -> ProjectRef {
    let value = self.pdf.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
      return ProjectRef::None;
    }
    let lower = value.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
      return ProjectRef::Url(value.to_string());
    }
    let path = Path::new(value);
    if path.is_absolute() {
      ProjectRef::File(path.to_path_buf())
    } else {
      ProjectRef::File(projects_dir.join(value))
    }
  }
}

// ─── Derived reads ───────────────────────────────────────────────────────────

fn unique_values<'a>(
  records: &'a [AssignmentRecord],
  field: impl Fn(&'a AssignmentRecord) -> &'a str,
) -> Vec<String> {
  let unique: std::collections::BTreeSet<&str> = records
    .iter()
    .map(field)
    .filter(|v| !v.is_empty())
    .collect();
  unique.into_iter().map(str::to_string).collect()
}

/// Sorted, de-duplicated reviewer names; empty cells dropped.
pub fn unique_reviewers(records: &[AssignmentRecord]) -> Vec<String> {
  unique_values(records, |r| &r.reviewer)
}

/// Sorted, de-duplicated reviewer chambers, for the admin filter controls.
pub fn unique_chambers(records: &[AssignmentRecord]) -> Vec<String> {
  unique_values(records, |r| &r.reviewer_chamber)
}

/// Sorted, de-duplicated authors, for the admin filter controls.
pub fn unique_authors(records: &[AssignmentRecord]) -> Vec<String> {
  unique_values(records, |r| &r.author)
}
