//! On-demand XLSX export for the admin view.
//!
//! Produces a two-sheet workbook — `submissions` and `distribution` — in
//! memory, ready for download.

use parley_core::{
  assignment::{AssignmentRecord, CANONICAL_COLUMNS},
  submission::SubmissionRecord,
};

use crate::Result;

const LOG_COLUMNS: [&str; 9] = [
  "timestamp",
  "reviewer",
  "chamber",
  "profile",
  "author",
  "author_chamber",
  "text",
  "score",
  "files",
];

/// Build the workbook and return its bytes.
pub fn export_workbook(
  submissions: &[SubmissionRecord],
  distribution: &[AssignmentRecord],
) -> Result<Vec<u8>> {
  let mut workbook = rust_xlsxwriter::Workbook::new();

  let sheet = workbook.add_worksheet();
  sheet.set_name("submissions")?;
  for (col, header) in LOG_COLUMNS.iter().enumerate() {
    sheet.write_string(0, col as u16, *header)?;
  }
  for (i, record) in submissions.iter().enumerate() {
    let row = (i + 1) as u32;
    let timestamp =
      record.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default();
    sheet.write_string(row, 0, &timestamp)?;
    sheet.write_string(row, 1, &record.reviewer)?;
    sheet.write_string(row, 2, &record.chamber)?;
    sheet.write_string(row, 3, &record.profile)?;
    sheet.write_string(row, 4, &record.author)?;
    sheet.write_string(row, 5, &record.author_chamber)?;
    sheet.write_string(row, 6, record.text.as_deref().unwrap_or(""))?;
    if let Some(score) = record.score {
      sheet.write_number(row, 7, f64::from(score))?;
    }
    sheet.write_string(row, 8, &record.files.join("|"))?;
  }

  let sheet = workbook.add_worksheet();
  sheet.set_name("distribution")?;
  for (col, header) in CANONICAL_COLUMNS.iter().enumerate() {
    sheet.write_string(0, col as u16, *header)?;
  }
  for (i, record) in distribution.iter().enumerate() {
    let row = (i + 1) as u32;
    sheet.write_string(row, 0, &record.reviewer)?;
    sheet.write_string(row, 1, &record.reviewer_chamber)?;
    sheet.write_string(row, 2, &record.reviewer_profile)?;
    sheet.write_string(row, 3, &record.author)?;
    sheet.write_string(row, 4, &record.author_chamber)?;
    sheet.write_string(row, 5, &record.pdf)?;
  }

  Ok(workbook.save_to_buffer()?)
}
