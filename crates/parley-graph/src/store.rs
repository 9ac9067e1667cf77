//! Flat-file persistence for relationship records.
//!
//! The record list is one JSON array on disk, replaced wholesale via
//! write-temp-then-rename on every append. Catalog files live alongside it.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::{
  Result,
  catalog::SkillCatalog,
  record::StyleRecord,
};

/// Store for the graph app's persisted state.
pub struct GraphStore {
  records_path: PathBuf,
  catalog_dir:  Option<PathBuf>,
}

impl GraphStore {
  pub fn new(
    records_path: impl Into<PathBuf>,
    catalog_dir: Option<PathBuf>,
  ) -> Self {
    Self { records_path: records_path.into(), catalog_dir }
  }

  /// Load all records. An absent file is an empty list.
  pub fn records(&self) -> Result<Vec<StyleRecord>> {
    if !self.records_path.exists() {
      return Ok(Vec::new());
    }
    let bytes = std::fs::read(&self.records_path)?;
    Ok(serde_json::from_slice(&bytes)?)
  }

  /// Validate, normalise, and append one record. Returns the stored form.
  pub fn add_record(&self, record: StyleRecord) -> Result<StyleRecord> {
    let record = record.normalized();
    record.validate()?;

    let mut records = self.records()?;
    records.push(record.clone());
    let bytes = serde_json::to_vec_pretty(&records)?;
    atomic_write(&self.records_path, &bytes)?;
    tracing::info!(
      style = %record.style,
      game = %record.game,
      total = records.len(),
      "relationship record added"
    );
    Ok(record)
  }

  /// The skill vocabularies in effect (catalog files or built-in defaults).
  pub fn catalog(&self) -> SkillCatalog {
    SkillCatalog::load(self.catalog_dir.as_deref())
  }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
  let dir = path.parent().unwrap_or_else(|| Path::new("."));
  let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
  tmp.write_all(bytes)?;
  tmp.flush()?;
  tmp.persist(path).map_err(|e| e.error)?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::Error;
  use std::collections::BTreeSet;

  fn store(dir: &Path) -> GraphStore {
    GraphStore::new(dir.join("records.json"), None)
  }

  #[test]
  fn absent_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    assert!(store(dir.path()).records().unwrap().is_empty());
  }

  #[test]
  fn add_then_read_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(dir.path());

    let stored = store
      .add_record(StyleRecord {
        style:     " Judo ".to_string(),
        game:      "Tag".to_string(),
        offensive: BTreeSet::from(["throw".to_string()]),
        ..Default::default()
      })
      .unwrap();
    // Stored form is normalised.
    assert_eq!(stored.style, "Judo");

    let records = store.records().unwrap();
    assert_eq!(records, vec![stored]);
  }

  #[test]
  fn appends_accumulate_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(dir.path());
    for (style, game) in [("Judo", "Tag"), ("Capoeira", "Rings")] {
      store
        .add_record(StyleRecord {
          style: style.to_string(),
          game: game.to_string(),
          ..Default::default()
        })
        .unwrap();
    }
    let records = store.records().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].style, "Judo");
    assert_eq!(records[1].style, "Capoeira");
  }

  #[test]
  fn invalid_records_are_rejected_before_any_write() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(dir.path());
    let result = store.add_record(StyleRecord {
      style: "  ".to_string(),
      game:  "Tag".to_string(),
      ..Default::default()
    });
    assert!(matches!(result, Err(Error::EmptyField("style"))));
    assert!(store.records().unwrap().is_empty());
  }
}
