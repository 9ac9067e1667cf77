//! Error types for `parley-store`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("distribution sheet not found: {0}")]
  MissingDistribution(PathBuf),

  #[error("reviewer not found in the distribution: {0:?}")]
  ReviewerNotFound(String),

  #[error("unsupported file type for {0:?} (allowed: pdf, docx, zip)")]
  UnsupportedFileType(String),

  #[error(transparent)]
  Domain(#[from] parley_core::Error),

  #[error("csv error: {0}")]
  Csv(#[from] csv::Error),

  #[error("xlsx error: {0}")]
  Xlsx(#[from] rust_xlsxwriter::XlsxError),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
