//! Error types for `parley-graph`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("required field {0:?} is empty")]
  EmptyField(&'static str),

  #[error("record file error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
