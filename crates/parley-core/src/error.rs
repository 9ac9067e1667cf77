//! Error types for `parley-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("reviewer not found in the distribution: {0:?}")]
  ReviewerNotFound(String),

  #[error("submission must include at least one file or a review text")]
  EmptySubmission,

  #[error("score {0} is out of range (0..=10)")]
  ScoreOutOfRange(u8),

  #[error("required field {0:?} is empty")]
  EmptyField(&'static str),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
