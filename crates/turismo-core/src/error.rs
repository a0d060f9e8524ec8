//! Error types for `turismo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown category family: {0:?}")]
  UnknownFamily(String),

  #[error("invalid time period: {0}")]
  InvalidPeriod(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
