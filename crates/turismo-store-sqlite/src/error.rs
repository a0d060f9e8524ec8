//! Error type for `turismo-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] turismo_core::Error),

  /// Any failure talking to SQLite. A load that fails this way has been
  /// rolled back.
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("unknown table: {0:?}")]
  UnknownTable(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
