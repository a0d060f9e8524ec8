//! Error type for the turismo pipeline runner.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("source file not found: {0:?}")]
  MissingSource(PathBuf),

  #[error("extracting {path:?}: {source}")]
  Extract {
    path:   PathBuf,
    #[source]
    source: turismo_extract::Error,
  },

  /// The file's transaction was rolled back.
  #[error("loading {path:?}: {source}")]
  Store {
    path:   PathBuf,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("configuration error: {0}")]
  Config(#[from] config::ConfigError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
