//! Error types for the turismo-extract parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No time-period header row in the scanned region; the source layout
  /// needs a human look.
  #[error("no time-period header row found in the first {scanned_rows} rows")]
  StructureNotFound { scanned_rows: usize },

  /// The header row was found but no category/metric block yielded a value.
  #[error("found {time_columns} time columns but extracted no data rows")]
  EmptyExtraction { time_columns: usize },

  #[error("workbook error: {0}")]
  Workbook(#[from] calamine::Error),

  #[error("workbook has no worksheets")]
  NoWorksheet,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
