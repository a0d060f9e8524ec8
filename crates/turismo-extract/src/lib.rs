//! Spreadsheet extraction for turismo.
//!
//! Turns the irregular "wide" layout of the published tourism sheets into
//! [`TidyRecord`]s. Pure synchronous; no database dependencies.
//!
//! Pipeline:
//!   workbook file
//!     └─ workbook::load_grid()          → Grid
//!          └─ columns::find_time_columns() → Vec<TimeColumn>
//!               └─ block::scan()          → Vec<Observation>
//!                    └─ tidy::assemble()   → Vec<TidyRecord>

pub mod block;
pub mod columns;
pub mod error;
pub mod number;
pub mod tidy;
pub mod workbook;

use std::path::Path;

use tracing::debug;
use turismo_core::{grid::Grid, record::TidyRecord};

pub use columns::{TimeColumn, find_time_columns};
pub use error::{Error, Result};
pub use number::parse_number;

/// Default number of top rows searched for the time header.
pub const DEFAULT_HEADER_SCAN_ROWS: usize = 100;

/// Tuning knobs for [`extract`].
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
  /// How many rows from the top may precede the time header.
  pub header_scan_rows: usize,
}

impl Default for ExtractOptions {
  fn default() -> Self { Self { header_scan_rows: DEFAULT_HEADER_SCAN_ROWS } }
}

/// Extract tidy records from an in-memory grid.
///
/// Fails with [`Error::StructureNotFound`] when no time header is found and
/// with [`Error::EmptyExtraction`] when the header is there but no block
/// yields a value.
pub fn extract(grid: &Grid, options: &ExtractOptions) -> Result<Vec<TidyRecord>> {
  let columns = find_time_columns(grid, options.header_scan_rows)?;
  let observations = block::scan(grid, &columns);
  if observations.is_empty() {
    return Err(Error::EmptyExtraction { time_columns: columns.len() });
  }

  debug!(observations = observations.len(), "observations extracted");
  Ok(tidy::assemble(observations))
}

/// Read the first sheet of `path` and [`extract`] it.
pub fn extract_file(path: impl AsRef<Path>, options: &ExtractOptions) -> Result<Vec<TidyRecord>> {
  let grid = workbook::load_grid(path)?;
  extract(&grid, options)
}
