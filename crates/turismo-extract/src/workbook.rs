//! Reading the first worksheet of a source file into a [`Grid`].

use std::path::Path;

use calamine::{Data, Range, Reader, open_workbook_auto};
use turismo_core::grid::{Cell, Grid};

use crate::{Error, Result};

/// Load the first sheet of the workbook at `path` (xlsx, xls, xlsb or ods)
/// with no header row.
pub fn load_grid(path: impl AsRef<Path>) -> Result<Grid> {
  let mut workbook = open_workbook_auto(path.as_ref())?;
  let range = workbook.worksheet_range_at(0).ok_or(Error::NoWorksheet)??;
  Ok(grid_from_range(&range))
}

/// Convert a calamine range to a grid anchored at cell `A1`.
///
/// calamine trims leading empty rows and columns; they are restored so that
/// column 0 is always the sheet's first column.
pub fn grid_from_range(range: &Range<Data>) -> Grid {
  let (row_offset, col_offset) = range
    .start()
    .map(|(r, c)| (r as usize, c as usize))
    .unwrap_or_default();

  let mut rows = vec![Vec::new(); row_offset];
  rows.extend(range.rows().map(|data| {
    let mut cells = vec![Cell::Empty; col_offset];
    cells.extend(data.iter().map(cell_from_data));
    cells
  }));
  Grid::new(rows)
}

fn cell_from_data(data: &Data) -> Cell {
  match data {
    Data::Empty | Data::Error(_) => Cell::Empty,
    Data::String(s) => Cell::Text(s.clone()),
    Data::Int(v) => Cell::Int(*v),
    Data::Float(v) => Cell::Float(*v),
    other => Cell::Text(other.to_string()),
  }
}
