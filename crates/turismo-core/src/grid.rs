//! The raw 2-D cell grid read from the first sheet of a source workbook.
//!
//! Row 0 / column 0 are the top-left cell of the sheet (absolute positions,
//! no header row). Rows may be ragged; reads past the end yield
//! [`Cell::Empty`].

/// A single spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
  #[default]
  Empty,
  Text(String),
  Int(i64),
  Float(f64),
}

impl Cell {
  /// The cell's text if it is a text cell containing non-whitespace.
  pub fn text(&self) -> Option<&str> {
    match self {
      Cell::Text(s) if !s.trim().is_empty() => Some(s),
      _ => None,
    }
  }

  /// `true` for empty cells and whitespace-only text.
  pub fn is_blank(&self) -> bool {
    match self {
      Cell::Empty => true,
      Cell::Text(s) => s.trim().is_empty(),
      Cell::Int(_) | Cell::Float(_) => false,
    }
  }
}

impl From<&str> for Cell {
  fn from(s: &str) -> Self { Cell::Text(s.to_string()) }
}

impl From<String> for Cell {
  fn from(s: String) -> Self { Cell::Text(s) }
}

impl From<i32> for Cell {
  fn from(v: i32) -> Self { Cell::Int(v.into()) }
}

impl From<i64> for Cell {
  fn from(v: i64) -> Self { Cell::Int(v) }
}

impl From<f64> for Cell {
  fn from(v: f64) -> Self { Cell::Float(v) }
}

static EMPTY: Cell = Cell::Empty;

/// Row-major grid of cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
  rows: Vec<Vec<Cell>>,
}

impl Grid {
  pub fn new(rows: Vec<Vec<Cell>>) -> Self { Self { rows } }

  /// Number of rows.
  pub fn height(&self) -> usize { self.rows.len() }

  /// The cell at `(row, col)`, or [`Cell::Empty`] when out of range.
  pub fn get(&self, row: usize, col: usize) -> &Cell {
    self
      .rows
      .get(row)
      .and_then(|r| r.get(col))
      .unwrap_or(&EMPTY)
  }

  pub fn row(&self, row: usize) -> &[Cell] { self.rows.get(row).map(Vec::as_slice).unwrap_or(&[]) }
}

/// Build a [`Grid`] from row literals: `grid![["España", ""], ["Dato base", 100]]`.
#[macro_export]
macro_rules! grid {
  ($([$($cell:expr),* $(,)?]),* $(,)?) => {
    $crate::grid::Grid::new(vec![$(vec![$($crate::grid::Cell::from($cell)),*]),*])
  };
}
