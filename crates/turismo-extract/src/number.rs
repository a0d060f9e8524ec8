//! Spanish-locale numeric coercion of single cells.

use turismo_core::grid::Cell;

/// Coerce a cell to a number.
///
/// Numeric cells pass through. Text is read as a Spanish-formatted number:
/// `.` is the thousands separator and `,` the decimal separator, so
/// `"12.345,6"` is `12345.6`. Blank, unparseable and non-finite cells yield
/// `None`; a bad cell never aborts extraction.
pub fn parse_number(cell: &Cell) -> Option<f64> {
  let value = match cell {
    Cell::Empty => return None,
    Cell::Int(v) => *v as f64,
    Cell::Float(v) => *v,
    Cell::Text(raw) => {
      let s = raw.trim();
      if s.is_empty() {
        return None;
      }
      let delocalized = s.replace('.', "").replace(',', ".");
      match delocalized.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
          tracing::trace!(raw = %s, "cell is not numeric; treating as empty");
          return None;
        }
      }
    }
  };

  value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn text(s: &str) -> Cell { Cell::Text(s.to_string()) }

  #[test]
  fn spanish_thousands_and_decimals() {
    assert_eq!(parse_number(&text("12.345,6")), Some(12345.6));
    assert_eq!(parse_number(&text("1.234.567")), Some(1234567.0));
    assert_eq!(parse_number(&text("-3,5")), Some(-3.5));
  }

  #[test]
  fn blanks_are_none() {
    assert_eq!(parse_number(&text("")), None);
    assert_eq!(parse_number(&text("   ")), None);
    assert_eq!(parse_number(&Cell::Empty), None);
  }

  #[test]
  fn numeric_cells_pass_through() {
    assert_eq!(parse_number(&Cell::Int(42)), Some(42.0));
    assert_eq!(parse_number(&Cell::Float(2.5)), Some(2.5));
  }

  #[test]
  fn garbage_is_none() {
    assert_eq!(parse_number(&text("..")), None);
    assert_eq!(parse_number(&text("n.d.")), None);
    assert_eq!(parse_number(&text("-")), None);
  }

  #[test]
  fn non_finite_is_none() {
    assert_eq!(parse_number(&text("NaN")), None);
    assert_eq!(parse_number(&text("inf")), None);
    assert_eq!(parse_number(&Cell::Float(f64::NAN)), None);
  }
}
