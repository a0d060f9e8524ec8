//! Locating the time-period header row.
//!
//! The header is the first row, within a bounded top region, holding at least
//! one cell that reads as a period: monthly `2025M01` or annual `2024`
//! (`2024.0` when the spreadsheet stores the year as a float).

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;
use turismo_core::{grid::Cell, grid::Grid, period::TimePeriod};

use crate::{Error, Result};

static MONTHLY_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?i)^\d{4}M\d{2}$").expect("invalid monthly regex"));

/// A grid column carrying values for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeColumn {
  /// Zero-based column index in the grid.
  pub index:  usize,
  /// Normalized header text (`2025M01`, `2024`).
  pub label:  String,
  pub period: TimePeriod,
}

/// Scan the first `scan_rows` rows top-to-bottom, left-to-right, and return
/// every period column of the first row that has any.
pub fn find_time_columns(grid: &Grid, scan_rows: usize) -> Result<Vec<TimeColumn>> {
  let limit = scan_rows.min(grid.height());

  for row in 0..limit {
    let columns: Vec<TimeColumn> = grid
      .row(row)
      .iter()
      .enumerate()
      .filter_map(|(index, cell)| {
        let (label, period) = period_label(cell)?;
        Some(TimeColumn { index, label, period })
      })
      .collect();

    if !columns.is_empty() {
      debug!(row, columns = columns.len(), "time header row found");
      return Ok(columns);
    }
  }

  Err(Error::StructureNotFound { scanned_rows: limit })
}

/// Read a header cell as a period label, if it is one.
fn period_label(cell: &Cell) -> Option<(String, TimePeriod)> {
  match cell {
    Cell::Text(raw) => {
      let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
      if MONTHLY_RE.is_match(&compact) {
        let label = compact.to_ascii_uppercase();
        return match TimePeriod::from_label(&label) {
          Ok(period) => Some((label, period)),
          Err(e) => {
            debug!(raw = %raw, error = %e, "ignoring out-of-range month header");
            None
          }
        };
      }
      // Years rendered from a float cell read `2024.0`.
      let (head, tail) = compact.split_once('.').unwrap_or((compact.as_str(), ""));
      let is_year = head.len() == 4 && tail.bytes().all(|b| b.is_ascii_digit());
      let year = four_digit_year(head.parse::<i64>().ok()?)?;
      is_year.then(|| annual(year))
    }
    Cell::Int(v) => four_digit_year(*v).map(annual),
    Cell::Float(v) if v.is_finite() => four_digit_year(v.trunc() as i64).map(annual),
    _ => None,
  }
}

fn four_digit_year(v: i64) -> Option<i32> {
  (1000..=9999).contains(&v).then_some(v as i32)
}

fn annual(year: i32) -> (String, TimePeriod) { (year.to_string(), TimePeriod::annual(year)) }

#[cfg(test)]
mod tests {
  use turismo_core::grid;

  use super::*;

  fn labels(columns: &[TimeColumn]) -> Vec<(usize, &str)> {
    columns.iter().map(|c| (c.index, c.label.as_str())).collect()
  }

  #[test]
  fn finds_monthly_header_below_title_rows() {
    let g = grid![
      ["Frontur. Número de turistas según país de residencia"],
      ["Unidades: Turistas"],
      [""],
      ["", "2025M02", "2025M01", "2024M12"],
      ["Total", "Dato base"],
    ];
    let cols = find_time_columns(&g, 30).unwrap();
    assert_eq!(labels(&cols), vec![(1, "2025M02"), (2, "2025M01"), (3, "2024M12")]);
    assert_eq!(cols[1].period, TimePeriod::monthly(2025, 1).unwrap());
  }

  #[test]
  fn strips_internal_whitespace_and_case() {
    let g = grid![["", " 2025 m03 "]];
    let cols = find_time_columns(&g, 10).unwrap();
    assert_eq!(labels(&cols), vec![(1, "2025M03")]);
  }

  #[test]
  fn annual_headers_from_text_int_and_float() {
    let g = grid![["", "2024", 2023_i64, 2022.0_f64, 2021.7_f64]];
    let cols = find_time_columns(&g, 10).unwrap();
    assert_eq!(
      labels(&cols),
      vec![(1, "2024"), (2, "2023"), (3, "2022"), (4, "2021")]
    );
    assert!(cols.iter().all(|c| c.period.is_annual()));
  }

  #[test]
  fn annual_headers_rendered_as_float_text() {
    let g = grid![["", "2024.0", "2023.0", "2022.5x"]];
    let cols = find_time_columns(&g, 10).unwrap();
    assert_eq!(labels(&cols), vec![(1, "2024"), (2, "2023")]);
    assert_eq!(cols[0].period, TimePeriod::annual(2024));
  }

  #[test]
  fn stops_at_first_matching_row() {
    let g = grid![["", "2025M01"], ["", "2025M02", "2025M03"]];
    let cols = find_time_columns(&g, 10).unwrap();
    assert_eq!(labels(&cols), vec![(1, "2025M01")]);
  }

  #[test]
  fn non_period_cells_are_ignored() {
    let g = grid![["", "Total", 12_i64, "2025M1", "12345", "2025M13"], ["", "2025M01"]];
    let cols = find_time_columns(&g, 10).unwrap();
    assert_eq!(labels(&cols), vec![(1, "2025M01")]);
  }

  #[test]
  fn header_beyond_scan_region_is_structure_not_found() {
    let g = grid![["title"], ["notes"], ["", "2025M01"]];
    let err = find_time_columns(&g, 2).unwrap_err();
    assert!(matches!(err, Error::StructureNotFound { scanned_rows: 2 }));
  }

  #[test]
  fn empty_grid_is_structure_not_found() {
    let err = find_time_columns(&Grid::default(), 100).unwrap_err();
    assert!(matches!(err, Error::StructureNotFound { scanned_rows: 0 }));
  }
}
