//! The block scanner: recovers `(category, period, metric, value)` tuples
//! from the label column.
//!
//! Sheets stack one block per category:
//!
//! ```text
//! España                          <- category header
//! Dato base              100  ... <- metric rows, values under period columns
//! Tasa de variación anual 2,5 ...
//! Francia
//! Dato base               80  ...
//! ```
//!
//! A category header is only recognisable by lookahead: it is a text row whose
//! next row is exactly the base-value metric label.

use tracing::debug;
use turismo_core::{
  grid::{Cell, Grid},
  metric::MetricKind,
  record::Observation,
  text::normalize_label,
};

use crate::{columns::TimeColumn, number::parse_number};

/// Normalized label of the metric row that opens every category block.
pub const BASE_LABEL: &str = "dato base";

/// Normalized metric labels, checked in order.
const METRIC_LABELS: [(&str, MetricKind); 4] = [
  (BASE_LABEL, MetricKind::VisitorCount),
  ("tasa de variacion anual", MetricKind::YearlyChangePct),
  ("acumulado en lo que va de ano", MetricKind::CumulativeCount),
  ("tasa de variacion acumulada", MetricKind::CumulativeChangePct),
];

/// Map a normalized label to its metric kind. A label matches when it
/// contains the vocabulary key, which tolerates trailing footnote markers.
pub fn metric_for_label(normalized: &str) -> Option<MetricKind> {
  METRIC_LABELS
    .iter()
    .find(|(key, _)| normalized.contains(key))
    .map(|(_, kind)| *kind)
}

// ─── Row classification ──────────────────────────────────────────────────────

/// What the label cell of a row says about the block structure.
#[derive(Debug, Clone, PartialEq)]
pub enum RowLabel {
  /// Empty or whitespace-only label; the row is skipped.
  Blank,
  /// A metric row.
  Metric(MetricKind),
  /// A category header (surface-trimmed text).
  Category(String),
  /// Anything else: no state change.
  Other,
}

impl RowLabel {
  /// Classify `label` given the label cell of the following row.
  ///
  /// Metric matches take precedence over header detection.
  pub fn classify(label: &Cell, next_label: &Cell) -> Self {
    if label.is_blank() {
      return RowLabel::Blank;
    }
    let Some(text) = label.text() else {
      return RowLabel::Other;
    };

    if let Some(kind) = metric_for_label(&normalize_label(text)) {
      return RowLabel::Metric(kind);
    }

    let opens_block = next_label
      .text()
      .is_some_and(|next| normalize_label(next) == BASE_LABEL);
    if opens_block {
      RowLabel::Category(text.trim().to_string())
    } else {
      RowLabel::Other
    }
  }
}

// ─── State machine ───────────────────────────────────────────────────────────

/// Scanner state carried from one row to the next.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanState {
  pub category: Option<String>,
  pub metric:   Option<MetricKind>,
}

impl ScanState {
  /// The state after reading a row labelled `label`.
  pub fn transition(self, label: RowLabel) -> Self {
    match label {
      RowLabel::Metric(kind) => Self { metric: Some(kind), ..self },
      RowLabel::Category(name) => {
        debug!(category = %name, "category block");
        Self { category: Some(name), metric: None }
      }
      RowLabel::Blank | RowLabel::Other => self,
    }
  }

  /// Consume row `row`: returns the next state and the observations the row
  /// emits under it.
  pub fn step(self, grid: &Grid, row: usize, columns: &[TimeColumn]) -> (Self, Vec<Observation>) {
    let label = RowLabel::classify(grid.get(row, 0), grid.get(row + 1, 0));
    if label == RowLabel::Blank {
      return (self, Vec::new());
    }

    let next = self.transition(label);
    let emitted = match (&next.category, next.metric) {
      (Some(category), Some(metric)) => columns
        .iter()
        .filter_map(|col| {
          let value = parse_number(grid.get(row, col.index))?;
          Some(Observation { category: category.clone(), period: col.period, metric, value })
        })
        .collect(),
      _ => Vec::new(),
    };

    (next, emitted)
  }
}

/// Walk every row of `grid` once, top to bottom.
pub fn scan(grid: &Grid, columns: &[TimeColumn]) -> Vec<Observation> {
  let (_, observations) = (0..grid.height()).fold(
    (ScanState::default(), Vec::new()),
    |(state, mut acc), row| {
      let (next, emitted) = state.step(grid, row, columns);
      acc.extend(emitted);
      (next, acc)
    },
  );
  observations
}

#[cfg(test)]
mod tests {
  use turismo_core::{grid, period::TimePeriod};

  use super::*;
  use crate::columns::find_time_columns;

  fn observations(g: &Grid) -> Vec<Observation> {
    let columns = find_time_columns(g, 30).unwrap();
    scan(g, &columns)
  }

  fn jan() -> TimePeriod { TimePeriod::monthly(2024, 1).unwrap() }

  #[test]
  fn metric_vocabulary() {
    assert_eq!(metric_for_label("dato base"), Some(MetricKind::VisitorCount));
    assert_eq!(metric_for_label("tasa de variacion anual (1)"), Some(MetricKind::YearlyChangePct));
    assert_eq!(
      metric_for_label("acumulado en lo que va de ano"),
      Some(MetricKind::CumulativeCount)
    );
    assert_eq!(
      metric_for_label("tasa de variacion acumulada"),
      Some(MetricKind::CumulativeChangePct)
    );
    assert_eq!(metric_for_label("espana"), None);
  }

  #[test]
  fn classify_prefers_metric_over_header() {
    let label = RowLabel::classify(&Cell::from("Dato base"), &Cell::from("Dato base"));
    assert_eq!(label, RowLabel::Metric(MetricKind::VisitorCount));
  }

  #[test]
  fn classify_header_needs_exact_base_label_next() {
    let header = RowLabel::classify(&Cell::from("  España "), &Cell::from("DATO  BASE"));
    assert_eq!(header, RowLabel::Category("España".into()));

    let not_header = RowLabel::classify(&Cell::from("España"), &Cell::from("Dato base (1)"));
    assert_eq!(not_header, RowLabel::Other);
  }

  #[test]
  fn classify_blank_and_numeric() {
    assert_eq!(RowLabel::classify(&Cell::Empty, &Cell::from("Dato base")), RowLabel::Blank);
    assert_eq!(RowLabel::classify(&Cell::from(" "), &Cell::Empty), RowLabel::Blank);
    assert_eq!(RowLabel::classify(&Cell::Int(3), &Cell::Empty), RowLabel::Other);
  }

  #[test]
  fn transition_resets_metric_on_new_category() {
    let state = ScanState { category: Some("España".into()), metric: Some(MetricKind::YearlyChangePct) };
    let next = state.transition(RowLabel::Category("Francia".into()));
    assert_eq!(next, ScanState { category: Some("Francia".into()), metric: None });
  }

  #[test]
  fn transition_metric_keeps_category() {
    let state = ScanState { category: Some("España".into()), metric: None };
    let next = state.transition(RowLabel::Metric(MetricKind::CumulativeCount));
    assert_eq!(next.category.as_deref(), Some("España"));
    assert_eq!(next.metric, Some(MetricKind::CumulativeCount));
  }

  #[test]
  fn lookahead_attributes_both_rows_to_category() {
    let g = grid![
      ["", "2024M01"],
      ["España"],
      ["Dato base", 100],
      ["Tasa de variación anual", 2.5],
    ];
    let obs = observations(&g);
    assert_eq!(
      obs,
      vec![
        Observation { category: "España".into(), period: jan(), metric: MetricKind::VisitorCount, value: 100.0 },
        Observation { category: "España".into(), period: jan(), metric: MetricKind::YearlyChangePct, value: 2.5 },
      ]
    );
  }

  #[test]
  fn multiple_blocks_and_blank_rows() {
    let g = grid![
      ["Turistas según país de residencia"],
      ["", "2024M02", "2024M01"],
      ["España"],
      ["Dato base", "1.200", "1.100"],
      [""],
      ["Francia"],
      ["Dato base", 80, ""],
      ["Acumulado en lo que va de año", "160", "80"],
    ];
    let obs = observations(&g);
    let summary: Vec<_> = obs.iter().map(|o| (o.category.as_str(), o.metric, o.period.to_string(), o.value)).collect();
    assert_eq!(
      summary,
      vec![
        ("España", MetricKind::VisitorCount, "2024M02".to_string(), 1200.0),
        ("España", MetricKind::VisitorCount, "2024M01".to_string(), 1100.0),
        ("Francia", MetricKind::VisitorCount, "2024M02".to_string(), 80.0),
        ("Francia", MetricKind::CumulativeCount, "2024M02".to_string(), 160.0),
        ("Francia", MetricKind::CumulativeCount, "2024M01".to_string(), 80.0),
      ]
    );
  }

  #[test]
  fn blank_label_rows_do_not_emit() {
    let g = grid![
      ["", "2024M01"],
      ["España"],
      ["Dato base", 100],
      ["", 999],
    ];
    let obs = observations(&g);
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].value, 100.0);
  }

  #[test]
  fn header_row_itself_emits_nothing() {
    let g = grid![["", "2024M01"], ["España", 7], ["Dato base", 100]];
    let obs = observations(&g);
    assert_eq!(obs.len(), 1);
    assert_eq!(obs[0].metric, MetricKind::VisitorCount);
  }

  #[test]
  fn no_blocks_yields_nothing() {
    let g = grid![["", "2024M01"], ["Total", 10], ["Notas", 3]];
    assert!(observations(&g).is_empty());
  }

  #[test]
  fn annual_columns_emit_annual_periods() {
    let g = grid![["", 2024_i64, 2023_i64], ["Andalucía"], ["Dato base", "12.000.000", "11.500.000"]];
    let obs = observations(&g);
    assert_eq!(obs.len(), 2);
    assert_eq!(obs[0].period, TimePeriod::annual(2024));
    assert_eq!(obs[0].value, 12_000_000.0);
    assert_eq!(obs[1].period.quarter(), None);
  }
}
