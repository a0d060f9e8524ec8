//! Metric kinds and the per-record metric bundle.

use serde::{Deserialize, Serialize};

/// The closed set of measures a category block can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
  /// Count of travellers in the period ("Dato base").
  VisitorCount,
  /// Percent change against the same period one year earlier.
  YearlyChangePct,
  /// Year-to-date cumulative count.
  CumulativeCount,
  /// Percent change of the cumulative count.
  CumulativeChangePct,
}

/// The four metrics of one fact row. `None` means "absent in the source",
/// never zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
  pub visitor_count:         Option<i64>,
  pub yearly_change_pct:     Option<f64>,
  pub cumulative_count:      Option<i64>,
  pub cumulative_change_pct: Option<f64>,
}

impl Metrics {
  /// Set `kind` to `value` unless it already holds a value.
  ///
  /// Counts are truncated toward zero. Returns `false` when the slot was
  /// already filled and the value was dropped.
  pub fn set_if_absent(&mut self, kind: MetricKind, value: f64) -> bool {
    fn fill<T>(slot: &mut Option<T>, v: T) -> bool {
      if slot.is_some() {
        return false;
      }
      *slot = Some(v);
      true
    }

    match kind {
      MetricKind::VisitorCount => fill(&mut self.visitor_count, value.trunc() as i64),
      MetricKind::YearlyChangePct => fill(&mut self.yearly_change_pct, value),
      MetricKind::CumulativeCount => fill(&mut self.cumulative_count, value.trunc() as i64),
      MetricKind::CumulativeChangePct => fill(&mut self.cumulative_change_pct, value),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_value_wins() {
    let mut m = Metrics::default();
    assert!(m.set_if_absent(MetricKind::VisitorCount, 500.0));
    assert!(!m.set_if_absent(MetricKind::VisitorCount, 900.0));
    assert_eq!(m.visitor_count, Some(500));
  }

  #[test]
  fn counts_truncate() {
    let mut m = Metrics::default();
    m.set_if_absent(MetricKind::CumulativeCount, 1234.9);
    assert_eq!(m.cumulative_count, Some(1234));
  }

  #[test]
  fn percentages_keep_fraction() {
    let mut m = Metrics::default();
    m.set_if_absent(MetricKind::YearlyChangePct, -3.25);
    assert_eq!(m.yearly_change_pct, Some(-3.25));
  }
}
