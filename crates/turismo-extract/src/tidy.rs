//! Pivot flat observations into one record per `(category, period)`.

use std::collections::BTreeMap;

use tracing::debug;
use turismo_core::{
  metric::Metrics,
  period::TimePeriod,
  record::{Observation, TidyRecord},
};

/// Group observations by `(category, period)` and fold their metrics into a
/// single record. For a repeated `(category, period, metric)` the first
/// observation wins and later ones are dropped.
///
/// Records come out ordered by category, then period.
pub fn assemble(observations: impl IntoIterator<Item = Observation>) -> Vec<TidyRecord> {
  let mut groups: BTreeMap<(String, TimePeriod), Metrics> = BTreeMap::new();
  let mut dropped = 0usize;

  for obs in observations {
    let metrics = groups.entry((obs.category, obs.period)).or_default();
    if !metrics.set_if_absent(obs.metric, obs.value) {
      dropped += 1;
    }
  }

  if dropped > 0 {
    debug!(dropped, "duplicate observations dropped");
  }

  groups
    .into_iter()
    .map(|((category, period), metrics)| TidyRecord { category, period, metrics })
    .collect()
}

#[cfg(test)]
mod tests {
  use turismo_core::metric::MetricKind;

  use super::*;

  fn obs(category: &str, month: u32, metric: MetricKind, value: f64) -> Observation {
    Observation {
      category: category.into(),
      period: TimePeriod::monthly(2024, month).unwrap(),
      metric,
      value,
    }
  }

  #[test]
  fn one_record_per_category_and_period() {
    let records = assemble(vec![
      obs("España", 1, MetricKind::VisitorCount, 100.0),
      obs("España", 1, MetricKind::YearlyChangePct, 2.5),
      obs("España", 2, MetricKind::VisitorCount, 120.0),
      obs("Francia", 1, MetricKind::VisitorCount, 80.0),
    ]);

    assert_eq!(records.len(), 3);
    let jan = &records[0];
    assert_eq!(jan.category, "España");
    assert_eq!(jan.period.month(), Some(1));
    assert_eq!(jan.metrics.visitor_count, Some(100));
    assert_eq!(jan.metrics.yearly_change_pct, Some(2.5));
    assert_eq!(jan.metrics.cumulative_count, None);
    assert_eq!(jan.metrics.cumulative_change_pct, None);
    assert_eq!(records[2].category, "Francia");
  }

  #[test]
  fn first_duplicate_wins() {
    let records = assemble(vec![
      obs("España", 1, MetricKind::VisitorCount, 100.0),
      obs("España", 1, MetricKind::VisitorCount, 999.0),
    ]);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].metrics.visitor_count, Some(100));
  }

  #[test]
  fn empty_input_empty_output() {
    assert!(assemble(Vec::new()).is_empty());
  }
}
