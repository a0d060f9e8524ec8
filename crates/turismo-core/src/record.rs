//! Extraction outputs: flat observations and tidy records.

use serde::{Deserialize, Serialize};

use crate::{
  metric::{MetricKind, Metrics},
  period::TimePeriod,
};

/// One non-null cell recovered from the sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
  pub category: String,
  pub period:   TimePeriod,
  pub metric:   MetricKind,
  pub value:    f64,
}

/// One row per `(category, period)` with one field per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TidyRecord {
  pub category: String,
  pub period:   TimePeriod,
  pub metrics:  Metrics,
}
