//! The `StarStore` trait and the row types it returns.
//!
//! The trait is implemented by storage backends (e.g. `turismo-store-sqlite`).
//! The pipeline runner depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  family::{CategoryFamily, StayBounds},
  metric::Metrics,
  period::TimePeriod,
  record::TidyRecord,
};

// ─── Row types ───────────────────────────────────────────────────────────────

/// A persisted `dim_time` row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeRow {
  pub id:                 i64,
  pub period:             TimePeriod,
  pub quarter:            Option<u32>,
  pub month_description:  Option<String>,
  pub first_day_of_month: Option<NaiveDate>,
}

/// A persisted `dim_<family>` row. `bounds` is only populated for
/// [`CategoryFamily::Duration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRow {
  pub id:     i64,
  pub name:   String,
  pub bounds: Option<StayBounds>,
}

/// A persisted fact row with its full surrogate-key tuple.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRow {
  pub time_id:     i64,
  pub country_id:  i64,
  pub region_id:   i64,
  pub motive_id:   i64,
  pub duration_id: i64,
  pub metrics:     Metrics,
}

impl FactRow {
  /// The foreign key this row holds for `family`.
  pub fn key_for(&self, family: CategoryFamily) -> i64 {
    match family {
      CategoryFamily::Country => self.country_id,
      CategoryFamily::Region => self.region_id,
      CategoryFamily::Motive => self.motive_id,
      CategoryFamily::Duration => self.duration_id,
    }
  }
}

/// Summary of one source-file load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
  pub family:         CategoryFamily,
  /// Tidy records upserted into the fact table.
  pub records:        usize,
  /// `dim_time` rows created by this load.
  pub new_periods:    usize,
  /// `dim_<family>` rows created by this load.
  pub new_categories: usize,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a star-schema backend.
///
/// Dimension and fact rows are append/update-only; no method deletes.
pub trait StarStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Load the tidy records of one source file atomically.
  ///
  /// Either every record commits or none does. Reloading the same records is
  /// idempotent; a `None` metric never clears a previously stored value.
  fn load(
    &self,
    family: CategoryFamily,
    records: Vec<TidyRecord>,
  ) -> impl Future<Output = Result<LoadReport, Self::Error>> + Send + '_;

  /// All `dim_time` rows ordered by `(year, month)`.
  fn time_periods(&self) -> impl Future<Output = Result<Vec<TimeRow>, Self::Error>> + Send + '_;

  /// All rows of a family's dimension, sentinel included, ordered by id.
  fn categories(
    &self,
    family: CategoryFamily,
  ) -> impl Future<Output = Result<Vec<CategoryRow>, Self::Error>> + Send + '_;

  /// The metrics stored for `name` in `family` at `period`, with every other
  /// family at its sentinel. Returns `None` if no such fact exists.
  fn fact<'a>(
    &'a self,
    family: CategoryFamily,
    name: &'a str,
    period: TimePeriod,
  ) -> impl Future<Output = Result<Option<Metrics>, Self::Error>> + Send + 'a;

  /// Every fact row, ordered by key tuple.
  fn fact_rows(&self) -> impl Future<Output = Result<Vec<FactRow>, Self::Error>> + Send + '_;
}
