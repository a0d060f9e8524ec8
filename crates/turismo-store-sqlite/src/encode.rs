//! Encoding and decoding helpers between domain types and the plain
//! representations stored in SQLite columns.
//!
//! Dates are stored as ISO 8601 `YYYY-MM-DD` strings. Periods are stored as
//! `(year, month)` with a NULL month for annual rows.

use chrono::NaiveDate;
use turismo_core::{
  family::StayBounds,
  metric::Metrics,
  period::TimePeriod,
  store::{CategoryRow, FactRow, TimeRow},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── TimePeriod ──────────────────────────────────────────────────────────────

pub fn decode_period(year: i32, month: Option<u32>) -> Result<TimePeriod> {
  match month {
    Some(m) => Ok(TimePeriod::monthly(year, m)?),
    None => Ok(TimePeriod::annual(year)),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `dim_time` row.
pub struct RawTimeRow {
  pub id:                 i64,
  pub year:               i32,
  pub month:              Option<u32>,
  pub quarter:            Option<u32>,
  pub month_description:  Option<String>,
  pub first_day_of_month: Option<String>,
}

impl RawTimeRow {
  pub fn into_time_row(self) -> Result<TimeRow> {
    Ok(TimeRow {
      id:                 self.id,
      period:             decode_period(self.year, self.month)?,
      quarter:            self.quarter,
      month_description:  self.month_description,
      first_day_of_month: self
        .first_day_of_month
        .as_deref()
        .map(decode_date)
        .transpose()?,
    })
  }
}

/// Raw values read directly from a `dim_<family>` row. The bounds columns
/// are only selected for the duration dimension.
pub struct RawCategoryRow {
  pub id:     i64,
  pub name:   String,
  pub bounds: Option<(Option<u32>, Option<u32>)>,
}

impl RawCategoryRow {
  pub fn into_category_row(self) -> CategoryRow {
    CategoryRow {
      id:     self.id,
      name:   self.name,
      bounds: self
        .bounds
        .map(|(min_nights, max_nights)| StayBounds { min_nights, max_nights }),
    }
  }
}

/// Column list matching [`RawFactRow::from_row`].
pub const FACT_COLUMNS: &str = "time_id, country_id, region_id, motive_id, duration_id, \
   visitor_count, yearly_change_pct, cumulative_count, cumulative_change_pct";

/// Raw values read directly from a `fact_turismo` row.
pub struct RawFactRow {
  pub time_id:               i64,
  pub country_id:            i64,
  pub region_id:             i64,
  pub motive_id:             i64,
  pub duration_id:           i64,
  pub visitor_count:         Option<i64>,
  pub yearly_change_pct:     Option<f64>,
  pub cumulative_count:      Option<i64>,
  pub cumulative_change_pct: Option<f64>,
}

impl RawFactRow {
  /// Read a row selected with [`FACT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      time_id:               row.get(0)?,
      country_id:            row.get(1)?,
      region_id:             row.get(2)?,
      motive_id:             row.get(3)?,
      duration_id:           row.get(4)?,
      visitor_count:         row.get(5)?,
      yearly_change_pct:     row.get(6)?,
      cumulative_count:      row.get(7)?,
      cumulative_change_pct: row.get(8)?,
    })
  }

  pub fn into_fact_row(self) -> FactRow {
    FactRow {
      time_id:     self.time_id,
      country_id:  self.country_id,
      region_id:   self.region_id,
      motive_id:   self.motive_id,
      duration_id: self.duration_id,
      metrics:     Metrics {
        visitor_count:         self.visitor_count,
        yearly_change_pct:     self.yearly_change_pct,
        cumulative_count:      self.cumulative_count,
        cumulative_change_pct: self.cumulative_change_pct,
      },
    }
  }
}
