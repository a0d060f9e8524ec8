//! Dimensional upsert loader.
//!
//! Every function takes the caller's connection (in practice the open
//! [`rusqlite::Transaction`] of one file load) and never commits. Natural-key
//! resolution is "select by key; insert if absent; read back the id", which
//! stays correct under the single-writer model because the transaction and
//! the unique indexes enclose it.

use rusqlite::{Connection, OptionalExtension as _, params};
use turismo_core::{
  family::{CategoryFamily, SENTINEL_ID, SENTINEL_NAME, StayBounds},
  metric::Metrics,
  period::TimePeriod,
  record::TidyRecord,
  store::LoadReport,
};

use crate::encode::encode_date;

/// A surrogate id and whether this call created its row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Resolved {
  pub id:      i64,
  pub created: bool,
}

// ─── Sentinels ───────────────────────────────────────────────────────────────

/// Insert the id-0 "Not applicable" row into every dimension that lacks it.
pub(crate) fn ensure_sentinels(conn: &Connection) -> rusqlite::Result<()> {
  for family in CategoryFamily::ALL {
    let table = family.dimension_table();
    conn.execute(
      &format!(
        "INSERT INTO {table} (id, name)
         SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM {table} WHERE id = ?1)"
      ),
      params![SENTINEL_ID, SENTINEL_NAME],
    )?;
  }
  Ok(())
}

// ─── Time dimension ──────────────────────────────────────────────────────────

/// Resolve `period` to its `dim_time` id, creating the row on first sight.
///
/// An existing row is only touched to backfill a missing month description or
/// first-day date; year, month and quarter never change.
pub(crate) fn resolve_time(conn: &Connection, period: TimePeriod) -> rusqlite::Result<Resolved> {
  let description = period.month_description();
  let first_day = period.first_day().map(encode_date);

  let existing: Option<(i64, Option<String>, Option<String>)> = conn
    .query_row(
      "SELECT id, month_description, first_day_of_month
       FROM dim_time WHERE year = ?1 AND month IS ?2",
      params![period.year(), period.month()],
      |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )
    .optional()?;

  match existing {
    Some((id, Some(_), Some(_))) => Ok(Resolved { id, created: false }),
    Some((id, ..)) => {
      conn.execute(
        "UPDATE dim_time
         SET month_description  = COALESCE(month_description, ?2),
             first_day_of_month = COALESCE(first_day_of_month, ?3)
         WHERE id = ?1",
        params![id, description, first_day],
      )?;
      Ok(Resolved { id, created: false })
    }
    None => {
      conn.execute(
        "INSERT INTO dim_time (year, month, quarter, month_description, first_day_of_month)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![period.year(), period.month(), period.quarter(), description, first_day],
      )?;
      Ok(Resolved { id: conn.last_insert_rowid(), created: true })
    }
  }
}

// ─── Category dimensions ─────────────────────────────────────────────────────

/// Resolve `name` within `family` to its dimension id, creating the row on
/// first sight. Duration rows get their [`StayBounds`] from the label.
pub(crate) fn resolve_category(
  conn: &Connection,
  family: CategoryFamily,
  name: &str,
) -> rusqlite::Result<Resolved> {
  let table = family.dimension_table();

  let existing: Option<i64> = conn
    .query_row(&format!("SELECT id FROM {table} WHERE name = ?1"), params![name], |row| {
      row.get(0)
    })
    .optional()?;
  if let Some(id) = existing {
    return Ok(Resolved { id, created: false });
  }

  if family.has_bounds() {
    let bounds = StayBounds::from_label(name);
    conn.execute(
      &format!("INSERT INTO {table} (name, min_nights, max_nights) VALUES (?1, ?2, ?3)"),
      params![name, bounds.min_nights, bounds.max_nights],
    )?;
  } else {
    conn.execute(&format!("INSERT INTO {table} (name) VALUES (?1)"), params![name])?;
  }
  Ok(Resolved { id: conn.last_insert_rowid(), created: true })
}

// ─── Facts ───────────────────────────────────────────────────────────────────

/// The full key tuple of a fact row: one family carries `category_id`, the
/// other three point at their sentinel.
pub(crate) fn fact_key(time_id: i64, family: CategoryFamily, category_id: i64) -> [i64; 5] {
  let id_for = |f: CategoryFamily| if f == family { category_id } else { SENTINEL_ID };
  [
    time_id,
    id_for(CategoryFamily::Country),
    id_for(CategoryFamily::Region),
    id_for(CategoryFamily::Motive),
    id_for(CategoryFamily::Duration),
  ]
}

/// Insert or update one fact row. On key collision a metric is overwritten
/// only when the new value is non-null.
pub(crate) fn upsert_fact(conn: &Connection, key: [i64; 5], metrics: &Metrics) -> rusqlite::Result<()> {
  let [time_id, country_id, region_id, motive_id, duration_id] = key;
  conn.execute(
    "INSERT INTO fact_turismo (
       time_id, country_id, region_id, motive_id, duration_id,
       visitor_count, yearly_change_pct, cumulative_count, cumulative_change_pct
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
     ON CONFLICT (time_id, country_id, region_id, motive_id, duration_id) DO UPDATE SET
       visitor_count         = COALESCE(excluded.visitor_count, visitor_count),
       yearly_change_pct     = COALESCE(excluded.yearly_change_pct, yearly_change_pct),
       cumulative_count      = COALESCE(excluded.cumulative_count, cumulative_count),
       cumulative_change_pct = COALESCE(excluded.cumulative_change_pct, cumulative_change_pct)",
    params![
      time_id,
      country_id,
      region_id,
      motive_id,
      duration_id,
      metrics.visitor_count,
      metrics.yearly_change_pct,
      metrics.cumulative_count,
      metrics.cumulative_change_pct,
    ],
  )?;
  Ok(())
}

// ─── One file ────────────────────────────────────────────────────────────────

/// Load every record of one source file. The caller owns the transaction.
pub(crate) fn load_records(
  conn: &Connection,
  family: CategoryFamily,
  records: &[TidyRecord],
) -> rusqlite::Result<LoadReport> {
  ensure_sentinels(conn)?;

  let mut report = LoadReport { family, records: 0, new_periods: 0, new_categories: 0 };
  for record in records {
    let time = resolve_time(conn, record.period)?;
    let category = resolve_category(conn, family, &record.category)?;
    upsert_fact(conn, fact_key(time.id, family, category.id), &record.metrics)?;

    report.records += 1;
    report.new_periods += usize::from(time.created);
    report.new_categories += usize::from(category.created);
  }
  Ok(report)
}
