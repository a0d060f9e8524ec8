//! [`SqliteStore`], the SQLite implementation of [`StarStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use turismo_core::{
  family::{CategoryFamily, SENTINEL_ID},
  metric::Metrics,
  period::TimePeriod,
  record::TidyRecord,
  store::{CategoryRow, FactRow, LoadReport, StarStore, TimeRow},
};

use crate::{
  encode::{FACT_COLUMNS, RawCategoryRow, RawFactRow, RawTimeRow},
  loader,
  schema::{SCHEMA, TABLES},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A turismo warehouse backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing and dry runs.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        loader::ensure_sentinels(conn)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of rows in one of the warehouse tables.
  pub async fn row_count(&self, table: &str) -> Result<u64> {
    let table = TABLES
      .iter()
      .copied()
      .find(|t| *t == table)
      .ok_or_else(|| Error::UnknownTable(table.to_owned()))?;

    let n: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))?)
      })
      .await?;
    Ok(n.max(0) as u64)
  }
}

// ─── StarStore impl ──────────────────────────────────────────────────────────

impl StarStore for SqliteStore {
  type Error = Error;

  async fn load(&self, family: CategoryFamily, records: Vec<TidyRecord>) -> Result<LoadReport> {
    debug!(%family, records = records.len(), "loading records");

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let report = loader::load_records(&tx, family, &records)?;
        tx.commit()?;
        Ok(report)
      })
      .await?;

    info!(
      %family,
      records = report.records,
      new_periods = report.new_periods,
      new_categories = report.new_categories,
      "load committed"
    );
    Ok(report)
  }

  async fn time_periods(&self) -> Result<Vec<TimeRow>> {
    let raws: Vec<RawTimeRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, year, month, quarter, month_description, first_day_of_month
           FROM dim_time ORDER BY year, IFNULL(month, 0)",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawTimeRow {
              id:                 row.get(0)?,
              year:               row.get(1)?,
              month:              row.get(2)?,
              quarter:            row.get(3)?,
              month_description:  row.get(4)?,
              first_day_of_month: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTimeRow::into_time_row).collect()
  }

  async fn categories(&self, family: CategoryFamily) -> Result<Vec<CategoryRow>> {
    let table = family.dimension_table();
    let with_bounds = family.has_bounds();

    let raws: Vec<RawCategoryRow> = self
      .conn
      .call(move |conn| {
        let sql = if with_bounds {
          format!("SELECT id, name, min_nights, max_nights FROM {table} ORDER BY id")
        } else {
          format!("SELECT id, name FROM {table} ORDER BY id")
        };
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], |row| {
            let bounds = if with_bounds { Some((row.get(2)?, row.get(3)?)) } else { None };
            Ok(RawCategoryRow { id: row.get(0)?, name: row.get(1)?, bounds })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawCategoryRow::into_category_row).collect())
  }

  async fn fact<'a>(
    &'a self,
    family: CategoryFamily,
    name: &'a str,
    period: TimePeriod,
  ) -> Result<Option<Metrics>> {
    let table = family.dimension_table();
    let column = family.fact_column();
    let others: Vec<&'static str> = CategoryFamily::ALL
      .into_iter()
      .filter(|f| *f != family)
      .map(CategoryFamily::fact_column)
      .collect();
    let name = name.to_owned();

    let raw: Option<RawFactRow> = self
      .conn
      .call(move |conn| {
        let sentinel_filter = others
          .iter()
          .map(|c| format!("f.{c} = {SENTINEL_ID}"))
          .collect::<Vec<_>>()
          .join(" AND ");
        let sql = format!(
          "SELECT {FACT_COLUMNS}
           FROM fact_turismo f
           JOIN dim_time t ON t.id = f.time_id
           JOIN {table} d ON d.id = f.{column}
           WHERE d.name = ?1 AND t.year = ?2 AND t.month IS ?3 AND {sentinel_filter}"
        );
        Ok(
          conn
            .query_row(
              &sql,
              rusqlite::params![name, period.year(), period.month()],
              RawFactRow::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(|r| r.into_fact_row().metrics))
  }

  async fn fact_rows(&self) -> Result<Vec<FactRow>> {
    let raws: Vec<RawFactRow> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {FACT_COLUMNS} FROM fact_turismo
           ORDER BY time_id, country_id, region_id, motive_id, duration_id"
        ))?;
        let rows = stmt
          .query_map([], RawFactRow::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawFactRow::into_fact_row).collect())
  }
}
