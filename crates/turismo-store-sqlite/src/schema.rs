//! SQL schema for the turismo star schema.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Shared time dimension. Annual rows have NULL month and quarter.
CREATE TABLE IF NOT EXISTS dim_time (
    id                 INTEGER PRIMARY KEY,
    year               INTEGER NOT NULL,
    month              INTEGER CHECK (month BETWEEN 1 AND 12),
    quarter            INTEGER CHECK (quarter BETWEEN 1 AND 4),
    month_description  TEXT,
    first_day_of_month TEXT,              -- ISO 8601 date
    CHECK ((month IS NULL) = (quarter IS NULL))
);

-- NULLs are distinct under UNIQUE, so fold the annual month to 0.
CREATE UNIQUE INDEX IF NOT EXISTS dim_time_natural_key
    ON dim_time (year, IFNULL(month, 0));

-- One dimension per category family. Row id 0 is the 'Not applicable'
-- sentinel.
CREATE TABLE IF NOT EXISTS dim_country (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS dim_region (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS dim_motive (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0)
);

CREATE TABLE IF NOT EXISTS dim_duration (
    id         INTEGER PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE CHECK (length(trim(name)) > 0),
    min_nights INTEGER,
    max_nights INTEGER
);

-- Unified fact table. Families a source does not break down point at the
-- sentinel row of their dimension.
CREATE TABLE IF NOT EXISTS fact_turismo (
    time_id               INTEGER NOT NULL REFERENCES dim_time(id),
    country_id            INTEGER NOT NULL DEFAULT 0 REFERENCES dim_country(id),
    region_id             INTEGER NOT NULL DEFAULT 0 REFERENCES dim_region(id),
    motive_id             INTEGER NOT NULL DEFAULT 0 REFERENCES dim_motive(id),
    duration_id           INTEGER NOT NULL DEFAULT 0 REFERENCES dim_duration(id),
    visitor_count         INTEGER,
    yearly_change_pct     REAL,
    cumulative_count      INTEGER,
    cumulative_change_pct REAL,
    PRIMARY KEY (time_id, country_id, region_id, motive_id, duration_id)
);

CREATE INDEX IF NOT EXISTS fact_turismo_country_idx  ON fact_turismo(country_id);
CREATE INDEX IF NOT EXISTS fact_turismo_region_idx   ON fact_turismo(region_id);
CREATE INDEX IF NOT EXISTS fact_turismo_motive_idx   ON fact_turismo(motive_id);
CREATE INDEX IF NOT EXISTS fact_turismo_duration_idx ON fact_turismo(duration_id);

PRAGMA user_version = 1;
";

/// Every table the schema creates, for validated ad-hoc queries.
pub const TABLES: [&str; 6] = [
  "dim_time",
  "dim_country",
  "dim_region",
  "dim_motive",
  "dim_duration",
  "fact_turismo",
];
