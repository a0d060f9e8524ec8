//! Category families and their dimension attributes.
//!
//! Every source spreadsheet measures one family. Each family owns its own
//! dimension table; the fact table references all four, using the sentinel
//! row for the families a file does not break down.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{Error, text::normalize_label};

/// Surrogate id reserved in every dimension for "not broken down by this
/// dimension".
pub const SENTINEL_ID: i64 = 0;

/// Name stored on every sentinel row.
pub const SENTINEL_NAME: &str = "Not applicable";

// ─── Family ──────────────────────────────────────────────────────────────────

/// The subject a spreadsheet measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryFamily {
  /// Country of residence of the traveller.
  Country,
  /// Autonomous region visited.
  Region,
  /// Main travel motive.
  Motive,
  /// Length-of-stay bucket.
  Duration,
}

impl CategoryFamily {
  pub const ALL: [CategoryFamily; 4] = [
    CategoryFamily::Country,
    CategoryFamily::Region,
    CategoryFamily::Motive,
    CategoryFamily::Duration,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Country => "country",
      Self::Region => "region",
      Self::Motive => "motive",
      Self::Duration => "duration",
    }
  }

  /// Name of the family's dimension table.
  pub fn dimension_table(self) -> &'static str {
    match self {
      Self::Country => "dim_country",
      Self::Region => "dim_region",
      Self::Motive => "dim_motive",
      Self::Duration => "dim_duration",
    }
  }

  /// Name of the family's foreign-key column in the fact table.
  pub fn fact_column(self) -> &'static str {
    match self {
      Self::Country => "country_id",
      Self::Region => "region_id",
      Self::Motive => "motive_id",
      Self::Duration => "duration_id",
    }
  }

  /// Whether the dimension carries [`StayBounds`] columns.
  pub fn has_bounds(self) -> bool { matches!(self, Self::Duration) }
}

impl fmt::Display for CategoryFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for CategoryFamily {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "country" | "pais" => Ok(Self::Country),
      "region" | "comunidad" => Ok(Self::Region),
      "motive" | "motivo" => Ok(Self::Motive),
      "duration" | "duracion" => Ok(Self::Duration),
      _ => Err(Error::UnknownFamily(s.to_string())),
    }
  }
}

// ─── Stay bounds ─────────────────────────────────────────────────────────────

static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\bde (\d+) a (\d+) noches?\b").expect("invalid range regex")
});
static MORE_THAN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bmas de (\d+) noches?\b").expect("invalid lower-bound regex"));
static LESS_THAN_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\bmenos de (\d+) noches?\b").expect("invalid upper-bound regex"));
static EXACT_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d+) noches?\b").expect("invalid exact regex"));

/// Night-count bounds of a duration bucket, both inclusive.
///
/// Derived from the bucket label; `None` on either side means unbounded or
/// unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayBounds {
  pub min_nights: Option<u32>,
  pub max_nights: Option<u32>,
}

impl StayBounds {
  /// Parse bucket labels such as `"De 2 a 3 noches"`, `"Más de 15 noches"`,
  /// `"Menos de 4 noches"`, `"1 noche"` or `"Sin pernoctación"`.
  pub fn from_label(label: &str) -> Self {
    let norm = normalize_label(label);

    if norm.starts_with("sin pernoct") {
      return Self { min_nights: Some(0), max_nights: Some(0) };
    }
    if let Some(c) = RANGE_RE.captures(&norm) {
      return Self { min_nights: nights(&c, 1), max_nights: nights(&c, 2) };
    }
    if let Some(c) = MORE_THAN_RE.captures(&norm) {
      return Self { min_nights: nights(&c, 1).map(|v| v + 1), max_nights: None };
    }
    if let Some(c) = LESS_THAN_RE.captures(&norm) {
      return Self {
        min_nights: Some(0),
        max_nights: nights(&c, 1).map(|v| v.saturating_sub(1)),
      };
    }
    if let Some(c) = EXACT_RE.captures(&norm) {
      let v = nights(&c, 1);
      return Self { min_nights: v, max_nights: v };
    }
    Self::default()
  }
}

fn nights(captures: &regex::Captures<'_>, group: usize) -> Option<u32> {
  captures.get(group).and_then(|m| m.as_str().parse().ok())
}
