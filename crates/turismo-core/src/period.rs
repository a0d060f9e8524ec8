//! Time periods: the shared time dimension of every category family.
//!
//! A period is either monthly (`2025M01`) or annual (`2024`). Its natural key
//! is `(year, month)`; the quarter is always derived, never stored
//! independently.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const MONTH_NAMES_ES: [&str; 12] = [
  "enero",
  "febrero",
  "marzo",
  "abril",
  "mayo",
  "junio",
  "julio",
  "agosto",
  "septiembre",
  "octubre",
  "noviembre",
  "diciembre",
];

/// Description stored in `dim_time.month_description` for annual rows.
pub const ANNUAL_DESCRIPTION: &str = "anual";

/// A `(year, month)` pair; `month == None` means annual granularity.
///
/// Ordering is by year, then month, with the annual period sorting before
/// every month of the same year.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "RawTimePeriod")]
pub struct TimePeriod {
  year:  i32,
  month: Option<u32>,
}

/// Unvalidated wire form of [`TimePeriod`].
#[derive(Deserialize)]
struct RawTimePeriod {
  year:  i32,
  month: Option<u32>,
}

impl TryFrom<RawTimePeriod> for TimePeriod {
  type Error = Error;

  fn try_from(raw: RawTimePeriod) -> Result<Self> {
    match raw.month {
      Some(m) => Self::monthly(raw.year, m),
      None => Ok(Self::annual(raw.year)),
    }
  }
}

impl TimePeriod {
  /// A monthly period. Fails unless `month` is in `1..=12`.
  pub fn monthly(year: i32, month: u32) -> Result<Self> {
    if !(1..=12).contains(&month) {
      return Err(Error::InvalidPeriod(format!("{year}M{month:02}")));
    }
    Ok(Self { year, month: Some(month) })
  }

  /// An annual period.
  pub fn annual(year: i32) -> Self { Self { year, month: None } }

  /// Decode a normalized header label: `YYYYMmm` (monthly) or `YYYY`
  /// (annual). The `M` may be either case.
  pub fn from_label(label: &str) -> Result<Self> {
    let invalid = || Error::InvalidPeriod(label.to_string());
    let bytes = label.as_bytes();

    match bytes.len() {
      4 if bytes.iter().all(u8::is_ascii_digit) => {
        Ok(Self::annual(label.parse().map_err(|_| invalid())?))
      }
      7 if bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4].eq_ignore_ascii_case(&b'M')
        && bytes[5..].iter().all(u8::is_ascii_digit) =>
      {
        let year = label[..4].parse().map_err(|_| invalid())?;
        let month = label[5..].parse().map_err(|_| invalid())?;
        Self::monthly(year, month).map_err(|_| invalid())
      }
      _ => Err(invalid()),
    }
  }

  pub fn year(&self) -> i32 { self.year }

  pub fn month(&self) -> Option<u32> { self.month }

  /// `((month - 1) / 3) + 1` for monthly periods; `None` for annual ones.
  pub fn quarter(&self) -> Option<u32> { self.month.map(|m| (m - 1) / 3 + 1) }

  pub fn is_annual(&self) -> bool { self.month.is_none() }

  /// Human-readable month name in Spanish, or [`ANNUAL_DESCRIPTION`].
  pub fn month_description(&self) -> &'static str {
    match self.month {
      Some(m) => MONTH_NAMES_ES[(m - 1) as usize],
      None => ANNUAL_DESCRIPTION,
    }
  }

  /// First calendar day covered by the period (January 1st for annual rows).
  pub fn first_day(&self) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(self.year, self.month.unwrap_or(1), 1)
  }
}

impl fmt::Display for TimePeriod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.month {
      Some(m) => write!(f, "{}M{m:02}", self.year),
      None => write!(f, "{}", self.year),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn quarter_derived_from_month() {
    let quarters: Vec<_> = (1..=12)
      .map(|m| TimePeriod::monthly(2024, m).unwrap().quarter().unwrap())
      .collect();
    assert_eq!(quarters, vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
  }

  #[test]
  fn annual_has_no_quarter() {
    let p = TimePeriod::annual(2023);
    assert_eq!(p.month(), None);
    assert_eq!(p.quarter(), None);
    assert!(p.is_annual());
  }

  #[test]
  fn decodes_monthly_label() {
    let p = TimePeriod::from_label("2025M01").unwrap();
    assert_eq!((p.year(), p.month(), p.quarter()), (2025, Some(1), Some(1)));

    let lower = TimePeriod::from_label("2025m11").unwrap();
    assert_eq!(lower.month(), Some(11));
    assert_eq!(lower.quarter(), Some(4));
  }

  #[test]
  fn decodes_annual_label() {
    assert_eq!(TimePeriod::from_label("2024").unwrap(), TimePeriod::annual(2024));
  }

  #[test]
  fn rejects_malformed_labels() {
    for bad in ["2025M13", "2025M00", "25M01", "2025-01", "abcd", "20245", ""] {
      assert!(TimePeriod::from_label(bad).is_err(), "{bad:?} should be rejected");
    }
  }

  #[test]
  fn descriptors() {
    let march = TimePeriod::monthly(2024, 3).unwrap();
    assert_eq!(march.month_description(), "marzo");
    assert_eq!(march.first_day().unwrap().to_string(), "2024-03-01");

    let year = TimePeriod::annual(2024);
    assert_eq!(year.month_description(), "anual");
    assert_eq!(year.first_day().unwrap().to_string(), "2024-01-01");
  }

  #[test]
  fn deserializing_validates_month() {
    let p: TimePeriod = serde_json::from_str(r#"{"year":2024,"month":7}"#).unwrap();
    assert_eq!(p, TimePeriod::monthly(2024, 7).unwrap());
    let annual: TimePeriod = serde_json::from_str(r#"{"year":2024,"month":null}"#).unwrap();
    assert!(annual.is_annual());

    for bad in [r#"{"year":2024,"month":0}"#, r#"{"year":2024,"month":13}"#] {
      assert!(serde_json::from_str::<TimePeriod>(bad).is_err(), "{bad} should be rejected");
    }
  }

  #[test]
  fn serde_round_trip_keeps_shape() {
    let p = TimePeriod::monthly(2025, 1).unwrap();
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(json, r#"{"year":2025,"month":1}"#);
    assert_eq!(serde_json::from_str::<TimePeriod>(&json).unwrap(), p);
  }

  #[test]
  fn annual_sorts_before_months() {
    let mut periods = vec![
      TimePeriod::monthly(2024, 2).unwrap(),
      TimePeriod::annual(2024),
      TimePeriod::monthly(2023, 12).unwrap(),
    ];
    periods.sort();
    assert_eq!(
      periods.iter().map(ToString::to_string).collect::<Vec<_>>(),
      vec!["2023M12", "2024", "2024M02"]
    );
  }
}
