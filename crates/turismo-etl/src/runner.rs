//! Per-source pipeline runner: extract one spreadsheet, load it in one
//! transaction, report.
//!
//! Sources run strictly one after another. A failed source is logged and,
//! under `continue_on_error`, recorded in the [`RunSummary`] while the next
//! source proceeds.

use std::{fmt, path::PathBuf};

use serde::Serialize;
use tracing::{error, info};
use turismo_core::{
  family::CategoryFamily,
  record::TidyRecord,
  store::{LoadReport, StarStore},
};
use turismo_extract::{ExtractOptions, extract_file};

use crate::{Error, Result, config::SourceConfig};

// ─── Outcomes ────────────────────────────────────────────────────────────────

/// What happened to one source that ran to completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceOutcome {
  pub family:    CategoryFamily,
  pub path:      PathBuf,
  /// Tidy records extracted from the sheet.
  pub extracted: usize,
  /// `None` on a dry run.
  pub report:    Option<LoadReport>,
}

/// A source that failed, with its rendered error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceFailure {
  pub family: CategoryFamily,
  pub path:   PathBuf,
  pub error:  String,
}

/// Result of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
  pub completed: Vec<SourceOutcome>,
  pub failed:    Vec<SourceFailure>,
}

impl RunSummary {
  pub fn is_success(&self) -> bool { self.failed.is_empty() }
}

/// One line per source: completed sources first, then failures.
impl fmt::Display for RunSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for outcome in &self.completed {
      let family = outcome.family.as_str();
      let path = outcome.path.display();
      match &outcome.report {
        Some(r) => writeln!(
          f,
          "{family:<9} {path}: {} records ({} new periods, {} new categories)",
          r.records, r.new_periods, r.new_categories
        )?,
        None => writeln!(f, "{family:<9} {path}: {} records extracted (dry run)", outcome.extracted)?,
      }
    }
    for failure in &self.failed {
      writeln!(
        f,
        "{:<9} {}: FAILED: {}",
        failure.family.as_str(),
        failure.path.display(),
        failure.error
      )?;
    }
    Ok(())
  }
}

// ─── Steps ───────────────────────────────────────────────────────────────────

/// Extract the tidy records of one source file.
pub fn extract_source(source: &SourceConfig, options: &ExtractOptions) -> Result<Vec<TidyRecord>> {
  if !source.path.is_file() {
    return Err(Error::MissingSource(source.path.clone()));
  }
  extract_file(&source.path, options).map_err(|e| Error::Extract {
    path:   source.path.clone(),
    source: e,
  })
}

/// Load already-extracted records of `source` into `store`.
pub async fn load_source<S: StarStore>(
  store: &S,
  source: &SourceConfig,
  records: Vec<TidyRecord>,
) -> Result<LoadReport> {
  store
    .load(source.family, records)
    .await
    .map_err(|e| Error::Store { path: source.path.clone(), source: Box::new(e) })
}

/// Run one source. With no store the records are only extracted.
pub async fn run_source<S: StarStore>(
  store: Option<&S>,
  source: &SourceConfig,
  options: &ExtractOptions,
) -> Result<SourceOutcome> {
  info!(family = %source.family, path = ?source.path, "processing source");

  let records = extract_source(source, options)?;
  let extracted = records.len();
  info!(family = %source.family, records = extracted, "records extracted");

  let report = match store {
    Some(store) => Some(load_source(store, source, records).await?),
    None => None,
  };

  Ok(SourceOutcome { family: source.family, path: source.path.clone(), extracted, report })
}

/// Run every source in order.
///
/// With `continue_on_error` a failing source is recorded and the run goes
/// on; otherwise the first failure is returned.
pub async fn run_all<S: StarStore>(
  store: Option<&S>,
  sources: &[SourceConfig],
  options: &ExtractOptions,
  continue_on_error: bool,
) -> Result<RunSummary> {
  let mut summary = RunSummary::default();

  for source in sources {
    match run_source(store, source, options).await {
      Ok(outcome) => summary.completed.push(outcome),
      Err(e) => {
        error!(family = %source.family, path = ?source.path, error = %e, "source failed");
        if !continue_on_error {
          return Err(e);
        }
        summary.failed.push(SourceFailure {
          family: source.family,
          path:   source.path.clone(),
          error:  e.to_string(),
        });
      }
    }
  }

  info!(
    completed = summary.completed.len(),
    failed = summary.failed.len(),
    "run finished"
  );
  Ok(summary)
}
