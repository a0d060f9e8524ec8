//! Runner configuration, deserialised from `turismo.toml` and `TURISMO__*`
//! environment variables.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use turismo_core::family::CategoryFamily;
use turismo_extract::{DEFAULT_HEADER_SCAN_ROWS, ExtractOptions};

use crate::Result;

/// Environment variable prefix; nested keys are separated by `__`.
pub const ENV_PREFIX: &str = "TURISMO";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Top-level runner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EtlConfig {
  #[serde(default = "default_database_path")]
  pub database_path:     PathBuf,
  #[serde(default = "default_header_scan_rows")]
  pub header_scan_rows:  usize,
  #[serde(default = "default_continue_on_error")]
  pub continue_on_error: bool,
  #[serde(default = "default_sources")]
  pub sources:           Vec<SourceConfig>,
}

/// One spreadsheet and the category family it breaks visitors down by.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
  pub family: CategoryFamily,
  pub path:   PathBuf,
}

impl Default for EtlConfig {
  fn default() -> Self {
    Self {
      database_path:     default_database_path(),
      header_scan_rows:  default_header_scan_rows(),
      continue_on_error: default_continue_on_error(),
      sources:           default_sources(),
    }
  }
}

impl EtlConfig {
  pub fn extract_options(&self) -> ExtractOptions {
    ExtractOptions { header_scan_rows: self.header_scan_rows }
  }

  /// Keep only the sources of the given families. An empty filter keeps all.
  pub fn retain_families(&mut self, families: &[CategoryFamily]) {
    if !families.is_empty() {
      self.sources.retain(|s| families.contains(&s.family));
    }
  }
}

fn default_database_path() -> PathBuf { PathBuf::from("dw_turismo.sqlite3") }

fn default_header_scan_rows() -> usize { DEFAULT_HEADER_SCAN_ROWS }

fn default_continue_on_error() -> bool { true }

/// The published tables the warehouse was built from.
fn default_sources() -> Vec<SourceConfig> {
  [
    (CategoryFamily::Country, "data/10822.xlsx"),
    (CategoryFamily::Region, "data/23988.xlsx"),
    (CategoryFamily::Motive, "data/13864.xlsx"),
    (CategoryFamily::Duration, "data/14290.xlsx"),
  ]
  .into_iter()
  .map(|(family, path)| SourceConfig { family, path: PathBuf::from(path) })
  .collect()
}

// ─── Loading ─────────────────────────────────────────────────────────────────

/// Read the configuration file at `path` (if it exists) layered under the
/// environment.
pub fn load_config(path: &Path) -> Result<EtlConfig> {
  let settings = config::Config::builder()
    .add_source(config::File::from(path).required(false))
    .add_source(
      config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true),
    )
    .build()?;

  let mut cfg: EtlConfig = settings.try_deserialize()?;
  cfg.database_path = expand_tilde(&cfg.database_path);
  Ok(cfg)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config(&dir.path().join("turismo.toml")).unwrap();
    assert_eq!(cfg, EtlConfig::default());
    assert_eq!(cfg.sources.len(), 4);
    assert_eq!(cfg.sources[1].family, CategoryFamily::Region);
    assert_eq!(cfg.sources[1].path, PathBuf::from("data/23988.xlsx"));
  }

  #[test]
  fn file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turismo.toml");
    std::fs::write(
      &path,
      r#"
header_scan_rows  = 30
continue_on_error = false

[[sources]]
family = "duration"
path   = "/srv/ine/14290.xlsx"
"#,
    )
    .unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.header_scan_rows, 30);
    assert!(!cfg.continue_on_error);
    assert_eq!(cfg.database_path, PathBuf::from("dw_turismo.sqlite3"));
    assert_eq!(
      cfg.sources,
      vec![SourceConfig {
        family: CategoryFamily::Duration,
        path:   PathBuf::from("/srv/ine/14290.xlsx"),
      }]
    );
  }

  #[test]
  fn unknown_family_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turismo.toml");
    std::fs::write(&path, "[[sources]]\nfamily = \"planet\"\npath = \"x.xlsx\"\n").unwrap();
    assert!(load_config(&path).is_err());
  }

  #[test]
  fn family_filter() {
    let mut cfg = EtlConfig::default();
    cfg.retain_families(&[]);
    assert_eq!(cfg.sources.len(), 4);
    cfg.retain_families(&[CategoryFamily::Motive, CategoryFamily::Country]);
    let families: Vec<_> = cfg.sources.iter().map(|s| s.family).collect();
    assert_eq!(families, vec![CategoryFamily::Country, CategoryFamily::Motive]);
  }

  #[test]
  fn tilde_expansion() {
    let plain = Path::new("dw.sqlite3");
    assert_eq!(expand_tilde(plain), plain.to_path_buf());
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(expand_tilde(Path::new("~/dw.sqlite3")), PathBuf::from(home).join("dw.sqlite3"));
    }
  }
}
