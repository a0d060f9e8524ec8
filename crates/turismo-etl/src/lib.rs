//! Batch pipeline that loads the published tourism spreadsheets into the
//! turismo star schema.
//!
//! Generic over any [`StarStore`](turismo_core::store::StarStore); the
//! `turismo-etl` binary wires it to [`turismo_store_sqlite::SqliteStore`].

pub mod config;
pub mod error;
pub mod runner;

pub use config::{EtlConfig, SourceConfig, load_config};
pub use error::{Error, Result};
pub use runner::{RunSummary, SourceFailure, SourceOutcome, run_all, run_source};
