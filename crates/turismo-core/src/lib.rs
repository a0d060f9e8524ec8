//! Core types and trait definitions for the turismo star-schema loader.
//!
//! This crate is deliberately free of spreadsheet and database dependencies.
//! The extraction and storage crates depend on it; it depends on nothing
//! proprietary.

pub mod error;
pub mod family;
pub mod grid;
pub mod metric;
pub mod period;
pub mod record;
pub mod store;
pub mod text;

pub use error::{Error, Result};
