//! SQLite backend for the turismo star schema.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each source file is loaded inside one
//! transaction on that thread.

mod encode;
mod loader;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
