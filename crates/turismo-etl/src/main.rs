//! turismo-etl binary.
//!
//! Reads `turismo.toml` (or the path given with `--config`), opens the SQLite
//! warehouse and loads every configured source file in turn.
//!
//! ```
//! cargo run -p turismo-etl -- --family country --family region
//! ```

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use turismo_core::family::CategoryFamily;
use turismo_etl::{load_config, run_all};
use turismo_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Load tourism spreadsheets into the turismo warehouse")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "turismo.toml")]
  config: PathBuf,

  /// Only run sources of this family. May be repeated.
  #[arg(short, long = "family", value_name = "FAMILY")]
  families: Vec<CategoryFamily>,

  /// Extract and report record counts without opening the database.
  #[arg(long)]
  dry_run: bool,

  /// Print the run summary as JSON on stdout.
  #[arg(long)]
  json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut cfg = load_config(&cli.config)
    .with_context(|| format!("failed to read config {:?}", cli.config))?;
  cfg.retain_families(&cli.families);
  if cfg.sources.is_empty() {
    anyhow::bail!("no sources configured for the selected families");
  }

  let options = cfg.extract_options();
  let summary = if cli.dry_run {
    run_all::<SqliteStore>(None, &cfg.sources, &options, cfg.continue_on_error).await?
  } else {
    let store = SqliteStore::open(&cfg.database_path)
      .await
      .with_context(|| format!("failed to open warehouse at {:?}", cfg.database_path))?;
    run_all(Some(&store), &cfg.sources, &options, cfg.continue_on_error).await?
  };

  if cli.json {
    println!("{}", serde_json::to_string_pretty(&summary)?);
  } else {
    print!("{summary}");
  }

  if !summary.is_success() {
    anyhow::bail!("{} of {} sources failed", summary.failed.len(), cfg.sources.len());
  }
  Ok(())
}
