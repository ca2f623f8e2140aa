mod cache;
mod config;
mod quran;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cache::SqliteStore;
use quran::{QuranClient, QuranService};

#[derive(Parser, Debug)]
#[command(name = "mushaf")]
#[command(about = "Mirrors quran.com chapters and verses into a local cache")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/mushaf/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Chapter id to evict from the cache before mirroring (repeatable)
  #[arg(long = "purge", value_name = "ID")]
  purge: Vec<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mushaf=info")),
    )
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  // Load configuration
  let config = config::Config::load(args.config.as_deref())?;

  let store = match &config.cache.path {
    Some(path) => SqliteStore::open_at(path)?,
    None => SqliteStore::open()?,
  };
  let client = QuranClient::new(&config.api)?;
  let service = QuranService::new(client, store);

  // Evict requested chapters first; each eviction is independent.
  for id in config.purge_chapters.iter().copied().chain(args.purge) {
    if let Err(e) = service.delete_chapter(id) {
      warn!("Failed to evict chapter {id}: {e}");
    }
  }

  let summaries = service.get_chapter_summaries().await?;
  info!(chapters = summaries.len(), "Loaded chapter summaries");

  for summary in &summaries {
    match service.get_chapter(summary.id).await {
      Ok(chapter) => info!(
        number = chapter.number,
        name = %chapter.name_simple,
        verses = chapter.verses.len(),
        "Mirrored chapter"
      ),
      Err(e) => error!("Failed to fetch chapter {}: {e}", summary.id),
    }
  }

  Ok(())
}
