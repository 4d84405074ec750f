use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use rentcast_sync::config;
use rentcast_sync::db;
use rentcast_sync::model::{AreaScope, SyncKind};
use rentcast_sync::photos::HttpPhotoFetcher;
use rentcast_sync::rentcast::RentcastClient;
use rentcast_sync::sync::{SyncOptions, Synchronizer};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// One of: sync | primary | properties | listings | stats | stats-primary
    command: Option<String>,
}

fn print_usage() {
    println!(
        "usage: rentcast-sync [--config <path>] <command>\n\n\
         commands:\n\
         \x20 sync            properties + listings for all service areas\n\
         \x20 primary         properties + listings for primary areas only\n\
         \x20 properties      property records only, all service areas\n\
         \x20 listings        sale listings only, all service areas\n\
         \x20 stats           market stats, all service areas\n\
         \x20 stats-primary   market stats, primary areas only"
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let Some(command) = args.command.as_deref() else {
        print_usage();
        return Ok(());
    };
    let (scope, kind) = match command {
        "sync" => (AreaScope::All, SyncKind::Full),
        "primary" => (AreaScope::Primary, SyncKind::Full),
        "properties" => (AreaScope::All, SyncKind::Properties),
        "listings" => (AreaScope::All, SyncKind::Listings),
        "stats" => (AreaScope::All, SyncKind::Stats),
        "stats-primary" => (AreaScope::Primary, SyncKind::Stats),
        other => {
            println!("unknown command: {}\n", other);
            print_usage();
            return Ok(());
        }
    };

    let cfg = config::load(Some(&args.config))?;
    cfg.ensure_dirs()?;

    let api_key =
        std::env::var("RENTCAST_API_KEY").unwrap_or_else(|_| cfg.rentcast.api_key.clone());
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| format!("sqlite://{}/listings.db", cfg.app.data_dir));

    let pool = db::init_pool(&database_url).await?;
    db::run_migrations(&pool).await?;

    let base_url = reqwest::Url::parse(&cfg.rentcast.base_url)?;
    let client = RentcastClient::with_base_url(api_key, base_url);
    let fetcher = HttpPhotoFetcher::new();
    let opts = SyncOptions {
        scope,
        kind,
        update_existing: cfg.app.update_existing,
        city_delay: Duration::from_millis(cfg.app.city_delay_ms),
        listing_limit: cfg.app.listing_limit,
        photo_dir: PathBuf::from(&cfg.app.photo_dir),
        download_photos: cfg.app.download_photos,
    };

    info!(command, "starting rentcast sync");
    let synchronizer = Synchronizer::new(&pool, &client, &fetcher, opts);
    let result = synchronizer.run().await;

    // Close the pool on every exit path before surfacing the result.
    pool.close().await;
    result
}
