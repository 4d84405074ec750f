use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use rentcast_sync::config::Config;
use rentcast_sync::rentcast::{ListingKind, RentcastClient};

/// Fetch one RentCast endpoint and pretty-print the JSON response.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    /// Endpoint: properties | sale | rental | value | rent | markets
    endpoint: String,

    /// Full street address (for value / rent)
    #[arg(long)]
    address: Option<String>,

    #[arg(long)]
    city: Option<String>,

    #[arg(long)]
    state: Option<String>,

    /// Zip code (for markets)
    #[arg(long)]
    zip: Option<String>,

    /// Provider listing id; with `sale` or `rental`, fetches that single listing
    #[arg(long)]
    id: Option<String>,

    #[arg(long, default_value = "5")]
    limit: u32,
}

fn require<'a>(value: &'a Option<String>, name: &str, endpoint: &str) -> Result<&'a str> {
    match value.as_deref() {
        Some(v) => Ok(v),
        None => bail!("--{} is required for the {} endpoint", name, endpoint),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let raw = fs::read_to_string(&args.config)?;
    let cfg: Config = serde_yaml::from_str(&raw)?;
    let api_key =
        std::env::var("RENTCAST_API_KEY").unwrap_or_else(|_| cfg.rentcast.api_key.clone());
    let base_url = reqwest::Url::parse(&cfg.rentcast.base_url)?;
    let client = RentcastClient::with_base_url(api_key, base_url);

    let endpoint = args.endpoint.as_str();
    let output = match endpoint {
        "properties" => {
            let city = require(&args.city, "city", endpoint)?;
            let state = require(&args.state, "state", endpoint)?;
            let records = client.fetch_properties(city, state, args.limit).await?;
            serde_json::to_string_pretty(&records)?
        }
        "sale" | "rental" => {
            let kind = if endpoint == "sale" {
                ListingKind::Sale
            } else {
                ListingKind::Rental
            };
            match args.id.as_deref() {
                Some(id) => {
                    let listing = client.fetch_listing_by_id(kind, id).await?;
                    serde_json::to_string_pretty(&listing)?
                }
                None => {
                    let city = require(&args.city, "city", endpoint)?;
                    let state = require(&args.state, "state", endpoint)?;
                    let records = client
                        .fetch_listings(kind, city, state, None, args.limit)
                        .await?;
                    serde_json::to_string_pretty(&records)?
                }
            }
        }
        "value" => {
            let address = require(&args.address, "address", endpoint)?;
            let estimate = client.fetch_value_estimate(address).await?;
            serde_json::to_string_pretty(&estimate)?
        }
        "rent" => {
            let address = require(&args.address, "address", endpoint)?;
            let estimate = client.fetch_rent_estimate(address).await?;
            serde_json::to_string_pretty(&estimate)?
        }
        "markets" => {
            let zip = require(&args.zip, "zip", endpoint)?;
            let stats = client.fetch_market_stats(zip).await?;
            serde_json::to_string_pretty(&stats)?
        }
        other => {
            bail!(
                "unknown endpoint '{}'; expected properties | sale | rental | value | rent | markets",
                other
            );
        }
    };

    println!("{}", output);
    Ok(())
}
