//! Per-city sync orchestration.
//!
//! Cities are processed strictly one at a time: fetch properties, upsert,
//! fetch sale listings, upsert, download photos for new listings, then a
//! fixed courtesy delay before the next city. Failure isolation is per
//! city — an error inside one city's sequence is logged and the loop moves
//! on; whatever upserts completed before the error stay committed.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info, instrument, warn};

use crate::db::{self, LookupKey, Pool, UpsertOutcome};
use crate::model::{AreaScope, SyncKind};
use crate::normalize;
use crate::photos::{self, PhotoFetcher};
use crate::rentcast::RentcastService;
use crate::service_area::{self, ServiceArea};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub scope: AreaScope,
    pub kind: SyncKind,
    pub update_existing: bool,
    pub city_delay: Duration,
    pub listing_limit: u32,
    pub photo_dir: PathBuf,
    pub download_photos: bool,
}

/// Per-city tallies, logged at the city boundary. There is deliberately no
/// end-of-run aggregate report; the script is fire-and-forget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncCounts {
    pub inserted: u32,
    pub updated: u32,
    pub skipped: u32,
}

impl SyncCounts {
    fn record(&mut self, outcome: &UpsertOutcome) {
        match outcome {
            UpsertOutcome::Inserted(_) => self.inserted += 1,
            UpsertOutcome::Updated(_) => self.updated += 1,
            UpsertOutcome::Skipped(_) => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: SyncCounts) {
        self.inserted += other.inserted;
        self.updated += other.updated;
        self.skipped += other.skipped;
    }
}

pub struct Synchronizer<'a> {
    pool: &'a Pool,
    rentcast: &'a dyn RentcastService,
    photos: &'a dyn PhotoFetcher,
    opts: SyncOptions,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        pool: &'a Pool,
        rentcast: &'a dyn RentcastService,
        photos: &'a dyn PhotoFetcher,
        opts: SyncOptions,
    ) -> Self {
        Self {
            pool,
            rentcast,
            photos,
            opts,
        }
    }

    /// Run over the registry areas selected by the configured scope.
    pub async fn run(&self) -> Result<()> {
        let areas: Vec<&ServiceArea> = match self.opts.scope {
            AreaScope::All => service_area::all().iter().collect(),
            AreaScope::Primary => service_area::primary(),
        };
        self.run_areas(&areas).await
    }

    /// Run over an explicit area list, sequentially, with the configured
    /// delay between cities.
    pub async fn run_areas(&self, areas: &[&ServiceArea]) -> Result<()> {
        db::ensure_mls(self.pool).await?;
        info!(
            kind = self.opts.kind.as_str(),
            cities = areas.len(),
            "starting sync run"
        );

        for (index, area) in areas.iter().enumerate() {
            if index > 0 && !self.opts.city_delay.is_zero() {
                tokio::time::sleep(self.opts.city_delay).await;
            }
            match self.sync_area(area).await {
                Ok(counts) => info!(
                    city = area.city,
                    state = area.state,
                    inserted = counts.inserted,
                    updated = counts.updated,
                    skipped = counts.skipped,
                    "city sync complete"
                ),
                Err(err) => error!(
                    ?err,
                    city = area.city,
                    state = area.state,
                    "city sync failed; continuing with next city"
                ),
            }
        }
        Ok(())
    }

    async fn sync_area(&self, area: &ServiceArea) -> Result<SyncCounts> {
        match self.opts.kind {
            SyncKind::Stats => {
                self.log_market_stats(area).await?;
                Ok(SyncCounts::default())
            }
            SyncKind::Properties => self.sync_properties(area).await,
            SyncKind::Listings => self.sync_listings(area).await,
            SyncKind::Full => {
                let mut counts = self.sync_properties(area).await?;
                counts.merge(self.sync_listings(area).await?);
                Ok(counts)
            }
        }
    }

    #[instrument(skip_all, fields(city = area.city))]
    async fn sync_properties(&self, area: &ServiceArea) -> Result<SyncCounts> {
        let records = self
            .rentcast
            .properties(area.city, area.state, self.opts.listing_limit)
            .await?;
        let mut counts = SyncCounts::default();

        for record in &records {
            let Some(normalized) = normalize::from_property(record) else {
                warn!(
                    city = area.city,
                    id = record.id.as_deref().unwrap_or("?"),
                    "skipping property with incomplete address"
                );
                counts.skipped += 1;
                continue;
            };
            let outcome = db::upsert_listing(
                self.pool,
                db::RENTCAST_MLS_ID,
                &normalized,
                self.opts.update_existing,
                LookupKey::RentcastId,
            )
            .await?;
            counts.record(&outcome);
        }
        Ok(counts)
    }

    #[instrument(skip_all, fields(city = area.city))]
    async fn sync_listings(&self, area: &ServiceArea) -> Result<SyncCounts> {
        let records = self
            .rentcast
            .sale_listings(area.city, area.state, Some("Active"), self.opts.listing_limit)
            .await?;
        let mut counts = SyncCounts::default();

        for record in &records {
            let Some(normalized) = normalize::from_sale_listing(record) else {
                warn!(
                    city = area.city,
                    id = record.id.as_deref().unwrap_or("?"),
                    "skipping listing with incomplete address"
                );
                counts.skipped += 1;
                continue;
            };
            let outcome = db::upsert_listing(
                self.pool,
                db::RENTCAST_MLS_ID,
                &normalized,
                self.opts.update_existing,
                LookupKey::ListingKey,
            )
            .await?;
            counts.record(&outcome);

            // Photos are only fetched on first insert; existing rows keep
            // whatever media they already have.
            if let UpsertOutcome::Inserted(listing_id) = outcome {
                if self.opts.download_photos && !normalized.photos.is_empty() {
                    let stored = photos::download_listing_photos(
                        self.photos,
                        &self.opts.photo_dir,
                        listing_id,
                        &normalized.photos,
                    )
                    .await?;
                    for photo in &stored {
                        db::insert_media(
                            self.pool,
                            normalize::media_id(listing_id, photo.position),
                            listing_id,
                            &photo.url,
                            photo.position,
                        )
                        .await?;
                    }
                }
            }
        }
        Ok(counts)
    }

    #[instrument(skip_all, fields(city = area.city))]
    async fn log_market_stats(&self, area: &ServiceArea) -> Result<()> {
        let stats = self.rentcast.market_stats(area.zip).await?;

        match stats.sale_data {
            Some(sale) => info!(
                city = area.city,
                zip = area.zip,
                median_price = sale.median_price,
                average_price = sale.average_price,
                total_listings = sale.total_listings,
                new_listings = sale.new_listings,
                avg_days_on_market = sale.average_days_on_market,
                "sale market stats"
            ),
            None => info!(city = area.city, zip = area.zip, "no sale market data"),
        }
        match stats.rental_data {
            Some(rental) => info!(
                city = area.city,
                zip = area.zip,
                median_rent = rental.median_price,
                average_rent = rental.average_price,
                total_listings = rental.total_listings,
                "rental market stats"
            ),
            None => info!(city = area.city, zip = area.zip, "no rental market data"),
        }
        Ok(())
    }
}
