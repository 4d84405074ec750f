use super::model::{LookupKey, MediaRow, UpsertOutcome};
use crate::model::NormalizedListing;
use anyhow::Result;
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::instrument;

pub type Pool = SqlitePool;

/// Fixed id of the RentCast provider row in `mls`.
pub const RENTCAST_MLS_ID: i64 = 1;

pub async fn init_pool(database_url: &str) -> Result<Pool> {
    let normalized = prepare_sqlite_url(database_url);
    let pool = SqlitePool::connect(&normalized).await?;
    // Enable WAL and stricter durability.
    sqlx::query("PRAGMA journal_mode=WAL;")
        .execute(&pool)
        .await?;
    sqlx::query("PRAGMA synchronous=FULL;")
        .execute(&pool)
        .await?;
    Ok(pool)
}

/// If using a file-backed SQLite URL, expand a leading `~/` and ensure the
/// parent directory exists. Leaves in-memory URLs untouched.
fn prepare_sqlite_url(url: &str) -> String {
    if !url.starts_with("sqlite:") || url.starts_with("sqlite::memory") {
        return url.to_string();
    }

    let rest = url["sqlite:".len()..].trim_start_matches("//");
    let (path_part, query_part) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    if path_part.is_empty() {
        return url.to_string();
    }

    let expanded_path = match path_part.strip_prefix("~/") {
        Some(tail) => match std::env::var("HOME") {
            Ok(home) => format!("{}/{}", home.trim_end_matches('/'), tail),
            Err(_) => path_part.to_string(),
        },
        None => path_part.to_string(),
    };

    if let Some(parent) = std::path::Path::new(&expanded_path).parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    let mut rebuilt = format!("sqlite://{}", expanded_path);
    if let Some(q) = query_part {
        rebuilt.push('?');
        rebuilt.push_str(q);
    }
    rebuilt
}

pub async fn run_migrations(pool: &Pool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Ensure the provider registry row exists before any city sync touches
/// listings. Upsert-by-fixed-id so repeated runs are harmless.
#[instrument(skip_all)]
pub async fn ensure_mls(pool: &Pool) -> Result<i64> {
    sqlx::query("INSERT INTO mls (id, name) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET name = excluded.name")
        .bind(RENTCAST_MLS_ID)
        .bind("RentCast")
        .execute(pool)
        .await?;
    Ok(RENTCAST_MLS_ID)
}

#[instrument(skip_all)]
pub async fn find_listing_id_by_key(
    pool: &Pool,
    mls_id: i64,
    listing_key: &str,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM listings WHERE mls_id = ? AND listing_key = ?",
    )
    .bind(mls_id)
    .bind(listing_key)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}

#[instrument(skip_all)]
pub async fn find_listing_id_by_rentcast(
    pool: &Pool,
    mls_id: i64,
    rentcast_id: &str,
) -> Result<Option<i64>> {
    let id = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM listings WHERE mls_id = ? AND rentcast_id = ?",
    )
    .bind(mls_id)
    .bind(rentcast_id)
    .fetch_optional(pool)
    .await?;
    Ok(id)
}

#[instrument(skip_all)]
pub async fn insert_listing(
    pool: &Pool,
    mls_id: i64,
    listing: &NormalizedListing,
) -> Result<i64> {
    let rec = sqlx::query(
        "INSERT INTO listings (mls_id, listing_key, rentcast_id, street, city, state, zip, county, \
                price, beds, baths_full, baths_half, sqft, lot_acres, year_built, latitude, longitude, \
                school_district, property_type, status, tax_annual, listed_at, last_synced_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(mls_id)
    .bind(&listing.listing_key)
    .bind(&listing.rentcast_id)
    .bind(&listing.street)
    .bind(&listing.city)
    .bind(&listing.state)
    .bind(&listing.zip)
    .bind(&listing.county)
    .bind(listing.price)
    .bind(listing.beds)
    .bind(listing.baths_full)
    .bind(listing.baths_half)
    .bind(listing.sqft)
    .bind(listing.lot_acres)
    .bind(listing.year_built)
    .bind(listing.latitude)
    .bind(listing.longitude)
    .bind(&listing.school_district)
    .bind(&listing.property_type)
    .bind(listing.status.as_str())
    .bind(listing.tax_annual)
    .bind(listing.listed_at)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(rec.get::<i64, _>("id"))
}

/// Overwrite the mutable fields of an existing row and refresh the sync
/// timestamp. The provider id is kept when the incoming record lacks one.
#[instrument(skip_all)]
pub async fn update_listing(pool: &Pool, id: i64, listing: &NormalizedListing) -> Result<()> {
    sqlx::query(
        "UPDATE listings SET rentcast_id = COALESCE(?, rentcast_id), street = ?, city = ?, \
                state = ?, zip = ?, county = ?, price = ?, beds = ?, baths_full = ?, baths_half = ?, \
                sqft = ?, lot_acres = ?, year_built = ?, latitude = ?, longitude = ?, \
                school_district = ?, property_type = ?, status = ?, tax_annual = ?, \
                listed_at = COALESCE(?, listed_at), last_synced_at = ? \
         WHERE id = ?",
    )
    .bind(&listing.rentcast_id)
    .bind(&listing.street)
    .bind(&listing.city)
    .bind(&listing.state)
    .bind(&listing.zip)
    .bind(&listing.county)
    .bind(listing.price)
    .bind(listing.beds)
    .bind(listing.baths_full)
    .bind(listing.baths_half)
    .bind(listing.sqft)
    .bind(listing.lot_acres)
    .bind(listing.year_built)
    .bind(listing.latitude)
    .bind(listing.longitude)
    .bind(&listing.school_district)
    .bind(&listing.property_type)
    .bind(listing.status.as_str())
    .bind(listing.tax_annual)
    .bind(listing.listed_at)
    .bind(Utc::now())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Insert-if-absent, update-if-present, keyed by `(mls_id, listing_key)` or
/// `(mls_id, rentcast_id)` depending on which endpoint the record came from.
/// When the row exists and `update_existing` is false, nothing is written.
#[instrument(skip_all)]
pub async fn upsert_listing(
    pool: &Pool,
    mls_id: i64,
    listing: &NormalizedListing,
    update_existing: bool,
    lookup: LookupKey,
) -> Result<UpsertOutcome> {
    let existing = match (lookup, listing.rentcast_id.as_deref()) {
        (LookupKey::RentcastId, Some(rentcast_id)) => {
            match find_listing_id_by_rentcast(pool, mls_id, rentcast_id).await? {
                Some(id) => Some(id),
                None => find_listing_id_by_key(pool, mls_id, &listing.listing_key).await?,
            }
        }
        _ => find_listing_id_by_key(pool, mls_id, &listing.listing_key).await?,
    };

    match existing {
        Some(id) if update_existing => {
            update_listing(pool, id, listing).await?;
            Ok(UpsertOutcome::Updated(id))
        }
        Some(id) => Ok(UpsertOutcome::Skipped(id)),
        None => {
            let id = insert_listing(pool, mls_id, listing).await?;
            Ok(UpsertOutcome::Inserted(id))
        }
    }
}

#[instrument(skip_all)]
pub async fn insert_media(
    pool: &Pool,
    id: i64,
    listing_id: i64,
    url: &str,
    position: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO media (id, listing_id, url, position) VALUES (?, ?, ?, ?) \
         ON CONFLICT(id) DO UPDATE SET url = excluded.url, position = excluded.position",
    )
    .bind(id)
    .bind(listing_id)
    .bind(url)
    .bind(position)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn media_for_listing(pool: &Pool, listing_id: i64) -> Result<Vec<MediaRow>> {
    let rows = sqlx::query(
        "SELECT id, listing_id, url, position FROM media WHERE listing_id = ? ORDER BY position",
    )
    .bind(listing_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| MediaRow {
            id: row.get("id"),
            listing_id: row.get("listing_id"),
            url: row.get("url"),
            position: row.get("position"),
        })
        .collect())
}
