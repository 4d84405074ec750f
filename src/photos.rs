//! Bounded photo downloader for newly inserted listings.
//!
//! A failed download never fails the listing: the media record falls back
//! to the original remote URL so display is never blocked.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use tracing::{info, warn};

/// Hard cap on photos persisted per listing, bounding local disk and
/// network use.
pub const MAX_PHOTOS_PER_LISTING: usize = 10;

/// Where a photo ended up: a local file path on success, the original
/// remote URL when the download failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    pub url: String,
    /// 1-based display order.
    pub position: i64,
}

/// Raw byte fetch behind a trait so the downloader can be exercised
/// without a network.
#[async_trait]
pub trait PhotoFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct HttpPhotoFetcher {
    http: Client,
}

impl HttpPhotoFetcher {
    pub fn new() -> Self {
        let http = Client::builder()
            .user_agent("rentcast-sync/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self { http }
    }
}

impl Default for HttpPhotoFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PhotoFetcher for HttpPhotoFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let res = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("failed to reach {}", url))?;
        if !res.status().is_success() {
            return Err(anyhow!("photo fetch failed {}: {}", res.status(), url));
        }
        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("failed to read photo body from {}", url))?;
        Ok(bytes.to_vec())
    }
}

/// Download up to [`MAX_PHOTOS_PER_LISTING`] photos for one listing, in
/// order, writing `listing-{id}-{order}.jpg` under `photo_dir`. Per-photo
/// failures are logged and downgraded to the remote-URL fallback; only a
/// failure to create the destination directory aborts.
pub async fn download_listing_photos(
    fetcher: &dyn PhotoFetcher,
    photo_dir: &Path,
    listing_id: i64,
    urls: &[String],
) -> Result<Vec<StoredPhoto>> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }
    tokio::fs::create_dir_all(photo_dir)
        .await
        .with_context(|| format!("failed to create photo dir: {}", photo_dir.display()))?;

    let mut stored = Vec::with_capacity(urls.len().min(MAX_PHOTOS_PER_LISTING));
    for (index, remote) in urls.iter().take(MAX_PHOTOS_PER_LISTING).enumerate() {
        let position = index as i64 + 1;
        let local = photo_dir.join(format!("listing-{}-{}.jpg", listing_id, position));
        match fetcher.fetch(remote).await {
            Ok(bytes) => match tokio::fs::write(&local, &bytes).await {
                Ok(()) => {
                    info!(listing_id, position, path = %local.display(), "photo saved");
                    stored.push(StoredPhoto {
                        url: local.to_string_lossy().into_owned(),
                        position,
                    });
                }
                Err(err) => {
                    warn!(?err, listing_id, position, path = %local.display(), "failed to write photo; keeping remote url");
                    stored.push(StoredPhoto {
                        url: remote.clone(),
                        position,
                    });
                }
            },
            Err(err) => {
                warn!(?err, listing_id, position, url = %remote, "photo download failed; keeping remote url");
                stored.push(StoredPhoto {
                    url: remote.clone(),
                    position,
                });
            }
        }
    }
    Ok(stored)
}
