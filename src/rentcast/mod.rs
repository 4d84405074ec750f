use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::warn;

use crate::rentcast::model::{
    MarketStats, Property, RentEstimate, SaleListing, ValueEstimate,
};

pub mod model;

const RENTCAST_API_BASE: &str = "https://api.rentcast.io/v1/";

/// Query parameters as key/value pairs; `None` values are never serialized
/// into the query string.
pub type Params<'a> = &'a [(&'a str, Option<String>)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    Sale,
    Rental,
}

impl ListingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingKind::Sale => "sale",
            ListingKind::Rental => "rental",
        }
    }
}

#[derive(Clone)]
pub struct RentcastClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for RentcastClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RentcastClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// The slice of the provider API the synchronizer consumes. Behind a trait
/// so tests can drive the pipeline with a scripted implementation.
#[async_trait]
pub trait RentcastService: Send + Sync {
    async fn properties(&self, city: &str, state: &str, limit: u32) -> Result<Vec<Property>>;

    async fn sale_listings(
        &self,
        city: &str,
        state: &str,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SaleListing>>;

    async fn market_stats(&self, zip: &str) -> Result<MarketStats>;
}

impl RentcastClient {
    pub fn new(api_key: String) -> Self {
        let base_url = Url::parse(RENTCAST_API_BASE).expect("valid default RentCast URL");
        Self::with_base_url(api_key, base_url)
    }

    pub fn with_base_url(api_key: String, base_url: Url) -> Self {
        let http = Client::builder()
            .user_agent("rentcast-sync/0.1")
            .no_proxy()
            .build()
            .expect("reqwest client");
        Self {
            http,
            base_url,
            api_key,
        }
    }

    /// Build an authenticated GET request. The API key rides on every
    /// request as the `X-Api-Key` header; absent parameter values are
    /// omitted from the query string entirely.
    pub fn build_request(&self, path: &str, params: Params<'_>) -> Result<reqwest::Request> {
        let mut url = self
            .base_url
            .join(path)
            .context("invalid RentCast base URL")?;
        if params.iter().any(|(_, value)| value.is_some()) {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                if let Some(value) = value {
                    query.append_pair(key, value);
                }
            }
        }
        self.http
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
            .build()
            .context("failed to build RentCast request")
    }

    /// Any non-2xx response becomes an error carrying the status code and
    /// the response body text. The client never retries; callers own that
    /// decision.
    async fn get<T: DeserializeOwned>(&self, path: &str, params: Params<'_>) -> Result<T> {
        let request = self.build_request(path, params)?;
        let res = self
            .http
            .execute(request)
            .await
            .context("failed to reach RentCast")?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            warn!(%status, path, "RentCast API error: {}", body);
            return Err(anyhow!("rentcast error {}: {}", status, body));
        }

        res.json::<T>()
            .await
            .context("invalid RentCast response JSON")
    }

    pub async fn fetch_properties(
        &self,
        city: &str,
        state: &str,
        limit: u32,
    ) -> Result<Vec<Property>> {
        self.get(
            "properties",
            &[
                ("city", Some(city.to_string())),
                ("state", Some(state.to_string())),
                ("limit", Some(limit.to_string())),
            ],
        )
        .await
    }

    pub async fn fetch_listings(
        &self,
        kind: ListingKind,
        city: &str,
        state: &str,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SaleListing>> {
        self.get(
            &format!("listings/{}", kind.as_str()),
            &[
                ("city", Some(city.to_string())),
                ("state", Some(state.to_string())),
                ("status", status.map(str::to_string)),
                ("limit", Some(limit.to_string())),
            ],
        )
        .await
    }

    pub async fn fetch_listing_by_id(&self, kind: ListingKind, id: &str) -> Result<SaleListing> {
        self.get(&format!("listings/{}/{}", kind.as_str(), id), &[])
            .await
    }

    pub async fn fetch_value_estimate(&self, address: &str) -> Result<ValueEstimate> {
        self.get("avm/value", &[("address", Some(address.to_string()))])
            .await
    }

    pub async fn fetch_rent_estimate(&self, address: &str) -> Result<RentEstimate> {
        self.get("avm/rent", &[("address", Some(address.to_string()))])
            .await
    }

    pub async fn fetch_market_stats(&self, zip: &str) -> Result<MarketStats> {
        self.get("markets", &[("zipCode", Some(zip.to_string()))])
            .await
    }
}

#[async_trait]
impl RentcastService for RentcastClient {
    async fn properties(&self, city: &str, state: &str, limit: u32) -> Result<Vec<Property>> {
        self.fetch_properties(city, state, limit).await
    }

    async fn sale_listings(
        &self,
        city: &str,
        state: &str,
        status: Option<&str>,
        limit: u32,
    ) -> Result<Vec<SaleListing>> {
        self.fetch_listings(ListingKind::Sale, city, state, status, limit)
            .await
    }

    async fn market_stats(&self, zip: &str) -> Result<MarketStats> {
        self.fetch_market_stats(zip).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RentcastClient {
        RentcastClient::new("test-key".into())
    }

    #[test]
    fn build_request_sets_auth_header() {
        let request = client().build_request("properties", &[]).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().path(), "/v1/properties");
        let headers = request.headers();
        assert_eq!(
            headers.get("X-Api-Key").and_then(|h| h.to_str().ok()),
            Some("test-key")
        );
        assert_eq!(
            headers.get("Accept").and_then(|h| h.to_str().ok()),
            Some("application/json")
        );
    }

    #[test]
    fn absent_params_are_omitted_from_query() {
        let request = client()
            .build_request(
                "listings/sale",
                &[
                    ("city", Some("Hackettstown".to_string())),
                    ("status", None),
                    ("limit", Some("50".to_string())),
                ],
            )
            .unwrap();
        let query = request.url().query().unwrap();
        assert!(query.contains("city=Hackettstown"));
        assert!(query.contains("limit=50"));
        assert!(!query.contains("status"));
    }

    #[test]
    fn all_absent_params_leave_no_query_string() {
        let request = client().build_request("markets", &[("zipCode", None)]).unwrap();
        assert_eq!(request.url().query(), None);
    }

    #[test]
    fn listing_paths_include_kind_and_id() {
        let request = client().build_request("listings/rental/123-abc", &[]).unwrap();
        assert_eq!(request.url().path(), "/v1/listings/rental/123-abc");
    }
}
