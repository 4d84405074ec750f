use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which service areas a run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaScope {
    All,
    Primary,
}

/// What a run fetches and persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    /// Properties and sale listings.
    Full,
    Properties,
    Listings,
    /// Market statistics only; nothing is persisted.
    Stats,
}

impl SyncKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncKind::Full => "full",
            SyncKind::Properties => "properties",
            SyncKind::Listings => "listings",
            SyncKind::Stats => "stats",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ListingStatus {
    Active,
    Pending,
    Sold,
    Inactive,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Active => "Active",
            ListingStatus::Pending => "Pending",
            ListingStatus::Sold => "Sold",
            ListingStatus::Inactive => "Inactive",
        }
    }

    /// Map a provider status string onto the local set. Unknown strings are
    /// treated as `Active` since the provider only returns live inventory.
    pub fn from_provider(status: Option<&str>) -> Self {
        let Some(status) = status else {
            return ListingStatus::Active;
        };
        let lower = status.to_ascii_lowercase();
        if lower.contains("pending") || lower.contains("under contract") {
            ListingStatus::Pending
        } else if lower.contains("sold") || lower.contains("closed") {
            ListingStatus::Sold
        } else if lower.contains("inactive") || lower.contains("delisted") {
            ListingStatus::Inactive
        } else {
            ListingStatus::Active
        }
    }
}

/// A provider record normalized into the local listing schema, ready to
/// upsert. Address fields are guaranteed non-empty; records that fail the
/// address-completeness gate never become one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedListing {
    pub listing_key: String,
    pub rentcast_id: Option<String>,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub county: Option<String>,
    pub price: Option<f64>,
    pub beds: Option<i64>,
    pub baths_full: Option<i64>,
    pub baths_half: Option<i64>,
    pub sqft: Option<i64>,
    pub lot_acres: Option<f64>,
    pub year_built: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub school_district: Option<String>,
    pub property_type: Option<String>,
    pub status: ListingStatus,
    pub tax_annual: Option<f64>,
    pub listed_at: Option<DateTime<Utc>>,
    /// Remote photo URLs, in display order. Only consulted on first insert.
    pub photos: Vec<String>,
}
