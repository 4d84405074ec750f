//! Typed responses from the RentCast REST API.
//!
//! Every field is optional: the provider omits anything it has no data for,
//! and the normalization layer decides what is actually required.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One year of a property's tax history.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxYear {
    pub year: Option<i64>,
    pub total: Option<f64>,
}

/// A record from `/properties`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Property {
    pub id: Option<String>,
    pub formatted_address: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<f64>,
    pub lot_size: Option<f64>,
    pub year_built: Option<i64>,
    pub school_district: Option<String>,
    pub last_sale_date: Option<DateTime<Utc>>,
    pub last_sale_price: Option<f64>,
    pub owner_occupied: Option<bool>,
    /// Keyed by year, e.g. `"2023"`.
    pub property_taxes: Option<HashMap<String, TaxYear>>,
    pub features: Option<serde_json::Value>,
}

/// A record from `/listings/sale` or `/listings/rental`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleListing {
    pub id: Option<String>,
    pub formatted_address: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub county: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub property_type: Option<String>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub square_footage: Option<f64>,
    pub lot_size: Option<f64>,
    pub year_built: Option<i64>,
    pub school_district: Option<String>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub listing_type: Option<String>,
    pub listed_date: Option<DateTime<Utc>>,
    pub removed_date: Option<DateTime<Utc>>,
    pub days_on_market: Option<i64>,
    pub mls_name: Option<String>,
    pub mls_number: Option<String>,
    pub photos: Option<Vec<String>>,
}

/// Automated valuation from `/avm/value`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueEstimate {
    pub price: Option<f64>,
    pub price_range_low: Option<f64>,
    pub price_range_high: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Rent estimate from `/avm/rent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentEstimate {
    pub rent: Option<f64>,
    pub rent_range_low: Option<f64>,
    pub rent_range_high: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Aggregates for one zip from `/markets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketStats {
    pub id: Option<String>,
    pub zip_code: Option<String>,
    pub sale_data: Option<MarketSegment>,
    pub rental_data: Option<MarketSegment>,
}

/// Sale or rental side of a market snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MarketSegment {
    pub last_updated_date: Option<DateTime<Utc>>,
    pub average_price: Option<f64>,
    pub median_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub average_days_on_market: Option<f64>,
    pub new_listings: Option<i64>,
    pub total_listings: Option<i64>,
}
