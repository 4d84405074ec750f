//! Pure mapping logic between provider records and the local schema.
//!
//! Everything here is deterministic: the same input record always produces
//! the same listing key, converted units, and row values across runs.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{ListingStatus, NormalizedListing};
use crate::rentcast::model::{Property, SaleListing, TaxYear};

pub const SQFT_PER_ACRE: f64 = 43_560.0;

/// Clamp for the acres column so extreme provider values cannot overflow a
/// fixed-precision consumer downstream.
pub const MAX_LOT_ACRES: f64 = 999_999.0;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

/// Derive the locally unique listing key from address components.
///
/// Lowercases, strips non-alphanumerics, collapses runs of separators to
/// single hyphens, and trims edge hyphens. The zip, when present, becomes
/// the final hyphenated segment.
pub fn listing_key(street: &str, city: &str, state: &str, zip: Option<&str>) -> String {
    let joined = match zip {
        Some(zip) => format!("{} {} {} {}", street, city, state, zip),
        None => format!("{} {} {}", street, city, state),
    };
    let lower = joined.to_lowercase();
    NON_ALNUM.replace_all(&lower, "-").trim_matches('-').to_string()
}

/// Square feet to acres, clamped to [`MAX_LOT_ACRES`].
pub fn acres_from_sqft(sqft: f64) -> f64 {
    (sqft / SQFT_PER_ACRE).min(MAX_LOT_ACRES)
}

/// Split a possibly fractional bathroom count into full and half baths.
///
/// Any fractional remainder counts as one half bath, so quarter-bath
/// precision is lost. Known approximation.
pub fn split_baths(total: f64) -> (i64, i64) {
    let full = total.floor();
    let half = if total - full > 0.0 { 1 } else { 0 };
    (full as i64, half)
}

/// Pick the `total` of the numerically greatest year in a tax-history map.
/// Returns `None` when no entry has both a parseable year and a total.
pub fn latest_tax_total(taxes: &HashMap<String, TaxYear>) -> Option<f64> {
    taxes
        .iter()
        .filter_map(|(year, entry)| {
            let year: i64 = year.parse().ok()?;
            Some((year, entry.total?))
        })
        .max_by_key(|(year, _)| *year)
        .map(|(_, total)| total)
}

/// Synthetic media row id: listing id and photo position packed together.
/// Positions stay below 100 because the downloader caps photos per listing.
pub fn media_id(listing_id: i64, position: i64) -> i64 {
    listing_id * 100 + position
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Normalize a property-endpoint record. Returns `None` when street, city,
/// or state is missing; such records are skipped, never stored.
pub fn from_property(record: &Property) -> Option<NormalizedListing> {
    let street = non_empty(record.address_line1.as_deref())?;
    let city = non_empty(record.city.as_deref())?;
    let state = non_empty(record.state.as_deref())?;
    let zip = non_empty(record.zip_code.as_deref());
    let (baths_full, baths_half) = match record.bathrooms {
        Some(total) => {
            let (full, half) = split_baths(total);
            (Some(full), Some(half))
        }
        None => (None, None),
    };

    Some(NormalizedListing {
        listing_key: listing_key(street, city, state, zip),
        rentcast_id: record.id.clone(),
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.map(str::to_string),
        county: record.county.clone(),
        price: record.last_sale_price,
        beds: record.bedrooms.map(|b| b as i64),
        baths_full,
        baths_half,
        sqft: record.square_footage.map(|s| s.round() as i64),
        lot_acres: record.lot_size.map(acres_from_sqft),
        year_built: record.year_built,
        latitude: record.latitude,
        longitude: record.longitude,
        school_district: record.school_district.clone(),
        property_type: record.property_type.clone(),
        status: ListingStatus::Active,
        tax_annual: record.property_taxes.as_ref().and_then(latest_tax_total),
        listed_at: None,
        photos: Vec::new(),
    })
}

/// Normalize a sale-listing record. Same address-completeness gate as
/// [`from_property`].
pub fn from_sale_listing(record: &SaleListing) -> Option<NormalizedListing> {
    let street = non_empty(record.address_line1.as_deref())?;
    let city = non_empty(record.city.as_deref())?;
    let state = non_empty(record.state.as_deref())?;
    let zip = non_empty(record.zip_code.as_deref());
    let (baths_full, baths_half) = match record.bathrooms {
        Some(total) => {
            let (full, half) = split_baths(total);
            (Some(full), Some(half))
        }
        None => (None, None),
    };

    Some(NormalizedListing {
        listing_key: listing_key(street, city, state, zip),
        rentcast_id: record.id.clone(),
        street: street.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip: zip.map(str::to_string),
        county: record.county.clone(),
        price: record.price,
        beds: record.bedrooms.map(|b| b as i64),
        baths_full,
        baths_half,
        sqft: record.square_footage.map(|s| s.round() as i64),
        lot_acres: record.lot_size.map(acres_from_sqft),
        year_built: record.year_built,
        latitude: record.latitude,
        longitude: record.longitude,
        school_district: record.school_district.clone(),
        property_type: record.property_type.clone(),
        status: ListingStatus::from_provider(record.status.as_deref()),
        tax_annual: None,
        listed_at: record.listed_date,
        photos: record.photos.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_key_matches_expected_form() {
        assert_eq!(
            listing_key("123 Main St.", "Hackettstown", "NJ", Some("07840")),
            "123-main-st-hackettstown-nj-07840"
        );
    }

    #[test]
    fn listing_key_ignores_casing_and_extra_whitespace() {
        let a = listing_key("123 Main St.", "Hackettstown", "NJ", Some("07840"));
        let b = listing_key("  123  MAIN st. ", "hackettstown", "nj", Some("07840"));
        assert_eq!(a, b);
    }

    #[test]
    fn listing_key_without_zip_has_no_trailing_segment() {
        assert_eq!(
            listing_key("9 Ridge Rd", "Long Valley", "NJ", None),
            "9-ridge-rd-long-valley-nj"
        );
    }

    #[test]
    fn one_acre_converts_exactly() {
        assert_eq!(acres_from_sqft(43_560.0), 1.0);
    }

    #[test]
    fn extreme_lot_size_clamps() {
        let sqft = MAX_LOT_ACRES * SQFT_PER_ACRE + 1.0;
        assert_eq!(acres_from_sqft(sqft), MAX_LOT_ACRES);
    }

    #[test]
    fn bath_split_handles_halves_and_whole_counts() {
        assert_eq!(split_baths(2.5), (2, 1));
        assert_eq!(split_baths(3.0), (3, 0));
        assert_eq!(split_baths(1.75), (1, 1));
    }

    #[test]
    fn latest_tax_year_wins() {
        let mut taxes = HashMap::new();
        taxes.insert(
            "2021".to_string(),
            TaxYear {
                year: Some(2021),
                total: Some(8_100.0),
            },
        );
        taxes.insert(
            "2023".to_string(),
            TaxYear {
                year: Some(2023),
                total: Some(8_900.0),
            },
        );
        taxes.insert(
            "2022".to_string(),
            TaxYear {
                year: Some(2022),
                total: Some(8_400.0),
            },
        );
        assert_eq!(latest_tax_total(&taxes), Some(8_900.0));
    }

    #[test]
    fn malformed_tax_history_yields_none() {
        let mut taxes = HashMap::new();
        taxes.insert(
            "recent".to_string(),
            TaxYear {
                year: None,
                total: Some(5_000.0),
            },
        );
        taxes.insert(
            "2020".to_string(),
            TaxYear {
                year: Some(2020),
                total: None,
            },
        );
        assert_eq!(latest_tax_total(&taxes), None);
    }

    #[test]
    fn media_ids_are_unique_per_position() {
        assert_eq!(media_id(42, 1), 4201);
        assert_eq!(media_id(42, 10), 4210);
        assert_ne!(media_id(42, 1), media_id(43, 1));
    }

    #[test]
    fn property_without_city_is_rejected() {
        let record = Property {
            id: Some("p-1".into()),
            address_line1: Some("12 Elm St".into()),
            state: Some("NJ".into()),
            ..Property::default()
        };
        assert!(from_property(&record).is_none());
    }

    #[test]
    fn blank_street_is_rejected() {
        let record = Property {
            id: Some("p-2".into()),
            address_line1: Some("   ".into()),
            city: Some("Hackettstown".into()),
            state: Some("NJ".into()),
            ..Property::default()
        };
        assert!(from_property(&record).is_none());
    }

    #[test]
    fn complete_property_normalizes() {
        let mut taxes = HashMap::new();
        taxes.insert(
            "2023".to_string(),
            TaxYear {
                year: Some(2023),
                total: Some(9_200.0),
            },
        );
        let record = Property {
            id: Some("p-3".into()),
            address_line1: Some("45 Grand Ave".into()),
            city: Some("Hackettstown".into()),
            state: Some("NJ".into()),
            zip_code: Some("07840".into()),
            bathrooms: Some(2.5),
            lot_size: Some(21_780.0),
            property_taxes: Some(taxes),
            ..Property::default()
        };
        let normalized = from_property(&record).unwrap();
        assert_eq!(normalized.listing_key, "45-grand-ave-hackettstown-nj-07840");
        assert_eq!(normalized.baths_full, Some(2));
        assert_eq!(normalized.baths_half, Some(1));
        assert_eq!(normalized.lot_acres, Some(0.5));
        assert_eq!(normalized.tax_annual, Some(9_200.0));
        assert_eq!(normalized.status, ListingStatus::Active);
    }
}
