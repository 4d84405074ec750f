//! Typed results returned by repositories.
//!
//! Keep these structs focused on the data returned by queries. Business
//! logic should live in higher layers.

/// Which compound key an upsert resolves an existing row by.
///
/// Listings from the listing endpoints carry the locally derived address
/// key; property-endpoint records are addressed by the provider's own id,
/// falling back to the address key when the provider id is absent or
/// unseen (the address key is the table's uniqueness constraint).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    ListingKey,
    RentcastId,
}

/// What an upsert did, with the affected row id where one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted(i64),
    Updated(i64),
    Skipped(i64),
}

/// A photo row attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRow {
    pub id: i64,
    pub listing_id: i64,
    pub url: String,
    pub position: i64,
}
