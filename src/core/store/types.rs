//! Catalog row types
//!
//! Plain records returned by the store; rendering them is entirely the
//! caller's concern.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Top-level container: a truck or other vehicle
#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub name: String,
    pub sort: i64,
    pub description: String,
    pub created: DateTime<Utc>,
}

/// A named storage location within a vehicle (compartment, locker, shelf)
#[derive(Debug, Clone, Serialize)]
pub struct Place {
    pub id: i64,
    pub vehicle_id: i64,
    pub name: String,
    pub sort: i64,
}

/// A piece of equipment stored in a place
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    pub id: i64,
    pub place_id: i64,
    pub name: String,
    pub quantity: i64,
    pub note: String,
    pub sort: i64,
    pub photo_path: Option<String>,
}

/// An opaque file attached to a vehicle
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: i64,
    pub vehicle_id: i64,
    pub original_name: String,
    pub stored_name: String,
    pub uploaded: DateTime<Utc>,
}

/// One search result: an item together with where it lives
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub item_id: i64,
    pub item_name: String,
    pub quantity: i64,
    pub place_id: i64,
    pub place_name: String,
    pub vehicle_id: i64,
    pub vehicle_name: String,
}

/// One CSV export row for a (place, item) pair
#[derive(Debug, Clone, Serialize)]
pub struct ExportRow {
    pub vehicle: String,
    pub place: String,
    pub item: String,
    pub quantity: i64,
    pub note: String,
}

/// One entry in the append-only audit trail
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub at: DateTime<Utc>,
    pub operator: String,
    pub action: String,
    pub detail: String,
}

/// Parse a stored RFC 3339 timestamp, defaulting to the epoch on garbage
pub(crate) fn parse_datetime(raw: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}
