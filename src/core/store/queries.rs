//! Query and mutation methods for the catalog store
//!
//! Readers take `&self`; every mutation takes `&mut self` plus an explicit
//! `AuthContext`, runs in one transaction and appends an audit entry.
//! Deletes return the id of the nearest surviving ancestor so the caller
//! can refresh the right view.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row, Transaction};

use super::{
    parse_datetime, AuditEntry, CatalogStore, Document, ExportRow, Item, Place, SearchHit,
    StoreError, Vehicle,
};
use crate::core::auth::AuthContext;
use crate::core::ordering::{self, Direction, SiblingScope};
use crate::core::search;

/// Partial update for an item; `None` leaves the field untouched
#[derive(Debug, Default, Clone)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub note: Option<String>,
    /// Move the item to another place; it re-appends at the end there
    pub place_id: Option<i64>,
}

// =========================================================================
// Row mappers
// =========================================================================

fn vehicle_from_row(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        name: row.get(1)?,
        sort: row.get(2)?,
        description: row.get(3)?,
        created: parse_datetime(row.get::<_, String>(4)?),
    })
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    Ok(Place {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        name: row.get(2)?,
        sort: row.get(3)?,
    })
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get(0)?,
        place_id: row.get(1)?,
        name: row.get(2)?,
        quantity: row.get(3)?,
        note: row.get(4)?,
        sort: row.get(5)?,
        photo_path: row.get(6)?,
    })
}

fn document_from_row(row: &Row<'_>) -> rusqlite::Result<Document> {
    Ok(Document {
        id: row.get(0)?,
        vehicle_id: row.get(1)?,
        original_name: row.get(2)?,
        stored_name: row.get(3)?,
        uploaded: parse_datetime(row.get::<_, String>(4)?),
    })
}

const VEHICLE_COLS: &str = "id, name, sort, description, created";
const PLACE_COLS: &str = "id, vehicle_id, name, sort";
const ITEM_COLS: &str = "id, place_id, name, quantity, note, sort, photo_path";
const DOCUMENT_COLS: &str = "id, vehicle_id, original_name, stored_name, uploaded";

// =========================================================================
// Shared row-level helpers (also used by the import reconciler)
//
// All of these run inside the caller's open transaction.
// =========================================================================

/// Trim a user-supplied name; empty after trimming is a Validation error
pub(crate) fn clean_name(raw: &str) -> Result<String, StoreError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    Ok(name.to_string())
}

/// Case-insensitive vehicle lookup by name
pub(crate) fn vehicle_id_by_name(
    tx: &Transaction<'_>,
    name: &str,
) -> Result<Option<i64>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id FROM vehicles WHERE name = ?1",
            params![name.trim()],
            |row| row.get(0),
        )
        .optional()?)
}

/// Case-insensitive place lookup by name within one vehicle
pub(crate) fn place_id_by_name(
    tx: &Transaction<'_>,
    vehicle_id: i64,
    name: &str,
) -> Result<Option<i64>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id FROM places WHERE vehicle_id = ?1 AND name = ?2 COLLATE NOCASE \
             ORDER BY sort, name, id LIMIT 1",
            params![vehicle_id, name.trim()],
            |row| row.get(0),
        )
        .optional()?)
}

/// Insert a vehicle appended at the end of the display order
pub(crate) fn insert_vehicle(
    tx: &Transaction<'_>,
    name: &str,
    description: &str,
) -> Result<i64, StoreError> {
    let sort = ordering::next_sort(tx, &SiblingScope::vehicles())?;
    tx.execute(
        "INSERT INTO vehicles (name, sort, description, created) VALUES (?1, ?2, ?3, ?4)",
        params![name, sort, description, Utc::now().to_rfc3339()],
    )?;
    Ok(tx.last_insert_rowid())
}

/// Insert a place appended at the end of its vehicle's order
pub(crate) fn insert_place(
    tx: &Transaction<'_>,
    vehicle_id: i64,
    name: &str,
) -> Result<i64, StoreError> {
    let sort = ordering::next_sort(tx, &SiblingScope::places_of(vehicle_id))?;
    tx.execute(
        "INSERT INTO places (vehicle_id, name, sort) VALUES (?1, ?2, ?3)",
        params![vehicle_id, name, sort],
    )?;
    Ok(tx.last_insert_rowid())
}

/// Insert an item appended at the end of its place's order
pub(crate) fn insert_item(
    tx: &Transaction<'_>,
    place_id: i64,
    name: &str,
    quantity: i64,
    note: &str,
) -> Result<i64, StoreError> {
    let sort = ordering::next_sort(tx, &SiblingScope::items_of(place_id))?;
    tx.execute(
        "INSERT INTO items (place_id, name, quantity, note, sort) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![place_id, name, quantity, note, sort],
    )?;
    Ok(tx.last_insert_rowid())
}

/// Append one audit entry inside the caller's transaction
pub(crate) fn record_audit(
    tx: &Transaction<'_>,
    auth: &AuthContext,
    action: &str,
    detail: &str,
) -> Result<(), StoreError> {
    tx.execute(
        "INSERT INTO audit (at, operator, action, detail) VALUES (?1, ?2, ?3, ?4)",
        params![Utc::now().to_rfc3339(), auth.operator(), action, detail],
    )?;
    Ok(())
}

impl CatalogStore {
    // =====================================================================
    // Vehicles
    // =====================================================================

    pub fn vehicle_by_id(&self, id: i64) -> Result<Vehicle, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {VEHICLE_COLS} FROM vehicles WHERE id = ?1"),
                params![id],
                vehicle_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::VehicleNotFound(id.to_string()))
    }

    /// Lookup by name, case-insensitively
    pub fn vehicle_by_name(&self, name: &str) -> Result<Vehicle, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {VEHICLE_COLS} FROM vehicles WHERE name = ?1"),
                params![name.trim()],
                vehicle_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::VehicleNotFound(name.trim().to_string()))
    }

    /// Resolve a CLI reference: a numeric id first, then a name
    pub fn resolve_vehicle(&self, reference: &str) -> Result<Vehicle, StoreError> {
        if let Ok(id) = reference.trim().parse::<i64>() {
            if let Ok(vehicle) = self.vehicle_by_id(id) {
                return Ok(vehicle);
            }
        }
        self.vehicle_by_name(reference)
    }

    pub fn list_vehicles(&self) -> Result<Vec<Vehicle>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {VEHICLE_COLS} FROM vehicles ORDER BY sort, name, id"
        ))?;
        let rows = stmt.query_map([], vehicle_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn create_vehicle(
        &mut self,
        auth: &AuthContext,
        name: &str,
        description: &str,
    ) -> Result<Vehicle, StoreError> {
        let name = clean_name(name)?;
        let tx = self.conn.transaction()?;
        if vehicle_id_by_name(&tx, &name)?.is_some() {
            return Err(StoreError::DuplicateVehicle(name));
        }
        let id = insert_vehicle(&tx, &name, description.trim())?;
        record_audit(&tx, auth, "vehicle.create", &name)?;
        tx.commit()?;
        self.vehicle_by_id(id)
    }

    pub fn rename_vehicle(
        &mut self,
        auth: &AuthContext,
        id: i64,
        new_name: &str,
    ) -> Result<Vehicle, StoreError> {
        let new_name = clean_name(new_name)?;
        let tx = self.conn.transaction()?;
        let old_name: String = tx
            .query_row(
                "SELECT name FROM vehicles WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::VehicleNotFound(id.to_string()))?;
        if let Some(other) = vehicle_id_by_name(&tx, &new_name)? {
            if other != id {
                return Err(StoreError::DuplicateVehicle(new_name));
            }
        }
        tx.execute(
            "UPDATE vehicles SET name = ?1 WHERE id = ?2",
            params![new_name, id],
        )?;
        record_audit(
            &tx,
            auth,
            "vehicle.rename",
            &format!("{old_name} -> {new_name}"),
        )?;
        tx.commit()?;
        self.vehicle_by_id(id)
    }

    /// Replace the vehicle's free-text description
    pub fn set_description(
        &mut self,
        auth: &AuthContext,
        id: i64,
        text: &str,
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let changed = tx.execute(
            "UPDATE vehicles SET description = ?1 WHERE id = ?2",
            params![text.trim(), id],
        )?;
        if changed == 0 {
            return Err(StoreError::VehicleNotFound(id.to_string()));
        }
        record_audit(&tx, auth, "vehicle.describe", &id.to_string())?;
        tx.commit()?;
        Ok(())
    }

    /// Move a vehicle in the fleet display order; false when already at the edge
    pub fn move_vehicle(
        &mut self,
        auth: &AuthContext,
        id: i64,
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let vehicle = self.vehicle_by_id(id)?;
        let tx = self.conn.transaction()?;
        let moved = ordering::shift(&tx, &SiblingScope::vehicles(), id, direction)?;
        if moved {
            record_audit(
                &tx,
                auth,
                "vehicle.move",
                &format!("{} {direction}", vehicle.name),
            )?;
        }
        tx.commit()?;
        Ok(moved)
    }

    /// Delete a vehicle and, transactionally, everything aboard it
    pub fn delete_vehicle(&mut self, auth: &AuthContext, id: i64) -> Result<(), StoreError> {
        let vehicle = self.vehicle_by_id(id)?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM vehicles WHERE id = ?1", params![id])?;
        record_audit(&tx, auth, "vehicle.delete", &vehicle.name)?;
        tx.commit()?;
        Ok(())
    }

    // =====================================================================
    // Places
    // =====================================================================

    pub fn place_by_id(&self, id: i64) -> Result<Place, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {PLACE_COLS} FROM places WHERE id = ?1"),
                params![id],
                place_from_row,
            )
            .optional()?
            .ok_or(StoreError::PlaceNotFound(id))
    }

    pub fn list_places(&self, vehicle_id: i64) -> Result<Vec<Place>, StoreError> {
        self.vehicle_by_id(vehicle_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PLACE_COLS} FROM places WHERE vehicle_id = ?1 ORDER BY sort, name, id"
        ))?;
        let rows = stmt.query_map(params![vehicle_id], place_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    /// Item count per place of a vehicle, keyed by place id
    pub fn place_counts(&self, vehicle_id: i64) -> Result<HashMap<i64, i64>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT p.id, COUNT(i.id) FROM places p \
             LEFT JOIN items i ON i.place_id = p.id \
             WHERE p.vehicle_id = ?1 GROUP BY p.id",
        )?;
        let rows = stmt.query_map(params![vehicle_id], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn create_place(
        &mut self,
        auth: &AuthContext,
        vehicle_id: i64,
        name: &str,
    ) -> Result<Place, StoreError> {
        let name = clean_name(name)?;
        let vehicle = self.vehicle_by_id(vehicle_id)?;
        let tx = self.conn.transaction()?;
        let id = insert_place(&tx, vehicle_id, &name)?;
        record_audit(
            &tx,
            auth,
            "place.create",
            &format!("{name} in {}", vehicle.name),
        )?;
        tx.commit()?;
        self.place_by_id(id)
    }

    pub fn rename_place(
        &mut self,
        auth: &AuthContext,
        id: i64,
        new_name: &str,
    ) -> Result<Place, StoreError> {
        let new_name = clean_name(new_name)?;
        let place = self.place_by_id(id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE places SET name = ?1 WHERE id = ?2",
            params![new_name, id],
        )?;
        record_audit(
            &tx,
            auth,
            "place.rename",
            &format!("{} -> {new_name}", place.name),
        )?;
        tx.commit()?;
        self.place_by_id(id)
    }

    pub fn move_place(
        &mut self,
        auth: &AuthContext,
        id: i64,
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let place = self.place_by_id(id)?;
        let tx = self.conn.transaction()?;
        let moved = ordering::shift(
            &tx,
            &SiblingScope::places_of(place.vehicle_id),
            id,
            direction,
        )?;
        if moved {
            record_audit(
                &tx,
                auth,
                "place.move",
                &format!("{} {direction}", place.name),
            )?;
        }
        tx.commit()?;
        Ok(moved)
    }

    /// Delete a place and its items; returns the owning vehicle id
    pub fn delete_place(&mut self, auth: &AuthContext, id: i64) -> Result<i64, StoreError> {
        let place = self.place_by_id(id)?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM places WHERE id = ?1", params![id])?;
        record_audit(&tx, auth, "place.delete", &place.name)?;
        tx.commit()?;
        Ok(place.vehicle_id)
    }

    // =====================================================================
    // Items
    // =====================================================================

    pub fn item_by_id(&self, id: i64) -> Result<Item, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {ITEM_COLS} FROM items WHERE id = ?1"),
                params![id],
                item_from_row,
            )
            .optional()?
            .ok_or(StoreError::ItemNotFound(id))
    }

    pub fn list_items(&self, place_id: i64) -> Result<Vec<Item>, StoreError> {
        self.place_by_id(place_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLS} FROM items WHERE place_id = ?1 ORDER BY sort, name, id"
        ))?;
        let rows = stmt.query_map(params![place_id], item_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn create_item(
        &mut self,
        auth: &AuthContext,
        place_id: i64,
        name: &str,
        quantity: i64,
        note: &str,
    ) -> Result<Item, StoreError> {
        let name = clean_name(name)?;
        if quantity < 0 {
            return Err(StoreError::Validation(
                "quantity must be non-negative".into(),
            ));
        }
        let place = self.place_by_id(place_id)?;
        let tx = self.conn.transaction()?;
        let id = insert_item(&tx, place_id, &name, quantity, note.trim())?;
        record_audit(
            &tx,
            auth,
            "item.create",
            &format!("{name} in {}", place.name),
        )?;
        tx.commit()?;
        self.item_by_id(id)
    }

    /// Apply a partial update; moving to another place re-appends there
    pub fn update_item(
        &mut self,
        auth: &AuthContext,
        id: i64,
        patch: ItemPatch,
    ) -> Result<Item, StoreError> {
        let current = self.item_by_id(id)?;

        let name = match patch.name {
            Some(raw) => clean_name(&raw)?,
            None => current.name.clone(),
        };
        let quantity = patch.quantity.unwrap_or(current.quantity);
        if quantity < 0 {
            return Err(StoreError::Validation(
                "quantity must be non-negative".into(),
            ));
        }
        let note = patch
            .note
            .map(|n| n.trim().to_string())
            .unwrap_or_else(|| current.note.clone());

        let destination = patch.place_id.unwrap_or(current.place_id);
        if destination != current.place_id {
            self.place_by_id(destination)?;
        }

        let tx = self.conn.transaction()?;
        let sort = if destination != current.place_id {
            ordering::next_sort(&tx, &SiblingScope::items_of(destination))?
        } else {
            current.sort
        };
        tx.execute(
            "UPDATE items SET name = ?1, quantity = ?2, note = ?3, place_id = ?4, sort = ?5 \
             WHERE id = ?6",
            params![name, quantity, note, destination, sort, id],
        )?;
        record_audit(&tx, auth, "item.update", &name)?;
        tx.commit()?;
        self.item_by_id(id)
    }

    pub fn move_item(
        &mut self,
        auth: &AuthContext,
        id: i64,
        direction: Direction,
    ) -> Result<bool, StoreError> {
        let item = self.item_by_id(id)?;
        let tx = self.conn.transaction()?;
        let moved = ordering::shift(&tx, &SiblingScope::items_of(item.place_id), id, direction)?;
        if moved {
            record_audit(&tx, auth, "item.move", &format!("{} {direction}", item.name))?;
        }
        tx.commit()?;
        Ok(moved)
    }

    /// Delete an item; returns the owning vehicle id
    pub fn delete_item(&mut self, auth: &AuthContext, id: i64) -> Result<i64, StoreError> {
        let item = self.item_by_id(id)?;
        let vehicle_id = self.place_by_id(item.place_id)?.vehicle_id;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM items WHERE id = ?1", params![id])?;
        record_audit(&tx, auth, "item.delete", &item.name)?;
        tx.commit()?;
        Ok(vehicle_id)
    }

    /// Point the item at a stored photo blob, replacing any previous
    /// reference. The previous blob is not reclaimed.
    pub fn attach_photo(
        &mut self,
        auth: &AuthContext,
        item_id: i64,
        stored_name: &str,
    ) -> Result<(), StoreError> {
        let item = self.item_by_id(item_id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "UPDATE items SET photo_path = ?1 WHERE id = ?2",
            params![stored_name, item_id],
        )?;
        record_audit(&tx, auth, "item.photo", &item.name)?;
        tx.commit()?;
        Ok(())
    }

    // =====================================================================
    // Documents
    // =====================================================================

    pub fn document_by_id(&self, id: i64) -> Result<Document, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT {DOCUMENT_COLS} FROM documents WHERE id = ?1"),
                params![id],
                document_from_row,
            )
            .optional()?
            .ok_or(StoreError::DocumentNotFound(id))
    }

    pub fn list_documents(&self, vehicle_id: i64) -> Result<Vec<Document>, StoreError> {
        self.vehicle_by_id(vehicle_id)?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DOCUMENT_COLS} FROM documents WHERE vehicle_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt.query_map(params![vehicle_id], document_from_row)?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    pub fn attach_document(
        &mut self,
        auth: &AuthContext,
        vehicle_id: i64,
        original_name: &str,
        stored_name: &str,
    ) -> Result<Document, StoreError> {
        let vehicle = self.vehicle_by_id(vehicle_id)?;
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO documents (vehicle_id, original_name, stored_name, uploaded) \
             VALUES (?1, ?2, ?3, ?4)",
            params![
                vehicle_id,
                original_name,
                stored_name,
                Utc::now().to_rfc3339()
            ],
        )?;
        let id = tx.last_insert_rowid();
        record_audit(
            &tx,
            auth,
            "document.attach",
            &format!("{original_name} to {}", vehicle.name),
        )?;
        tx.commit()?;
        self.document_by_id(id)
    }

    /// Delete a document record; returns the owning vehicle id
    pub fn delete_document(&mut self, auth: &AuthContext, id: i64) -> Result<i64, StoreError> {
        let document = self.document_by_id(id)?;
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM documents WHERE id = ?1", params![id])?;
        record_audit(&tx, auth, "document.delete", &document.original_name)?;
        tx.commit()?;
        Ok(document.vehicle_id)
    }

    // =====================================================================
    // Search & export
    // =====================================================================

    /// Free-text search across item/place/vehicle names.
    ///
    /// Every query token must be a substring of the combined normalized
    /// names; results are ordered by vehicle, place and item name and
    /// deduplicated by (item, place). A blank query matches nothing.
    pub fn search(
        &self,
        query: &str,
        vehicle_filter: Option<i64>,
    ) -> Result<Vec<SearchHit>, StoreError> {
        let tokens = search::tokens(query);
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT i.id, i.name, i.quantity, p.id, p.name, v.id, v.name \
             FROM items i \
             JOIN places p ON i.place_id = p.id \
             JOIN vehicles v ON p.vehicle_id = v.id \
             ORDER BY v.name, p.name, i.name, i.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(SearchHit {
                item_id: row.get(0)?,
                item_name: row.get(1)?,
                quantity: row.get(2)?,
                place_id: row.get(3)?,
                place_name: row.get(4)?,
                vehicle_id: row.get(5)?,
                vehicle_name: row.get(6)?,
            })
        })?;

        let mut seen: HashSet<(i64, i64)> = HashSet::new();
        let mut hits = Vec::new();
        for hit in rows {
            let hit = hit?;
            let haystack = format!(
                "{} {} {}",
                search::normalize(&hit.item_name),
                search::normalize(&hit.place_name),
                search::normalize(&hit.vehicle_name)
            );
            if !search::matches_all(&tokens, &haystack) {
                continue;
            }
            if let Some(vehicle_id) = vehicle_filter {
                if hit.vehicle_id != vehicle_id {
                    continue;
                }
            }
            if !seen.insert((hit.item_id, hit.place_id)) {
                continue;
            }
            hits.push(hit);
        }
        Ok(hits)
    }

    /// Export projection: one row per (place, item) of a vehicle, in
    /// `(place.sort, item.sort)` order.
    pub fn export_rows(&self, vehicle_id: i64) -> Result<Vec<ExportRow>, StoreError> {
        let vehicle = self.vehicle_by_id(vehicle_id)?;
        let mut stmt = self.conn.prepare(
            "SELECT p.name, i.name, i.quantity, i.note \
             FROM places p \
             JOIN items i ON i.place_id = p.id \
             WHERE p.vehicle_id = ?1 \
             ORDER BY p.sort, p.name, p.id, i.sort, i.name, i.id",
        )?;
        let rows = stmt.query_map(params![vehicle_id], |row| {
            Ok(ExportRow {
                vehicle: vehicle.name.clone(),
                place: row.get(0)?,
                item: row.get(1)?,
                quantity: row.get(2)?,
                note: row.get(3)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }

    // =====================================================================
    // Audit trail
    // =====================================================================

    /// Most recent audit entries, newest first
    pub fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, at, operator, action, detail FROM audit ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(AuditEntry {
                id: row.get(0)?,
                at: parse_datetime(row.get::<_, String>(1)?),
                operator: row.get(2)?,
                action: row.get(3)?,
                detail: row.get(4)?,
            })
        })?;
        Ok(rows.collect::<Result<_, _>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::CatalogStore;

    fn fixture() -> (CatalogStore, AuthContext) {
        (
            CatalogStore::open_in_memory().unwrap(),
            AuthContext::new("tester"),
        )
    }

    #[test]
    fn test_vehicles_list_in_append_order() {
        let (mut store, auth) = fixture();
        store.create_vehicle(&auth, "Engine 7", "").unwrap();
        store.create_vehicle(&auth, "Ladder 2", "").unwrap();
        store.create_vehicle(&auth, "Ambulance 1", "").unwrap();

        let names: Vec<String> = store
            .list_vehicles()
            .unwrap()
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, ["Engine 7", "Ladder 2", "Ambulance 1"]);
    }

    #[test]
    fn test_vehicle_name_conflict_is_case_insensitive() {
        let (mut store, auth) = fixture();
        store.create_vehicle(&auth, "Engine 7", "").unwrap();

        let err = store.create_vehicle(&auth, "engine 7", "").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateVehicle(_)));
    }

    #[test]
    fn test_empty_names_are_rejected() {
        let (mut store, auth) = fixture();
        let err = store.create_vehicle(&auth, "   ", "").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let err = store.rename_place(&auth, place.id, " \t").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_resolve_vehicle_by_id_and_name() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();

        assert_eq!(
            store.resolve_vehicle(&vehicle.id.to_string()).unwrap().id,
            vehicle.id
        );
        assert_eq!(store.resolve_vehicle("engine 7").unwrap().id, vehicle.id);
        assert!(matches!(
            store.resolve_vehicle("Engine 99"),
            Err(StoreError::VehicleNotFound(_))
        ));
    }

    #[test]
    fn test_create_place_requires_existing_vehicle() {
        let (mut store, auth) = fixture();
        let err = store.create_place(&auth, 42, "Cab").unwrap_err();
        assert!(matches!(err, StoreError::VehicleNotFound(_)));
    }

    #[test]
    fn test_items_append_and_list_in_creation_order() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();

        for name in ["Flashlight", "Gloves", "Radio", "Axe"] {
            store.create_item(&auth, place.id, name, 1, "").unwrap();
        }

        let names: Vec<String> = store
            .list_items(place.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Flashlight", "Gloves", "Radio", "Axe"]);

        let sorts: Vec<i64> = store
            .list_items(place.id)
            .unwrap()
            .into_iter()
            .map(|i| i.sort)
            .collect();
        let mut distinct = sorts.clone();
        distinct.dedup();
        assert_eq!(sorts, distinct, "sort values must be distinct");
    }

    #[test]
    fn test_move_boundaries_are_noops() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let first = store.create_item(&auth, place.id, "Flashlight", 1, "").unwrap();
        let last = store.create_item(&auth, place.id, "Gloves", 1, "").unwrap();

        assert!(!store.move_item(&auth, first.id, Direction::Up).unwrap());
        assert!(!store.move_item(&auth, last.id, Direction::Down).unwrap());

        let names: Vec<String> = store
            .list_items(place.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Flashlight", "Gloves"]);
    }

    #[test]
    fn test_move_down_then_up_restores_order() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let a = store.create_item(&auth, place.id, "Flashlight", 1, "").unwrap();
        store.create_item(&auth, place.id, "Gloves", 1, "").unwrap();

        assert!(store.move_item(&auth, a.id, Direction::Down).unwrap());
        assert!(store.move_item(&auth, a.id, Direction::Up).unwrap());

        let names: Vec<String> = store
            .list_items(place.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Flashlight", "Gloves"]);
    }

    #[test]
    fn test_delete_vehicle_cascades_completely() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let mut item_ids = Vec::new();
        let mut place_ids = Vec::new();
        for place_name in ["Cab", "Rear Locker"] {
            let place = store.create_place(&auth, vehicle.id, place_name).unwrap();
            place_ids.push(place.id);
            for item_name in ["Flashlight", "Gloves", "Radio"] {
                let item = store.create_item(&auth, place.id, item_name, 1, "").unwrap();
                item_ids.push(item.id);
            }
        }
        let document = store
            .attach_document(&auth, vehicle.id, "manual.pdf", "ab12.pdf")
            .unwrap();

        store.delete_vehicle(&auth, vehicle.id).unwrap();

        assert!(matches!(
            store.vehicle_by_id(vehicle.id),
            Err(StoreError::VehicleNotFound(_))
        ));
        for place_id in place_ids {
            assert!(matches!(
                store.place_by_id(place_id),
                Err(StoreError::PlaceNotFound(_))
            ));
        }
        for item_id in item_ids {
            assert!(matches!(
                store.item_by_id(item_id),
                Err(StoreError::ItemNotFound(_))
            ));
        }
        assert!(matches!(
            store.document_by_id(document.id),
            Err(StoreError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn test_deletes_return_surviving_ancestor() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let item = store.create_item(&auth, place.id, "Flashlight", 1, "").unwrap();

        assert_eq!(store.delete_item(&auth, item.id).unwrap(), vehicle.id);
        assert_eq!(store.delete_place(&auth, place.id).unwrap(), vehicle.id);
    }

    #[test]
    fn test_update_item_move_reappends_at_destination() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let cab = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let locker = store.create_place(&auth, vehicle.id, "Rear Locker").unwrap();
        let moved = store.create_item(&auth, cab.id, "Flashlight", 1, "").unwrap();
        store.create_item(&auth, locker.id, "Hose", 1, "").unwrap();

        let patch = ItemPatch {
            place_id: Some(locker.id),
            quantity: Some(3),
            ..Default::default()
        };
        let updated = store.update_item(&auth, moved.id, patch).unwrap();
        assert_eq!(updated.place_id, locker.id);
        assert_eq!(updated.quantity, 3);

        let names: Vec<String> = store
            .list_items(locker.id)
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, ["Hose", "Flashlight"], "moved item lands last");
    }

    #[test]
    fn test_attach_photo_overwrites_previous_reference() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let place = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let item = store.create_item(&auth, place.id, "Flashlight", 1, "").unwrap();

        store.attach_photo(&auth, item.id, "aaaa.jpg").unwrap();
        store.attach_photo(&auth, item.id, "bbbb.jpg").unwrap();

        assert_eq!(
            store.item_by_id(item.id).unwrap().photo_path.as_deref(),
            Some("bbbb.jpg")
        );
    }

    #[test]
    fn test_search_and_of_tokens() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let locker = store.create_place(&auth, vehicle.id, "Rear Locker").unwrap();
        store
            .create_item(&auth, locker.id, "Fire-Hose Nozzle", 1, "")
            .unwrap();

        assert_eq!(store.search("fire hose", None).unwrap().len(), 1);
        assert_eq!(store.search("hose nozzle", None).unwrap().len(), 1);
        assert_eq!(store.search("locker fir", None).unwrap().len(), 1);
        assert!(store.search("hose truck", None).unwrap().is_empty());
        assert!(store.search("", None).unwrap().is_empty());
        assert!(store.search("  !! ", None).unwrap().is_empty());
    }

    #[test]
    fn test_search_vehicle_filter_and_ordering() {
        let (mut store, auth) = fixture();
        let engine = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let ladder = store.create_vehicle(&auth, "Ladder 2", "").unwrap();
        let cab_e = store.create_place(&auth, engine.id, "Cab").unwrap();
        let cab_l = store.create_place(&auth, ladder.id, "Cab").unwrap();
        store.create_item(&auth, cab_e.id, "Radio", 1, "").unwrap();
        store.create_item(&auth, cab_l.id, "Radio", 1, "").unwrap();

        let all = store.search("radio", None).unwrap();
        assert_eq!(all.len(), 2);
        // Ordered by vehicle name, then place, then item
        assert_eq!(all[0].vehicle_name, "Engine 7");
        assert_eq!(all[1].vehicle_name, "Ladder 2");

        let filtered = store.search("radio", Some(ladder.id)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].vehicle_id, ladder.id);
    }

    #[test]
    fn test_export_rows_follow_place_then_item_order() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        let cab = store.create_place(&auth, vehicle.id, "Cab").unwrap();
        let locker = store.create_place(&auth, vehicle.id, "Rear Locker").unwrap();
        store.create_item(&auth, cab.id, "Flashlight", 2, "").unwrap();
        store.create_item(&auth, cab.id, "Gloves", 1, "").unwrap();
        store.create_item(&auth, locker.id, "Hose", 1, "").unwrap();

        // Move the locker first; export must follow the new order
        store.move_place(&auth, locker.id, Direction::Up).unwrap();

        let rows = store.export_rows(vehicle.id).unwrap();
        let flat: Vec<(String, String)> = rows
            .into_iter()
            .map(|r| (r.place, r.item))
            .collect();
        assert_eq!(
            flat,
            [
                ("Rear Locker".to_string(), "Hose".to_string()),
                ("Cab".to_string(), "Flashlight".to_string()),
                ("Cab".to_string(), "Gloves".to_string()),
            ]
        );
    }

    #[test]
    fn test_audit_records_mutations_with_operator() {
        let (mut store, auth) = fixture();
        let vehicle = store.create_vehicle(&auth, "Engine 7", "").unwrap();
        store.set_description(&auth, vehicle.id, "First due engine").unwrap();

        let entries = store.list_audit(10).unwrap();
        assert_eq!(entries.len(), 2);
        // Newest first
        assert_eq!(entries[0].action, "vehicle.describe");
        assert_eq!(entries[1].action, "vehicle.create");
        assert!(entries.iter().all(|e| e.operator == "tester"));
    }
}
