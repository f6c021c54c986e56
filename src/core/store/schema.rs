//! Database schema initialization

use rusqlite::params;

use super::{CatalogStore, StoreError, SCHEMA_VERSION};

impl CatalogStore {
    /// Create the schema on first open; refuse databases from newer builds
    pub(super) fn ensure_schema(&mut self) -> Result<(), StoreError> {
        let found: i32 = self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })
            .unwrap_or(0);

        match found {
            0 => self.init_schema(),
            SCHEMA_VERSION => Ok(()),
            other => Err(StoreError::SchemaVersion {
                found: other,
                supported: SCHEMA_VERSION,
            }),
        }
    }

    fn init_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            r#"
            -- Schema version tracking
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            -- Vehicles: top-level containers, uniquely named (case-insensitive)
            CREATE TABLE IF NOT EXISTS vehicles (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL COLLATE NOCASE,
                sort INTEGER NOT NULL DEFAULT 0,
                description TEXT NOT NULL DEFAULT '',
                created TEXT NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS idx_vehicles_name ON vehicles(name);

            -- Places: ordered storage locations within a vehicle
            CREATE TABLE IF NOT EXISTS places (
                id INTEGER PRIMARY KEY,
                vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                sort INTEGER NOT NULL DEFAULT 0
            );
            CREATE INDEX IF NOT EXISTS idx_places_vehicle ON places(vehicle_id);

            -- Items: ordered equipment within a place
            CREATE TABLE IF NOT EXISTS items (
                id INTEGER PRIMARY KEY,
                place_id INTEGER NOT NULL REFERENCES places(id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                quantity INTEGER NOT NULL DEFAULT 1,
                note TEXT NOT NULL DEFAULT '',
                sort INTEGER NOT NULL DEFAULT 0,
                photo_path TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_items_place ON items(place_id);
            CREATE INDEX IF NOT EXISTS idx_items_name ON items(name);

            -- Documents: unordered file attachments on a vehicle
            CREATE TABLE IF NOT EXISTS documents (
                id INTEGER PRIMARY KEY,
                vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
                original_name TEXT NOT NULL,
                stored_name TEXT NOT NULL,
                uploaded TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_documents_vehicle ON documents(vehicle_id);

            -- Append-only audit trail of mutations
            CREATE TABLE IF NOT EXISTS audit (
                id INTEGER PRIMARY KEY,
                at TEXT NOT NULL,
                operator TEXT NOT NULL,
                action TEXT NOT NULL,
                detail TEXT NOT NULL DEFAULT ''
            );
            "#,
        )?;

        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
            params![SCHEMA_VERSION],
        )?;

        Ok(())
    }
}
