//! SQLite-backed catalog store
//!
//! The persistent entity graph: Vehicle -> Place -> Item plus
//! Vehicle -> Document, with cascade-on-delete, explicit sibling ordering
//! and an append-only audit trail. Every mutating method takes an
//! `AuthContext` and runs in a single transaction; readers never see a
//! partially applied operation.

pub(crate) mod queries;
mod schema;
mod types;

pub use queries::ItemPatch;
pub use types::*;

use std::path::Path;

use rusqlite::{Connection, Transaction};
use thiserror::Error;

use crate::core::project::Project;

/// Current schema version - opening a newer database is refused
const SCHEMA_VERSION: i32 = 1;

/// The catalog store backed by SQLite
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Open (or create) the catalog database of a project
    pub fn open(project: &Project) -> Result<Self, StoreError> {
        Self::open_path(&project.db_path())
    }

    /// Open (or create) a catalog database at an explicit path
    pub fn open_path(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// In-memory store, used by tests
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        // WAL for concurrent readers; foreign keys drive the cascades
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let mut store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Begin a transaction for a multi-step operation (import)
    pub(crate) fn transaction(&mut self) -> Result<Transaction<'_>, StoreError> {
        Ok(self.conn.transaction()?)
    }
}

/// Errors surfaced by the catalog store
///
/// NotFound, Validation and Conflict are recoverable at the presentation
/// boundary; Database wraps everything the storage layer itself reports.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("vehicle '{0}' not found")]
    VehicleNotFound(String),

    #[error("place {0} not found")]
    PlaceNotFound(i64),

    #[error("item {0} not found")]
    ItemNotFound(i64),

    #[error("document {0} not found")]
    DocumentNotFound(i64),

    #[error("a vehicle named '{0}' already exists")]
    DuplicateVehicle(String),

    #[error("{0}")]
    Validation(String),

    #[error("catalog database has schema version {found}, this build supports {supported}")]
    SchemaVersion { found: i32, supported: i32 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

impl StoreError {
    /// True for the errors a caller recovers from with a message and a
    /// safe fallback view, as opposed to storage-layer failures.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            StoreError::Database(_) | StoreError::SchemaVersion { .. }
        )
    }
}
