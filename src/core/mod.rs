//! Core module - catalog store, ordering, import/export and search

pub mod auth;
pub mod blob;
pub mod config;
pub mod ordering;
pub mod project;
pub mod reconcile;
pub mod search;
pub mod store;

pub use auth::AuthContext;
pub use blob::{BlobError, BlobStore, StoredBlob};
pub use config::Config;
pub use ordering::{Direction, SiblingScope};
pub use project::{Project, ProjectError};
pub use reconcile::{ImportError, ImportOptions, ImportReport, RowSkip};
pub use store::{
    AuditEntry, CatalogStore, Document, ExportRow, Item, ItemPatch, Place, SearchHit, StoreError,
    Vehicle,
};
