//! packlist: vehicle stowage tracking
//!
//! A Unix-style toolkit for tracking the equipment stowed aboard a fleet of
//! vehicles: ordered storage places per vehicle, ordered items per place,
//! attached documents, CSV import/export and free-text search.

pub mod cli;
pub mod core;
