//! Repository layer for persisting domain models to SQLite
//!
//! Bridges the in-memory Datastore to SQLite persistence

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::SqliteRepo;
