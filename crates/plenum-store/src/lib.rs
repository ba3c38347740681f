//! Plenum Store - Persistence layer with SQLite and seed import
//!
//! Provides:
//! - SQLite schema with migrations framework
//! - Repository layer bridging the in-memory Datastore to persistence
//! - Hydration from SQLite back into a Datastore
//! - Seed Format v0 parser and importer

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;
pub mod seed;

// Re-export key types
pub use errors::Result;
