//! Plenum Engine - Orchestration layer
//!
//! Provides high-level command orchestration that coordinates caller
//! identity, core domain operations, commit retries, and confirmation
//! dispatch over the in-memory datastore.

pub mod commands;
pub mod errors;
pub mod identity;
pub mod retry;

// Re-export key types
pub use errors::Result;
