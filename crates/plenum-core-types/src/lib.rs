//! Shared identifier and logging-schema types for Plenum.
//!
//! This crate sits at the bottom of the workspace: every other crate depends
//! on it, so it stays small and dependency-light. It defines the identifiers
//! that name profiles and conferences, the websafe key codec used at every
//! external surface, and the canonical field names for structured logging.

pub mod correlation;
pub mod ids;
pub mod schema;

pub use correlation::RequestId;
pub use ids::{ConferenceId, ConferenceKey, ParseKeyError, UserId};
