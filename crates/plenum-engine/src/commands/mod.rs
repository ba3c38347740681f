//! Command orchestration layer
//!
//! High-level entry points over the core operation set. Each one resolves
//! the caller, decodes wire-format keys, retries transient commit failures,
//! and dispatches whatever confirmation tasks the commit released.

use plenum_core::errors::ApiError;
use plenum_core_types::ConferenceKey;

pub mod conference;
pub mod engine_command;
pub mod engine_query;
pub mod profile;
pub mod registration;

/// Decode a websafe conference key from the wire.
///
/// # Errors
///
/// Returns [`ApiError::InvalidKey`] when the string is not a key this
/// system produced.
pub(crate) fn decode_key(websafe_key: &str) -> Result<ConferenceKey, ApiError> {
    ConferenceKey::from_websafe(websafe_key).map_err(|_| ApiError::InvalidKey {
        key: websafe_key.to_string(),
    })
}
