//! Error handling for plenum-store
//!
//! Wraps the plenum-core fault envelope with store-specific helpers

use plenum_core::errors::{ApiErrorKind, ApiFault};

/// Result type alias using ApiFault
pub type Result<T> = std::result::Result<T, ApiFault>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ApiFault {
    ApiFault::new(ApiErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ApiFault {
    ApiFault::new(ApiErrorKind::Internal)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a seed validation error
pub fn seed_validation(reason: &str) -> ApiFault {
    ApiFault::new(ApiErrorKind::InvalidArgument)
        .with_op("seed_parse")
        .with_message(reason.to_string())
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ApiFault {
    ApiFault::new(ApiErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ApiFault {
    ApiFault::new(ApiErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}
