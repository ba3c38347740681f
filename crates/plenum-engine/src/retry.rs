//! Bounded retry for transient commit failures
//!
//! A group commit can lose the race for its entity groups. That failure is
//! transient, so engine commands retry it a fixed number of times with a
//! short exponential backoff before giving up. Nothing else is retried:
//! validation failures and business-rule conflicts are deterministic and
//! would fail the same way again.

use std::time::Duration;

use plenum_core::errors::{ApiError, ApiErrorKind, Result};

/// Commit attempts per engine command, counting the first try
pub const COMMIT_ATTEMPTS: u32 = 3;

const BASE_BACKOFF_MS: u64 = 10;

/// Run `operation` up to `attempts` times, sleeping between tries.
///
/// Only failures of kind [`ApiErrorKind::Unavailable`] are retried; any
/// other error returns immediately. The backoff doubles after each failed
/// attempt, starting at 10ms.
///
/// # Errors
///
/// Returns the operation's own error for non-transient failures, and
/// [`ApiError::RetriesExhausted`] when every attempt failed transiently.
pub fn with_retries<T>(
    op: &str,
    attempts: u32,
    mut operation: impl FnMut() -> Result<T>,
) -> Result<T> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(err) if err.kind() != ApiErrorKind::Unavailable => return Err(err),
            Err(_) if attempt == attempts => {
                return Err(ApiError::RetriesExhausted {
                    op: op.to_string(),
                    attempts,
                });
            }
            Err(err) => {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS << (attempt - 1));
                tracing::warn!(
                    op = op,
                    attempt = attempt,
                    backoff_ms = backoff.as_millis() as u64,
                    error = %err,
                    "transient commit failure, retrying"
                );
                std::thread::sleep(backoff);
                attempt += 1;
            }
        }
    }
}
