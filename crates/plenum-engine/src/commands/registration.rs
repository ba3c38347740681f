//! Registration and cancellation orchestration

#![allow(clippy::result_large_err)]

use std::time::Instant;

use plenum_core::ops;
use plenum_core::store::Datastore;
use plenum_core::{log_op_end, log_op_error, log_op_start};
use plenum_core_types::RequestId;

use crate::commands::decode_key;
use crate::errors::Result;
use crate::identity::{resolve_caller, AuthUser};
use crate::retry::{with_retries, COMMIT_ATTEMPTS};

/// Register the caller for a conference.
///
/// One commit over both groups moves the seat and appends the attendance
/// entry, so the two can never diverge. Returns `true` on success; a
/// registration that did not happen is always an error.
///
/// # Errors
///
/// Returns an `InvalidArgument` fault for a malformed key, a `NotFound`
/// one when the key does not resolve, and a `Conflict` one when the caller
/// is already registered or the conference is sold out.
pub fn register_for_conference(
    auth: Option<&AuthUser>,
    websafe_key: &str,
    store: &Datastore,
) -> Result<bool> {
    let request_id = RequestId::new();
    log_op_start!(
        "register_for_conference",
        request_id = %request_id,
        conference_key = %websafe_key
    );
    let start = Instant::now();

    let result = (|| -> Result<bool> {
        let caller = resolve_caller(store, auth)?;
        let key = decode_key(websafe_key)?;
        let commit = with_retries("register_for_conference", COMMIT_ATTEMPTS, || {
            ops::register(store, &caller, &key)
        })?;
        Ok(commit.value)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(registered) => {
            log_op_end!(
                "register_for_conference",
                duration_ms = duration_ms,
                request_id = %request_id,
                registered = registered
            );
            Ok(registered)
        }
        Err(fault) => {
            let fault = fault.with_request_id(request_id.clone());
            log_op_error!(
                "register_for_conference",
                fault.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(fault)
        }
    }
}

/// Unregister the caller from a conference.
///
/// Returns `true` when a registration was removed and the seat went back,
/// `false` when the caller was not on the attendee list. The `false` case
/// commits nothing.
///
/// # Errors
///
/// Returns an `InvalidArgument` fault for a malformed key and a `NotFound`
/// one when the key does not resolve.
pub fn unregister_from_conference(
    auth: Option<&AuthUser>,
    websafe_key: &str,
    store: &Datastore,
) -> Result<bool> {
    let request_id = RequestId::new();
    log_op_start!(
        "unregister_from_conference",
        request_id = %request_id,
        conference_key = %websafe_key
    );
    let start = Instant::now();

    let result = (|| -> Result<bool> {
        let caller = resolve_caller(store, auth)?;
        let key = decode_key(websafe_key)?;
        let commit = with_retries("unregister_from_conference", COMMIT_ATTEMPTS, || {
            ops::unregister(store, &caller, &key)
        })?;
        Ok(commit.value)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(removed) => {
            log_op_end!(
                "unregister_from_conference",
                duration_ms = duration_ms,
                request_id = %request_id,
                removed = removed
            );
            Ok(removed)
        }
        Err(fault) => {
            let fault = fault.with_request_id(request_id.clone());
            log_op_error!(
                "unregister_from_conference",
                fault.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(fault)
        }
    }
}
