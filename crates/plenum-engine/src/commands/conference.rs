//! Conference create and update orchestration

#![allow(clippy::result_large_err)]

use std::time::Instant;

use plenum_core::model::{Conference, ConferenceForm};
use plenum_core::ops;
use plenum_core::queue::NotificationQueue;
use plenum_core::rules::validate_conference_form;
use plenum_core::store::Datastore;
use plenum_core::{log_op_end, log_op_error, log_op_start};
use plenum_core_types::RequestId;

use crate::commands::decode_key;
use crate::errors::Result;
use crate::identity::{resolve_caller, AuthUser};
use crate::retry::{with_retries, COMMIT_ATTEMPTS};

/// Create a conference under the caller's ownership group.
///
/// ## Pipeline (in order):
///
/// 1. Resolve the caller, minting an account mapping on first contact.
/// 2. Validate the form, before any id gets allocated.
/// 3. Allocate the conference id.
/// 4. Commit the creating transaction, with retries for lost group races.
/// 5. Dispatch the confirmation tasks the commit released.
///
/// The id allocation sits outside the retry loop: a retried commit writes
/// the same conference it staged before instead of minting a duplicate. An
/// exhausted retry burns the allocated id; ids only need to be unique, not
/// dense.
///
/// # Errors
///
/// Returns an `Unauthorized` fault without an authenticated user, an
/// `InvalidArgument` one for a form without a name, and an `Unavailable`
/// one when every commit attempt lost its group.
pub fn create_conference(
    auth: Option<&AuthUser>,
    form: &ConferenceForm,
    store: &Datastore,
    queue: &dyn NotificationQueue,
) -> Result<Conference> {
    let request_id = RequestId::new();
    log_op_start!("create_conference", request_id = %request_id);
    let start = Instant::now();

    let result = (|| -> Result<Conference> {
        let caller = resolve_caller(store, auth)?;
        validate_conference_form(form)?;

        let id = store.allocate_conference_id();
        let commit = with_retries("create_conference", COMMIT_ATTEMPTS, || {
            ops::create_conference(store, &caller, id, form)
        })?;
        for task in &commit.tasks {
            queue.enqueue(task);
        }
        Ok(commit.value)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(conference) => {
            log_op_end!(
                "create_conference",
                duration_ms = duration_ms,
                request_id = %request_id,
                conference_key = %conference.key().websafe()
            );
            Ok(conference)
        }
        Err(fault) => {
            let fault = fault.with_request_id(request_id.clone());
            log_op_error!(
                "create_conference",
                fault.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(fault)
        }
    }
}

/// Update a conference the caller organizes.
///
/// The form replaces the stored conference wholesale; only the seats
/// already handed out survive a capacity change. Organizer-only: the
/// update commit itself rejects any other caller.
///
/// # Errors
///
/// Returns an `InvalidArgument` fault for a malformed key or a form
/// without a name, a `NotFound` one when the key does not resolve, and a
/// `Forbidden` one when the caller is not the organizer.
pub fn update_conference(
    auth: Option<&AuthUser>,
    websafe_key: &str,
    form: &ConferenceForm,
    store: &Datastore,
) -> Result<Conference> {
    let request_id = RequestId::new();
    log_op_start!(
        "update_conference",
        request_id = %request_id,
        conference_key = %websafe_key
    );
    let start = Instant::now();

    let result = (|| -> Result<Conference> {
        let caller = resolve_caller(store, auth)?;
        let key = decode_key(websafe_key)?;
        validate_conference_form(form)?;

        let commit = with_retries("update_conference", COMMIT_ATTEMPTS, || {
            ops::update_conference(store, &caller, &key, form)
        })?;
        Ok(commit.value)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(conference) => {
            log_op_end!(
                "update_conference",
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Ok(conference)
        }
        Err(fault) => {
            let fault = fault.with_request_id(request_id.clone());
            log_op_error!(
                "update_conference",
                fault.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(fault)
        }
    }
}
