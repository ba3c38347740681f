//! Profile save orchestration

#![allow(clippy::result_large_err)]

use std::time::Instant;

use plenum_core::model::{Profile, ProfileForm};
use plenum_core::ops;
use plenum_core::store::Datastore;
use plenum_core::{log_op_end, log_op_error, log_op_start};
use plenum_core_types::RequestId;

use crate::errors::Result;
use crate::identity::{resolve_caller, AuthUser};
use crate::retry::{with_retries, COMMIT_ATTEMPTS};

/// Save the caller's profile from a partial form.
///
/// Resolves the caller, then runs the load-modify-save commit with retries
/// for lost group races. A caller without a stored profile gets the
/// default-initialized one as the base, so the first save also creates.
///
/// # Errors
///
/// Returns an `Unauthorized` fault without an authenticated user, and an
/// `Unavailable` one when every commit attempt lost its group.
pub fn save_profile(
    auth: Option<&AuthUser>,
    form: &ProfileForm,
    store: &Datastore,
) -> Result<Profile> {
    let request_id = RequestId::new();
    log_op_start!("save_profile", request_id = %request_id);
    let start = Instant::now();

    let result = (|| -> Result<Profile> {
        let caller = resolve_caller(store, auth)?;
        let profile = with_retries("save_profile", COMMIT_ATTEMPTS, || {
            ops::save_profile(store, &caller, form)
        })?;
        Ok(profile)
    })();

    let duration_ms = start.elapsed().as_millis() as u64;
    match result {
        Ok(profile) => {
            log_op_end!("save_profile", duration_ms = duration_ms, request_id = %request_id);
            Ok(profile)
        }
        Err(fault) => {
            let fault = fault.with_request_id(request_id.clone());
            log_op_error!(
                "save_profile",
                fault.clone(),
                duration_ms = duration_ms,
                request_id = %request_id
            );
            Err(fault)
        }
    }
}
