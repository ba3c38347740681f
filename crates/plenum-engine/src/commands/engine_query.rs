//! Engine-level read-only query surface
//!
//! `apply_engine_query` is the single entry point for all reads that span
//! the identity and core layers. Unlike `apply_engine_command`, it never
//! stages a transaction, with one caveat: resolving a caller whose
//! provider supplied no stable id can mint an account mapping, and that
//! step is idempotent.

#![allow(clippy::result_large_err)]

use plenum_core::model::{Conference, Profile};
use plenum_core::ops;
use plenum_core::query::{ConferenceQuery, Filter};
use plenum_core::store::Datastore;
use plenum_core::{log_op_end, log_op_error, log_op_start};
use plenum_core_types::RequestId;

use crate::commands::decode_key;
use crate::errors::Result;
use crate::identity::{resolve_caller, AuthUser};

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    // ── Profile ──────────────────────────────────────────────────────────
    /// The caller's profile, stored or default-initialized.
    ProfileGet,

    // ── Conference ───────────────────────────────────────────────────────
    /// One conference by websafe key. No caller required; listings are
    /// public.
    ConferenceGet { websafe_key: String },
    /// Conferences the caller organizes, ordered by name.
    ConferencesCreated,
    /// Conferences the caller is registered for, in registration order.
    ConferencesToAttend,

    // ── Filtered query ───────────────────────────────────────────────────
    /// All conferences matching the filters, in query order. No caller
    /// required.
    QueryConferences { filters: Vec<Filter> },
}

/// All possible results from `apply_engine_query`.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    ProfileGet(Profile),
    ConferenceGet(Conference),
    ConferencesCreated(Vec<Conference>),
    ConferencesToAttend(Vec<Conference>),
    QueryConferences(Vec<Conference>),
}

/// Apply a read-only query for the given caller.
///
/// # Errors
///
/// Returns the fault of the underlying operation, enriched with a request
/// id for log correlation.
pub fn apply_engine_query(
    query: EngineQuery,
    auth: Option<&AuthUser>,
    store: &Datastore,
) -> Result<EngineQueryResult> {
    match query {
        // ── ProfileGet ───────────────────────────────────────────────────
        EngineQuery::ProfileGet => {
            let request_id = RequestId::new();
            log_op_start!("get_profile", request_id = %request_id);
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let caller = resolve_caller(store, auth)?;
                let profile = ops::load_or_default_profile(store, &caller);
                Ok(EngineQueryResult::ProfileGet(profile))
            })();

            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    log_op_end!("get_profile", duration_ms = duration_ms, request_id = %request_id);
                    Ok(value)
                }
                Err(fault) => {
                    let fault = fault.with_request_id(request_id.clone());
                    log_op_error!(
                        "get_profile",
                        fault.clone(),
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Err(fault)
                }
            }
        }

        // ── ConferenceGet ────────────────────────────────────────────────
        EngineQuery::ConferenceGet { websafe_key } => {
            let request_id = RequestId::new();
            log_op_start!(
                "get_conference",
                request_id = %request_id,
                conference_key = %websafe_key
            );
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let key = decode_key(&websafe_key)?;
                let conference = ops::get_conference(store, &key)?;
                Ok(EngineQueryResult::ConferenceGet(conference))
            })();

            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    log_op_end!(
                        "get_conference",
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Ok(value)
                }
                Err(fault) => {
                    let fault = fault.with_request_id(request_id.clone());
                    log_op_error!(
                        "get_conference",
                        fault.clone(),
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Err(fault)
                }
            }
        }

        // ── ConferencesCreated ───────────────────────────────────────────
        EngineQuery::ConferencesCreated => {
            let request_id = RequestId::new();
            log_op_start!("get_conferences_created", request_id = %request_id);
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let caller = resolve_caller(store, auth)?;
                let conferences = ops::conferences_created_by(store, &caller);
                Ok(EngineQueryResult::ConferencesCreated(conferences))
            })();

            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    log_op_end!(
                        "get_conferences_created",
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Ok(value)
                }
                Err(fault) => {
                    let fault = fault.with_request_id(request_id.clone());
                    log_op_error!(
                        "get_conferences_created",
                        fault.clone(),
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Err(fault)
                }
            }
        }

        // ── ConferencesToAttend ──────────────────────────────────────────
        EngineQuery::ConferencesToAttend => {
            let request_id = RequestId::new();
            log_op_start!("get_conferences_to_attend", request_id = %request_id);
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let caller = resolve_caller(store, auth)?;
                let conferences = ops::conferences_to_attend(store, &caller)?;
                Ok(EngineQueryResult::ConferencesToAttend(conferences))
            })();

            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    log_op_end!(
                        "get_conferences_to_attend",
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Ok(value)
                }
                Err(fault) => {
                    let fault = fault.with_request_id(request_id.clone());
                    log_op_error!(
                        "get_conferences_to_attend",
                        fault.clone(),
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Err(fault)
                }
            }
        }

        // ── QueryConferences ─────────────────────────────────────────────
        EngineQuery::QueryConferences { filters } => {
            let request_id = RequestId::new();
            log_op_start!(
                "query_conferences",
                request_id = %request_id,
                filter_count = filters.len()
            );
            let start = std::time::Instant::now();

            let result = (|| -> Result<EngineQueryResult> {
                let query = ConferenceQuery::build(filters)?;
                Ok(EngineQueryResult::QueryConferences(query.run(store)))
            })();

            let duration_ms = start.elapsed().as_millis() as u64;
            match result {
                Ok(value) => {
                    log_op_end!(
                        "query_conferences",
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Ok(value)
                }
                Err(fault) => {
                    let fault = fault.with_request_id(request_id.clone());
                    log_op_error!(
                        "query_conferences",
                        fault.clone(),
                        duration_ms = duration_ms,
                        request_id = %request_id
                    );
                    Err(fault)
                }
            }
        }
    }
}
