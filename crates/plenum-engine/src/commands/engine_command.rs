//! Engine command surface
//!
//! One enum for every write the engine supports, and one entry point that
//! applies a command for a caller. Transports build an [`EngineCommand`]
//! and match on the [`EngineCommandResult`]; the orchestration itself
//! lives in the per-entity modules this one dispatches to.

#![allow(clippy::result_large_err)]

use plenum_core::model::{Conference, ConferenceForm, Profile, ProfileForm};
use plenum_core::queue::NotificationQueue;
use plenum_core::store::Datastore;

use crate::commands::{conference, profile, registration};
use crate::errors::Result;
use crate::identity::AuthUser;

/// All writes the engine can apply
#[derive(Debug, Clone)]
pub enum EngineCommand {
    /// Create or update the caller's profile from a partial form
    ProfileSave { form: ProfileForm },
    /// Create a conference under the caller's ownership group
    ConferenceCreate { form: ConferenceForm },
    /// Replace a conference the caller organizes with the form's contents
    ConferenceUpdate {
        websafe_key: String,
        form: ConferenceForm,
    },
    /// Register the caller for a conference
    Register { websafe_key: String },
    /// Unregister the caller from a conference
    Unregister { websafe_key: String },
}

/// Result of applying an engine command
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    ProfileSave(Profile),
    ConferenceCreate(Conference),
    ConferenceUpdate(Conference),
    /// Always `true`: a registration that did not happen is an error
    Register(bool),
    /// `true` when a registration was removed, `false` when the caller was
    /// not on the attendee list
    Unregister(bool),
}

/// Apply an engine command for the given caller.
///
/// Every command requires an authenticated caller. Confirmation tasks
/// released by a creating commit go to `queue` before the result returns.
///
/// # Errors
///
/// Returns the fault of the underlying operation, enriched with a request
/// id for log correlation.
pub fn apply_engine_command(
    cmd: EngineCommand,
    auth: Option<&AuthUser>,
    store: &Datastore,
    queue: &dyn NotificationQueue,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::ProfileSave { form } => {
            let saved = profile::save_profile(auth, &form, store)?;
            Ok(EngineCommandResult::ProfileSave(saved))
        }
        EngineCommand::ConferenceCreate { form } => {
            let created = conference::create_conference(auth, &form, store, queue)?;
            Ok(EngineCommandResult::ConferenceCreate(created))
        }
        EngineCommand::ConferenceUpdate { websafe_key, form } => {
            let updated = conference::update_conference(auth, &websafe_key, &form, store)?;
            Ok(EngineCommandResult::ConferenceUpdate(updated))
        }
        EngineCommand::Register { websafe_key } => {
            let registered = registration::register_for_conference(auth, &websafe_key, store)?;
            Ok(EngineCommandResult::Register(registered))
        }
        EngineCommand::Unregister { websafe_key } => {
            let removed = registration::unregister_from_conference(auth, &websafe_key, store)?;
            Ok(EngineCommandResult::Unregister(removed))
        }
    }
}
