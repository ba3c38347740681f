//! Conference create, update, and listing operations

use plenum_core_types::{ConferenceId, ConferenceKey};

use crate::errors::{ApiError, Result};
use crate::model::{CallerIdentity, Conference, ConferenceForm, Profile};
use crate::store::{ConfirmationTask, Datastore, TxCommit};

/// Create a conference under the caller's ownership group.
///
/// The id must already be allocated, outside any retry loop, so a retried
/// attempt writes the same entity it wrote before instead of a fresh one.
/// The transaction saves the conference and the caller's profile together
/// (creating the default profile if the caller never saved one) and queues
/// the confirmation email task, which the commit releases to the caller.
///
/// # Errors
///
/// Returns [`ApiError::MissingConferenceName`] for a form without a name,
/// and [`ApiError::DatastoreContention`] when the commit loses its group.
pub fn create_conference(
    store: &Datastore,
    caller: &CallerIdentity,
    id: ConferenceId,
    form: &ConferenceForm,
) -> Result<TxCommit<Conference>> {
    store.run_in_transaction(&[caller.user_id.clone()], |txn| {
        let conference = Conference::create(id, caller.user_id.clone(), form)?;
        let profile = txn
            .get_profile(&caller.user_id)
            .unwrap_or_else(|| Profile::default_for(caller.user_id.clone(), &caller.email));

        txn.put_conference(conference.clone())?;
        txn.put_profile(profile)?;
        txn.add_task(ConfirmationTask {
            organizer_email: caller.email.clone(),
            conference_name: conference.name().to_string(),
            conference_key: conference.key(),
        });
        Ok(conference)
    })
}

/// Update a conference from a form.
///
/// Only the organizer may update, and only when their profile exists. The
/// existence check runs before the ownership check so a missing conference
/// reports not-found rather than forbidden.
///
/// # Errors
///
/// Returns [`ApiError::ConferenceNotFound`] when the key does not resolve,
/// [`ApiError::NotOrganizer`] when the caller is not the organizer or has no
/// profile, and [`ApiError::CapacityBelowAllocated`] when the new capacity
/// is below the seats already handed out.
pub fn update_conference(
    store: &Datastore,
    caller: &CallerIdentity,
    key: &ConferenceKey,
    form: &ConferenceForm,
) -> Result<TxCommit<Conference>> {
    let groups = [caller.user_id.clone(), key.owner().clone()];
    store.run_in_transaction(&groups, |txn| {
        let mut conference =
            txn.get_conference(key)
                .ok_or_else(|| ApiError::ConferenceNotFound {
                    conference_key: key.websafe(),
                })?;

        let profile = txn.get_profile(&caller.user_id);
        if profile.is_none() || conference.organizer_user_id() != &caller.user_id {
            return Err(ApiError::NotOrganizer {
                conference_key: key.websafe(),
            });
        }

        conference.apply_form(form)?;
        txn.put_conference(conference.clone())?;
        Ok(conference)
    })
}

/// Get a conference by key. No authorization; conference listings are
/// public.
///
/// # Errors
///
/// Returns [`ApiError::ConferenceNotFound`] when the key does not resolve.
pub fn get_conference(store: &Datastore, key: &ConferenceKey) -> Result<Conference> {
    store
        .get_conference(key)
        .ok_or_else(|| ApiError::ConferenceNotFound {
            conference_key: key.websafe(),
        })
}

/// All conferences the caller organizes, ordered by name
pub fn conferences_created_by(store: &Datastore, caller: &CallerIdentity) -> Vec<Conference> {
    let mut conferences = store.conferences_by_organizer(&caller.user_id);
    conferences.sort_by(|a, b| a.name().cmp(b.name()).then_with(|| a.id().cmp(&b.id())));
    conferences
}

/// All conferences the caller is registered for, in registration order.
///
/// Keys that no longer resolve are skipped rather than failing the whole
/// listing.
///
/// # Errors
///
/// Returns [`ApiError::ProfileNotFound`] when the caller has never saved a
/// profile.
pub fn conferences_to_attend(store: &Datastore, caller: &CallerIdentity) -> Result<Vec<Conference>> {
    let profile = store
        .get_profile(&caller.user_id)
        .ok_or_else(|| ApiError::ProfileNotFound {
            user_id: caller.user_id.as_str().to_string(),
        })?;
    Ok(store.conferences_by_keys(profile.conferences_to_attend()))
}
