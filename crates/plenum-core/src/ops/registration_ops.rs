//! Registration and unregistration

use plenum_core_types::ConferenceKey;

use crate::errors::{ApiError, Result};
use crate::model::{CallerIdentity, Profile};
use crate::store::{Datastore, TxCommit};

/// Register the caller for a conference.
///
/// One transaction spans both ownership groups involved: the attendee's
/// (profile write) and the organizer's (seat count write). Checks run in a
/// fixed order so callers see stable failures: existence, then duplicate
/// registration, then seat availability. On success the seat decrement and
/// the attendance append commit together or not at all.
///
/// # Errors
///
/// Returns [`ApiError::ConferenceNotFound`] when the key does not resolve,
/// [`ApiError::AlreadyRegistered`] when the caller is already an attendee,
/// and [`ApiError::NoSeatsAvailable`] when the conference is sold out.
pub fn register(
    store: &Datastore,
    caller: &CallerIdentity,
    key: &ConferenceKey,
) -> Result<TxCommit<bool>> {
    let groups = [caller.user_id.clone(), key.owner().clone()];
    store.run_in_transaction(&groups, |txn| {
        let mut conference =
            txn.get_conference(key)
                .ok_or_else(|| ApiError::ConferenceNotFound {
                    conference_key: key.websafe(),
                })?;

        let mut profile = txn
            .get_profile(&caller.user_id)
            .unwrap_or_else(|| Profile::default_for(caller.user_id.clone(), &caller.email));

        if profile.is_registered_for(key) {
            return Err(ApiError::AlreadyRegistered {
                conference_key: key.websafe(),
            });
        }

        conference.book_seat()?;
        profile.add_conference(key.clone());

        txn.put_conference(conference)?;
        txn.put_profile(profile)?;
        Ok(true)
    })
}

/// Unregister the caller from a conference.
///
/// A caller who is not on the attendee list gets `false` back, not an
/// error; only a key that does not resolve is an error. The asymmetry with
/// [`register`] (where a duplicate attempt is a conflict) is part of the
/// public contract. On the `false` path nothing is written, so the returned
/// seat count and attendance list are untouched.
///
/// # Errors
///
/// Returns [`ApiError::ConferenceNotFound`] when the key does not resolve.
pub fn unregister(
    store: &Datastore,
    caller: &CallerIdentity,
    key: &ConferenceKey,
) -> Result<TxCommit<bool>> {
    let groups = [caller.user_id.clone(), key.owner().clone()];
    store.run_in_transaction(&groups, |txn| {
        let mut conference =
            txn.get_conference(key)
                .ok_or_else(|| ApiError::ConferenceNotFound {
                    conference_key: key.websafe(),
                })?;

        let mut profile = txn
            .get_profile(&caller.user_id)
            .unwrap_or_else(|| Profile::default_for(caller.user_id.clone(), &caller.email));

        if !profile.remove_conference(key) {
            return Ok(false);
        }

        conference.return_seat()?;
        txn.put_conference(conference)?;
        txn.put_profile(profile)?;
        Ok(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Conference, ConferenceForm};
    use crate::ops::create_conference;
    use plenum_core_types::{ConferenceId, UserId};

    fn caller(id: &str) -> CallerIdentity {
        CallerIdentity::new(UserId::new(id), format!("{}@example.com", id))
    }

    fn create(store: &Datastore, organizer: &CallerIdentity, seats: u32) -> Conference {
        let id = store.allocate_conference_id();
        create_conference(
            store,
            organizer,
            id,
            &ConferenceForm {
                name: Some("GCP Live".into()),
                max_attendees: seats,
                ..ConferenceForm::default()
            },
        )
        .unwrap()
        .value
    }

    #[test]
    fn test_register_books_seat_and_appends_attendance() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 2);
        let attendee = caller("attendee");

        let commit = register(&store, &attendee, &conference.key()).unwrap();
        assert!(commit.value);
        assert!(commit.tasks.is_empty());

        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            1
        );
        let profile = store.get_profile(&attendee.user_id).unwrap();
        assert!(profile.is_registered_for(&conference.key()));
    }

    #[test]
    fn test_register_unknown_key_is_not_found() {
        let store = Datastore::new();
        let key = ConferenceKey::new(UserId::new("owner"), ConferenceId::new(404));
        let err = register(&store, &caller("attendee"), &key).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("No Conference found with key: {}", key.websafe())
        );
    }

    #[test]
    fn test_register_twice_is_conflict() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 5);
        let attendee = caller("attendee");

        register(&store, &attendee, &conference.key()).unwrap();
        let err = register(&store, &attendee, &conference.key()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "You have already registered for this conference"
        );
        // The failed attempt did not touch the seat count
        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            4
        );
    }

    #[test]
    fn test_register_sold_out_is_conflict_and_writes_nothing() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 1);
        register(&store, &caller("first"), &conference.key()).unwrap();

        let second = caller("second");
        let err = register(&store, &second, &conference.key()).unwrap_err();
        assert_eq!(err.to_string(), "There are no seats available.");
        assert!(store.get_profile(&second.user_id).is_none());
    }

    #[test]
    fn test_unregister_returns_seat() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 1);
        let attendee = caller("attendee");
        register(&store, &attendee, &conference.key()).unwrap();

        let commit = unregister(&store, &attendee, &conference.key()).unwrap();
        assert!(commit.value);
        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            1
        );
        assert!(!store
            .get_profile(&attendee.user_id)
            .unwrap()
            .is_registered_for(&conference.key()));
    }

    #[test]
    fn test_unregister_non_member_is_false_not_error() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 1);
        let stranger = caller("stranger");

        let commit = unregister(&store, &stranger, &conference.key()).unwrap();
        assert!(!commit.value);

        // Nothing was written on the false path
        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            1
        );
        assert!(store.get_profile(&stranger.user_id).is_none());
    }

    #[test]
    fn test_unregister_unknown_key_is_not_found() {
        let store = Datastore::new();
        let key = ConferenceKey::new(UserId::new("owner"), ConferenceId::new(404));
        let err = unregister(&store, &caller("attendee"), &key).unwrap_err();
        assert!(matches!(err, ApiError::ConferenceNotFound { .. }));
    }

    #[test]
    fn test_register_then_unregister_roundtrip_restores_seats() {
        let store = Datastore::new();
        let conference = create(&store, &caller("organizer"), 3);

        for name in ["a", "b", "c"] {
            register(&store, &caller(name), &conference.key()).unwrap();
        }
        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            0
        );

        for name in ["a", "b", "c"] {
            unregister(&store, &caller(name), &conference.key()).unwrap();
        }
        assert_eq!(
            store.get_conference(&conference.key()).unwrap().seats_available(),
            3
        );
    }
}
