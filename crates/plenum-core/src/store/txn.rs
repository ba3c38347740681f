//! Ownership-group transactions
//!
//! A transaction enlists the ownership groups it will touch up front. While
//! it runs, it holds those groups' locks (acquired in sorted order), stages
//! every write in its own buffers, and sees its own staged writes before
//! committed state. On success the staged writes are applied to committed
//! state in one step; on error nothing is applied. Notification tasks added
//! during the transaction ride along and are only released to the caller on
//! commit, so a task is dispatched at most once per committed transaction
//! and never for an aborted one.
//!
//! Errors cross the transaction boundary as ordinary values: the body
//! returns `Result`, and every failure kind an operation can produce inside
//! a transaction is a variant the caller matches on.

use std::collections::BTreeMap;
use std::sync::PoisonError;

use plenum_core_types::{ConferenceKey, UserId};

use crate::errors::{ApiError, Result};
use crate::model::{Conference, Profile};

use super::Datastore;

/// Confirmation email work item, queued inside a creating transaction and
/// handed to the dispatcher only after that transaction commits
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationTask {
    pub organizer_email: String,
    pub conference_name: String,
    pub conference_key: ConferenceKey,
}

/// A committed transaction: the body's return value plus the notification
/// tasks the transaction queued
#[derive(Debug)]
pub struct TxCommit<T> {
    pub value: T,
    pub tasks: Vec<ConfirmationTask>,
}

/// Live transaction handle passed to the transaction body
#[derive(Debug)]
pub struct Txn<'a> {
    store: &'a Datastore,
    groups: Vec<UserId>,
    staged_profiles: BTreeMap<UserId, Profile>,
    staged_conferences: BTreeMap<ConferenceKey, Conference>,
    tasks: Vec<ConfirmationTask>,
}

impl Txn<'_> {
    fn in_groups(&self, group: &UserId) -> bool {
        self.groups.contains(group)
    }

    /// Read a profile, seeing this transaction's own writes first.
    ///
    /// The profile's group must be enlisted; group locks make committed
    /// state for enlisted groups stable for the life of the transaction.
    pub fn get_profile(&self, user_id: &UserId) -> Option<Profile> {
        debug_assert!(
            self.in_groups(user_id),
            "transactional read outside enlisted groups"
        );
        if let Some(profile) = self.staged_profiles.get(user_id) {
            return Some(profile.clone());
        }
        self.store.state().profiles.get(user_id).cloned()
    }

    /// Read a conference, seeing this transaction's own writes first
    pub fn get_conference(&self, key: &ConferenceKey) -> Option<Conference> {
        debug_assert!(
            self.in_groups(key.owner()),
            "transactional read outside enlisted groups"
        );
        if let Some(conference) = self.staged_conferences.get(key) {
            return Some(conference.clone());
        }
        self.store.state().conferences.get(key).cloned()
    }

    /// Stage a profile write.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::CrossGroupWrite`] if the profile's group is not
    /// enlisted in this transaction.
    pub fn put_profile(&mut self, profile: Profile) -> Result<()> {
        if !self.in_groups(profile.user_id()) {
            return Err(ApiError::CrossGroupWrite {
                entity: format!("profile:{}", profile.user_id()),
            });
        }
        self.staged_profiles.insert(profile.user_id().clone(), profile);
        Ok(())
    }

    /// Stage a conference write.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::CrossGroupWrite`] if the conference's group is
    /// not enlisted in this transaction.
    pub fn put_conference(&mut self, conference: Conference) -> Result<()> {
        if !self.in_groups(conference.organizer_user_id()) {
            return Err(ApiError::CrossGroupWrite {
                entity: format!("conference:{}", conference.key().websafe()),
            });
        }
        self.staged_conferences.insert(conference.key(), conference);
        Ok(())
    }

    /// Queue a notification task, released only if this transaction commits
    pub fn add_task(&mut self, task: ConfirmationTask) {
        self.tasks.push(task);
    }
}

impl Datastore {
    /// Run a transaction over the given ownership groups.
    ///
    /// The body stages writes on the [`Txn`] it receives and returns a value
    /// on success. All staged writes become visible atomically when the body
    /// succeeds and the commit goes through; if the body returns an error or
    /// the commit hits contention, no staged write survives.
    ///
    /// # Errors
    ///
    /// Propagates whatever error the body returns, and
    /// [`ApiError::DatastoreContention`] when the commit itself fails.
    /// Contention is the transient case callers are expected to retry.
    pub fn run_in_transaction<T, F>(&self, groups: &[UserId], body: F) -> Result<TxCommit<T>>
    where
        F: FnOnce(&mut Txn<'_>) -> Result<T>,
    {
        let mut groups: Vec<UserId> = groups.to_vec();
        groups.sort();
        groups.dedup();

        // Sorted acquisition keeps overlapping transactions deadlock-free.
        let locks: Vec<_> = groups.iter().map(|group| self.group_lock(group)).collect();
        let _guards: Vec<_> = locks
            .iter()
            .map(|lock| lock.lock().unwrap_or_else(PoisonError::into_inner))
            .collect();

        let mut txn = Txn {
            store: self,
            groups,
            staged_profiles: BTreeMap::new(),
            staged_conferences: BTreeMap::new(),
            tasks: Vec::new(),
        };
        let value = body(&mut txn)?;

        let Txn {
            groups,
            staged_profiles,
            staged_conferences,
            tasks,
            ..
        } = txn;

        if self.take_injected_commit_failure() {
            let group = groups
                .iter()
                .map(|g| g.as_str())
                .collect::<Vec<_>>()
                .join(",");
            return Err(ApiError::DatastoreContention {
                group,
                details: "commit lost the race for its entity groups".to_string(),
            });
        }

        let mut state = self.state();
        for (user_id, profile) in staged_profiles {
            state.profiles.insert(user_id, profile);
        }
        for (key, conference) in staged_conferences {
            state.conferences.insert(key, conference);
        }

        Ok(TxCommit { value, tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConferenceForm, TeeShirtSize};
    use plenum_core_types::ConferenceId;

    fn user(id: &str) -> UserId {
        UserId::new(id)
    }

    fn profile(id: &str) -> Profile {
        Profile::new(
            user(id),
            id.to_string(),
            format!("{}@example.com", id),
            TeeShirtSize::NotSpecified,
        )
    }

    fn conference(owner: &str, id: i64, seats: u32) -> Conference {
        Conference::create(
            ConferenceId::new(id),
            user(owner),
            &ConferenceForm {
                name: Some(format!("conf-{}", id)),
                max_attendees: seats,
                ..ConferenceForm::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn test_commit_applies_all_staged_writes() {
        let store = Datastore::new();
        let owner = user("owner");
        store.insert_conference(conference("owner", 1, 5));

        let key = ConferenceKey::new(owner.clone(), ConferenceId::new(1));
        let commit = store
            .run_in_transaction(&[owner.clone()], |txn| {
                let mut c = txn.get_conference(&key).unwrap();
                c.book_seat()?;
                txn.put_conference(c)?;

                let mut p = profile("owner");
                p.add_conference(key.clone());
                txn.put_profile(p)?;
                Ok(true)
            })
            .unwrap();

        assert!(commit.value);
        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 4);
        assert!(store
            .get_profile(&owner)
            .unwrap()
            .is_registered_for(&key));
    }

    #[test]
    fn test_body_error_discards_staged_writes() {
        let store = Datastore::new();
        let owner = user("owner");
        store.insert_conference(conference("owner", 1, 5));
        let key = ConferenceKey::new(owner.clone(), ConferenceId::new(1));

        let result: Result<TxCommit<()>> = store.run_in_transaction(&[owner.clone()], |txn| {
            let mut c = txn.get_conference(&key).unwrap();
            c.book_seat()?;
            txn.put_conference(c)?;
            Err(ApiError::Internal {
                message: "boom".into(),
            })
        });

        assert!(result.is_err());
        // The staged booking never landed
        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 5);
    }

    #[test]
    fn test_transaction_sees_its_own_writes() {
        let store = Datastore::new();
        let owner = user("owner");
        store.insert_conference(conference("owner", 1, 5));
        let key = ConferenceKey::new(owner.clone(), ConferenceId::new(1));

        store
            .run_in_transaction(&[owner.clone()], |txn| {
                let mut c = txn.get_conference(&key).unwrap();
                c.book_seat()?;
                txn.put_conference(c)?;

                let reread = txn.get_conference(&key).unwrap();
                assert_eq!(reread.seats_available(), 4);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_write_outside_enlisted_groups_is_rejected() {
        let store = Datastore::new();
        let result: Result<TxCommit<()>> =
            store.run_in_transaction(&[user("alice")], |txn| {
                txn.put_conference(conference("bob", 1, 5))?;
                Ok(())
            });
        assert!(matches!(
            result.unwrap_err(),
            ApiError::CrossGroupWrite { .. }
        ));
    }

    #[test]
    fn test_injected_contention_fails_commit_and_discards_writes() {
        let store = Datastore::new();
        let owner = user("owner");
        store.insert_conference(conference("owner", 1, 5));
        let key = ConferenceKey::new(owner.clone(), ConferenceId::new(1));

        store.fail_next_commits(1);
        let result: Result<TxCommit<()>> = store.run_in_transaction(&[owner.clone()], |txn| {
            let mut c = txn.get_conference(&key).unwrap();
            c.book_seat()?;
            txn.put_conference(c)?;
            Ok(())
        });

        assert!(matches!(
            result.unwrap_err(),
            ApiError::DatastoreContention { .. }
        ));
        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 5);

        // The failure was consumed; the next commit goes through
        store
            .run_in_transaction(&[owner.clone()], |txn| {
                let mut c = txn.get_conference(&key).unwrap();
                c.book_seat()?;
                txn.put_conference(c)
            })
            .unwrap();
        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 4);
    }

    #[test]
    fn test_tasks_only_released_on_commit() {
        let store = Datastore::new();
        let owner = user("owner");
        let key = ConferenceKey::new(owner.clone(), ConferenceId::new(1));
        let task = ConfirmationTask {
            organizer_email: "owner@example.com".into(),
            conference_name: "GCP Live".into(),
            conference_key: key,
        };

        let commit = store
            .run_in_transaction(&[owner.clone()], |txn| {
                txn.add_task(task.clone());
                Ok(())
            })
            .unwrap();
        assert_eq!(commit.tasks, vec![task.clone()]);

        let result: Result<TxCommit<()>> = store.run_in_transaction(&[owner.clone()], |txn| {
            txn.add_task(task.clone());
            Err(ApiError::Internal {
                message: "abort".into(),
            })
        });
        // No commit, no tasks
        assert!(result.is_err());
    }

    #[test]
    fn test_cross_group_transaction_touches_both_groups() {
        let store = Datastore::new();
        let alice = user("alice");
        let bob = user("bob");
        store.insert_conference(conference("bob", 1, 5));
        let key = ConferenceKey::new(bob.clone(), ConferenceId::new(1));

        store
            .run_in_transaction(&[alice.clone(), bob.clone()], |txn| {
                let mut c = txn.get_conference(&key).unwrap();
                c.book_seat()?;
                txn.put_conference(c)?;

                let mut p = profile("alice");
                p.add_conference(key.clone());
                txn.put_profile(p)
            })
            .unwrap();

        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 4);
        assert!(store.get_profile(&alice).unwrap().is_registered_for(&key));
    }

    #[test]
    fn test_concurrent_transactions_serialize_on_group() {
        let store = Datastore::new();
        store.insert_conference(conference("owner", 1, 64));
        let key = ConferenceKey::new(user("owner"), ConferenceId::new(1));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let key = key.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..8 {
                    store
                        .run_in_transaction(&[key.owner().clone()], |txn| {
                            let mut c = txn.get_conference(&key).unwrap();
                            c.book_seat()?;
                            txn.put_conference(c)
                        })
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 8 threads x 8 bookings against 64 seats: every booking landed
        assert_eq!(store.get_conference(&key).unwrap().seats_available(), 0);
    }
}
