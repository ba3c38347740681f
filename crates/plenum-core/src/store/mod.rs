//! Entity storage with ownership-group transactions
//!
//! [`Datastore`] holds the committed working set: profiles, conferences, the
//! email-to-id account table, and the conference id allocator. It is cheap to
//! clone (all clones share state) and is always passed explicitly into
//! operations; nothing in this crate reaches for a global.
//!
//! Mutations of profiles and conferences go through
//! [`Datastore::run_in_transaction`], which scopes a transaction to one or
//! more ownership groups and applies its writes atomically. Plain reads
//! outside a transaction return independent copies of committed entities.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use plenum_core_types::{ConferenceId, ConferenceKey, UserId};

use crate::model::{Conference, Profile, UserAccount};

pub mod txn;

pub use txn::{ConfirmationTask, TxCommit, Txn};

/// Committed entity state, mutated only under the state lock
#[derive(Debug)]
pub(crate) struct CommittedState {
    pub(crate) profiles: BTreeMap<UserId, Profile>,
    pub(crate) conferences: BTreeMap<ConferenceKey, Conference>,
    pub(crate) accounts: BTreeMap<String, UserAccount>,
    pub(crate) next_conference_id: i64,
}

impl Default for CommittedState {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            conferences: BTreeMap::new(),
            accounts: BTreeMap::new(),
            next_conference_id: 1,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) state: Mutex<CommittedState>,
    /// One lock per ownership group; transactions acquire them in sorted
    /// order so overlapping group sets cannot deadlock.
    pub(crate) group_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    /// Countdown of commits that should fail with contention
    pub(crate) fail_commits: AtomicU32,
}

/// Shared handle to the entity store
#[derive(Debug, Clone, Default)]
pub struct Datastore {
    pub(crate) inner: Arc<Inner>,
}

impl Datastore {
    /// Create a new empty Datastore
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, CommittedState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn group_lock(&self, group: &UserId) -> Arc<Mutex<()>> {
        let mut locks = self
            .inner
            .group_locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(group.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Allocate the id for a conference that has not been created yet.
    ///
    /// Allocation is durable for the lifetime of this store and never hands
    /// the same id out twice, so a creating transaction that gets retried
    /// reuses its id instead of minting a duplicate entity.
    pub fn allocate_conference_id(&self) -> ConferenceId {
        let mut state = self.state();
        let id = state.next_conference_id;
        state.next_conference_id += 1;
        ConferenceId::new(id)
    }

    /// Get a committed conference by key, as an independent copy
    pub fn get_conference(&self, key: &ConferenceKey) -> Option<Conference> {
        self.state().conferences.get(key).cloned()
    }

    /// Get a committed profile by user id, as an independent copy
    pub fn get_profile(&self, user_id: &UserId) -> Option<Profile> {
        self.state().profiles.get(user_id).cloned()
    }

    /// Multi-get conferences in the order the keys are given, skipping keys
    /// that no longer resolve. All keys are read under one lock acquisition,
    /// so the result is a consistent snapshot.
    pub fn conferences_by_keys(&self, keys: &[ConferenceKey]) -> Vec<Conference> {
        let state = self.state();
        keys.iter()
            .filter_map(|key| state.conferences.get(key).cloned())
            .collect()
    }

    /// All conferences in one organizer's ownership group
    pub fn conferences_by_organizer(&self, organizer: &UserId) -> Vec<Conference> {
        self.state()
            .conferences
            .iter()
            .filter(|(key, _)| key.owner() == organizer)
            .map(|(_, conference)| conference.clone())
            .collect()
    }

    /// All committed conferences, in key order
    pub fn all_conferences(&self) -> Vec<Conference> {
        self.state().conferences.values().cloned().collect()
    }

    /// All committed profiles, in user id order
    pub fn all_profiles(&self) -> Vec<Profile> {
        self.state().profiles.values().cloned().collect()
    }

    /// All known accounts, in email order
    pub fn all_accounts(&self) -> Vec<UserAccount> {
        self.state().accounts.values().cloned().collect()
    }

    /// Look up the account minted for an email, creating it on first
    /// contact. The mint closure only runs when no account exists yet, and
    /// the whole step is atomic, so one email always maps to one id.
    pub fn get_or_insert_account(
        &self,
        email: &str,
        mint: impl FnOnce() -> UserAccount,
    ) -> UserAccount {
        let mut state = self.state();
        state
            .accounts
            .entry(email.to_string())
            .or_insert_with(mint)
            .clone()
    }

    /// Insert a committed profile directly, bypassing transactions.
    ///
    /// This is useful for seeding and for test setup.
    pub fn insert_profile(&self, profile: Profile) {
        let mut state = self.state();
        state.profiles.insert(profile.user_id().clone(), profile);
    }

    /// Insert a committed conference directly, bypassing transactions.
    ///
    /// This is useful for seeding and for test setup.
    pub fn insert_conference(&self, conference: Conference) {
        let mut state = self.state();
        state.conferences.insert(conference.key(), conference);
    }

    /// Insert an account directly, bypassing the mint path.
    ///
    /// This is useful for seeding and for test setup.
    pub fn insert_account(&self, account: UserAccount) {
        let mut state = self.state();
        state.accounts.insert(account.email.clone(), account);
    }

    /// Next id the allocator will hand out
    pub fn next_conference_id(&self) -> i64 {
        self.state().next_conference_id
    }

    /// Reset the allocator, used when restoring persisted state
    pub fn set_next_conference_id(&self, next: i64) {
        self.state().next_conference_id = next;
    }

    /// Make the next `count` transaction commits fail with contention.
    ///
    /// This is useful for testing retry behavior without a second writer.
    pub fn fail_next_commits(&self, count: u32) {
        self.inner.fail_commits.store(count, Ordering::SeqCst);
    }

    pub(crate) fn take_injected_commit_failure(&self) -> bool {
        self.inner
            .fail_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}
