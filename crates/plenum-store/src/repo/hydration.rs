//! Hydration layer - loads persisted state into a Datastore
//!
//! Converts database rows back into domain entities with deterministic ordering

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::repo::SqliteRepo;
use plenum_core::store::Datastore;
use rusqlite::Connection;

/// Load the complete persisted state into a fresh Datastore
///
/// Profiles, conferences, and accounts load in deterministic ORDER BY order;
/// the allocator high-water mark is restored last.
pub fn load_datastore(conn: &Connection) -> Result<Datastore> {
    let store = Datastore::new();

    for profile in SqliteRepo::list_profiles(conn)? {
        store.insert_profile(profile);
    }

    for conference in SqliteRepo::list_conferences(conn)? {
        store.insert_conference(conference);
    }

    for account in SqliteRepo::list_accounts(conn)? {
        store.insert_account(account);
    }

    store.set_next_conference_id(SqliteRepo::allocator_high_water(conn)?);

    Ok(store)
}

/// Persist the complete working set of a Datastore
///
/// Upserts every profile, conference, and account plus the allocator
/// high-water mark in one transaction. Entities are never deleted in this
/// domain, so upserts cover the whole diff.
pub fn persist_datastore(conn: &mut Connection, store: &Datastore) -> Result<()> {
    let tx = conn.transaction().map_err(from_rusqlite)?;

    for profile in store.all_profiles() {
        SqliteRepo::persist_profile_tx(&tx, &profile)?;
    }

    for conference in store.all_conferences() {
        SqliteRepo::persist_conference_tx(&tx, &conference)?;
    }

    for account in store.all_accounts() {
        SqliteRepo::persist_account_tx(&tx, &account)?;
    }

    SqliteRepo::set_allocator_high_water_tx(&tx, store.next_conference_id())?;

    tx.commit().map_err(from_rusqlite)?;

    Ok(())
}
