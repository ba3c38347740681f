//! Store consistency check
//!
//! Scans the hydrated datastore for invariant violations: seat counts
//! outside their capacity bounds, attendance references to missing
//! conferences, conferences whose organizer has no profile, and seat
//! allocations that disagree with the registration lists.

use anyhow::Result;
use plenum_core::rules::check_invariants;
use plenum_store::repo::hydration::load_datastore;

use super::{open_database, Context};

pub fn execute(ctx: &Context) -> Result<()> {
    let conn = open_database(&ctx.db)?;
    let store = load_datastore(&conn)?;
    let report = check_invariants(&store);

    if report.is_clean() {
        println!(
            "Store is consistent: {} conferences, {} profiles",
            store.all_conferences().len(),
            store.all_profiles().len()
        );
        return Ok(());
    }

    for breach in &report.seat_breaches {
        println!(
            "seat breach: {} has {} seats available with capacity {}",
            breach.conference_key.websafe(),
            breach.seats_available,
            breach.max_attendees
        );
    }
    for dangling in &report.dangling_attendance {
        println!(
            "dangling attendance: profile {} references missing conference {}",
            dangling.user_id,
            dangling.conference_key.websafe()
        );
    }
    for key in &report.orphaned_conferences {
        println!(
            "orphaned conference: organizer of {} has no profile",
            key.websafe()
        );
    }
    for mismatch in &report.registration_mismatches {
        println!(
            "registration mismatch: {} has {} seats allocated but {} profiles registered",
            mismatch.conference_key.websafe(),
            mismatch.seats_allocated,
            mismatch.registered_profiles
        );
    }

    anyhow::bail!(
        "store check found {} invariant violations",
        report.finding_count()
    );
}
