//! Seed importer orchestration
//!
//! Imports seeds by building domain entities through the same form paths
//! live operations use, then persisting to SQLite

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use crate::repo::SqliteRepo;
use crate::seed::format_v0::{SeedConference, SeedProfile};
use crate::seed::{compute_seed_digest, parse_seed_file_with_db};
use plenum_core::errors::ApiFault;
use plenum_core::model::{Conference, ConferenceForm, Profile, TeeShirtSize};
use plenum_core_types::{ConferenceId, ConferenceKey, UserId};
use rusqlite::{Connection, Transaction};
use std::path::Path;

/// Import a seed file into the database
///
/// This is the main entry point for seed import. It:
/// 1. Parses and validates the seed YAML (checking the database for
///    organizers defined by earlier imports)
/// 2. Computes the seed digest
/// 3. Builds profiles and conferences through the model's own form paths
/// 4. Upserts to SQLite within one transaction, preserving attendance lists
///    and allocated seats on re-import
/// 5. Raises the allocator high-water mark past every seeded id
///
/// Returns the seed digest on success
pub fn import_seed(path: &Path, conn: &mut Connection) -> Result<String> {
    // Parse seed (pass connection to allow cross-seed organizer validation)
    let seed = parse_seed_file_with_db(path, Some(conn))?;

    // Compute seed digest
    let seed_digest = compute_seed_digest(&seed);

    // Start transaction
    let tx = conn.transaction().map_err(crate::errors::from_rusqlite)?;

    // Profiles first so conference organizer references resolve
    for seed_profile in &seed.profiles {
        let profile = build_profile(&tx, seed_profile)?;
        SqliteRepo::persist_profile_tx(&tx, &profile)?;
    }

    let mut id_floor = 0;
    for seed_conference in &seed.conferences {
        let conference = build_conference(&tx, seed_conference)?;
        SqliteRepo::persist_conference_tx(&tx, &conference)?;
        id_floor = id_floor.max(seed_conference.id);
    }

    // Keep live allocation clear of seeded ids
    if id_floor > 0 {
        SqliteRepo::raise_allocator_high_water_tx(&tx, id_floor + 1)?;
    }

    // Commit transaction
    tx.commit().map_err(crate::errors::from_rusqlite)?;

    tracing::info!(
        digest = %seed_digest,
        profiles = seed.profiles.len(),
        conferences = seed.conferences.len(),
        "seed imported"
    );

    Ok(seed_digest)
}

/// Build the profile a seed entry describes.
///
/// A fresh profile takes the seed fields with the usual defaults (display
/// name from the email local part, size not specified). When the profile
/// already exists in the database, its attendance list is carried over so a
/// re-import cannot strand registrations.
fn build_profile(tx: &Transaction, seed_profile: &SeedProfile) -> Result<Profile> {
    let user_id = UserId::new(seed_profile.user_id.clone());

    let display_name = seed_profile.display_name.clone().unwrap_or_else(|| {
        seed_profile
            .main_email
            .split('@')
            .next()
            .unwrap_or(&seed_profile.main_email)
            .to_string()
    });
    let tee_shirt_size = match &seed_profile.tee_shirt_size {
        // The parser has already validated the wire name
        Some(size) => size.parse::<TeeShirtSize>().map_err(ApiFault::from)?,
        None => TeeShirtSize::NotSpecified,
    };

    let mut profile = Profile::new(
        user_id.clone(),
        display_name,
        seed_profile.main_email.clone(),
        tee_shirt_size,
    );

    if let Some(existing) = SqliteRepo::get_profile(tx, &user_id)? {
        for key in existing.conferences_to_attend() {
            profile.add_conference(key.clone());
        }
    }

    Ok(profile)
}

/// Build the conference a seed entry describes.
///
/// The seed fields go through [`ConferenceForm`] so defaults and the month
/// projection come out exactly as a live create would produce them. A
/// conference that already exists is updated through the same form overlay,
/// which keeps its allocated seats and enforces the capacity rule.
fn build_conference(tx: &Transaction, seed_conference: &SeedConference) -> Result<Conference> {
    let organizer = UserId::new(seed_conference.organizer_user_id.clone());
    let id = ConferenceId::new(seed_conference.id);
    let form = ConferenceForm {
        name: Some(seed_conference.name.clone()),
        description: seed_conference.description.clone(),
        topics: seed_conference.topics.clone(),
        city: seed_conference.city.clone(),
        start_date: seed_conference.start_date,
        end_date: seed_conference.end_date,
        max_attendees: seed_conference.max_attendees,
    };

    let key = ConferenceKey::new(organizer.clone(), id);
    match SqliteRepo::get_conference(tx, &key)? {
        Some(mut existing) => {
            existing.apply_form(&form).map_err(ApiFault::from)?;
            Ok(existing)
        }
        None => Conference::create(id, organizer, &form).map_err(ApiFault::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrations;
    use std::path::PathBuf;

    fn setup_test_db() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migrations::apply_migrations(&mut conn).unwrap();
        conn
    }

    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
    }

    #[test]
    fn test_import_minimal_seed() {
        let mut conn = setup_test_db();
        let path = fixtures_dir().join("seed_minimal.yaml");

        let result = import_seed(&path, &mut conn);
        assert!(result.is_ok(), "Import should succeed: {:?}", result.err());

        let profile_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profile_count, 1);

        let conference_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conferences", [], |row| row.get(0))
            .unwrap();
        assert_eq!(conference_count, 1);
    }

    #[test]
    fn test_import_raises_allocator_high_water() {
        let mut conn = setup_test_db();
        let path = fixtures_dir().join("seed_full.yaml");

        import_seed(&path, &mut conn).unwrap();

        // seed_full's highest conference id is 4
        let next = SqliteRepo::allocator_high_water(&conn).unwrap();
        assert_eq!(next, 5);
    }

    #[test]
    fn test_import_failure_rolls_back() {
        let mut conn = setup_test_db();
        let path = fixtures_dir().join("seed_invalid_duplicate_id.yaml");

        let result = import_seed(&path, &mut conn);
        assert!(result.is_err(), "Import should fail on invalid seed");

        let profile_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))
            .unwrap();
        assert_eq!(profile_count, 0, "Rollback should remove all changes");
    }

    #[test]
    fn test_reimport_is_idempotent() {
        let mut conn = setup_test_db();
        let path = fixtures_dir().join("seed_full.yaml");

        let digest1 = import_seed(&path, &mut conn).unwrap();
        let digest2 = import_seed(&path, &mut conn).unwrap();
        assert_eq!(digest1, digest2);

        let conference_count: i64 = conn
            .query_row("SELECT COUNT(*) FROM conferences", [], |row| row.get(0))
            .unwrap();
        assert_eq!(conference_count, 4, "Re-import should upsert, not duplicate");
    }
}
