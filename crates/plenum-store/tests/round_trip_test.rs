// Integration tests for round-trip determinism: run operations against a
// hydrated Datastore, persist, reload, and continue where the first session
// left off.

use plenum_core::model::{CallerIdentity, ConferenceForm};
use plenum_core::ops;
use plenum_core::store::Datastore;
use plenum_core_types::UserId;
use plenum_store::repo::hydration::{load_datastore, persist_datastore};

fn caller(id: &str) -> CallerIdentity {
    CallerIdentity::new(UserId::new(id), format!("{}@example.com", id))
}

fn form(name: &str, max_attendees: u32) -> ConferenceForm {
    ConferenceForm {
        name: Some(name.to_string()),
        max_attendees,
        ..ConferenceForm::default()
    }
}

#[test]
fn test_session_survives_persist_and_reload() {
    // Given: An on-disk database
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("plenum.db");
    let mut conn = plenum_store::db::open(&db_path).unwrap();
    plenum_store::db::configure(&conn).unwrap();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    // And: A first session that creates a conference and registers an attendee
    let organizer = caller("organizer");
    let attendee = caller("attendee");
    {
        let store = load_datastore(&conn).unwrap();
        let id = store.allocate_conference_id();
        let created = ops::create_conference(&store, &organizer, id, &form("GCP Live", 3))
            .expect("Should create conference");
        ops::register(&store, &attendee, &created.value.key()).expect("Should register");
        persist_datastore(&mut conn, &store).unwrap();
    }

    // When: A second session reloads from the same database
    let store = load_datastore(&conn).unwrap();

    // Then: The committed state is exactly what the first session left
    let conferences = store.all_conferences();
    assert_eq!(conferences.len(), 1);
    assert_eq!(conferences[0].name(), "GCP Live");
    assert_eq!(conferences[0].seats_available(), 2);

    let attending = ops::conferences_to_attend(&store, &attendee).expect("Should list attendance");
    assert_eq!(attending.len(), 1);
    assert_eq!(attending[0].name(), "GCP Live");

    // And: The organizer profile minted by the create survived too
    let organizer_profile = store.get_profile(&UserId::new("organizer")).unwrap();
    assert_eq!(organizer_profile.display_name(), "organizer");

    // And: The second session can keep registering against the reloaded state
    let second = caller("second");
    ops::register(&store, &second, &conferences[0].key()).expect("Should register after reload");
    assert_eq!(
        store.get_conference(&conferences[0].key()).unwrap().seats_available(),
        1
    );
}

#[test]
fn test_reload_is_deterministic() {
    // Given: A database with a handful of entities
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("plenum.db");
    let mut conn = plenum_store::db::open(&db_path).unwrap();
    plenum_store::db::configure(&conn).unwrap();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    let store = Datastore::new();
    let alice = caller("alice");
    let bob = caller("bob");
    for (organizer, name) in [(&alice, "Zebra Summit"), (&bob, "Alpha Days"), (&alice, "Mango Forum")] {
        let id = store.allocate_conference_id();
        ops::create_conference(&store, organizer, id, &form(name, 10))
            .expect("Should create conference");
    }
    persist_datastore(&mut conn, &store).unwrap();

    // When: We reload twice
    let store1 = load_datastore(&conn).unwrap();
    let store2 = load_datastore(&conn).unwrap();

    // Then: Both loads produce identical state
    assert_eq!(store1.all_conferences(), store2.all_conferences());
    assert_eq!(store1.all_profiles(), store2.all_profiles());
    assert_eq!(store1.next_conference_id(), store2.next_conference_id());
}

#[test]
fn test_allocation_continues_past_persisted_high_water() {
    // Given: A session that allocated ids 1..=2 and persisted
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("plenum.db");
    let mut conn = plenum_store::db::open(&db_path).unwrap();
    plenum_store::db::configure(&conn).unwrap();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    let store = Datastore::new();
    let organizer = caller("organizer");
    for name in ["First", "Second"] {
        let id = store.allocate_conference_id();
        ops::create_conference(&store, &organizer, id, &form(name, 5))
            .expect("Should create conference");
    }
    persist_datastore(&mut conn, &store).unwrap();

    // When: A later session allocates its first id
    let reloaded = load_datastore(&conn).unwrap();

    // Then: Allocation picks up past the persisted high-water mark
    assert_eq!(reloaded.allocate_conference_id().value(), 3);
}
