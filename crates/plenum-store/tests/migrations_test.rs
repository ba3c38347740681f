// Integration tests for the migration framework

use rusqlite::Connection;

fn setup_test_db() -> Connection {
    Connection::open_in_memory().expect("Failed to create in-memory database")
}

fn get_table_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
        .unwrap();
    stmt.query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap()
}

#[test]
fn test_apply_migrations_on_empty_db() {
    // Given: An empty SQLite database
    let mut conn = setup_test_db();

    // When: Migrations are applied
    let result = plenum_store::migrations::apply_migrations(&mut conn);

    // Then: All migrations succeed
    assert!(
        result.is_ok(),
        "Migrations should succeed: {:?}",
        result.err()
    );

    // And: All expected tables exist
    let tables = get_table_names(&conn);
    let expected_tables = vec![
        "schema_version",
        "profiles",
        "conferences",
        "accounts",
        "allocator",
    ];

    for expected_table in &expected_tables {
        assert!(
            tables.contains(&expected_table.to_string()),
            "Missing table: {}",
            expected_table
        );
    }
}

#[test]
fn test_migrations_are_idempotent() {
    // Given: A database with migrations applied
    let mut conn = setup_test_db();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    // When: Migrations are applied a second time
    let result = plenum_store::migrations::apply_migrations(&mut conn);

    // Then: Nothing fails and each migration is recorded exactly once
    assert!(result.is_ok());
    let applied: i64 = conn
        .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
        .unwrap();
    assert_eq!(applied, 1);
}

#[test]
fn test_allocator_row_is_seeded() {
    // Given: A freshly migrated database
    let mut conn = setup_test_db();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    // Then: The allocator starts at 1
    let next: i64 = conn
        .query_row(
            "SELECT next_conference_id FROM allocator WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(next, 1);
}

#[test]
fn test_schema_version_records_checksums() {
    // Given: A migrated database
    let mut conn = setup_test_db();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    // Then: Every applied migration carries a 64-char sha256 checksum
    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_initial_schema'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64);
}

#[test]
fn test_seat_invariant_enforced_by_schema() {
    // Given: A migrated database
    let mut conn = setup_test_db();
    plenum_store::migrations::apply_migrations(&mut conn).unwrap();

    // When: A row claims more available seats than capacity
    let result = conn.execute(
        "INSERT INTO conferences (organizer_user_id, conference_id, name, topics_json, city, month, max_attendees, seats_available, updated_at)
         VALUES ('u-1', 1, 'Broken', '[]', 'Default City', 0, 10, 11, 0)",
        [],
    );

    // Then: The CHECK constraint rejects it
    assert!(result.is_err());
}
