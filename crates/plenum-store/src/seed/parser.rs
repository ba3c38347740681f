//! Seed parser with validation
//!
//! Parses YAML and validates schema version, uniqueness, and referential
//! integrity

#![allow(clippy::result_large_err)]

use crate::errors::{seed_validation, Result};
use crate::seed::format_v0::SeedV0;
use plenum_core::model::TeeShirtSize;
use rusqlite::Connection;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a seed file from a path
pub fn parse_seed_file(path: &Path) -> Result<SeedV0> {
    parse_seed_file_with_db(path, None)
}

/// Parse a seed file from a path with optional database context for
/// cross-seed organizer validation
pub fn parse_seed_file_with_db(path: &Path, conn: Option<&Connection>) -> Result<SeedV0> {
    let content = fs::read_to_string(path)
        .map_err(|e| seed_validation(&format!("Failed to read seed file: {}", e)))?;

    parse_seed_str_with_db(&content, conn)
}

/// Parse a seed from a string
pub fn parse_seed_str(content: &str) -> Result<SeedV0> {
    parse_seed_str_with_db(content, None)
}

/// Parse a seed from a string with optional database context for cross-seed
/// organizer validation
pub fn parse_seed_str_with_db(content: &str, conn: Option<&Connection>) -> Result<SeedV0> {
    // Parse YAML
    let seed: SeedV0 = serde_yaml::from_str(content)
        .map_err(|e| seed_validation(&format!("YAML parse error: {}", e)))?;

    // Validate seed
    validate_seed(&seed, conn)?;

    Ok(seed)
}

/// Validate a parsed seed
fn validate_seed(seed: &SeedV0, conn: Option<&Connection>) -> Result<()> {
    // Validate schema version
    if seed.schema_version != 0 {
        return Err(seed_validation(&format!(
            "Unsupported schema_version: {}. Expected 0",
            seed.schema_version
        )));
    }

    // Validate profile uniqueness and field quality
    let mut profile_ids = HashSet::new();
    for profile in &seed.profiles {
        if !profile_ids.insert(&profile.user_id) {
            return Err(seed_validation(&format!(
                "Duplicate profile user_id: {}",
                profile.user_id
            )));
        }
        if profile.main_email.is_empty() {
            return Err(seed_validation(&format!(
                "Profile {} has an empty main_email",
                profile.user_id
            )));
        }
        if let Some(size) = &profile.tee_shirt_size {
            if size.parse::<TeeShirtSize>().is_err() {
                return Err(seed_validation(&format!(
                    "Unknown tee shirt size {} for profile {}",
                    size, profile.user_id
                )));
            }
        }
    }

    // Validate conference ids and uniqueness
    let mut conference_ids = HashSet::new();
    for conference in &seed.conferences {
        if conference.id < 1 {
            return Err(seed_validation(&format!(
                "Conference id must be positive, got {}",
                conference.id
            )));
        }
        if !conference_ids.insert((&conference.organizer_user_id, conference.id)) {
            return Err(seed_validation(&format!(
                "Duplicate conference id {} for organizer {}",
                conference.id, conference.organizer_user_id
            )));
        }
        if conference.name.is_empty() {
            return Err(seed_validation(&format!(
                "Conference {} has an empty name",
                conference.id
            )));
        }

        // Check the organizer exists (check database when available)
        if !profile_ids.contains(&conference.organizer_user_id) {
            let in_db = conn.is_some_and(|conn| {
                conn.query_row(
                    "SELECT 1 FROM profiles WHERE user_id = ?1",
                    [&conference.organizer_user_id],
                    |_| Ok(true),
                )
                .unwrap_or(false)
            });

            if !in_db {
                return Err(seed_validation(&format!(
                    "Conference references non-existent organizer profile: {}",
                    conference.organizer_user_id
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_seed() {
        let yaml = r#"
schema_version: 0
profiles:
  - user_id: u-alice
    main_email: "alice@example.com"
conferences:
  - id: 1
    organizer_user_id: u-alice
    name: "GCP Live"
    max_attendees: 500
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_ok());
    }

    #[test]
    fn test_reject_invalid_schema_version() {
        let yaml = r#"
schema_version: 99
profiles: []
conferences: []
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("schema_version"));
    }

    #[test]
    fn test_reject_duplicate_profiles() {
        let yaml = r#"
schema_version: 0
profiles:
  - user_id: u-alice
    main_email: "alice@example.com"
  - user_id: u-alice
    main_email: "alice@elsewhere.example.com"
conferences: []
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate profile"));
    }

    #[test]
    fn test_reject_duplicate_conference_ids() {
        let yaml = r#"
schema_version: 0
profiles:
  - user_id: u-alice
    main_email: "alice@example.com"
conferences:
  - id: 1
    organizer_user_id: u-alice
    name: "First"
    max_attendees: 10
  - id: 1
    organizer_user_id: u-alice
    name: "Second"
    max_attendees: 20
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Duplicate conference id"));
    }

    #[test]
    fn test_reject_missing_organizer() {
        let yaml = r#"
schema_version: 0
profiles: []
conferences:
  - id: 1
    organizer_user_id: u-ghost
    name: "Orphan Conf"
    max_attendees: 10
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("non-existent organizer"));
    }

    #[test]
    fn test_reject_bad_tee_shirt_size() {
        let yaml = r#"
schema_version: 0
profiles:
  - user_id: u-alice
    main_email: "alice@example.com"
    tee_shirt_size: "ENORMOUS"
conferences: []
"#;

        let result = parse_seed_str(yaml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("tee shirt size"));
    }

    #[test]
    fn test_db_context_resolves_known_organizer() {
        let mut conn = Connection::open_in_memory().unwrap();
        crate::migrations::apply_migrations(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO profiles (user_id, display_name, main_email, tee_shirt_size, conference_keys_json, updated_at)
             VALUES ('u-db', 'Db User', 'db@example.com', 'NOT_SPECIFIED', '[]', 0)",
            [],
        )
        .unwrap();

        let yaml = r#"
schema_version: 0
profiles: []
conferences:
  - id: 1
    organizer_user_id: u-db
    name: "Known Organizer Conf"
    max_attendees: 10
"#;

        // Without the database the organizer is unknown
        assert!(parse_seed_str(yaml).is_err());
        // With it, validation passes
        assert!(parse_seed_str_with_db(yaml, Some(&conn)).is_ok());
    }
}
