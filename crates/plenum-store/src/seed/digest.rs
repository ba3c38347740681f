//! Seed digest canonicalization
//!
//! Computes stable SHA256 digests of seeds for reproducibility

use crate::seed::format_v0::{SeedConference, SeedProfile, SeedV0};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Canonical representation of a seed for digest calculation
#[derive(Debug, Clone, Serialize)]
struct CanonicalSeed {
    schema_version: u32,
    profiles: Vec<CanonicalProfile>,
    conferences: Vec<CanonicalConference>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalProfile {
    user_id: String,
    display_name: Option<String>,
    main_email: String,
    tee_shirt_size: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq, PartialOrd, Ord)]
struct CanonicalConference {
    organizer_user_id: String,
    id: i64,
    name: String,
    description: Option<String>,
    topics: Vec<String>,
    city: Option<String>,
    start_date: Option<i64>,
    end_date: Option<i64>,
    max_attendees: u32,
}

/// Compute a stable digest for a seed
///
/// Returns a SHA256 hex digest of the canonicalized seed representation, so
/// reformatting or reordering a seed file does not change its identity.
pub fn compute_seed_digest(seed: &SeedV0) -> String {
    // Canonicalize seed
    let canonical = canonicalize_seed(seed);

    // Serialize to JSON with stable field order
    let json = serde_json::to_string(&canonical).expect("Failed to serialize canonical seed");

    // Compute SHA256 digest
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    let result = hasher.finalize();

    hex::encode(result)
}

/// Canonicalize a seed for deterministic digest calculation
fn canonicalize_seed(seed: &SeedV0) -> CanonicalSeed {
    // Sort profiles by user id
    let mut profiles: Vec<CanonicalProfile> =
        seed.profiles.iter().map(canonicalize_profile).collect();
    profiles.sort_by(|a, b| a.user_id.cmp(&b.user_id));

    // Sort conferences by (organizer, id)
    let mut conferences: Vec<CanonicalConference> = seed
        .conferences
        .iter()
        .map(canonicalize_conference)
        .collect();
    conferences.sort();

    CanonicalSeed {
        schema_version: seed.schema_version,
        profiles,
        conferences,
    }
}

fn canonicalize_profile(profile: &SeedProfile) -> CanonicalProfile {
    CanonicalProfile {
        user_id: profile.user_id.clone(),
        display_name: profile.display_name.clone(),
        main_email: profile.main_email.clone(),
        tee_shirt_size: profile.tee_shirt_size.clone(),
    }
}

/// Dates canonicalize to unix timestamps so equivalent RFC 3339 spellings
/// digest identically
fn canonicalize_conference(conference: &SeedConference) -> CanonicalConference {
    CanonicalConference {
        organizer_user_id: conference.organizer_user_id.clone(),
        id: conference.id,
        name: conference.name.clone(),
        description: conference.description.clone(),
        topics: conference.topics.clone(),
        city: conference.city.clone(),
        start_date: conference.start_date.map(|d| d.timestamp()),
        end_date: conference.end_date.map(|d| d.timestamp()),
        max_attendees: conference.max_attendees,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::parser::parse_seed_str;

    #[test]
    fn test_seed_digest_stable() {
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

        let seed1 = parse_seed_str(yaml).unwrap();
        let seed2 = parse_seed_str(yaml).unwrap();

        let digest1 = compute_seed_digest(&seed1);
        let digest2 = compute_seed_digest(&seed2);

        assert_eq!(digest1, digest2);
        assert_eq!(digest1.len(), 64); // SHA256 is 64 hex chars
    }

    #[test]
    fn test_seed_digest_format_independent() {
        // Same content, different whitespace and quoting
        let yaml1 = r#"
schema_version: 0
profiles:
  - user_id: u-alice
    main_email: "alice@example.com"
conferences: []
"#;

        let yaml2 = r#"
schema_version: 0
profiles:
    - user_id: "u-alice"
      main_email: alice@example.com
conferences: []
"#;

        let seed1 = parse_seed_str(yaml1).unwrap();
        let seed2 = parse_seed_str(yaml2).unwrap();

        let digest1 = compute_seed_digest(&seed1);
        let digest2 = compute_seed_digest(&seed2);

        assert_eq!(digest1, digest2, "Digests should be format-independent");
    }

    #[test]
    fn test_seed_digest_stable_with_sorting() {
        // Conferences in different order should produce the same digest
        let yaml1 = r#"
schema_version: 0
profiles:
  - user_id: u-a
    main_email: "a@example.com"
conferences:
  - id: 1
    organizer_user_id: u-a
    name: "Alpha"
    max_attendees: 10
  - id: 2
    organizer_user_id: u-a
    name: "Beta"
    max_attendees: 20
"#;

        let yaml2 = r#"
schema_version: 0
profiles:
  - user_id: u-a
    main_email: "a@example.com"
conferences:
  - id: 2
    organizer_user_id: u-a
    name: "Beta"
    max_attendees: 20
  - id: 1
    organizer_user_id: u-a
    name: "Alpha"
    max_attendees: 10
"#;

        let seed1 = parse_seed_str(yaml1).unwrap();
        let seed2 = parse_seed_str(yaml2).unwrap();

        let digest1 = compute_seed_digest(&seed1);
        let digest2 = compute_seed_digest(&seed2);

        assert_eq!(
            digest1, digest2,
            "Digest should be stable regardless of conference order"
        );
    }

    #[test]
    fn test_seed_digest_tracks_content() {
        let yaml1 = r#"
schema_version: 0
profiles:
  - user_id: u-a
    main_email: "a@example.com"
conferences: []
"#;

        let yaml2 = r#"
schema_version: 0
profiles:
  - user_id: u-a
    main_email: "a@other.example.com"
conferences: []
"#;

        let seed1 = parse_seed_str(yaml1).unwrap();
        let seed2 = parse_seed_str(yaml2).unwrap();

        assert_ne!(compute_seed_digest(&seed1), compute_seed_digest(&seed2));
    }
}
