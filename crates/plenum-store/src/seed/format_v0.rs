//! Seed Format v0 schema
//!
//! Defines the YAML structure for seed import

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level seed file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedV0 {
    /// Schema version (must be 0 for this format)
    pub schema_version: u32,

    /// Profiles to import
    #[serde(default)]
    pub profiles: Vec<SeedProfile>,

    /// Conferences to import
    #[serde(default)]
    pub conferences: Vec<SeedConference>,
}

/// Profile definition in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedProfile {
    /// Stable user id; also names the ownership group
    pub user_id: String,

    /// Display name; falls back to the email local part when omitted
    #[serde(default)]
    pub display_name: Option<String>,

    /// Contact email
    pub main_email: String,

    /// Tee shirt size wire name (XS..XXXL); NOT_SPECIFIED when omitted
    #[serde(default)]
    pub tee_shirt_size: Option<String>,
}

/// Conference definition in seed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConference {
    /// Numeric id (stable across imports)
    pub id: i64,

    /// Organizer; must resolve to a seed profile or an existing database row
    pub organizer_user_id: String,

    /// Conference name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Topic tags; an empty list takes the model defaults
    #[serde(default)]
    pub topics: Vec<String>,

    /// Host city; omitted takes the model default
    #[serde(default)]
    pub city: Option<String>,

    /// When the conference starts (RFC 3339)
    #[serde(default)]
    pub start_date: Option<DateTime<Utc>>,

    /// When the conference ends (RFC 3339)
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,

    /// Seat capacity; seeded conferences open with every seat available
    pub max_attendees: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_seed() {
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

        let seed: SeedV0 = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(seed.schema_version, 0);
        assert_eq!(seed.profiles.len(), 1);
        assert_eq!(seed.profiles[0].user_id, "u-alice");
        assert!(seed.profiles[0].display_name.is_none());
        assert_eq!(seed.conferences.len(), 1);
        assert_eq!(seed.conferences[0].id, 1);
        assert!(seed.conferences[0].topics.is_empty());
    }

    #[test]
    fn test_parse_full_conference_fields() {
        let yaml = r#"
schema_version: 0
profiles: []
conferences:
  - id: 7
    organizer_user_id: u-bob
    name: "Cloud Days"
    description: "Two days of cloud talks"
    topics: ["Cloud", "Web"]
    city: "Tokyo"
    start_date: "2014-06-10T09:00:00Z"
    end_date: "2014-06-11T17:00:00Z"
    max_attendees: 120
"#;

        let seed: SeedV0 = serde_yaml::from_str(yaml).unwrap();
        let conference = &seed.conferences[0];
        assert_eq!(conference.topics, vec!["Cloud", "Web"]);
        assert_eq!(conference.city.as_deref(), Some("Tokyo"));
        assert!(conference.start_date.is_some());
        assert_eq!(conference.max_attendees, 120);
    }

    #[test]
    fn test_sections_default_to_empty() {
        let yaml = "schema_version: 0\n";
        let seed: SeedV0 = serde_yaml::from_str(yaml).unwrap();
        assert!(seed.profiles.is_empty());
        assert!(seed.conferences.is_empty());
    }
}
