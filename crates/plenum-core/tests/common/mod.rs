use chrono::{DateTime, TimeZone, Utc};
use plenum_core::{CallerIdentity, Conference, ConferenceForm, Datastore};
use plenum_core_types::UserId;

/// Create a new empty Datastore for testing
#[allow(dead_code)]
pub fn new_store() -> Datastore {
    Datastore::new()
}

/// The identity most tests act as
#[allow(dead_code)]
pub fn test_caller() -> CallerIdentity {
    CallerIdentity::new(UserId::new("123456789"), "testuser@example.com")
}

/// A caller derived from a short id, for multi-user tests
#[allow(dead_code)]
pub fn caller(id: &str) -> CallerIdentity {
    CallerIdentity::new(UserId::new(id), format!("{}@example.com", id))
}

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

/// The standard fixture form: a March conference in Mountain View
#[allow(dead_code)]
pub fn gcp_live_form() -> ConferenceForm {
    ConferenceForm {
        name: Some("GCP Live".to_string()),
        description: Some("New announcements for Google Cloud Platform".to_string()),
        topics: vec!["Google".to_string(), "Cloud".to_string(), "Platform".to_string()],
        city: Some("Mountain View".to_string()),
        start_date: Some(date(2014, 3, 25)),
        end_date: Some(date(2014, 3, 26)),
        max_attendees: 500,
    }
}

/// Create a conference through the real operation and return it
#[allow(dead_code)]
pub fn create_test_conference(
    store: &Datastore,
    organizer: &CallerIdentity,
    name: &str,
    max_attendees: u32,
) -> Conference {
    let id = store.allocate_conference_id();
    let form = ConferenceForm {
        name: Some(name.to_string()),
        max_attendees,
        ..ConferenceForm::default()
    };
    plenum_core::ops::create_conference(store, organizer, id, &form)
        .expect("Should create conference")
        .value
}
