//! Store-wide consistency checks
//!
//! The operations in this crate preserve these invariants transaction by
//! transaction; the checks here exist for data that arrived some other way,
//! like imported seed files or a database edited by hand. They scan the
//! whole store and report findings instead of failing on the first one.

use std::collections::HashMap;

use plenum_core_types::ConferenceKey;

use crate::store::Datastore;

/// A conference whose stored seat counts are impossible
#[derive(Debug, Clone, PartialEq)]
pub struct SeatBreach {
    pub conference_key: ConferenceKey,
    pub seats_available: u32,
    pub max_attendees: u32,
}

/// A profile attendance entry pointing at a conference that does not exist
#[derive(Debug, Clone, PartialEq)]
pub struct DanglingAttendance {
    pub user_id: String,
    pub conference_key: ConferenceKey,
}

/// A conference whose allocated seats disagree with the number of profiles
/// actually registered for it
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationMismatch {
    pub conference_key: ConferenceKey,
    pub seats_allocated: u32,
    pub registered_profiles: u32,
}

/// Findings of one full consistency scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvariantReport {
    pub seat_breaches: Vec<SeatBreach>,
    pub dangling_attendance: Vec<DanglingAttendance>,
    /// Conferences whose organizer has no profile
    pub orphaned_conferences: Vec<ConferenceKey>,
    pub registration_mismatches: Vec<RegistrationMismatch>,
}

impl InvariantReport {
    pub fn is_clean(&self) -> bool {
        self.seat_breaches.is_empty()
            && self.dangling_attendance.is_empty()
            && self.orphaned_conferences.is_empty()
            && self.registration_mismatches.is_empty()
    }

    /// Total number of findings
    pub fn finding_count(&self) -> usize {
        self.seat_breaches.len()
            + self.dangling_attendance.len()
            + self.orphaned_conferences.len()
            + self.registration_mismatches.len()
    }
}

/// Scan the whole store for invariant violations.
///
/// Checks, per conference: `seats_available <= max_attendees`, the organizer
/// has a profile, and the seats handed out equal the number of profiles
/// registered. Per profile: every attendance key resolves.
pub fn check_invariants(store: &Datastore) -> InvariantReport {
    let conferences = store.all_conferences();
    let profiles = store.all_profiles();
    let mut report = InvariantReport::default();

    let mut registrations: HashMap<ConferenceKey, u32> = HashMap::new();
    for profile in &profiles {
        for key in profile.conferences_to_attend() {
            *registrations.entry(key.clone()).or_insert(0) += 1;
            if store.get_conference(key).is_none() {
                report.dangling_attendance.push(DanglingAttendance {
                    user_id: profile.user_id().as_str().to_string(),
                    conference_key: key.clone(),
                });
            }
        }
    }

    for conference in &conferences {
        let key = conference.key();
        if conference.seats_available() > conference.max_attendees() {
            report.seat_breaches.push(SeatBreach {
                conference_key: key.clone(),
                seats_available: conference.seats_available(),
                max_attendees: conference.max_attendees(),
            });
        }
        if store.get_profile(conference.organizer_user_id()).is_none() {
            report.orphaned_conferences.push(key.clone());
        }
        let registered = registrations.get(&key).copied().unwrap_or(0);
        if registered != conference.seats_allocated() {
            report.registration_mismatches.push(RegistrationMismatch {
                conference_key: key,
                seats_allocated: conference.seats_allocated(),
                registered_profiles: registered,
            });
        }
    }

    report
}
