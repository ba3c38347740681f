use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::profile::TeeShirtSize;

/// Inbound form for creating or updating a conference
///
/// Every field except `max_attendees` is optional; absent fields fall back to
/// the defaults applied by [`super::Conference::apply_form`]. `max_attendees`
/// defaults to zero when omitted, which creates a conference nobody can
/// register for until the organizer raises the capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceForm {
    /// Conference name; mandatory on both create and update
    pub name: Option<String>,

    /// Free-form description
    pub description: Option<String>,

    /// Topic tags; an empty list gets the default topics
    #[serde(default)]
    pub topics: Vec<String>,

    /// Host city; an absent city gets the default city
    pub city: Option<String>,

    /// When the conference starts
    pub start_date: Option<DateTime<Utc>>,

    /// When the conference ends
    pub end_date: Option<DateTime<Utc>>,

    /// Seat capacity
    #[serde(default)]
    pub max_attendees: u32,
}

/// Inbound form for creating or updating a profile
///
/// Both fields are optional: on update, only the fields that are present are
/// written, and on first save the absent ones get defaults derived from the
/// caller's identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<TeeShirtSize>,
}
