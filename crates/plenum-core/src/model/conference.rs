use chrono::{DateTime, Datelike, Utc};
use plenum_core_types::{ConferenceId, ConferenceKey, UserId};
use serde::{Deserialize, Serialize};

use super::forms::ConferenceForm;
use crate::errors::{ApiError, Result};

/// City used when a conference form does not name one
pub const DEFAULT_CITY: &str = "Default City";

/// Topics used when a conference form supplies none
pub const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];

/// Conference - an event with a bounded number of seats
///
/// A conference lives inside its organizer's ownership group and is keyed by
/// the (organizer, id) pair. Seat accounting is the entity's core invariant:
/// `0 <= seats_available <= max_attendees` holds after every mutation, and
/// the only way to move seats is through [`Conference::book_seat`] and
/// [`Conference::return_seat`]. `month` is a stored projection of
/// `start_date`, recomputed on every form application so the query surface
/// can filter on it without date arithmetic.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    /// Numeric id allocated under the organizer's group
    id: ConferenceId,

    /// The organizer; names the ownership group this entity lives in
    organizer_user_id: UserId,

    /// Conference name
    name: String,

    /// Free-form description
    description: Option<String>,

    /// Topic tags
    topics: Vec<String>,

    /// Host city
    city: String,

    /// When the conference starts
    start_date: Option<DateTime<Utc>>,

    /// When the conference ends
    end_date: Option<DateTime<Utc>>,

    /// Month of `start_date` (1-12), or 0 when no start date is set
    month: u32,

    /// Seat capacity
    max_attendees: u32,

    /// Seats still open for registration
    seats_available: u32,
}

impl Conference {
    /// Create a conference from a form.
    ///
    /// The id must already be allocated under the organizer's group; doing
    /// the allocation before the creating transaction keeps retries
    /// idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingConferenceName`] when the form has no name.
    pub fn create(id: ConferenceId, organizer_user_id: UserId, form: &ConferenceForm) -> Result<Self> {
        let mut conference = Self {
            id,
            organizer_user_id,
            name: String::new(),
            description: None,
            topics: Vec::new(),
            city: String::new(),
            start_date: None,
            end_date: None,
            month: 0,
            max_attendees: 0,
            seats_available: 0,
        };
        conference.apply_form(form)?;
        Ok(conference)
    }

    /// Overwrite this conference with the contents of a form.
    ///
    /// Field handling mirrors the create path: an empty topic list and an
    /// absent city fall back to defaults, description and dates are copied
    /// as-is (clearing them when absent), and `month` is recomputed from the
    /// new start date. Capacity changes keep already-allocated seats: the new
    /// availability is `max_attendees - seats_allocated`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingConferenceName`] when the form has no name,
    /// and [`ApiError::CapacityBelowAllocated`] when the form's capacity is
    /// smaller than the number of seats already handed out.
    pub fn apply_form(&mut self, form: &ConferenceForm) -> Result<()> {
        let name = form.name.as_ref().ok_or(ApiError::MissingConferenceName)?;
        self.name = name.clone();
        self.description = form.description.clone();
        self.topics = if form.topics.is_empty() {
            DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
        } else {
            form.topics.clone()
        };
        self.city = form
            .city
            .clone()
            .unwrap_or_else(|| DEFAULT_CITY.to_string());
        self.start_date = form.start_date;
        self.end_date = form.end_date;
        self.month = self.start_date.map(|d| d.month()).unwrap_or(0);

        let allocated = self.seats_allocated();
        if form.max_attendees < allocated {
            return Err(ApiError::CapacityBelowAllocated {
                conference_key: self.key().websafe(),
                requested: form.max_attendees,
                allocated,
            });
        }
        self.max_attendees = form.max_attendees;
        self.seats_available = self.max_attendees - allocated;
        Ok(())
    }

    /// Take one seat.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NoSeatsAvailable`] when the conference is sold
    /// out.
    pub fn book_seat(&mut self) -> Result<()> {
        if self.seats_available == 0 {
            return Err(ApiError::NoSeatsAvailable {
                conference_key: self.key().websafe(),
            });
        }
        self.seats_available -= 1;
        Ok(())
    }

    /// Give one seat back.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SeatsExceedCapacity`] when availability is
    /// already at capacity.
    pub fn return_seat(&mut self) -> Result<()> {
        if self.seats_available >= self.max_attendees {
            return Err(ApiError::SeatsExceedCapacity {
                conference_key: self.key().websafe(),
            });
        }
        self.seats_available += 1;
        Ok(())
    }

    /// Seats already handed out
    pub fn seats_allocated(&self) -> u32 {
        self.max_attendees - self.seats_available
    }

    /// The (organizer, id) key of this conference
    pub fn key(&self) -> ConferenceKey {
        ConferenceKey::new(self.organizer_user_id.clone(), self.id)
    }

    pub fn id(&self) -> ConferenceId {
        self.id
    }

    pub fn organizer_user_id(&self) -> &UserId {
        &self.organizer_user_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Read-only view of the topic tags
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Month of the start date (1-12), 0 when no start date is set
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn max_attendees(&self) -> u32 {
        self.max_attendees
    }

    pub fn seats_available(&self) -> u32 {
        self.seats_available
    }

    /// Flatten into the column-shaped record the store persists
    pub fn to_record(&self) -> ConferenceRecord {
        ConferenceRecord {
            id: self.id.value(),
            organizer_user_id: self.organizer_user_id.as_str().to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            topics: self.topics.clone(),
            city: self.city.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            month: self.month,
            max_attendees: self.max_attendees,
            seats_available: self.seats_available,
        }
    }

    /// Rebuild a conference from its stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::SeatInvariantBroken`] when the stored seat counts
    /// violate `seats_available <= max_attendees`.
    pub fn from_record(record: ConferenceRecord) -> Result<Self> {
        if record.seats_available > record.max_attendees {
            let key = ConferenceKey::new(
                UserId::new(record.organizer_user_id.clone()),
                ConferenceId::new(record.id),
            );
            return Err(ApiError::SeatInvariantBroken {
                conference_key: key.websafe(),
                seats_available: record.seats_available,
                max_attendees: record.max_attendees,
            });
        }
        Ok(Self {
            id: ConferenceId::new(record.id),
            organizer_user_id: UserId::new(record.organizer_user_id),
            name: record.name,
            description: record.description,
            topics: record.topics,
            city: record.city,
            start_date: record.start_date,
            end_date: record.end_date,
            month: record.month,
            max_attendees: record.max_attendees,
            seats_available: record.seats_available,
        })
    }
}

/// Column-shaped persistence record for [`Conference`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConferenceRecord {
    pub id: i64,
    pub organizer_user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub topics: Vec<String>,
    pub city: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub month: u32,
    pub max_attendees: u32,
    pub seats_available: u32,
}
