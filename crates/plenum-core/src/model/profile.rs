use plenum_core_types::{ConferenceKey, UserId};
use serde::{Deserialize, Serialize};

use super::forms::ProfileForm;
use crate::errors::{ApiError, Result};

/// T-shirt size recorded on a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeeShirtSize {
    #[default]
    NotSpecified,
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
    Xxxl,
}

impl TeeShirtSize {
    /// Stable wire name, as stored and as spoken by clients
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeShirtSize::NotSpecified => "NOT_SPECIFIED",
            TeeShirtSize::Xs => "XS",
            TeeShirtSize::S => "S",
            TeeShirtSize::M => "M",
            TeeShirtSize::L => "L",
            TeeShirtSize::Xl => "XL",
            TeeShirtSize::Xxl => "XXL",
            TeeShirtSize::Xxxl => "XXXL",
        }
    }
}

impl std::str::FromStr for TeeShirtSize {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "NOT_SPECIFIED" => Ok(TeeShirtSize::NotSpecified),
            "XS" => Ok(TeeShirtSize::Xs),
            "S" => Ok(TeeShirtSize::S),
            "M" => Ok(TeeShirtSize::M),
            "L" => Ok(TeeShirtSize::L),
            "XL" => Ok(TeeShirtSize::Xl),
            "XXL" => Ok(TeeShirtSize::Xxl),
            "XXXL" => Ok(TeeShirtSize::Xxxl),
            other => Err(ApiError::Internal {
                message: format!("unknown tee shirt size: {}", other),
            }),
        }
    }
}

impl std::fmt::Display for TeeShirtSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Profile - a user's account record and attendance list
///
/// A profile is the root of its owner's ownership group: every conference the
/// user organizes is keyed under it, and every registration transaction that
/// touches the user enlists this group. The attendance list is private;
/// callers read it through [`Profile::conferences_to_attend`] and mutate it
/// only through the registration engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identity-layer user id; also the ownership group name
    user_id: UserId,

    /// Name shown to other attendees
    display_name: String,

    /// Contact email
    main_email: String,

    /// T-shirt size for conference swag
    tee_shirt_size: TeeShirtSize,

    /// Keys of the conferences this user is registered for
    conference_keys_to_attend: Vec<ConferenceKey>,
}

impl Profile {
    /// Create a profile with explicit field values
    pub fn new(
        user_id: UserId,
        display_name: String,
        main_email: String,
        tee_shirt_size: TeeShirtSize,
    ) -> Self {
        Self {
            user_id,
            display_name,
            main_email,
            tee_shirt_size,
            conference_keys_to_attend: Vec::new(),
        }
    }

    /// Create the default profile minted the first time a caller shows up
    /// without one: display name is the local part of the email, size is
    /// not specified, attendance list is empty.
    pub fn default_for(user_id: UserId, email: &str) -> Self {
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        Self::new(
            user_id,
            display_name,
            email.to_string(),
            TeeShirtSize::NotSpecified,
        )
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn main_email(&self) -> &str {
        &self.main_email
    }

    pub fn tee_shirt_size(&self) -> TeeShirtSize {
        self.tee_shirt_size
    }

    /// Read-only view of the attendance list, in registration order
    pub fn conferences_to_attend(&self) -> &[ConferenceKey] {
        &self.conference_keys_to_attend
    }

    /// Whether this user is on the attendee list of the given conference
    pub fn is_registered_for(&self, key: &ConferenceKey) -> bool {
        self.conference_keys_to_attend.contains(key)
    }

    /// Append a conference to the attendance list. The registration engine
    /// checks membership first; this method does not deduplicate.
    pub fn add_conference(&mut self, key: ConferenceKey) {
        self.conference_keys_to_attend.push(key);
    }

    /// Remove a conference from the attendance list. Returns whether the
    /// key was present.
    pub fn remove_conference(&mut self, key: &ConferenceKey) -> bool {
        let before = self.conference_keys_to_attend.len();
        self.conference_keys_to_attend.retain(|k| k != key);
        self.conference_keys_to_attend.len() < before
    }

    /// Apply a partial update: only the fields present in the form are
    /// written, the rest keep their current values.
    pub fn apply_update(&mut self, form: &ProfileForm) {
        if let Some(display_name) = &form.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(tee_shirt_size) = form.tee_shirt_size {
            self.tee_shirt_size = tee_shirt_size;
        }
    }

    /// Flatten into the column-shaped record the store persists
    pub fn to_record(&self) -> ProfileRecord {
        ProfileRecord {
            user_id: self.user_id.as_str().to_string(),
            display_name: self.display_name.clone(),
            main_email: self.main_email.clone(),
            tee_shirt_size: self.tee_shirt_size.as_str().to_string(),
            conference_keys_to_attend: self
                .conference_keys_to_attend
                .iter()
                .map(|k| k.websafe())
                .collect(),
        }
    }

    /// Rebuild a profile from its stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored tee shirt size is unknown or any
    /// stored attendance key fails to decode.
    pub fn from_record(record: ProfileRecord) -> Result<Self> {
        let tee_shirt_size: TeeShirtSize = record.tee_shirt_size.parse()?;
        let mut conference_keys_to_attend = Vec::with_capacity(record.conference_keys_to_attend.len());
        for raw in &record.conference_keys_to_attend {
            let key = ConferenceKey::from_websafe(raw).map_err(|_| ApiError::InvalidKey {
                key: raw.clone(),
            })?;
            conference_keys_to_attend.push(key);
        }
        Ok(Self {
            user_id: UserId::new(record.user_id),
            display_name: record.display_name,
            main_email: record.main_email,
            tee_shirt_size,
            conference_keys_to_attend,
        })
    }
}

/// Column-shaped persistence record for [`Profile`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
    pub conference_keys_to_attend: Vec<String>,
}
