use plenum_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the Plenum system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Caller supplied no identity
    Unauthorized,
    /// Entity does not exist
    NotFound,
    /// Caller is authenticated but lacks rights over the entity
    Forbidden,
    /// Request conflicts with current entity state
    Conflict,
    /// Request is malformed or fails validation
    InvalidArgument,
    /// Transient failure; the caller may retry
    Unavailable,
    /// Invariant breach or other defect on our side
    Internal,
    /// Durable storage failure (SQL, migration, seed import)
    Persistence,
    /// Filesystem or other I/O failure
    Io,
}

impl ApiErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ApiErrorKind::Unauthorized => "ERR_UNAUTHORIZED",
            ApiErrorKind::NotFound => "ERR_NOT_FOUND",
            ApiErrorKind::Forbidden => "ERR_FORBIDDEN",
            ApiErrorKind::Conflict => "ERR_CONFLICT",
            ApiErrorKind::InvalidArgument => "ERR_INVALID_ARGUMENT",
            ApiErrorKind::Unavailable => "ERR_UNAVAILABLE",
            ApiErrorKind::Internal => "ERR_INTERNAL",
            ApiErrorKind::Persistence => "ERR_PERSISTENCE",
            ApiErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for
/// debugging and log correlation.
#[derive(Debug, Clone)]
pub struct ApiFault {
    kind: ApiErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    user_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ApiFault>>,
}

impl ApiFault {
    /// Create a new fault with the specified kind
    pub fn new(kind: ApiErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            user_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (a websafe conference key, usually)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add user ID context
    pub fn with_user_id(mut self, id: impl Into<String>) -> Self {
        self.user_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source fault
    pub fn with_source(mut self, source: ApiFault) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the fault kind
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the user ID context, if any
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the fault message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source fault, if any
    pub fn source_fault(&self) -> Option<&ApiFault> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ApiFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(user_id) = &self.user_id {
            write!(f, " (user_id: {})", user_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Comprehensive error taxonomy for Plenum operations
///
/// Message texts on the conflict and not-found variants are part of the API
/// surface and are asserted on by clients; change them deliberately.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    // ===== Auth Errors =====
    /// Caller presented no identity
    #[error("Authorization required")]
    Unauthorized,

    /// Caller is not the organizer of the conference
    #[error("Only the owner can update the conference.")]
    NotOrganizer { conference_key: String },

    // ===== Lookup Errors =====
    /// Conference not found for the given websafe key
    #[error("No Conference found with key: {conference_key}")]
    ConferenceNotFound { conference_key: String },

    /// Profile has never been saved for this user
    #[error("Profile doesn't exist.")]
    ProfileNotFound { user_id: String },

    // ===== Registration Conflicts =====
    /// User is already on the attendee list
    #[error("You have already registered for this conference")]
    AlreadyRegistered { conference_key: String },

    /// Conference is sold out
    #[error("There are no seats available.")]
    NoSeatsAvailable { conference_key: String },

    /// Returning seats would push availability past capacity
    #[error("The number of seats would exceed the capacity.")]
    SeatsExceedCapacity { conference_key: String },

    /// Capacity cannot shrink below the seats already handed out
    #[error("{allocated} seats are already allocated, but you tried to set maxAttendees to {requested}")]
    CapacityBelowAllocated {
        conference_key: String,
        requested: u32,
        allocated: u32,
    },

    // ===== Validation Errors =====
    /// Conference form is missing the mandatory name
    #[error("The name is required")]
    MissingConferenceName,

    /// A websafe conference key failed to decode
    #[error("Invalid conference key: {key}")]
    InvalidKey { key: String },

    /// Query uses inequality operators on more than one field
    #[error("Inequality filter is allowed on only one field.")]
    MultipleInequalityFields {
        first_field: String,
        second_field: String,
    },

    /// Filter value cannot be coerced to the field's type
    #[error("Invalid value for field {field}: {value}")]
    InvalidFilterValue { field: String, value: String },

    /// Filter names a field the query surface does not expose
    #[error("Unknown query field: {field}")]
    UnknownFilterField { field: String },

    /// Filter names an operator the query surface does not expose
    #[error("Unknown query operator: {operator}")]
    UnknownFilterOperator { operator: String },

    // ===== Storage Errors =====
    /// Transaction lost a commit race on an ownership group
    #[error("Datastore contention on group {group}: {details}")]
    DatastoreContention { group: String, details: String },

    /// Bounded retry gave up on a transient failure
    #[error("Operation {op} failed after {attempts} attempts")]
    RetriesExhausted { op: String, attempts: u32 },

    /// Transaction tried to write an entity outside its enlisted groups
    #[error("Entity {entity} does not belong to any group enlisted in this transaction")]
    CrossGroupWrite { entity: String },

    /// Stored seat counts violate 0 <= seats_available <= max_attendees
    #[error("Conference {conference_key} has {seats_available} seats available but capacity {max_attendees}")]
    SeatInvariantBroken {
        conference_key: String,
        seats_available: u32,
        max_attendees: u32,
    },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    /// Classify this error under the canonical kind taxonomy
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::Unauthorized => ApiErrorKind::Unauthorized,
            ApiError::NotOrganizer { .. } => ApiErrorKind::Forbidden,
            ApiError::ConferenceNotFound { .. } | ApiError::ProfileNotFound { .. } => {
                ApiErrorKind::NotFound
            }
            ApiError::AlreadyRegistered { .. }
            | ApiError::NoSeatsAvailable { .. }
            | ApiError::SeatsExceedCapacity { .. }
            | ApiError::CapacityBelowAllocated { .. } => ApiErrorKind::Conflict,
            ApiError::MissingConferenceName
            | ApiError::InvalidKey { .. }
            | ApiError::MultipleInequalityFields { .. }
            | ApiError::InvalidFilterValue { .. }
            | ApiError::UnknownFilterField { .. }
            | ApiError::UnknownFilterOperator { .. } => ApiErrorKind::InvalidArgument,
            ApiError::DatastoreContention { .. } | ApiError::RetriesExhausted { .. } => {
                ApiErrorKind::Unavailable
            }
            ApiError::CrossGroupWrite { .. }
            | ApiError::SeatInvariantBroken { .. }
            | ApiError::Serialization { .. }
            | ApiError::Internal { .. } => ApiErrorKind::Internal,
        }
    }
}

/// Conversion from ApiError to ApiFault
///
/// Ops return the granular ApiError; the logging and CLI layers report the
/// canonical envelope. The conversion preserves the user-facing message and
/// attaches whatever identifiers the variant carries.
impl From<ApiError> for ApiFault {
    fn from(err: ApiError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            ApiError::Unauthorized | ApiError::MissingConferenceName => {
                ApiFault::new(kind).with_message(message)
            }

            ApiError::NotOrganizer { conference_key }
            | ApiError::ConferenceNotFound { conference_key }
            | ApiError::AlreadyRegistered { conference_key }
            | ApiError::NoSeatsAvailable { conference_key }
            | ApiError::SeatsExceedCapacity { conference_key }
            | ApiError::CapacityBelowAllocated {
                conference_key, ..
            }
            | ApiError::SeatInvariantBroken {
                conference_key, ..
            } => ApiFault::new(kind)
                .with_entity_id(conference_key)
                .with_message(message),

            ApiError::ProfileNotFound { user_id } => ApiFault::new(kind)
                .with_user_id(user_id)
                .with_message(message),

            ApiError::InvalidKey { key } => ApiFault::new(kind)
                .with_entity_id(key)
                .with_message(message),

            ApiError::MultipleInequalityFields { .. }
            | ApiError::InvalidFilterValue { .. }
            | ApiError::UnknownFilterField { .. }
            | ApiError::UnknownFilterOperator { .. } => {
                ApiFault::new(kind).with_op("query").with_message(message)
            }

            ApiError::DatastoreContention { group, .. } => ApiFault::new(kind)
                .with_entity_id(group)
                .with_message(message),

            ApiError::RetriesExhausted { op, .. } => {
                ApiFault::new(kind).with_op(op).with_message(message)
            }

            ApiError::CrossGroupWrite { entity } => ApiFault::new(kind)
                .with_entity_id(entity)
                .with_message(message),

            ApiError::Serialization { .. } | ApiError::Internal { .. } => {
                ApiFault::new(kind).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to ApiError
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Serialization {
            message: err.to_string(),
        }
    }
}
