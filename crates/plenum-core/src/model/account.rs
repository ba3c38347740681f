use chrono::{DateTime, Utc};
use plenum_core_types::UserId;
use serde::{Deserialize, Serialize};

/// Mapping from a login email to the stable user id minted for it
///
/// Identity providers do not always hand back a durable id on first contact,
/// so the engine keeps its own email-to-id table and mints an id the first
/// time an email shows up. Lookups after that always return the same id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(email: impl Into<String>, user_id: UserId) -> Self {
        Self {
            email: email.into(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

/// A fully resolved caller: stable user id plus the email it came from
///
/// Operations that lazily create a profile need both halves, since the
/// default display name is derived from the email.
#[derive(Debug, Clone, PartialEq)]
pub struct CallerIdentity {
    pub user_id: UserId,
    pub email: String,
}

impl CallerIdentity {
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
        }
    }
}
